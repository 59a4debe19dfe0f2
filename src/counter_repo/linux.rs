// /proc/net/dev parsing.
//
// Format: two header lines, then one row per interface:
//   "  eth0: <rx bytes> <rx packets> ... (8 rx fields) <tx bytes> ... (8 tx fields)"

use super::SourceError;

const HEADER_LINES: usize = 2;
const RX_BYTES_FIELD: usize = 0;
const TX_BYTES_FIELD: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

pub fn parse_proc_net_dev(content: &str) -> Result<Vec<InterfaceCounters>, SourceError> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(HEADER_LINES) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let (name, fields) = line.split_once(':').ok_or_else(|| SourceError::Parse {
            line: line_no,
            reason: "missing ':' after interface name".into(),
        })?;
        let fields: Vec<&str> = fields.split_whitespace().collect();
        let field = |i: usize| -> Result<u64, SourceError> {
            let raw = fields.get(i).ok_or_else(|| SourceError::Parse {
                line: line_no,
                reason: format!(
                    "expected at least {} fields, got {}",
                    TX_BYTES_FIELD + 1,
                    fields.len()
                ),
            })?;
            raw.parse::<u64>().map_err(|e| SourceError::Parse {
                line: line_no,
                reason: format!("field {i} ({raw:?}): {e}"),
            })
        };
        out.push(InterfaceCounters {
            name: name.trim().to_string(),
            rx_bytes: field(RX_BYTES_FIELD)?,
            tx_bytes: field(TX_BYTES_FIELD)?,
        });
    }
    Ok(out)
}
