// Total rx/tx byte counters: sysinfo-backed and /proc/net/dev-backed sources

mod linux;

pub use linux::{InterfaceCounters, parse_proc_net_dev};

use crate::config::{CounterSourceKind, CountersConfig};
use crate::models::CounterSnapshot;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use sysinfo::Networks;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed counter line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("counter source lock poisoned")]
    Poisoned,
}

/// Capability to read the current cumulative totals on demand.
pub trait CounterSource: Send + Sync {
    fn read(&self) -> Result<CounterSnapshot, SourceError>;
}

impl<T: CounterSource + ?Sized> CounterSource for Arc<T> {
    fn read(&self) -> Result<CounterSnapshot, SourceError> {
        (**self).read()
    }
}

/// Saturating sum of per-interface totals, skipping ignored interfaces.
pub fn sum_counters<'a, I>(interfaces: I, ignore: &[String]) -> CounterSnapshot
where
    I: IntoIterator<Item = (&'a str, u64, u64)>,
{
    interfaces
        .into_iter()
        .filter(|(name, _, _)| !ignore.iter().any(|i| i == name))
        .fold(CounterSnapshot::ZERO, |acc, (_, rx, tx)| CounterSnapshot {
            rx_bytes: acc.rx_bytes.saturating_add(rx),
            tx_bytes: acc.tx_bytes.saturating_add(tx),
        })
}

pub struct SysinfoCounterSource {
    networks: Mutex<Networks>,
    ignore: Vec<String>,
}

impl SysinfoCounterSource {
    pub fn new(ignore: Vec<String>) -> Self {
        Self {
            networks: Mutex::new(Networks::new_with_refreshed_list()),
            ignore,
        }
    }
}

impl CounterSource for SysinfoCounterSource {
    #[instrument(skip(self), level = "trace", fields(source = "sysinfo"))]
    fn read(&self) -> Result<CounterSnapshot, SourceError> {
        let mut networks = self.networks.lock().map_err(|_| SourceError::Poisoned)?;
        networks.refresh(true);
        let totals = networks.list().iter().map(|(name, data)| {
            (
                name.as_str(),
                data.total_received(),
                data.total_transmitted(),
            )
        });
        Ok(sum_counters(totals, &self.ignore))
    }
}

/// Reads `/proc/net/dev` (or a file in the same format) on every call.
pub struct ProcNetDevSource {
    path: PathBuf,
    ignore: Vec<String>,
}

impl ProcNetDevSource {
    pub fn new(path: impl Into<PathBuf>, ignore: Vec<String>) -> Self {
        Self {
            path: path.into(),
            ignore,
        }
    }
}

impl CounterSource for ProcNetDevSource {
    #[instrument(skip(self), level = "trace", fields(source = "procfs"))]
    fn read(&self) -> Result<CounterSnapshot, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| SourceError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        let interfaces = parse_proc_net_dev(&content)?;
        Ok(sum_counters(
            interfaces
                .iter()
                .map(|i| (i.name.as_str(), i.rx_bytes, i.tx_bytes)),
            &self.ignore,
        ))
    }
}

/// Builds the configured counter source.
pub fn from_config(config: &CountersConfig) -> Arc<dyn CounterSource> {
    let ignore = config.ignore_interfaces.clone();
    match config.source {
        CounterSourceKind::Sysinfo => Arc::new(SysinfoCounterSource::new(ignore)),
        CounterSourceKind::Procfs => {
            Arc::new(ProcNetDevSource::new(&config.proc_net_dev_path, ignore))
        }
    }
}
