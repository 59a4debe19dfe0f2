//! Tracing setup for the daemon.
//!
//! Logs always go to stderr. Stdout belongs to the console and json sinks, so
//! `netspeedmon | jq` sees sink output only.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Local wall-clock timestamps with millisecond precision and UTC offset.
pub struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Installs the global subscriber: `RUST_LOG` filter (default "info"),
/// local timestamps, stderr writer.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_timer_format() {
        let mut out = String::new();
        LocalTimer.format_time(&mut Writer::new(&mut out)).unwrap();
        // e.g. 2026-10-19T14:03:07.123+02:00
        assert_eq!(out.len(), 29, "unexpected timestamp {out:?}");
        assert_eq!(&out[4..5], "-");
        assert_eq!(&out[10..11], "T");
        assert_eq!(&out[19..20], ".");
        assert!(matches!(&out[23..24], "+" | "-"));
        assert!(chrono::DateTime::parse_from_str(&out, "%Y-%m-%dT%H:%M:%S%.3f%:z").is_ok());
    }
}
