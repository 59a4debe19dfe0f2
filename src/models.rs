// Domain models: counter readings, per-tick deltas and what the sink renders

use serde::{Deserialize, Serialize};

/// Cumulative byte counters summed over all monitored interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterSnapshot {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

impl CounterSnapshot {
    pub const ZERO: CounterSnapshot = CounterSnapshot {
        rx_bytes: 0,
        tx_bytes: 0,
    };

    pub fn new(rx_bytes: u64, tx_bytes: u64) -> Self {
        Self { rx_bytes, tx_bytes }
    }

    /// Signed per-direction difference `self - earlier`. A counter that went
    /// backwards (platform reset) yields a negative value.
    pub fn delta_since(&self, earlier: &CounterSnapshot) -> (i64, i64) {
        (
            self.rx_bytes.wrapping_sub(earlier.rx_bytes) as i64,
            self.tx_bytes.wrapping_sub(earlier.tx_bytes) as i64,
        )
    }
}

/// The four quantities computed on every tick, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deltas {
    pub download_rate: i64,
    pub upload_rate: i64,
    pub session_download: i64,
    pub session_upload: i64,
}

impl Deltas {
    pub fn between(
        current: &CounterSnapshot,
        previous: &CounterSnapshot,
        baseline: &CounterSnapshot,
    ) -> Self {
        let (download_rate, upload_rate) = current.delta_since(previous);
        let (session_download, session_upload) = current.delta_since(baseline);
        Self {
            download_rate,
            upload_rate,
            session_download,
            session_upload,
        }
    }

    pub fn has_negative(&self) -> bool {
        self.download_rate < 0
            || self.upload_rate < 0
            || self.session_download < 0
            || self.session_upload < 0
    }

    pub fn clamped(self) -> Self {
        Self {
            download_rate: self.download_rate.max(0),
            upload_rate: self.upload_rate.max(0),
            session_download: self.session_download.max(0),
            session_upload: self.session_upload.max(0),
        }
    }

    /// Combined rate shown in the compact icon.
    pub fn total_rate(&self) -> i64 {
        self.download_rate.wrapping_add(self.upload_rate)
    }
}

/// Compact two-line form drawn inside the icon glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconText {
    pub magnitude: String,
    pub unit: String,
}

impl IconText {
    pub fn new(magnitude: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit: unit.into(),
        }
    }
}

/// Everything the presentation sink receives for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub icon: IconText,
    pub download: String,
    pub upload: String,
    pub session_download: String,
    pub session_upload: String,
}

impl TickReport {
    /// Content shown between activation and the first tick.
    pub fn placeholder() -> Self {
        Self {
            icon: IconText::new("0", "Kb/s"),
            download: "0Kb/s".into(),
            upload: "0Kb/s".into(),
            session_download: "0Kb".into(),
            session_upload: "0Kb".into(),
        }
    }
}

/// Observable lifecycle of the monitor; serializes to lowercase JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    Stopped,
    Running,
}

impl MonitorState {
    pub fn is_running(self) -> bool {
        matches!(self, MonitorState::Running)
    }
}
