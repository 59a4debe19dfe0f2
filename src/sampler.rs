// Sampler state machine: baseline capture, per-tick deltas, reset on stop.
// Owns no timer; the worker drives `tick` and serializes access.

use crate::config::CounterResetPolicy;
use crate::counter_repo::{CounterSource, SourceError};
use crate::formatting::format_report;
use crate::models::{CounterSnapshot, Deltas, TickReport};

/// Result of one successful tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub current: CounterSnapshot,
    pub deltas: Deltas,
    pub report: TickReport,
}

#[derive(Debug)]
pub struct Sampler {
    policy: CounterResetPolicy,
    previous: CounterSnapshot,
    baseline: CounterSnapshot,
    running: bool,
    ticks_total: u64,
    read_errors_total: u64,
}

impl Sampler {
    pub fn new(policy: CounterResetPolicy) -> Self {
        Self {
            policy,
            previous: CounterSnapshot::ZERO,
            baseline: CounterSnapshot::ZERO,
            running: false,
            ticks_total: 0,
            read_errors_total: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn previous(&self) -> CounterSnapshot {
        self.previous
    }

    pub fn baseline(&self) -> CounterSnapshot {
        self.baseline
    }

    /// Successful ticks since the sampler was created.
    pub fn ticks_total(&self) -> u64 {
        self.ticks_total
    }

    /// Failed counter reads since the sampler was created.
    pub fn read_errors_total(&self) -> u64 {
        self.read_errors_total
    }

    /// Captures the session baseline. Returns `Ok(false)` if already running.
    pub fn activate(&mut self, source: &dyn CounterSource) -> Result<bool, SourceError> {
        if self.running {
            return Ok(false);
        }
        let now = source.read()?;
        self.previous = now;
        self.baseline = now;
        self.running = true;
        tracing::debug!(
            rx_bytes = now.rx_bytes,
            tx_bytes = now.tx_bytes,
            "session baseline captured"
        );
        Ok(true)
    }

    /// One sampling step. `None` when stopped; the caller must not reschedule.
    ///
    /// On a read error `previous` is kept, so the next successful tick covers
    /// the skipped interval.
    pub fn tick(&mut self, source: &dyn CounterSource) -> Option<Result<Sample, SourceError>> {
        if !self.running {
            return None;
        }
        let current = match source.read() {
            Ok(c) => c,
            Err(e) => {
                self.read_errors_total += 1;
                return Some(Err(e));
            }
        };

        let raw = Deltas::between(&current, &self.previous, &self.baseline);
        if raw.has_negative() {
            tracing::debug!(
                rx_went_back = raw.download_rate < 0,
                tx_went_back = raw.upload_rate < 0,
                policy = ?self.policy,
                "counter decreased since previous sample"
            );
        }
        let deltas = match self.policy {
            CounterResetPolicy::PassThrough => raw,
            CounterResetPolicy::Clamp => raw.clamped(),
        };

        self.previous = current;
        self.ticks_total += 1;
        Some(Ok(Sample {
            current,
            deltas,
            report: format_report(&deltas),
        }))
    }

    /// Ends the session. Returns false if already stopped.
    pub fn deactivate(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        self.previous = CounterSnapshot::ZERO;
        self.baseline = CounterSnapshot::ZERO;
        true
    }
}
