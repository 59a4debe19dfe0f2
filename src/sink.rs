// Presentation sinks: where each tick's formatted strings end up

use crate::config::SinkKind;
use crate::models::TickReport;
use serde::Serialize;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Receives formatted output from the monitor. Called with the sampler lock
/// held, so calls never interleave and nothing arrives after `on_stop`.
pub trait PresentationSink: Send + Sync {
    /// Once per activation, before the first tick.
    fn on_start(&self, _placeholder: &TickReport) {}

    /// Exactly once per successful tick.
    fn on_tick(&self, report: &TickReport);

    /// Once per deactivation.
    fn on_stop(&self) {}
}

impl<T: PresentationSink + ?Sized> PresentationSink for Arc<T> {
    fn on_start(&self, placeholder: &TickReport) {
        (**self).on_start(placeholder)
    }

    fn on_tick(&self, report: &TickReport) {
        (**self).on_tick(report)
    }

    fn on_stop(&self) {
        (**self).on_stop()
    }
}

/// Notification-style text: icon glyph, rate line, session line.
pub fn status_line(report: &TickReport) -> String {
    format!(
        "[{} {}] Down: {}  Up: {} | Session Down: {}  Up: {}",
        report.icon.magnitude,
        report.icon.unit,
        report.download,
        report.upload,
        report.session_download,
        report.session_upload
    )
}

/// Emits one structured INFO event per tick.
#[derive(Debug, Default)]
pub struct LogSink;

impl PresentationSink for LogSink {
    fn on_start(&self, _placeholder: &TickReport) {
        tracing::info!("monitoring started");
    }

    fn on_tick(&self, report: &TickReport) {
        tracing::info!(
            icon = %format_args!("{} {}", report.icon.magnitude, report.icon.unit),
            down = %report.download,
            up = %report.upload,
            session_down = %report.session_download,
            session_up = %report.session_upload,
            "throughput"
        );
    }

    fn on_stop(&self) {
        tracing::info!("monitoring stopped");
    }
}

/// Writes `status_line` per tick to a writer (stdout in the daemon).
pub struct ConsoleSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn write_line(&self, line: &str) {
        let Ok(mut out) = self.out.lock() else {
            tracing::warn!(operation = "console_sink", "writer lock poisoned");
            return;
        };
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            tracing::warn!(error = %e, operation = "console_sink", "write failed");
        }
    }
}

impl<W: Write + Send> PresentationSink for ConsoleSink<W> {
    fn on_start(&self, placeholder: &TickReport) {
        self.write_line(&status_line(placeholder));
    }

    fn on_tick(&self, report: &TickReport) {
        self.write_line(&status_line(report));
    }

    fn on_stop(&self) {
        self.write_line("stopped");
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum JsonEvent<'a> {
    Start(&'a TickReport),
    Tick(&'a TickReport),
    Stop,
}

/// One JSON object per line: `{"event":"tick","icon":{...},"download":...}`.
pub struct JsonSink<W: Write + Send> {
    out: Mutex<W>,
}

impl JsonSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: &JsonEvent<'_>) {
        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, operation = "json_sink", "serialize failed");
                return;
            }
        };
        let Ok(mut out) = self.out.lock() else {
            tracing::warn!(operation = "json_sink", "writer lock poisoned");
            return;
        };
        if let Err(e) = writeln!(out, "{json}").and_then(|_| out.flush()) {
            tracing::warn!(error = %e, operation = "json_sink", "write failed");
        }
    }
}

impl<W: Write + Send> PresentationSink for JsonSink<W> {
    fn on_start(&self, placeholder: &TickReport) {
        self.emit(&JsonEvent::Start(placeholder));
    }

    fn on_tick(&self, report: &TickReport) {
        self.emit(&JsonEvent::Tick(report));
    }

    fn on_stop(&self) {
        self.emit(&JsonEvent::Stop);
    }
}

pub fn from_config(kind: SinkKind) -> Arc<dyn PresentationSink> {
    match kind {
        SinkKind::Console => Arc::new(ConsoleSink::stdout()),
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::Json => Arc::new(JsonSink::stdout()),
    }
}
