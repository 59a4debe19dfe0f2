// Monitor service: owns the sampler, drives it from a 1 s timer task and
// exposes start/stop/is_running plus per-subscriber streams of state
// transitions.
//
// Locking: `control` (async) serializes start/stop including spawning and
// joining the timer task. `sampler` (sync) is taken by start/stop and by every
// tick; the tick calls the sink while holding it.

use crate::config::CounterResetPolicy;
use crate::counter_repo::{CounterSource, SourceError};
use crate::models::{MonitorState, TickReport};
use crate::sampler::Sampler;
use crate::sink::PresentationSink;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::Instrument;

/// Fixed sampling interval; rates are bytes per interval, labelled per second.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);

/// Source and sink the monitor talks to.
pub struct WorkerDeps {
    pub source: Arc<dyn CounterSource>,
    pub sink: Arc<dyn PresentationSink>,
}

pub struct WorkerConfig {
    pub counter_reset: CounterResetPolicy,
    /// How often to log sampler stats (real seconds).
    pub stats_log_interval_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            counter_reset: CounterResetPolicy::PassThrough,
            stats_log_interval_secs: 60,
        }
    }
}

struct Shared {
    sampler: Mutex<Sampler>,
    source: Arc<dyn CounterSource>,
    sink: Arc<dyn PresentationSink>,
}

impl Shared {
    fn sampler(&self) -> MutexGuard<'_, Sampler> {
        // Sampler state stays consistent even if a sink panicked mid-tick.
        self.sampler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct RunningTask {
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct Monitor {
    shared: Arc<Shared>,
    control: tokio::sync::Mutex<Option<RunningTask>>,
    // Unbounded per subscriber, so a slow reader never loses a transition.
    subscribers: Mutex<Vec<mpsc::UnboundedSender<MonitorState>>>,
    stats_log_interval: Duration,
}

impl Monitor {
    pub fn new(deps: WorkerDeps, config: WorkerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                sampler: Mutex::new(Sampler::new(config.counter_reset)),
                source: deps.source,
                sink: deps.sink,
            }),
            control: tokio::sync::Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            stats_log_interval: Duration::from_secs(config.stats_log_interval_secs.max(1)),
        }
    }

    /// Starts a session. Returns `Ok(false)` if already running (no second
    /// timer, no new baseline).
    pub async fn start(&self) -> Result<bool, SourceError> {
        let mut control = self.control.lock().await;
        {
            let mut sampler = self.shared.sampler();
            if !sampler.activate(self.shared.source.as_ref())? {
                return Ok(false);
            }
            self.shared.sink.on_start(&TickReport::placeholder());
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let span = tracing::span!(
            tracing::Level::DEBUG,
            "sampler",
            interval_ms = SAMPLE_INTERVAL.as_millis() as u64
        );
        let handle = tokio::spawn(
            run_ticks(self.shared.clone(), shutdown_rx, self.stats_log_interval).instrument(span),
        );
        *control = Some(RunningTask {
            shutdown_tx,
            handle,
        });
        tracing::info!("monitor started");
        self.publish(MonitorState::Running);
        Ok(true)
    }

    /// Ends the session. Returns false if already stopped. When this returns,
    /// no further reads or sink calls happen for the old session.
    pub async fn stop(&self) -> bool {
        let mut control = self.control.lock().await;
        {
            let mut sampler = self.shared.sampler();
            if !sampler.deactivate() {
                return false;
            }
            self.shared.sink.on_stop();
        }

        if let Some(task) = control.take() {
            let _ = task.shutdown_tx.send(());
            if let Err(e) = task.handle.await {
                tracing::warn!(error = %e, operation = "join_sampler_task", "sampler task failed");
            }
        }
        tracing::info!("monitor stopped");
        self.publish(MonitorState::Stopped);
        true
    }

    pub fn is_running(&self) -> bool {
        self.shared.sampler().is_running()
    }

    pub fn state(&self) -> MonitorState {
        if self.is_running() {
            MonitorState::Running
        } else {
            MonitorState::Stopped
        }
    }

    /// Every transition published after this call, in order, however late
    /// the receiver drains.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<MonitorState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// (successful ticks, failed reads) since the monitor was created.
    pub fn stats(&self) -> (u64, u64) {
        let sampler = self.shared.sampler();
        (sampler.ticks_total(), sampler.read_errors_total())
    }

    fn publish(&self, state: MonitorState) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        // Dropped receivers are pruned here.
        subscribers.retain(|tx| tx.send(state).is_ok());
        tracing::trace!(?state, subscribers = subscribers.len(), "state published");
    }
}

async fn run_ticks(
    shared: Arc<Shared>,
    mut shutdown_rx: oneshot::Receiver<()>,
    stats_log_interval: Duration,
) {
    let start = Instant::now();
    let mut tick = interval_at(start + SAMPLE_INTERVAL, SAMPLE_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut stats_log_tick = interval_at(start + stats_log_interval, stats_log_interval);
    stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if !tick_once(&shared) {
                    tracing::debug!("sampler stopped; timer exiting");
                    break;
                }
            }
            _ = stats_log_tick.tick() => {
                let sampler = shared.sampler();
                tracing::info!(
                    ticks_total = sampler.ticks_total(),
                    read_errors_total = sampler.read_errors_total(),
                    "monitor stats"
                );
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("sampler task shutting down");
                break;
            }
        }
    }
}

/// One sampling step under the sampler lock. Returns false once stopped.
///
/// A panicking sink must not take the timer down with it: the sampler would
/// stay `running` with nothing driving it.
fn tick_once(shared: &Shared) -> bool {
    let mut sampler = shared.sampler();
    match sampler.tick(shared.source.as_ref()) {
        None => false,
        Some(Ok(sample)) => {
            tracing::trace!(
                download_rate = sample.deltas.download_rate,
                upload_rate = sample.deltas.upload_rate,
                session_download = sample.deltas.session_download,
                session_upload = sample.deltas.session_upload,
                "tick"
            );
            let delivered =
                std::panic::catch_unwind(AssertUnwindSafe(|| shared.sink.on_tick(&sample.report)));
            if delivered.is_err() {
                tracing::warn!(operation = "sink_on_tick", "sink panicked; tick dropped");
            }
            true
        }
        Some(Err(e)) => {
            tracing::warn!(
                error = %e,
                operation = "read_counters",
                "counter read failed; skipping tick"
            );
            true
        }
    }
}
