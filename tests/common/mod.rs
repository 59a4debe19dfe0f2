// Shared test helpers: a counter source the test moves by hand, and a sink
// that records everything it receives.
#![allow(dead_code)]

use netspeedmon::counter_repo::{CounterSource, SourceError};
use netspeedmon::models::{CounterSnapshot, TickReport};
use netspeedmon::sink::PresentationSink;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Returns whatever counters the test last set; can be told to fail.
pub struct FakeCounterSource {
    current: Mutex<CounterSnapshot>,
    failing: AtomicBool,
    reads: AtomicUsize,
}

impl FakeCounterSource {
    pub fn new(rx: u64, tx: u64) -> Self {
        Self {
            current: Mutex::new(CounterSnapshot::new(rx, tx)),
            failing: AtomicBool::new(false),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, rx: u64, tx: u64) {
        *self.current.lock().unwrap() = CounterSnapshot::new(rx, tx);
    }

    pub fn add(&self, rx: u64, tx: u64) {
        let mut c = self.current.lock().unwrap();
        c.rx_bytes += rx;
        c.tx_bytes += tx;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CounterSource for FakeCounterSource {
    fn read(&self) -> Result<CounterSnapshot, SourceError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Poisoned);
        }
        Ok(*self.current.lock().unwrap())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Start(TickReport),
    Tick(TickReport),
    Stop,
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn ticks(&self) -> Vec<TickReport> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Tick(r) => Some(r),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for RecordingSink {
    fn on_start(&self, placeholder: &TickReport) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Start(placeholder.clone()));
    }

    fn on_tick(&self, report: &TickReport) {
        self.events
            .lock()
            .unwrap()
            .push(SinkEvent::Tick(report.clone()));
    }

    fn on_stop(&self) {
        self.events.lock().unwrap().push(SinkEvent::Stop);
    }
}
