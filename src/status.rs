//! Status event bus.
//!
//! Pipeline stages push [`StatusEvent`]s into an unbounded channel; a single
//! sink task drains the channel and writes one line per event, so output
//! preserves emission order. Each source has its own enable switch. Trainer
//! lines carry the elapsed milliseconds of the current run clock,
//! right-aligned in a ten character field.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSource {
    Initializer,
    DataProvider,
    Trainer,
}

#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub source: StatusSource,
    pub message: String,
}

/// Per-channel enable switches. Initializer and data-provider events are on
/// from the start; the trainer channel is switched on when a trainer is
/// wired into a pipeline (or by `log on`).
#[derive(Debug)]
pub struct ChannelToggles {
    initializer: AtomicBool,
    data_provider: AtomicBool,
    trainer: AtomicBool,
}

impl ChannelToggles {
    pub fn new() -> Self {
        Self {
            initializer: AtomicBool::new(true),
            data_provider: AtomicBool::new(true),
            trainer: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self, source: StatusSource) -> bool {
        self.flag(source).load(Ordering::Relaxed)
    }

    pub fn enable(&self, source: StatusSource) {
        self.flag(source).store(true, Ordering::Relaxed);
    }

    pub fn set_all(&self, enabled: bool) {
        self.initializer.store(enabled, Ordering::Relaxed);
        self.data_provider.store(enabled, Ordering::Relaxed);
        self.trainer.store(enabled, Ordering::Relaxed);
    }

    fn flag(&self, source: StatusSource) -> &AtomicBool {
        match source {
            StatusSource::Initializer => &self.initializer,
            StatusSource::DataProvider => &self.data_provider,
            StatusSource::Trainer => &self.trainer,
        }
    }
}

impl Default for ChannelToggles {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct ClockState {
    started: Option<Instant>,
    accumulated: Duration,
}

/// Wall clock for one training run: reset and started before training,
/// stopped after. Readable while running.
#[derive(Debug, Default)]
pub struct RunClock {
    state: Mutex<ClockState>,
}

impl RunClock {
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = ClockState::default();
        }
    }

    pub fn start(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.started = Some(Instant::now());
        }
    }

    pub fn stop(&self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(started) = state.started.take() {
                state.accumulated += started.elapsed();
            }
        }
    }

    pub fn elapsed_millis(&self) -> u128 {
        match self.state.lock() {
            Ok(state) => {
                let running = state.started.map(|s| s.elapsed()).unwrap_or_default();
                (state.accumulated + running).as_millis()
            }
            Err(_) => 0,
        }
    }
}

/// Producer half of the bus, cloned into every stage that reports status.
/// Sending after the sink is gone silently drops the event.
#[derive(Debug, Clone)]
pub struct StatusSender {
    tx: UnboundedSender<StatusEvent>,
}

impl StatusSender {
    pub fn initializer(&self, message: impl Into<String>) {
        self.send(StatusSource::Initializer, message.into());
    }

    pub fn data_provider(&self, message: impl Into<String>) {
        self.send(StatusSource::DataProvider, message.into());
    }

    pub fn trainer(&self, message: impl Into<String>) {
        self.send(StatusSource::Trainer, message.into());
    }

    fn send(&self, source: StatusSource, message: String) {
        let _ = self.tx.send(StatusEvent { source, message });
    }
}

pub fn channel() -> (StatusSender, UnboundedReceiver<StatusEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (StatusSender { tx }, rx)
}

/// Drain events into `sink` until every sender is gone. Disabled channels
/// are suppressed at this single consumer, which is what keeps the output
/// ordered: there is exactly one writer.
pub async fn run_sink<W: Write>(
    mut rx: UnboundedReceiver<StatusEvent>,
    toggles: Arc<ChannelToggles>,
    clock: Arc<RunClock>,
    mut sink: W,
) {
    while let Some(event) = rx.recv().await {
        if !toggles.is_enabled(event.source) {
            continue;
        }
        let result = match event.source {
            StatusSource::Trainer => {
                writeln!(sink, "{:>10}: {}", clock.elapsed_millis(), event.message)
            }
            _ => writeln!(sink, "{}", event.message),
        };
        if result.is_err() {
            break;
        }
    }
}

/// Spawn the sink task against stdout. The task ends when the last
/// [`StatusSender`] is dropped.
pub fn spawn_sink(
    rx: UnboundedReceiver<StatusEvent>,
    toggles: Arc<ChannelToggles>,
    clock: Arc<RunClock>,
) -> JoinHandle<()> {
    tokio::spawn(run_sink(rx, toggles, clock, std::io::stdout()))
}
