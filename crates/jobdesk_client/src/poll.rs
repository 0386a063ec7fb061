use std::sync::mpsc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Emits [`EngineEvent::PollDue`] every `interval` until `cancel` fires.
///
/// The first tick comes one full interval after start; the caller performs
/// the immediate fetch itself. A slow consumer delays later ticks rather than
/// bursting to catch up.
pub async fn run_poll_timer(interval: Duration, cancel: CancellationToken, sink: &dyn EventSink) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => sink.emit(EngineEvent::PollDue),
        }
    }
}
