//! Cancellable repeating tick loops

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Identifies one scheduled tick loop
pub type LoopId = u64;

/// Handle to a running tick loop. Cancels the loop when cancelled or dropped.
pub struct TickHandle {
    id: LoopId,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TickHandle {
    pub fn new(id: LoopId, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn id(&self) -> LoopId {
        self.id
    }

    pub fn cancel(mut self) {
        self.cancel_inner();
    }

    fn cancel_inner(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel_inner();
    }
}

impl std::fmt::Debug for TickHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHandle").field("id", &self.id).finish()
    }
}

/// Schedules repeating tick loops
pub trait Ticker: Send {
    fn schedule(&mut self, period: Duration) -> TickHandle;
}

/// Runs each loop as a tokio task that sends its id down a channel every
/// period. The receiving side delivers the ticks to the engine.
#[derive(Debug)]
pub struct IntervalTicker {
    tx: mpsc::UnboundedSender<LoopId>,
    next_id: LoopId,
}

impl IntervalTicker {
    pub fn new(tx: mpsc::UnboundedSender<LoopId>) -> Self {
        Self { tx, next_id: 1 }
    }

    /// Create a ticker together with the receiver its loops send to
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LoopId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Ticker for IntervalTicker {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        let id = self.next_id;
        self.next_id += 1;

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            // First tick one period from now, not immediately
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });

        debug!("Scheduled tick loop {} every {:?}", id, period);
        TickHandle::new(id, move || {
            debug!("Cancelled tick loop {}", id);
            task.abort();
        })
    }
}

/// Ticker that never fires on its own; tracks which loops are alive so
/// callers can drive ticks by hand.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    active: Arc<Mutex<BTreeSet<LoopId>>>,
    scheduled: Arc<Mutex<Vec<Duration>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of loops scheduled and not yet cancelled
    pub fn active_loops(&self) -> Vec<LoopId> {
        self.active
            .lock()
            .map(|active| active.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Periods of every loop ever scheduled
    pub fn scheduled_periods(&self) -> Vec<Duration> {
        self.scheduled
            .lock()
            .map(|scheduled| scheduled.clone())
            .unwrap_or_default()
    }
}

impl Ticker for ManualTicker {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        let id = match self.scheduled.lock() {
            Ok(mut scheduled) => {
                scheduled.push(period);
                scheduled.len() as LoopId
            }
            Err(_) => 0,
        };
        if let Ok(mut active) = self.active.lock() {
            active.insert(id);
        }

        let active = Arc::clone(&self.active);
        TickHandle::new(id, move || {
            if let Ok(mut active) = active.lock() {
                active.remove(&id);
            }
        })
    }
}
