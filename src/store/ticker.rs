//! Foreground ticker for the timer store.
//!
//! While the cook-mode screen is not presented, the store drives its own
//! countdown: once per second it rederives remaining time from each timer's
//! end time. The ticker never decrements, so missed or late ticks cannot
//! make the display drift.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use super::SharedStore;

/// Default period between recomputations.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// StoreTicker
// ============================================================================

/// Periodic recomputation of the store's timers.
pub struct StoreTicker {
    /// Store being driven
    store: SharedStore,
    /// Period between ticks
    period: Duration,
}

impl StoreTicker {
    /// Creates a ticker with the default one-second period.
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            period: TICK_INTERVAL,
        }
    }

    /// Overrides the tick period.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Performs a single tick.
    ///
    /// Returns true if the store's timers changed.
    pub async fn tick_once(&self) -> bool {
        let mut store = self.store.lock().await;
        if !store.should_tick() {
            return false;
        }
        store.recompute()
    }

    /// Runs the tick loop until `shutdown` flips to true or its sender is
    /// dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("Store ticker stopped");
                        return;
                    }
                }
            }
        }
    }

    /// Spawns the tick loop on the current runtime.
    pub fn spawn(self) -> TickerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        TickerHandle { shutdown_tx, task }
    }
}

/// Handle to a spawned [`StoreTicker`].
pub struct TickerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickerHandle {
    /// Stops the ticker and waits for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}

// ============================================================================
// Tests
// ============================================================================
