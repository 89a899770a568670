//! App lifecycle listener.
//!
//! While the app is suspended nothing ticks, so on return to the foreground
//! every timer is rederived from its end time right away instead of on the
//! next one-second tick. Notifications whose fire time passed while away have
//! been delivered by the OS and are forgotten.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::SharedStore;
use crate::notification::{NotificationScheduler, SharedNotifier};
use crate::types::AppState;

/// Reacts to foreground/background transitions.
pub struct LifecycleListener<S> {
    /// Store to resync
    store: SharedStore,
    /// Notifier whose fired handles are dropped on resume
    notifier: SharedNotifier<S>,
    /// Last observed state
    current: AppState,
}

impl<S: NotificationScheduler> LifecycleListener<S> {
    /// Creates a listener assuming the app starts in the foreground.
    pub fn new(store: SharedStore, notifier: SharedNotifier<S>) -> Self {
        Self {
            store,
            notifier,
            current: AppState::Active,
        }
    }

    /// Returns the last observed state.
    pub fn current(&self) -> AppState {
        self.current
    }

    /// Handles one lifecycle transition.
    ///
    /// Returns true if returning to the foreground changed any timer.
    pub async fn on_app_state_change(&mut self, next: AppState) -> bool {
        let previous = std::mem::replace(&mut self.current, next);
        debug!(from = previous.as_str(), to = next.as_str(), "App state changed");

        if !(previous.is_away() && next == AppState::Active) {
            return false;
        }

        let (changed, now) = {
            let mut store = self.store.lock().await;
            (store.recompute(), store.clock().now_ms())
        };
        let fired = self.notifier.lock().await.prune_fired(now);

        info!(changed, ?fired, "Timers resynced after returning to foreground");
        changed
    }

    /// Processes transitions until the sender side is dropped.
    pub async fn run(mut self, mut states: mpsc::UnboundedReceiver<AppState>) {
        while let Some(next) = states.recv().await {
            self.on_app_state_change(next).await;
        }
        debug!("Lifecycle listener stopped");
    }
}

impl<S> LifecycleListener<S>
where
    S: NotificationScheduler + Send + Sync + 'static,
{
    /// Spawns the listener on the current runtime.
    pub fn spawn(self, states: mpsc::UnboundedReceiver<AppState>) -> JoinHandle<()> {
        tokio::spawn(self.run(states))
    }
}

// ============================================================================
// Tests
// ============================================================================
