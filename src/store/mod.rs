//! Timer store shared by the cook-mode screen and the floating timer.
//!
//! - `provider`: the store itself (timers, session, recomputation)
//! - `ticker`: the one-second loop that drives the store outside cook mode
//! - `lifecycle`: immediate resync on return to the foreground

pub mod lifecycle;
pub mod provider;
pub mod ticker;

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

use crate::clock::Clock;

pub use lifecycle::LifecycleListener;
pub use provider::{StoreEvent, TimerStore};
pub use ticker::{StoreTicker, TickerHandle, TICK_INTERVAL};

/// Store handle shared across tasks.
pub type SharedStore = Arc<Mutex<TimerStore>>;

/// Creates a shared store and the receiver for its events.
pub fn shared_store(clock: Arc<dyn Clock>) -> (SharedStore, mpsc::UnboundedReceiver<StoreEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(Mutex::new(TimerStore::new(clock, tx))), rx)
}
