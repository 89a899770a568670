//! Cook Timer Library
//!
//! This library provides the timer core of a recipe app's cook mode.
//! It includes:
//! - A shared timer store that survives leaving the cook-mode screen
//! - A foreground ticker and an app-lifecycle resync, both wall-clock based
//! - Background notifications scheduled for each running step timer
//! - The cook-mode controller and the floating-timer view model
//! - Persisted preferences (theme, timer sound, chat history)
//! - CLI command parsing and display utilities

pub mod cli;
pub mod clock;
pub mod cook;
pub mod notification;
pub mod overlay;
pub mod prefs;
pub mod sound;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use cook::{CookModeController, CookModeError};
pub use notification::{
    ConsoleNotificationScheduler, MockNotificationScheduler, NotificationError, NotificationId,
    NotificationScheduler, SharedNotifier, TimerNotifier,
};
pub use overlay::{floating_timer, FloatingTimer};
pub use prefs::{Preferences, PrefsError, ThemePreference};
pub use sound::{SoundError, TimerSound};
pub use store::{
    shared_store, LifecycleListener, SharedStore, StoreEvent, StoreTicker, TimerStore,
};
pub use types::{AppState, CookingSession, Location, SessionUpdate, TimerMap, TimerState};
