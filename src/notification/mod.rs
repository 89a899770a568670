//! Background notifications for step timers.
//!
//! Each running timer gets one OS-level local notification, scheduled to fire
//! at the timer's end time so the user hears about it even if the app is
//! suspended. The module is split into:
//!
//! - [`NotificationScheduler`]: the seam to the platform notification API
//! - [`TimerNotifier`]: per-step bookkeeping on top of a scheduler
//! - Backends: [`MockNotificationScheduler`] for tests,
//!   [`ConsoleNotificationScheduler`] for terminals, and
//!   `UserNotificationScheduler` on macOS
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cook_timer::clock::SystemClock;
//! use cook_timer::notification::{ConsoleNotificationScheduler, TimerNotifier};
//! use cook_timer::sound::TimerSound;
//!
//! let mut notifier = TimerNotifier::new(ConsoleNotificationScheduler::new(), Arc::new(SystemClock));
//! notifier
//!     .schedule_timer_notification(2, 60, "Simmer the sauce", TimerSound::Chime)
//!     .await;
//! ```
//!
//! # Failure handling
//!
//! Scheduling and cancellation failures are logged and swallowed; the in-app
//! countdown keeps working without the OS layer. A refused permission is
//! reported through [`TimerNotifier::permission_denied`].

mod console;
mod content;
pub mod error;
mod mock;
mod timer;

#[cfg(target_os = "macos")]
pub mod macos;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

pub use self::console::ConsoleNotificationScheduler;
pub use self::content::{sanitize_step_text, TimerNotificationContent, TIMER_NOTIFICATION_TITLE};
pub use self::error::NotificationError;
pub use self::mock::{MockNotificationScheduler, ScheduledRequest};
pub use self::timer::{ScheduledNotification, TimerNotifier};

#[cfg(target_os = "macos")]
pub use self::macos::UserNotificationScheduler;

/// Notifier shared between the cook-mode screen and the lifecycle listener.
pub type SharedNotifier<S> = Arc<Mutex<TimerNotifier<S>>>;

// ============================================================================
// NotificationId
// ============================================================================

/// Opaque handle the platform returns for a scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Wraps a platform identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// NotificationScheduler
// ============================================================================

/// Platform API for time-triggered local notifications.
#[allow(async_fn_in_trait)]
pub trait NotificationScheduler {
    /// Returns true if notifications are currently permitted.
    async fn is_authorized(&self) -> Result<bool, NotificationError>;

    /// Asks the user for permission. Returns whether it was granted.
    async fn request_authorization(&self) -> Result<bool, NotificationError>;

    /// Schedules `content` to be delivered after `delay`.
    async fn schedule(
        &self,
        content: &TimerNotificationContent,
        delay: Duration,
    ) -> Result<NotificationId, NotificationError>;

    /// Cancels a pending notification. Unknown ids are ignored.
    async fn cancel(&self, id: &NotificationId) -> Result<(), NotificationError>;
}

impl<T: NotificationScheduler> NotificationScheduler for Arc<T> {
    async fn is_authorized(&self) -> Result<bool, NotificationError> {
        (**self).is_authorized().await
    }

    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        (**self).request_authorization().await
    }

    async fn schedule(
        &self,
        content: &TimerNotificationContent,
        delay: Duration,
    ) -> Result<NotificationId, NotificationError> {
        (**self).schedule(content, delay).await
    }

    async fn cancel(&self, id: &NotificationId) -> Result<(), NotificationError> {
        (**self).cancel(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = NotificationId::generate();
        let b = NotificationId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = NotificationId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_eq!(id.to_string(), "abc");
    }
}
