//! macOS notification backend using `objc2-user-notifications`.
//!
//! # Requirements
//!
//! - macOS 10.14+
//! - The binary must be code-signed for notifications to work properly
//!
//! ```bash
//! codesign --force --deep --sign - target/release/cook-timer
//! ```

mod center;
mod content;
mod request;

use std::time::Duration;

pub use self::content::{create_timer_content, NotificationContentBuilder, TIMER_CATEGORY};

use self::center::NotificationCenter;
use self::request::create_timer_request;
use super::{NotificationError, NotificationId, NotificationScheduler, TimerNotificationContent};

/// Schedules timer notifications through `UNUserNotificationCenter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserNotificationScheduler;

impl UserNotificationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationScheduler for UserNotificationScheduler {
    async fn is_authorized(&self) -> Result<bool, NotificationError> {
        NotificationCenter::is_authorized().await
    }

    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        NotificationCenter::request_authorization().await
    }

    async fn schedule(
        &self,
        content: &TimerNotificationContent,
        delay: Duration,
    ) -> Result<NotificationId, NotificationError> {
        let id = NotificationId::generate();
        let request = {
            let native = create_timer_content(content);
            create_timer_request(id.as_str(), &native, delay.as_secs_f64())
        };
        NotificationCenter::add(&request).await?;
        Ok(id)
    }

    async fn cancel(&self, id: &NotificationId) -> Result<(), NotificationError> {
        NotificationCenter::remove_pending(id.as_str());
        Ok(())
    }
}
