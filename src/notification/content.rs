//! Platform-independent notification content.

use serde::{Deserialize, Serialize};

use crate::sound::TimerSound;

/// Maximum length for step text in notifications.
const MAX_STEP_TEXT_LENGTH: usize = 100;

/// Title of every timer-finished notification.
pub const TIMER_NOTIFICATION_TITLE: &str = "⏰ タイマー終了";

/// What a timer-finished notification shows and plays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerNotificationContent {
    /// Step index the timer belongs to
    pub step: u32,
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Sound to play on delivery
    pub sound: TimerSound,
}

impl TimerNotificationContent {
    /// Builds the content for the timer of `step`.
    pub fn for_step(step: u32, step_text: &str, sound: TimerSound) -> Self {
        let body = match sanitize_step_text(step_text) {
            Some(text) => format!("ステップ {}: {}", step + 1, text),
            None => format!("ステップ {} のタイマーが終了しました", step + 1),
        };

        Self {
            step,
            title: TIMER_NOTIFICATION_TITLE.to_string(),
            body,
            sound,
        }
    }
}

/// Sanitizes step text for use in notifications.
///
/// Returns `None` if nothing printable is left.
pub fn sanitize_step_text(text: &str) -> Option<String> {
    let sanitized: String = text
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_STEP_TEXT_LENGTH)
        .collect();
    let trimmed = sanitized.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
