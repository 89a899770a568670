//! Notification system error types.
//!
//! Every error here is non-fatal to the timers: callers log it and keep the
//! in-app countdown running.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("通知許可の取得に失敗しました: {0}")]
    AuthorizationFailed(String),

    /// Notification permission was denied by the user.
    #[error("通知許可が拒否されています")]
    PermissionDenied,

    /// Failed to schedule a notification.
    #[error("通知の予約に失敗しました: {0}")]
    ScheduleFailed(String),

    /// Failed to cancel a scheduled notification.
    #[error("通知の取り消しに失敗しました: {0}")]
    CancelFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::AuthorizationFailed(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) | Self::PermissionDenied => {
                "設定 > 通知 でアプリの通知を許可してください"
            }
            Self::ScheduleFailed(_) | Self::CancelFailed(_) => {
                "タイマーはアプリ内で引き続き動作します"
            }
        }
    }
}
