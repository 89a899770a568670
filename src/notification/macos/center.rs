//! Async wrapper around `UNUserNotificationCenter`.
//!
//! Completion handlers run on a framework queue; each call bridges its
//! handler to a oneshot channel and awaits it.

use std::cell::RefCell;
use std::ptr::NonNull;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::Bool;
use objc2_foundation::{NSArray, NSError, NSString};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNAuthorizationStatus, UNNotificationRequest, UNNotificationSettings,
    UNUserNotificationCenter,
};
use tokio::sync::oneshot;

use crate::notification::NotificationError;

/// Maps a completion handler's `NSError` out-parameter to a result.
fn completion_result(
    error: *mut NSError,
    wrap: fn(String) -> NotificationError,
) -> Result<(), NotificationError> {
    // SAFETY: the framework passes either null or a valid NSError for the
    // duration of the handler.
    match unsafe { error.as_ref() } {
        Some(error) => Err(wrap(error.localizedDescription().to_string())),
        None => Ok(()),
    }
}

fn channel_closed(wrap: fn(String) -> NotificationError) -> NotificationError {
    wrap("completion handler was dropped".to_string())
}

pub struct NotificationCenter;

impl NotificationCenter {
    fn shared() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    /// Prompts for alert and sound permission.
    pub async fn request_authorization() -> Result<bool, NotificationError> {
        let (tx, rx) = oneshot::channel();
        let sender = RefCell::new(Some(tx));
        let handler = RcBlock::new(move |granted: Bool, error: *mut NSError| {
            if let Some(tx) = sender.borrow_mut().take() {
                let result = completion_result(error, NotificationError::AuthorizationFailed)
                    .map(|()| granted.as_bool());
                let _ = tx.send(result);
            }
        });

        Self::shared().requestAuthorizationWithOptions_completionHandler(
            UNAuthorizationOptions::Alert | UNAuthorizationOptions::Sound,
            &handler,
        );

        rx.await
            .map_err(|_| channel_closed(NotificationError::AuthorizationFailed))?
    }

    pub async fn authorization_status() -> Result<UNAuthorizationStatus, NotificationError> {
        let (tx, rx) = oneshot::channel();
        let sender = RefCell::new(Some(tx));
        let handler = RcBlock::new(move |settings: NonNull<UNNotificationSettings>| {
            if let Some(tx) = sender.borrow_mut().take() {
                // SAFETY: settings is valid for the duration of the handler.
                let _ = tx.send(unsafe { settings.as_ref().authorizationStatus() });
            }
        });

        Self::shared().getNotificationSettingsWithCompletionHandler(&handler);

        rx.await
            .map_err(|_| channel_closed(NotificationError::AuthorizationFailed))
    }

    /// Returns true if alerts may be shown, provisionally included.
    pub async fn is_authorized() -> Result<bool, NotificationError> {
        Ok(matches!(
            Self::authorization_status().await?,
            UNAuthorizationStatus::Authorized
                | UNAuthorizationStatus::Provisional
                | UNAuthorizationStatus::Ephemeral
        ))
    }

    /// Hands a request to the notification center.
    pub async fn add(request: &UNNotificationRequest) -> Result<(), NotificationError> {
        let (tx, rx) = oneshot::channel();
        let sender = RefCell::new(Some(tx));
        let handler = RcBlock::new(move |error: *mut NSError| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(completion_result(error, NotificationError::ScheduleFailed));
            }
        });

        Self::shared().addNotificationRequest_withCompletionHandler(request, Some(&handler));

        rx.await
            .map_err(|_| channel_closed(NotificationError::ScheduleFailed))?
    }

    /// Withdraws a pending request. Unknown identifiers are ignored.
    pub fn remove_pending(identifier: &str) {
        let identifier = NSString::from_str(identifier);
        let identifiers: Retained<NSArray<NSString>> = NSArray::from_slice(&[&*identifier]);
        Self::shared().removePendingNotificationRequestsWithIdentifiers(&identifiers);
    }
}
