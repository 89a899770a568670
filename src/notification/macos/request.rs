//! Time-triggered notification requests.

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::{
    UNMutableNotificationContent, UNNotificationRequest, UNNotificationTrigger,
    UNTimeIntervalNotificationTrigger,
};

/// Shortest delay the notification center accepts for a time-interval trigger.
const MIN_TRIGGER_SECONDS: f64 = 1.0;

/// Creates a one-shot request firing `delay_seconds` from now.
#[must_use]
pub fn create_timer_request(
    identifier: &str,
    content: &UNMutableNotificationContent,
    delay_seconds: f64,
) -> Retained<UNNotificationRequest> {
    let identifier = NSString::from_str(identifier);
    let interval = delay_seconds.max(MIN_TRIGGER_SECONDS);

    let trigger = unsafe {
        UNTimeIntervalNotificationTrigger::triggerWithTimeInterval_repeats(interval, false)
    };
    let trigger: &UNNotificationTrigger = &trigger;

    unsafe {
        UNNotificationRequest::requestWithIdentifier_content_trigger(
            &identifier,
            content,
            Some(trigger),
        )
    }
}
