//! Native notification content construction.

use objc2::rc::Retained;
use objc2_foundation::NSString;
use objc2_user_notifications::{UNMutableNotificationContent, UNNotificationSound};

use crate::notification::TimerNotificationContent;
use crate::sound::TimerSound;

/// Category identifier attached to timer notifications.
pub const TIMER_CATEGORY: &str = "COOK_TIMER_DONE";

/// Builder for constructing notification content.
pub struct NotificationContentBuilder {
    content: Retained<UNMutableNotificationContent>,
}

impl NotificationContentBuilder {
    #[must_use]
    pub fn new() -> Self {
        let content = unsafe { UNMutableNotificationContent::new() };
        Self { content }
    }

    #[must_use]
    pub fn title(self, title: &str) -> Self {
        let title = NSString::from_str(title);
        unsafe {
            self.content.setTitle(&title);
        }
        self
    }

    #[must_use]
    pub fn body(self, body: &str) -> Self {
        let body = NSString::from_str(body);
        unsafe {
            self.content.setBody(&body);
        }
        self
    }

    #[must_use]
    pub fn category_identifier(self, category_id: &str) -> Self {
        let category_id = NSString::from_str(category_id);
        unsafe {
            self.content.setCategoryIdentifier(&category_id);
        }
        self
    }

    /// Sets the sound for the user's timer-sound choice.
    #[must_use]
    pub fn timer_sound(self, sound: TimerSound) -> Self {
        let sound = match (sound, sound.bundled_file()) {
            (TimerSound::None, _) => return self,
            (_, Some(file)) => {
                let name = NSString::from_str(file);
                unsafe { UNNotificationSound::soundNamed(&name) }
            }
            (_, None) => unsafe { UNNotificationSound::defaultSound() },
        };
        unsafe {
            self.content.setSound(Some(&sound));
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Retained<UNMutableNotificationContent> {
        self.content
    }
}

impl Default for NotificationContentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts platform-independent content into native content.
#[must_use]
pub fn create_timer_content(
    content: &TimerNotificationContent,
) -> Retained<UNMutableNotificationContent> {
    NotificationContentBuilder::new()
        .title(&content.title)
        .body(&content.body)
        .category_identifier(TIMER_CATEGORY)
        .timer_sound(content.sound)
        .build()
}
