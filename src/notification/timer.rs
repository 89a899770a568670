//! Per-step notification bookkeeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{NotificationId, NotificationScheduler, TimerNotificationContent};
use crate::clock::{end_time_after, Clock};
use crate::sound::TimerSound;

/// A notification outstanding for one step timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledNotification {
    /// Step index of the timer
    pub step_index: u32,
    /// Handle returned by the platform
    pub notification_id: NotificationId,
    /// Epoch ms at which the notification fires
    pub end_time: u64,
}

/// Tracks at most one scheduled notification per step.
pub struct TimerNotifier<S> {
    /// Platform backend
    scheduler: S,
    /// Wall clock used to stamp fire times
    clock: Arc<dyn Clock>,
    /// Outstanding notifications keyed by step index
    scheduled: HashMap<u32, ScheduledNotification>,
    /// Whether permission has been confirmed
    permission_granted: bool,
    /// Whether the user refused permission
    permission_denied: bool,
}

impl<S: NotificationScheduler> TimerNotifier<S> {
    /// Creates a notifier on top of `scheduler`.
    pub fn new(scheduler: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            scheduler,
            clock,
            scheduled: HashMap::new(),
            permission_granted: false,
            permission_denied: false,
        }
    }

    /// Returns the backend.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Returns true once the user has refused notification permission.
    pub fn permission_denied(&self) -> bool {
        self.permission_denied
    }

    /// Returns the outstanding notification for `step`.
    pub fn scheduled(&self, step: u32) -> Option<&ScheduledNotification> {
        self.scheduled.get(&step)
    }

    /// Number of outstanding notifications.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Schedules the finish notification for a step timer.
    ///
    /// Any previous notification for the step is cancelled first. Returns
    /// `None` when there is no time left, when permission is refused, or when
    /// the backend fails.
    pub async fn schedule_timer_notification(
        &mut self,
        step: u32,
        remaining_seconds: u32,
        step_text: &str,
        sound: TimerSound,
    ) -> Option<NotificationId> {
        self.cancel_timer_notification(step).await;

        if remaining_seconds == 0 {
            debug!(step, "Not scheduling notification: no time left");
            return None;
        }

        if !self.ensure_permission().await {
            return None;
        }

        let content = TimerNotificationContent::for_step(step, step_text, sound);
        let now = self.clock.now_ms();
        let delay = Duration::from_secs(u64::from(remaining_seconds));

        match self.scheduler.schedule(&content, delay).await {
            Ok(id) => {
                debug!(step, %id, remaining_seconds, "Timer notification scheduled");
                self.scheduled.insert(
                    step,
                    ScheduledNotification {
                        step_index: step,
                        notification_id: id.clone(),
                        end_time: end_time_after(now, remaining_seconds),
                    },
                );
                Some(id)
            }
            Err(e) => {
                warn!("タイマー通知の予約に失敗しました (step {}): {}", step, e);
                None
            }
        }
    }

    /// Cancels the notification for `step`, if any.
    pub async fn cancel_timer_notification(&mut self, step: u32) {
        let Some(scheduled) = self.scheduled.remove(&step) else {
            return;
        };

        if let Err(e) = self.scheduler.cancel(&scheduled.notification_id).await {
            warn!("タイマー通知の取り消しに失敗しました (step {}): {}", step, e);
        } else {
            debug!(step, id = %scheduled.notification_id, "Timer notification cancelled");
        }
    }

    /// Cancels every outstanding notification.
    pub async fn cancel_all_timer_notifications(&mut self) {
        let steps: Vec<u32> = self.scheduled.keys().copied().collect();
        for step in steps {
            self.cancel_timer_notification(step).await;
        }
    }

    /// Pauses a timer's notification (cancels it).
    pub async fn pause_timer_notification(&mut self, step: u32) {
        self.cancel_timer_notification(step).await;
    }

    /// Resumes a timer's notification with its fresh remaining time.
    pub async fn resume_timer_notification(
        &mut self,
        step: u32,
        remaining_seconds: u32,
        step_text: &str,
        sound: TimerSound,
    ) -> Option<NotificationId> {
        self.schedule_timer_notification(step, remaining_seconds, step_text, sound)
            .await
    }

    /// Forgets the notification the platform reports as delivered.
    ///
    /// Returns the step it belonged to.
    pub fn handle_delivered(&mut self, id: &NotificationId) -> Option<u32> {
        let step = self
            .scheduled
            .iter()
            .find(|(_, scheduled)| &scheduled.notification_id == id)
            .map(|(step, _)| *step)?;
        self.scheduled.remove(&step);
        info!(step, %id, "Timer notification delivered");
        Some(step)
    }

    /// Forgets every notification whose fire time is not after `now_ms`.
    ///
    /// Returns the affected steps in ascending order.
    pub fn prune_fired(&mut self, now_ms: u64) -> Vec<u32> {
        let mut fired: Vec<u32> = self
            .scheduled
            .values()
            .filter(|scheduled| scheduled.end_time <= now_ms)
            .map(|scheduled| scheduled.step_index)
            .collect();
        fired.sort_unstable();

        for step in &fired {
            self.scheduled.remove(step);
        }
        if !fired.is_empty() {
            debug!(?fired, "Forgot fired timer notifications");
        }
        fired
    }

    async fn ensure_permission(&mut self) -> bool {
        if self.permission_granted {
            return true;
        }

        match self.scheduler.is_authorized().await {
            Ok(true) => {
                self.permission_granted = true;
                self.permission_denied = false;
                return true;
            }
            Ok(false) => {}
            Err(e) => warn!("通知許可の確認に失敗しました: {}", e),
        }

        match self.scheduler.request_authorization().await {
            Ok(true) => {
                self.permission_granted = true;
                self.permission_denied = false;
                true
            }
            Ok(false) => {
                warn!("通知許可が拒否されています");
                self.permission_denied = true;
                false
            }
            Err(e) => {
                warn!("通知許可の取得に失敗しました: {}", e);
                false
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
