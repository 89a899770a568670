//! In-memory notification backend for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{NotificationError, NotificationId, NotificationScheduler, TimerNotificationContent};
use crate::clock::{Clock, SystemClock};
use crate::sound::TimerSound;

/// A request recorded by [`MockNotificationScheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRequest {
    pub id: NotificationId,
    pub step: u32,
    pub title: String,
    pub body: String,
    pub sound: TimerSound,
    pub fire_at_ms: u64,
}

/// Records scheduled notifications and fires them on demand.
#[derive(Debug)]
pub struct MockNotificationScheduler {
    clock: Arc<dyn Clock>,
    pending: Mutex<Vec<ScheduledRequest>>,
    delivered: Mutex<Vec<ScheduledRequest>>,
    cancelled: Mutex<Vec<NotificationId>>,
    authorized: AtomicBool,
    grant_on_request: AtomicBool,
    should_fail: AtomicBool,
    permission_requests: AtomicUsize,
}

impl Default for MockNotificationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationScheduler {
    /// Creates an authorized mock stamped with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an authorized mock stamped with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Mutex::new(Vec::new()),
            delivered: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            authorized: AtomicBool::new(true),
            grant_on_request: AtomicBool::new(true),
            should_fail: AtomicBool::new(false),
            permission_requests: AtomicUsize::new(0),
        }
    }

    pub fn set_authorized(&self, authorized: bool) {
        self.authorized.store(authorized, Ordering::SeqCst);
    }

    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request.store(grant, Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Notifications scheduled and neither cancelled nor delivered.
    #[must_use]
    pub fn pending(&self) -> Vec<ScheduledRequest> {
        self.pending.lock().unwrap().clone()
    }

    #[must_use]
    pub fn delivered(&self) -> Vec<ScheduledRequest> {
        self.delivered.lock().unwrap().clone()
    }

    #[must_use]
    pub fn cancelled(&self) -> Vec<NotificationId> {
        self.cancelled.lock().unwrap().clone()
    }

    /// Delivers every pending notification due at `now_ms`.
    ///
    /// Returns the delivered ids in fire order.
    pub fn deliver_due(&self, now_ms: u64) -> Vec<NotificationId> {
        let mut pending = self.pending.lock().unwrap();
        let (mut due, rest): (Vec<_>, Vec<_>) = pending
            .drain(..)
            .partition(|request| request.fire_at_ms <= now_ms);
        *pending = rest;

        due.sort_by_key(|request| request.fire_at_ms);
        let ids = due.iter().map(|request| request.id.clone()).collect();
        self.delivered.lock().unwrap().extend(due);
        ids
    }
}

impl NotificationScheduler for MockNotificationScheduler {
    async fn is_authorized(&self) -> Result<bool, NotificationError> {
        Ok(self.authorized.load(Ordering::SeqCst))
    }

    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let granted = self.grant_on_request.load(Ordering::SeqCst);
        if granted {
            self.authorized.store(true, Ordering::SeqCst);
        }
        Ok(granted)
    }

    async fn schedule(
        &self,
        content: &TimerNotificationContent,
        delay: Duration,
    ) -> Result<NotificationId, NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::ScheduleFailed("Mock failure".to_string()));
        }

        let id = NotificationId::generate();
        self.pending.lock().unwrap().push(ScheduledRequest {
            id: id.clone(),
            step: content.step,
            title: content.title.clone(),
            body: content.body.clone(),
            sound: content.sound,
            fire_at_ms: self.clock.now_ms() + delay.as_millis() as u64,
        });
        Ok(id)
    }

    async fn cancel(&self, id: &NotificationId) -> Result<(), NotificationError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(NotificationError::CancelFailed("Mock failure".to_string()));
        }

        self.pending.lock().unwrap().retain(|request| &request.id != id);
        self.cancelled.lock().unwrap().push(id.clone());
        Ok(())
    }
}
