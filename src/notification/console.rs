//! Terminal notification backend.
//!
//! Each scheduled notification is a tokio task that sleeps until the fire
//! time and then prints the notification, ringing the terminal bell unless
//! the sound is silent. Cancelling aborts the task.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use super::{NotificationError, NotificationId, NotificationScheduler, TimerNotificationContent};

/// Prints timer notifications to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotificationScheduler {
    /// Pending delivery tasks
    tasks: Mutex<HashMap<NotificationId, JoinHandle<()>>>,
    /// Where delivered ids are reported
    delivered_tx: Option<mpsc::UnboundedSender<NotificationId>>,
}

impl ConsoleNotificationScheduler {
    /// Creates a scheduler that does not report deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler that sends each delivered id on `delivered_tx`.
    #[must_use]
    pub fn with_delivery_channel(delivered_tx: mpsc::UnboundedSender<NotificationId>) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            delivered_tx: Some(delivered_tx),
        }
    }

    /// Number of notifications still waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.tasks
            .lock()
            .map(|tasks| tasks.values().filter(|task| !task.is_finished()).count())
            .unwrap_or(0)
    }
}

impl NotificationScheduler for ConsoleNotificationScheduler {
    async fn is_authorized(&self) -> Result<bool, NotificationError> {
        Ok(true)
    }

    async fn request_authorization(&self) -> Result<bool, NotificationError> {
        Ok(true)
    }

    async fn schedule(
        &self,
        content: &TimerNotificationContent,
        delay: Duration,
    ) -> Result<NotificationId, NotificationError> {
        let id = NotificationId::generate();
        let title = content.title.clone();
        let body = content.body.clone();
        let ring = !content.sound.is_silent();
        let delivered_tx = self.delivered_tx.clone();
        let task_id = id.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let bell = if ring { "\x07" } else { "" };
            println!("{}\n🔔 {}\n   {}", bell, title, body);
            info!(id = %task_id, "Console notification delivered");
            if let Some(tx) = delivered_tx {
                let _ = tx.send(task_id);
            }
        });

        let mut tasks = self
            .tasks
            .lock()
            .map_err(|e| NotificationError::ScheduleFailed(e.to_string()))?;
        tasks.retain(|_, task| !task.is_finished());
        tasks.insert(id.clone(), task);
        Ok(id)
    }

    async fn cancel(&self, id: &NotificationId) -> Result<(), NotificationError> {
        let mut tasks = self
            .tasks
            .lock()
            .map_err(|e| NotificationError::CancelFailed(e.to_string()))?;
        if let Some(task) = tasks.remove(id) {
            task.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::TimerSound;

    fn content() -> TimerNotificationContent {
        TimerNotificationContent::for_step(0, "Boil", TimerSound::None)
    }

    #[tokio::test]
    async fn test_delivers_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = ConsoleNotificationScheduler::with_delivery_channel(tx);

        let id = scheduler
            .schedule(&content(), Duration::from_millis(50))
            .await
            .unwrap();

        let delivered = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(delivered, Some(id));
    }

    #[tokio::test]
    async fn test_cancel_prevents_delivery() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = ConsoleNotificationScheduler::with_delivery_channel(tx);

        let id = scheduler
            .schedule(&content(), Duration::from_millis(200))
            .await
            .unwrap();
        scheduler.cancel(&id).await.unwrap();
        assert_eq!(scheduler.pending_count(), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_noop() {
        let scheduler = ConsoleNotificationScheduler::new();
        assert!(scheduler.cancel(&NotificationId::new("missing")).await.is_ok());
    }
}
