//! Cook-mode screen controller.
//!
//! While the cook-mode screen is presented it owns the countdown: it keeps a
//! local copy of the timers, ticks them itself and pushes every change into
//! the shared store. When the user navigates away the store's ticker takes
//! over, and on re-entry the controller adopts whatever the store holds.
//!
//! Every timer start, pause and resume is mirrored into a background
//! notification so a suspended app still tells the user when a step is done.

pub mod error;

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::notification::{NotificationScheduler, SharedNotifier};
use crate::sound::TimerSound;
use crate::store::SharedStore;
use crate::types::{CookingSession, Location, SessionUpdate, TimerMap, TimerState};

pub use error::CookModeError;

/// Result type for cook-mode operations.
pub type Result<T> = std::result::Result<T, CookModeError>;

// ============================================================================
// CookModeController
// ============================================================================

/// Write path of the cook-mode screen.
pub struct CookModeController<S> {
    /// Shared timer store
    store: SharedStore,
    /// Shared notification bookkeeping
    notifier: SharedNotifier<S>,
    /// Wall clock
    clock: Arc<dyn Clock>,
    /// Screen-local timers, pushed to the store after every change
    timers: TimerMap,
    /// Session the screen was entered with
    session: Option<CookingSession>,
    /// Whether the screen is currently presented
    on_screen: bool,
    /// Sound used for new notifications
    sound: TimerSound,
}

impl<S: NotificationScheduler> CookModeController<S> {
    /// Creates a controller that has not entered cook mode yet.
    pub fn new(store: SharedStore, notifier: SharedNotifier<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            notifier,
            clock,
            timers: TimerMap::new(),
            session: None,
            on_screen: false,
            sound: TimerSound::default(),
        }
    }

    /// Sets the notification sound.
    #[must_use]
    pub fn with_sound(mut self, sound: TimerSound) -> Self {
        self.sound = sound;
        self
    }

    /// Returns the notification sound.
    pub fn sound(&self) -> TimerSound {
        self.sound
    }

    /// Changes the sound used for notifications scheduled from now on.
    pub fn set_sound(&mut self, sound: TimerSound) {
        self.sound = sound;
    }

    /// Returns the screen-local timers.
    pub fn timers(&self) -> &TimerMap {
        &self.timers
    }

    /// Returns the timer of `step`.
    pub fn timer(&self, step: u32) -> Option<&TimerState> {
        self.timers.get(&step)
    }

    /// Returns the session the screen was entered with.
    pub fn session(&self) -> Option<&CookingSession> {
        self.session.as_ref()
    }

    /// Returns true while the cook-mode screen is presented.
    pub fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    /// Presents the cook-mode screen for `session`.
    ///
    /// Re-entering the recipe that is already in the store adopts its
    /// timers, which may have been counted down by the store's ticker in the
    /// meantime. Entering a different recipe ends the previous session first.
    ///
    /// Returns the steps whose timers finished while the screen was away.
    pub async fn enter(&mut self, session: CookingSession) -> Vec<u32> {
        let recipe_id = session.recipe_id.clone();
        let (adopted, replaced) = {
            let mut store = self.store.lock().await;
            let same_recipe = store
                .session()
                .is_some_and(|current| current.recipe_id == recipe_id);

            let adopted = if same_recipe {
                store.recompute();
                store.timers().clone()
            } else {
                if store.session().is_some() {
                    store.end_session();
                }
                store.start_session(session.clone());
                TimerMap::new()
            };

            store.set_location(Location::CookMode {
                recipe_id: recipe_id.clone(),
            });
            (adopted, !same_recipe)
        };

        if replaced {
            self.notifier.lock().await.cancel_all_timer_notifications().await;
            self.session = Some(session);
        } else if self.session.is_none() {
            self.session = self.store.lock().await.session().cloned();
        }

        self.timers = adopted;
        self.on_screen = true;
        info!(recipe_id = %recipe_id, timers = self.timers.len(), "Entered cook mode");

        self.settle().await
    }

    /// Starts (or restarts) the timer of `step`.
    ///
    /// # Errors
    /// Returns an error if the screen is not presented, the step is outside
    /// the recipe, or `seconds` is zero.
    pub async fn start_step_timer(&mut self, step: u32, seconds: u32, step_text: &str) -> Result<()> {
        self.check_step(step)?;
        if seconds == 0 {
            return Err(CookModeError::InvalidDuration);
        }

        let timer = TimerState::running(seconds, step_text, self.clock.now_ms());
        self.timers.insert(step, timer);
        self.push_timers().await;

        self.notifier
            .lock()
            .await
            .schedule_timer_notification(step, seconds, step_text, self.sound)
            .await;

        info!(step, seconds, "Step timer started");
        Ok(())
    }

    /// Pauses the timer of `step`.
    ///
    /// A timer that has already run out is completed instead of paused.
    ///
    /// # Errors
    /// Returns an error if there is no such timer, it is already paused, or
    /// it has run out.
    pub async fn pause_step_timer(&mut self, step: u32) -> Result<()> {
        self.require_on_screen()?;
        if self.settle().await.contains(&step) {
            return Err(CookModeError::TimerFinished(step));
        }
        let now = self.clock.now_ms();
        let timer = self
            .timers
            .get_mut(&step)
            .ok_or(CookModeError::TimerNotFound(step))?;
        if timer.is_paused {
            return Err(CookModeError::AlreadyPaused(step));
        }

        timer.pause(now);
        let remaining = timer.remaining;
        self.push_timers().await;
        self.notifier.lock().await.pause_timer_notification(step).await;

        info!(step, remaining, "Step timer paused");
        Ok(())
    }

    /// Resumes the paused timer of `step`.
    ///
    /// # Errors
    /// Returns an error if there is no such timer or it is not paused.
    pub async fn resume_step_timer(&mut self, step: u32) -> Result<()> {
        self.require_on_screen()?;
        let now = self.clock.now_ms();
        let timer = self
            .timers
            .get_mut(&step)
            .ok_or(CookModeError::TimerNotFound(step))?;
        if !timer.is_paused {
            return Err(CookModeError::NotPaused(step));
        }

        timer.resume(now);
        let remaining = timer.remaining;
        let step_text = timer.step_text.clone();
        self.push_timers().await;
        self.notifier
            .lock()
            .await
            .resume_timer_notification(step, remaining, &step_text, self.sound)
            .await;

        info!(step, remaining, "Step timer resumed");
        Ok(())
    }

    /// Discards the timer of `step` and its notification.
    ///
    /// # Errors
    /// Returns an error if there is no such timer.
    pub async fn cancel_step_timer(&mut self, step: u32) -> Result<()> {
        self.require_on_screen()?;
        if self.timers.remove(&step).is_none() {
            return Err(CookModeError::TimerNotFound(step));
        }

        self.push_timers().await;
        self.notifier.lock().await.cancel_timer_notification(step).await;

        info!(step, "Step timer cancelled");
        Ok(())
    }

    /// Advances the screen's countdown by rederiving every timer from the
    /// clock.
    ///
    /// Returns the steps that completed on this tick. Does nothing while the
    /// screen is not presented.
    pub async fn tick(&mut self) -> Vec<u32> {
        if !self.on_screen {
            return Vec::new();
        }
        self.settle().await
    }

    /// Moves the session to `step`.
    ///
    /// # Errors
    /// Returns an error if the screen is not presented or the step is
    /// outside the recipe.
    pub async fn advance_step(&mut self, step: u32) -> Result<()> {
        self.check_step(step)?;
        if let Some(session) = self.session.as_mut() {
            session.current_step = step;
        }
        self.store
            .lock()
            .await
            .update_session(SessionUpdate::step(step));

        debug!(step, "Advanced to step");
        Ok(())
    }

    /// Navigates away from the cook-mode screen to `location`.
    ///
    /// Timers keep running; the store's ticker drives them from here on.
    pub async fn leave(&mut self, location: Location) {
        if !self.on_screen {
            return;
        }
        let location = if location.is_cook_mode() {
            Location::Home
        } else {
            location
        };

        self.push_timers().await;
        self.store.lock().await.set_location(location);
        self.on_screen = false;
        info!(timers = self.timers.len(), "Left cook mode with timers running");
    }

    /// Finishes cooking: ends the session, clears every timer and cancels
    /// every notification.
    pub async fn exit(&mut self) {
        {
            let mut store = self.store.lock().await;
            store.end_session();
            store.set_location(Location::Home);
        }
        self.notifier.lock().await.cancel_all_timer_notifications().await;

        self.timers.clear();
        self.session = None;
        self.on_screen = false;
        info!("Exited cook mode");
    }

    /// Recomputes local timers, drops completed ones and publishes the
    /// result.
    async fn settle(&mut self) -> Vec<u32> {
        let now = self.clock.now_ms();
        let mut changed = false;
        for timer in self.timers.values_mut() {
            changed |= timer.recompute(now);
        }

        let completed: Vec<u32> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.is_elapsed())
            .map(|(step, _)| *step)
            .collect();
        for step in &completed {
            self.timers.remove(step);
        }

        if changed || !completed.is_empty() {
            self.push_timers().await;
        }

        if !completed.is_empty() {
            let mut notifier = self.notifier.lock().await;
            for step in &completed {
                notifier.cancel_timer_notification(*step).await;
                info!(step, "Step timer completed");
            }
        }
        completed
    }

    async fn push_timers(&self) {
        self.store.lock().await.sync_timers(self.timers.clone());
    }

    fn require_on_screen(&self) -> Result<&CookingSession> {
        match (&self.session, self.on_screen) {
            (Some(session), true) => Ok(session),
            _ => Err(CookModeError::NotInCookMode),
        }
    }

    fn check_step(&self, step: u32) -> Result<()> {
        let session = self.require_on_screen()?;
        if step >= session.total_steps {
            return Err(CookModeError::StepOutOfRange {
                step,
                total_steps: session.total_steps,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
