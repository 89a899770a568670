//! `cook` command runner.
//!
//! Wires the store, the notifier and the cook-mode controller together for a
//! single step timer in the terminal. The screen drives the countdown until
//! `--leave-after` elapses; from then on the store's ticker does, and the
//! floating timer is printed on every change.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::debug;

use super::commands::CookArgs;
use super::display::Display;
use crate::clock::{Clock, SystemClock};
use crate::cook::CookModeController;
use crate::notification::{
    ConsoleNotificationScheduler, NotificationError, NotificationId, NotificationScheduler,
    SharedNotifier, TimerNotifier,
};
use crate::overlay::floating_timer;
use crate::sound::TimerSound;
use crate::store::{shared_store, StoreEvent, StoreTicker, TickerHandle, TICK_INTERVAL};
use crate::types::{CookingSession, Location};

/// Runs one step timer to completion or until Ctrl-C.
pub async fn run_cook(args: CookArgs, sound: TimerSound) -> Result<()> {
    #[cfg(target_os = "macos")]
    if args.system_notifications {
        // Deliveries are not reported back; fired handles are pruned by end time.
        let (_delivered_tx, delivered_rx) = mpsc::unbounded_channel();
        let scheduler = crate::notification::UserNotificationScheduler::new();
        return run_with(args, sound, scheduler, delivered_rx).await;
    }

    let (delivered_tx, delivered_rx) = mpsc::unbounded_channel();
    let scheduler = ConsoleNotificationScheduler::with_delivery_channel(delivered_tx);
    run_with(args, sound, scheduler, delivered_rx).await
}

async fn run_with<S: NotificationScheduler>(
    args: CookArgs,
    sound: TimerSound,
    scheduler: S,
    mut delivered_rx: mpsc::UnboundedReceiver<NotificationId>,
) -> Result<()> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let (store, mut events) = shared_store(clock.clone());
    let notifier = Arc::new(Mutex::new(TimerNotifier::new(scheduler, clock.clone())));
    let mut controller = CookModeController::new(store.clone(), notifier.clone(), clock.clone())
        .with_sound(sound);

    let session = CookingSession::new(&args.recipe, &args.title, args.step + 1);
    controller.enter(session).await;
    controller
        .start_step_timer(args.step, args.seconds, &args.text)
        .await
        .context("タイマーを開始できませんでした")?;

    if notifier.lock().await.permission_denied() {
        Display::show_notification_warning(&NotificationError::PermissionDenied);
    }
    Display::show_timer_started(&args.title, args.step, args.seconds, &args.text);

    let leave_at = args
        .leave_after
        .map(|secs| Instant::now() + Duration::from_secs(u64::from(secs)));
    let mut screen = interval(TICK_INTERVAL);
    screen.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut background: Option<TickerHandle> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = screen.tick(), if controller.is_on_screen() => {
                for step in controller.tick().await {
                    Display::show_step_done(step);
                }
                if controller.timers().is_empty() {
                    break;
                }
                if let Some(timer) = controller.timer(args.step) {
                    Display::show_countdown(args.step, timer.remaining, timer.total);
                }
                if leave_at.is_some_and(|at| Instant::now() >= at) {
                    controller
                        .leave(Location::Recipe {
                            recipe_id: args.recipe.clone(),
                        })
                        .await;
                    Display::show_left_cook_mode();
                    if let Some(timer) = floating_timer(&*store.lock().await) {
                        Display::show_floating(&timer);
                    }
                    background = Some(StoreTicker::new(store.clone()).spawn());
                }
            }
            Some(event) = events.recv() => {
                if controller.is_on_screen() {
                    continue;
                }
                match event {
                    StoreEvent::TimersUpdated { .. } => {
                        if let Some(timer) = floating_timer(&*store.lock().await) {
                            Display::show_floating(&timer);
                        }
                    }
                    StoreEvent::TimerElapsed { step } => {
                        Display::show_step_done(step);
                        forget_fired(&notifier, clock.as_ref()).await;
                        if store.lock().await.active_timers().next().is_none() {
                            break;
                        }
                    }
                    _ => {}
                }
            }
            Some(id) = delivered_rx.recv() => {
                if let Some(step) = notifier.lock().await.handle_delivered(&id) {
                    debug!(step, "Notification for step delivered");
                }
            }
            result = &mut ctrl_c => {
                result.context("Ctrl-C の待機に失敗しました")?;
                Display::show_interrupted();
                break;
            }
        }
    }

    if let Some(ticker) = background {
        ticker.shutdown().await;
    }
    controller.exit().await;
    Ok(())
}

/// Forgets the notifications whose fire time has passed.
///
/// Backends that never report deliveries would otherwise keep the handles
/// until the session ends.
async fn forget_fired<S: NotificationScheduler>(
    notifier: &SharedNotifier<S>,
    clock: &dyn Clock,
) {
    let fired = notifier.lock().await.prune_fired(clock.now_ms());
    if !fired.is_empty() {
        debug!(?fired, "Fired notifications forgotten");
    }
}
