//! Display utilities for the cook-timer CLI.
//!
//! This module provides formatted output for:
//! - Timer progress and completion
//! - The floating timer shown outside cook mode
//! - Preferences and chat history
//! - Error messages

use std::io::{self, Write};

use crate::notification::NotificationError;
use crate::overlay::{format_remaining, FloatingTimer};
use crate::prefs::{ChatMessage, ChatRole};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows a success message for a started step timer.
    pub fn show_timer_started(title: &str, step: u32, seconds: u32, text: &str) {
        println!("* タイマーを開始しました");
        println!("  レシピ: {}", title);
        if text.is_empty() {
            println!("  ステップ {}", step + 1);
        } else {
            println!("  ステップ {}: {}", step + 1, text);
        }
        println!("  時間: {}", format_remaining(seconds));
    }

    /// Redraws the cook-mode countdown line in place.
    pub fn show_countdown(step: u32, remaining: u32, total: u32) {
        print!("\r{}", Self::countdown_line(step, remaining, total));
        let _ = io::stdout().flush();
    }

    /// Shows the floating timer on its own line.
    pub fn show_floating(timer: &FloatingTimer) {
        println!("{}", Self::floating_line(timer));
    }

    /// Shows that the user left cook mode.
    pub fn show_left_cook_mode() {
        println!();
        println!("<- 調理モードを離れました（タイマーはバックグラウンドで継続します）");
    }

    /// Shows that a step timer finished.
    pub fn show_step_done(step: u32) {
        println!();
        println!("* ステップ {} のタイマーが終了しました", step + 1);
    }

    /// Shows a notification problem that does not stop the timer.
    pub fn show_notification_warning(error: &NotificationError) {
        eprintln!("注意: {}", error);
        eprintln!("  {}", error.suggestion());
    }

    /// Shows that the run was interrupted.
    pub fn show_interrupted() {
        println!();
        println!("[] タイマーを中断しました");
    }

    /// Shows one preference.
    pub fn show_pref(key: &str, value: &str) {
        println!("{} = {}", key, value);
    }

    /// Shows a success message for a saved preference.
    pub fn show_pref_saved(key: &str, value: &str) {
        println!("* 設定を保存しました: {} = {}", key, value);
    }

    /// Shows a recipe's chat history.
    pub fn show_history(recipe: &str, history: &[ChatMessage]) {
        if history.is_empty() {
            println!("チャット履歴はありません ({})", recipe);
            return;
        }
        println!("チャット履歴 ({})", recipe);
        println!("─────────────────────────────");
        for message in history {
            println!("{}", Self::history_line(message));
        }
    }

    /// Shows a success message for a cleared chat history.
    pub fn show_history_cleared(recipe: &str, existed: bool) {
        if existed {
            println!("* チャット履歴を削除しました ({})", recipe);
        } else {
            println!("チャット履歴はありません ({})", recipe);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    fn countdown_line(step: u32, remaining: u32, total: u32) -> String {
        format!(
            "ステップ {} [{}] {}",
            step + 1,
            Self::progress_bar(total.saturating_sub(remaining), total),
            format_remaining(remaining)
        )
    }

    fn floating_line(timer: &FloatingTimer) -> String {
        let state = if timer.is_paused { " (一時停止中)" } else { "" };
        let others = if timer.others > 0 {
            format!(" +{}", timer.others)
        } else {
            String::new()
        };
        format!(
            "[{}] ステップ {} {}{}{}",
            timer.recipe_title,
            timer.step + 1,
            timer.label(),
            state,
            others
        )
    }

    fn history_line(message: &ChatMessage) -> String {
        let speaker = match message.role {
            ChatRole::User => "あなた",
            ChatRole::Assistant => "アシスタント",
        };
        format!("{}: {}", speaker, message.content)
    }

    fn progress_bar(spent: u32, total: u32) -> String {
        let filled = if total == 0 {
            BAR_WIDTH
        } else {
            (spent.min(total) as usize * BAR_WIDTH) / total as usize
        };
        format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

// ============================================================================
// Tests
// ============================================================================
