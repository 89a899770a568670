//! Cook-mode error types.
//!
//! These are rejections of a user action on the cook-mode screen. None of
//! them leave the store or the notifier in a partial state.

use thiserror::Error;

/// Errors returned by [`super::CookModeController`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CookModeError {
    /// No cook-mode session has been entered.
    #[error("調理モードが開始されていません")]
    NotInCookMode,

    /// A timer needs a positive duration.
    #[error("タイマーの時間は1秒以上にしてください")]
    InvalidDuration,

    /// The step index is outside the recipe.
    #[error("ステップ {step} は存在しません（全{total_steps}ステップ）")]
    StepOutOfRange {
        /// Requested step index
        step: u32,
        /// Number of steps in the recipe
        total_steps: u32,
    },

    /// The step has no timer.
    #[error("ステップ {0} のタイマーはありません")]
    TimerNotFound(u32),

    /// The step's timer is already paused.
    #[error("ステップ {0} のタイマーは既に一時停止しています")]
    AlreadyPaused(u32),

    /// The step's timer is not paused.
    #[error("ステップ {0} のタイマーは一時停止していません")]
    NotPaused(u32),

    /// The step's timer ran out before the action reached it.
    #[error("ステップ {0} のタイマーは既に終了しています")]
    TimerFinished(u32),
}

impl CookModeError {
    /// Returns true if the error refers to a missing or out-of-range step.
    #[must_use]
    pub fn is_step_error(&self) -> bool {
        matches!(self, Self::StepOutOfRange { .. } | Self::TimerNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_step_out_of_range() {
        let err = CookModeError::StepOutOfRange {
            step: 7,
            total_steps: 5,
        };
        assert!(err.to_string().contains("ステップ 7"));
        assert!(err.to_string().contains("全5ステップ"));
    }

    #[test]
    fn test_error_display_timer_states() {
        assert!(CookModeError::TimerNotFound(2).to_string().contains("ステップ 2"));
        assert!(CookModeError::AlreadyPaused(1).to_string().contains("一時停止"));
        assert!(CookModeError::NotPaused(1).to_string().contains("一時停止していません"));
        assert!(CookModeError::TimerFinished(3).to_string().contains("既に終了"));
    }

    #[test]
    fn test_is_step_error() {
        assert!(CookModeError::TimerNotFound(0).is_step_error());
        assert!(CookModeError::StepOutOfRange {
            step: 1,
            total_steps: 1
        }
        .is_step_error());
        assert!(!CookModeError::InvalidDuration.is_step_error());
        assert!(!CookModeError::NotInCookMode.is_step_error());
    }
}
