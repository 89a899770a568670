//! Command definitions for the cook-timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::sound::TimerSound;

/// Longest step text accepted on the command line.
const MAX_TEXT_LENGTH: usize = 200;

// ============================================================================
// CLI Structure
// ============================================================================

/// Cook Timer CLI - step timers for cook mode
#[derive(Parser, Debug)]
#[command(
    name = "cook-timer",
    version,
    about = "レシピの調理モード用ステップタイマー",
    long_about = "調理ステップごとのタイマーを実行します。\n\
                  調理モードを離れてもタイマーは進み続け、終了時に通知します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Preferences file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub prefs_file: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a step timer in cook mode
    Cook(CookArgs),

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },

    /// Show or clear the assistant chat history of a recipe
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Preference subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PrefsAction {
    /// Print one preference, or all of them
    Get {
        /// Preference to print
        #[arg(value_enum)]
        key: Option<PrefKey>,
    },

    /// Change a preference
    Set {
        /// Preference to change
        #[arg(value_enum)]
        key: PrefKey,
        /// New value
        value: String,
    },
}

/// Preferences the CLI can read and write.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    /// light, dark or system
    Theme,
    /// default, chime, bell or none
    TimerSound,
}

impl PrefKey {
    /// Every key, in display order.
    pub const ALL: [PrefKey; 2] = [PrefKey::Theme, PrefKey::TimerSound];

    /// Storage key of the preference.
    pub fn storage_key(&self) -> &'static str {
        match self {
            PrefKey::Theme => crate::prefs::keys::THEME,
            PrefKey::TimerSound => crate::prefs::keys::TIMER_SOUND,
        }
    }
}

/// Chat history subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryAction {
    /// Print the conversation for a recipe
    Show {
        /// Recipe identifier
        recipe: String,
    },

    /// Delete the conversation for a recipe
    Clear {
        /// Recipe identifier
        recipe: String,
    },
}

// ============================================================================
// Cook Command Arguments
// ============================================================================

/// Arguments for the cook command
#[derive(Args, Debug, Clone)]
pub struct CookArgs {
    /// Zero-based step index the timer belongs to (0-99)
    #[arg(
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=99)
    )]
    pub step: u32,

    /// Timer duration in seconds (1-86400)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=86_400)
    )]
    pub seconds: u32,

    /// Step text shown in the notification
    #[arg(short, long, default_value = "", value_parser = validate_step_text)]
    pub text: String,

    /// Recipe identifier
    #[arg(long, default_value = "quick-timer")]
    pub recipe: String,

    /// Recipe title
    #[arg(long, default_value = "クイックタイマー")]
    pub title: String,

    /// Leave cook mode after this many seconds and keep counting in the background
    #[arg(long, value_name = "SECONDS")]
    pub leave_after: Option<u32>,

    /// Notification sound (overrides the saved preference)
    #[arg(long)]
    pub sound: Option<TimerSound>,

    /// Use the macOS notification center instead of the terminal
    #[cfg(target_os = "macos")]
    #[arg(long)]
    pub system_notifications: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates the step text.
///
/// - Must not exceed 200 characters
fn validate_step_text(s: &str) -> Result<String, String> {
    if s.chars().count() > MAX_TEXT_LENGTH {
        return Err("ステップの説明は200文字以内にしてください".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["cook-timer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
            assert!(cli.prefs_file.is_none());
        }

        #[test]
        fn test_parse_global_flags_after_subcommand() {
            let cli = Cli::parse_from([
                "cook-timer",
                "prefs",
                "get",
                "-v",
                "--prefs-file",
                "/tmp/prefs.json",
            ]);
            assert!(cli.verbose);
            assert_eq!(cli.prefs_file, Some(PathBuf::from("/tmp/prefs.json")));
        }

        #[test]
        fn test_parse_completions() {
            let cli = Cli::parse_from(["cook-timer", "completions", "zsh"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Zsh
                })
            ));
        }
    }

    // ------------------------------------------------------------------------
    // Cook Args Tests
    // ------------------------------------------------------------------------

    mod cook_args_tests {
        use super::*;

        fn parse_cook(args: &[&str]) -> Result<CookArgs, clap::Error> {
            let mut argv = vec!["cook-timer", "cook"];
            argv.extend_from_slice(args);
            let cli = Cli::try_parse_from(argv)?;
            match cli.command {
                Some(Commands::Cook(args)) => Ok(args),
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_defaults() {
            let args = parse_cook(&["--seconds", "90"]).unwrap();
            assert_eq!(args.step, 0);
            assert_eq!(args.seconds, 90);
            assert_eq!(args.text, "");
            assert_eq!(args.recipe, "quick-timer");
            assert!(args.leave_after.is_none());
            assert!(args.sound.is_none());
        }

        #[test]
        fn test_all_options() {
            let args = parse_cook(&[
                "--step",
                "2",
                "-s",
                "60",
                "-t",
                "Simmer the sauce",
                "--recipe",
                "pasta",
                "--title",
                "Tomato pasta",
                "--leave-after",
                "5",
                "--sound",
                "bell",
            ])
            .unwrap();
            assert_eq!(args.step, 2);
            assert_eq!(args.text, "Simmer the sauce");
            assert_eq!(args.leave_after, Some(5));
            assert_eq!(args.sound, Some(TimerSound::Bell));
        }

        #[test]
        fn test_seconds_required() {
            assert!(parse_cook(&[]).is_err());
        }

        #[test]
        fn test_seconds_range() {
            assert!(parse_cook(&["--seconds", "0"]).is_err());
            assert!(parse_cook(&["--seconds", "86401"]).is_err());
            assert!(parse_cook(&["--seconds", "86400"]).is_ok());
        }

        #[test]
        fn test_step_range() {
            assert!(parse_cook(&["--seconds", "1", "--step", "100"]).is_err());
        }

        #[test]
        fn test_unknown_sound_rejected() {
            assert!(parse_cook(&["--seconds", "1", "--sound", "gong"]).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Prefs / History Tests
    // ------------------------------------------------------------------------

    mod prefs_tests {
        use super::*;

        #[test]
        fn test_parse_prefs_set() {
            let cli = Cli::parse_from(["cook-timer", "prefs", "set", "timer-sound", "chime"]);
            match cli.command {
                Some(Commands::Prefs {
                    action: PrefsAction::Set { key, value },
                }) => {
                    assert_eq!(key, PrefKey::TimerSound);
                    assert_eq!(value, "chime");
                }
                other => panic!("unexpected command: {:?}", other),
            }
        }

        #[test]
        fn test_parse_prefs_get_all() {
            let cli = Cli::parse_from(["cook-timer", "prefs", "get"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Prefs {
                    action: PrefsAction::Get { key: None }
                })
            ));
        }

        #[test]
        fn test_parse_history_clear() {
            let cli = Cli::parse_from(["cook-timer", "history", "clear", "pasta"]);
            assert!(matches!(
                cli.command,
                Some(Commands::History {
                    action: HistoryAction::Clear { recipe }
                }) if recipe == "pasta"
            ));
        }

        #[test]
        fn test_storage_keys() {
            assert_eq!(PrefKey::Theme.storage_key(), "theme");
            assert_eq!(PrefKey::TimerSound.storage_key(), "timer_sound");
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_validate_step_text() {
            assert!(validate_step_text("").is_ok());
            assert!(validate_step_text(&"あ".repeat(200)).is_ok());
            assert!(validate_step_text(&"あ".repeat(201)).is_err());
        }
    }
}
