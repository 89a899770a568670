//! CLI module for the cook timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `cook`: The cook-mode session runner
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod cook;
pub mod display;

pub use commands::{Cli, Commands, CookArgs, HistoryAction, PrefKey, PrefsAction};
pub use cook::run_cook;
pub use display::Display;
