//! Cook Timer CLI - step timers for cooking
//!
//! Runs recipe step timers that keep counting when you leave cook mode and
//! notify you when a step is done, and manages the app's saved preferences.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use cook_timer::cli::{
    run_cook, Cli, Commands, Display, HistoryAction, PrefKey, PrefsAction,
};
use cook_timer::prefs::{Preferences, ThemePreference};
use cook_timer::sound::TimerSound;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Cook(args)) => {
            let sound = match args.sound {
                Some(sound) => sound,
                None => load_prefs(&cli.prefs_file)?.timer_sound(),
            };
            run_cook(args, sound).await?;
        }
        Some(Commands::Prefs { action }) => {
            let mut prefs = load_prefs(&cli.prefs_file)?;
            match action {
                PrefsAction::Get { key: Some(key) } => {
                    Display::show_pref(key.storage_key(), &pref_value(&prefs, key));
                }
                PrefsAction::Get { key: None } => {
                    for key in PrefKey::ALL {
                        Display::show_pref(key.storage_key(), &pref_value(&prefs, key));
                    }
                }
                PrefsAction::Set { key, value } => {
                    match key {
                        PrefKey::Theme => prefs.set_theme(value.parse::<ThemePreference>()?),
                        PrefKey::TimerSound => prefs.set_timer_sound(value.parse::<TimerSound>()?),
                    }
                    prefs.save().context("設定を保存できませんでした")?;
                    Display::show_pref_saved(key.storage_key(), &pref_value(&prefs, key));
                }
            }
        }
        Some(Commands::History { action }) => {
            let mut prefs = load_prefs(&cli.prefs_file)?;
            match action {
                HistoryAction::Show { recipe } => {
                    Display::show_history(&recipe, &prefs.chat_history(&recipe));
                }
                HistoryAction::Clear { recipe } => {
                    let existed = prefs.clear_chat_history(&recipe);
                    if existed {
                        prefs.save().context("設定を保存できませんでした")?;
                    }
                    Display::show_history_cleared(&recipe, existed);
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Loads preferences from `--prefs-file` or the default location.
fn load_prefs(path: &Option<std::path::PathBuf>) -> Result<Preferences> {
    let prefs = match path {
        Some(path) => Preferences::load(path.clone()),
        None => Preferences::load_default(),
    };
    prefs.context("設定を読み込めませんでした")
}

/// Returns the effective value of a preference.
fn pref_value(prefs: &Preferences, key: PrefKey) -> String {
    match key {
        PrefKey::Theme => prefs.theme().to_string(),
        PrefKey::TimerSound => prefs.timer_sound().to_string(),
    }
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
