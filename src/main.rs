//! farsight - far/near focus trainer
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use farsight::config::{crash_log_path, Config};
use farsight::core::SystemClock;
use farsight::error::{exit_codes, FarsightError};
use farsight::storage::{FileKvStore, SettingsStore, StatsStore};

// =============================================================================
// CLI Definition
// =============================================================================

/// farsight - far/near focus trainer for tired eyes
#[derive(Parser)]
#[command(name = "farsight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a training session (type `m` + Enter to mute, `q` + Enter to quit)
    Train {
        /// Session length in minutes (3, 5 or 10); defaults to the saved setting
        #[arg(long, short)]
        minutes: Option<u32>,
        /// Start with speech and ambient audio muted
        #[arg(long)]
        mute: bool,
        /// Tick without waiting (for trying things out)
        #[arg(long, hide = true)]
        fast: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show today's sessions, streak and badge count
    Stats {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show totals, the 30-day heatmap and recent sessions
    History {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Maximum recent sessions to list
        #[arg(long, short)]
        limit: Option<usize>,
    },

    /// List all badges
    Badges {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show or change training settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
        /// Output as JSON
        #[arg(long, short, global = true)]
        json: bool,
        /// Suppress output
        #[arg(long, short, global = true)]
        quiet: bool,
    },

    /// Erase all training stats (settings are kept)
    Clear {
        /// Confirm the erase
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },
}

#[derive(Subcommand, Clone, Debug)]
enum SettingsAction {
    /// Print current settings
    Show,
    /// Change one or more settings
    Set {
        /// Session length in minutes (3, 5 or 10)
        #[arg(long)]
        minutes: Option<u32>,
        /// Countdown beeps (on/off)
        #[arg(long, value_parser = clap::builder::BoolishValueParser::new())]
        sound: Option<bool>,
        /// Spoken congratulation on completion (on/off)
        #[arg(long, value_parser = clap::builder::BoolishValueParser::new())]
        encouragement: Option<bool>,
        /// Speech voice name; empty for the default voice
        #[arg(long)]
        voice: Option<String>,
        /// Speech rate (0.5 to 2.0)
        #[arg(long)]
        rate: Option<f64>,
        /// Ambient theme (none, forest_meditation)
        #[arg(long)]
        theme: Option<String>,
    },
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("farsight error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Log to stderr, filtered by `FARSIGHT_LOG` (default `warn`).
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("FARSIGHT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.farsight/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("farsight panic: {}", info);

        if let Some(crash_log) = crash_log_path() {
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();

    let data_dir = config.resolved_data_dir().ok_or_else(|| {
        FarsightError::config("Could not determine data directory (no home directory)")
    })?;
    let kv = FileKvStore::with_dir(data_dir)?;

    match cli.command {
        Commands::Train {
            minutes,
            mute,
            fast,
            json,
            quiet,
        } => run_train(kv, &config, minutes, mute, fast, json, quiet),
        Commands::Stats { json, quiet } => run_stats(kv, json, quiet),
        Commands::History { json, quiet, limit } => run_history(kv, json, quiet, limit),
        Commands::Badges { json, quiet } => run_badges(kv, json, quiet),
        Commands::Settings {
            action,
            json,
            quiet,
        } => run_settings(kv, action.unwrap_or(SettingsAction::Show), json, quiet),
        Commands::Clear { yes, json, quiet } => run_clear(kv, yes, json, quiet),
    }
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::OK as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        print!("{}", formatted);
    }
}

fn run_train(
    kv: FileKvStore,
    config: &Config,
    minutes: Option<u32>,
    mute: bool,
    fast: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::train::{TrainCommand, TrainOptions};
    use farsight::core::ProgressionEngine;
    use farsight::feedback::TerminalFeedback;
    use farsight::host::IntervalTrigger;

    let settings = SettingsStore::new(kv.clone()).load();
    let engine = ProgressionEngine::new(StatsStore::new(kv));

    let interval = if fast {
        Duration::ZERO
    } else {
        Duration::from_secs(1)
    };
    let trigger = IntervalTrigger::with_stdin(interval);

    let cmd = TrainCommand::new(settings, config.feedback.clone());
    let options = TrainOptions {
        json,
        quiet,
        minutes,
        mute,
        fast,
    };

    let show_progress = !json && !quiet;
    let output = cmd.run(
        &options,
        engine,
        trigger,
        TerminalFeedback::stdout(),
        |progress| {
            if show_progress {
                let mut stdout = std::io::stdout();
                let _ = write!(stdout, "\r{}  ", progress.render());
                let _ = stdout.flush();
            }
        },
    );
    if show_progress {
        println!();
    }

    print_formatted(&cmd.format_output(&output, &options));
    Ok(success_to_exit_code(output.success))
}

fn run_stats(
    kv: FileKvStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::stats::{StatsCommand, StatsOptions};

    let cmd = StatsCommand::new(kv, SystemClock);
    let options = StatsOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_history(
    kv: FileKvStore,
    json: bool,
    quiet: bool,
    limit: Option<usize>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::history::{HistoryCommand, HistoryOptions};

    let cmd = HistoryCommand::new(kv, SystemClock);
    let options = HistoryOptions { json, quiet, limit };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_badges(
    kv: FileKvStore,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::badges::{BadgesCommand, BadgesOptions};

    let cmd = BadgesCommand::new(kv);
    let options = BadgesOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_settings(
    kv: FileKvStore,
    action: SettingsAction,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::settings::{SettingsCommand, SettingsOptions, SettingsUpdate};

    let cmd = SettingsCommand::new(kv);
    let options = SettingsOptions { json, quiet };

    let output = match action {
        SettingsAction::Show => cmd.show(),
        SettingsAction::Set {
            minutes,
            sound,
            encouragement,
            voice,
            rate,
            theme,
        } => cmd.set(&SettingsUpdate {
            minutes,
            sound,
            encouragement,
            voice,
            rate,
            theme,
        }),
    };
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_clear(
    kv: FileKvStore,
    yes: bool,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use farsight::cli::clear::{ClearCommand, ClearOptions};

    let cmd = ClearCommand::new(kv);
    let options = ClearOptions { json, quiet, yes };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_codes::OK, 0);
        assert_eq!(exit_codes::ERROR, 1);
        assert_eq!(exit_codes::CRASH, 3);
    }

    #[test]
    fn test_cli_parse_train() {
        let cli = Cli::parse_from(["farsight", "train", "--minutes", "10", "--mute"]);
        match cli.command {
            Commands::Train {
                minutes, mute, fast, ..
            } => {
                assert_eq!(minutes, Some(10));
                assert!(mute);
                assert!(!fast);
            }
            _ => panic!("Expected Train command"),
        }
    }

    #[test]
    fn test_cli_parse_history_limit() {
        let cli = Cli::parse_from(["farsight", "history", "--limit", "5", "--json"]);
        match cli.command {
            Commands::History { limit, json, .. } => {
                assert_eq!(limit, Some(5));
                assert!(json);
            }
            _ => panic!("Expected History command"),
        }
    }

    #[test]
    fn test_cli_parse_settings_set() {
        let cli = Cli::parse_from([
            "farsight",
            "settings",
            "set",
            "--sound",
            "off",
            "--theme",
            "forest",
            "--rate",
            "1.5",
        ]);
        match cli.command {
            Commands::Settings {
                action:
                    Some(SettingsAction::Set {
                        sound, theme, rate, ..
                    }),
                ..
            } => {
                assert_eq!(sound, Some(false));
                assert_eq!(theme.as_deref(), Some("forest"));
                assert_eq!(rate, Some(1.5));
            }
            _ => panic!("Expected Settings set command"),
        }
    }

    #[test]
    fn test_cli_parse_settings_defaults_to_show() {
        let cli = Cli::parse_from(["farsight", "settings", "--json"]);
        match cli.command {
            Commands::Settings { action, json, .. } => {
                assert!(action.is_none());
                assert!(json);
            }
            _ => panic!("Expected Settings command"),
        }
    }

    #[test]
    fn test_cli_parse_clear() {
        let cli = Cli::parse_from(["farsight", "clear", "--yes"]);
        assert!(matches!(cli.command, Commands::Clear { yes: true, .. }));
    }
}
