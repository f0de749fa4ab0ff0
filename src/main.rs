//! # Claude Tool Tracker
//!
//! A PreToolUse hook for Claude Code that shows which tool, MCP server, agent,
//! skill or slash command is being used, and counts every call.
//!
//! ## Usage
//!
//! Hook mode reads one JSON event from stdin, prints the hook response on
//! stdout and the notification on stderr:
//!
//! ```bash
//! echo '{"tool_name":"Read","tool_input":{}}' | tool-tracker
//! ```

use clap::{Parser, Subcommand};
use log::debug;
use std::io::{self, Read};
use std::panic::{self, AssertUnwindSafe};

use chrono::NaiveDate;
use tool_tracker::common::{current_date, TrackerPaths};
use tool_tracker::config::{Settings, SettingsLayer};
use tool_tracker::display::{render_stats_report, render_top_tools};
use tool_tracker::error::{Result, TrackerError};
use tool_tracker::hook_handler::{handle_stop, run_tool_use_hook, HookOutcome, HookResponse};
use tool_tracker::stats::{StatsScope, StatsStore};
use tool_tracker::theme::Theme;

/// Claude Tool Tracker - visual tool usage tracking for Claude Code
#[derive(Parser)]
#[command(name = "tool-tracker")]
#[command(version)]
#[command(about = "Tracks and displays Claude Code tool usage", long_about = None)]
#[command(
    after_help = "Input: Without a subcommand, reads a PreToolUse event as JSON from stdin\n\nExample:\n  echo '{\"tool_name\":\"Read\",\"tool_input\":{}}' | tool-tracker"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle the Stop hook (prints the session summary when enabled)
    Stop,

    /// Show usage statistics
    Stats {
        /// Show all-time statistics instead of today's session
        #[arg(long)]
        all: bool,

        /// Also list the N most used tools
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },

    /// Clear the statistics of one session (today by default)
    Clear {
        /// Session date to clear
        #[arg(long, value_name = "YYYY-MM-DD")]
        session: Option<String>,
    },

    /// Set the notification theme (colorful, minimal, emoji)
    Theme {
        theme: String,

        /// Write to the project settings file instead of the global one
        #[arg(long)]
        local: bool,
    },

    /// Print the effective settings
    Config,

    /// Generate a settings file with the default values
    GenerateConfig {
        /// Write to the project settings file instead of the global one
        #[arg(long)]
        local: bool,

        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging with WARN level by default (can be overridden with RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let paths = TrackerPaths::from_env();

    match cli.command {
        None => emit_guarded(|| match read_stdin() {
            Ok(buffer) => run_tool_use_hook(&buffer, &paths),
            Err(e) => HookOutcome {
                response: HookResponse::with_error(e),
                notification: None,
            },
        }),
        Some(Commands::Stop) => emit_guarded(|| {
            // Stop hook payload carries nothing we use
            if let Err(e) = read_stdin() {
                debug!("Ignoring unreadable Stop payload: {}", e);
            }
            handle_stop(&paths)
        }),
        Some(Commands::Stats { all, top }) => show_stats(&paths, all, top),
        Some(Commands::Clear { session }) => clear_session(&paths, session)?,
        Some(Commands::Theme { theme, local }) => set_theme(&paths, &theme, local)?,
        Some(Commands::Config) => show_config(&paths),
        Some(Commands::GenerateConfig { local, force }) => generate_config(&paths, local, force)?,
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Run a hook and print its outcome. A panic still produces a proceed response.
fn emit_guarded<F>(hook: F)
where
    F: FnOnce() -> HookOutcome,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(hook)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unexpected panic".to_string());
        HookOutcome {
            response: HookResponse::with_error(message),
            notification: None,
        }
    });

    if let Some(notification) = &outcome.notification {
        eprintln!("{}", notification);
    }
    println!("{}", outcome.response.to_json());
}

fn stats_store(paths: &TrackerPaths) -> StatsStore {
    let settings = Settings::load(paths);
    StatsStore::new(settings.stats_path(paths))
}

fn show_stats(paths: &TrackerPaths, all: bool, top: Option<usize>) {
    let doc = stats_store(paths).load();
    let (scope, title, empty_scope) = if all {
        (StatsScope::AllTime, "ALL-TIME STATISTICS", "all time")
    } else {
        (StatsScope::today(), "SESSION STATISTICS", "this session")
    };

    println!("{}", render_stats_report(title, doc.counts(&scope), empty_scope));

    if let Some(n) = top {
        let top_tools = doc.top_n(n, &scope);
        if !top_tools.is_empty() {
            println!("\nTop {} tools:", n);
            println!("{}", render_top_tools(&top_tools));
        }
    }
}

fn clear_session(paths: &TrackerPaths, session: Option<String>) -> Result<()> {
    if let Some(session) = &session {
        NaiveDate::parse_from_str(session, "%Y-%m-%d").map_err(|e| {
            TrackerError::invalid_input(format!("invalid session date '{}': {}", session, e))
        })?;
    }

    let session_id = session.unwrap_or_else(current_date);
    if stats_store(paths).clear(Some(&session_id)) {
        println!("Cleared statistics for session {}", session_id);
    } else {
        println!("No statistics to clear for session {}", session_id);
    }
    Ok(())
}

fn set_theme(paths: &TrackerPaths, theme: &str, local: bool) -> Result<()> {
    let theme = theme
        .parse::<Theme>()
        .map_err(|e| TrackerError::invalid_input(e))?;
    let target = if local {
        paths.local_settings()
    } else {
        paths.global_settings()
    };

    // Keys the target file does not set keep falling through to the other layer
    let mut layer = SettingsLayer::load(&target);
    layer.theme = Some(theme);
    layer.save(&target)?;

    println!("Theme set to {} in {}", theme, target.display());
    Ok(())
}

fn show_config(paths: &TrackerPaths) {
    let settings = Settings::load(paths);
    let describe = |path: std::path::PathBuf| {
        let state = if path.exists() { "found" } else { "not found" };
        format!("{} ({})", path.display(), state)
    };

    println!("# Global settings: {}", describe(paths.global_settings()));
    println!("# Project settings: {}", describe(paths.local_settings()));
    println!("# Statistics file: {}", settings.stats_path(paths).display());
    println!();
    print!("{}", settings.to_frontmatter());
}

fn generate_config(paths: &TrackerPaths, local: bool, force: bool) -> Result<()> {
    let config_path = if local {
        paths.local_settings()
    } else {
        paths.global_settings()
    };

    if config_path.exists() && !force {
        return Err(TrackerError::config(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    println!("Generating settings file at: {}", config_path.display());
    Settings::default().save(&config_path)?;
    println!("Settings file generated successfully!");
    println!("Edit {} to customize settings", config_path.display());
    Ok(())
}
