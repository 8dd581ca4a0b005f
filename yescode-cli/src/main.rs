// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! YesCode CLI - balance monitoring for YesCode accounts from the terminal.
//!
//! # Examples
//!
//! ```bash
//! # One-shot status line
//! yescode
//!
//! # JSON output
//! yescode --format json --pretty
//!
//! # Keep the status line fresh
//! yescode watch --interval 30
//!
//! # Store an API key (prompted)
//! yescode key set
//!
//! # Always show the team balance
//! yescode mode team
//!
//! # Interactive menu
//! yescode menu
//!
//! # Print the Codex setup command
//! yescode setup --tool codex --print
//! ```

mod commands;
mod output;
mod presenter;
mod session;
mod status_bar;
mod switch;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use yescode_fetch::FetchError;
use yescode_store::LogLevel;

use commands::{config, key, menu, mode, providers, reverse, setup, status, watch};
use session::Session;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "YESCODE_LOG";

// ============================================================================
// CLI Definition
// ============================================================================

/// YesCode CLI - balance monitoring.
#[derive(Parser)]
#[command(name = "yescode")]
#[command(about = "YesCode balance monitor")]
#[command(long_about = r#"
YesCode shows the remaining balance of a YesCode account.

Display modes:
  • Auto          Team when in a team, else Subscription unless the
                  account prefers PayGo only, else PayGo
  • Subscription  Daily or weekly subscription balance
  • PayGo         Pay-as-you-go dollars
  • Team          Team daily or weekly balance

Examples:
  yescode                        # Status line
  yescode watch                  # Refresh periodically
  yescode menu                   # Interactive menu
  yescode key set                # Store an API key
  yescode --format json          # JSON output
"#)]
#[command(version)]
#[command(author = "YesCode Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'status' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default location.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Whether text output may contain ANSI colors.
    pub fn use_colors(&self) -> bool {
        !self.no_color
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and show the balance (default if no command specified).
    #[command(visible_alias = "s")]
    Status,

    /// Refresh the balance periodically.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Open the interactive menu.
    #[command(visible_alias = "m")]
    Menu,

    /// Manage the API key.
    Key(key::KeyArgs),

    /// Choose which balance is shown.
    Mode(mode::ModeArgs),

    /// Show used instead of remaining balance.
    Reverse(reverse::ReverseArgs),

    /// Switch provider alternatives.
    #[command(visible_alias = "p")]
    Providers,

    /// Generate setup commands for coding CLIs.
    Setup(setup::SetupArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// No API key configured.
    NotConfigured = 2,
}

impl ExitCode {
    /// Exit code for a failed command.
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<FetchError>() {
            Some(FetchError::NotConfigured) => Self::NotConfigured,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Tracing directive to install.
///
/// A non-empty `YESCODE_LOG` wins over `--verbose`, which beats the stored level.
fn log_directive(from_env: Option<String>, verbose: bool, level: LogLevel) -> String {
    match from_env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ if verbose => "yescode=debug,info".to_string(),
        _ => format!("yescode={level}"),
    }
}

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = EnvFilter::new(log_directive(std::env::var(LOG_ENV).ok(), verbose, level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let session = match Session::open(cli.config.clone()).await {
        Ok(session) => session,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(ExitCode::Error as i32);
        }
    };

    setup_logging(cli.verbose, cli.quiet, session.settings().log_level().await);

    let result = match &cli.command {
        Some(Commands::Status) | None => status::run(&cli, &session).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli, &session).await,
        Some(Commands::Menu) => menu::run(&cli, &session).await,
        Some(Commands::Key(args)) => key::run(args, &cli, &session).await,
        Some(Commands::Mode(args)) => mode::run(args, &cli, &session).await,
        Some(Commands::Reverse(args)) => reverse::run(args, &cli, &session).await,
        Some(Commands::Providers) => providers::run(&cli, &session).await,
        Some(Commands::Setup(args)) => setup::run(args, &cli, &session).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &session).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
