//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use tracing::info;

use yescode_store::default_config_dir;

use crate::output::{JsonFormatter, TextFormatter};
use crate::session::Session;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Set the watch refresh interval.
    Interval {
        /// Seconds between refreshes (minimum 10).
        seconds: u64,
    },

    /// Reset to defaults. The environment of the stored key is kept.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, session: &Session) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, session).await,
        ConfigAction::Path => show_paths(cli, session),
        ConfigAction::Interval { seconds } => set_interval(*seconds, cli, session).await,
        ConfigAction::Reset => reset_config(cli, session).await,
    }
}

async fn show_config(cli: &Cli, session: &Session) -> Result<()> {
    let settings = session.settings().get().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(cli.use_colors());
            println!("{}", formatter.format_header("YesCode Configuration"));
            println!();
            println!("Environment:      {}", settings.environment.label());
            println!("Display mode:     {}", settings.display_mode);
            println!("Reverse display:  {}", settings.reverse_display);
            println!(
                "Refresh interval: {}s",
                settings.refresh_interval().as_secs()
            );
            println!("Log level:        {}", settings.log_level);
            println!(
                "Settings file:    {}",
                session.settings().path().display()
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli, session: &Session) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = session.settings().path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_interval(seconds: u64, cli: &Cli, session: &Session) -> Result<()> {
    session
        .settings()
        .set_refresh_interval_secs(seconds)
        .await?;

    info!(seconds, "Refresh interval updated");
    if !cli.quiet {
        println!("Refresh interval set to: {seconds}s");
    }

    Ok(())
}

async fn reset_config(cli: &Cli, session: &Session) -> Result<()> {
    session.settings().reset().await?;

    info!(path = %session.settings().path().display(), "Settings reset");
    if !cli.quiet {
        println!("Configuration reset to defaults");
    }

    Ok(())
}
