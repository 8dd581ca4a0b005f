//! Reverse command - show used instead of remaining.

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::Cli;
use crate::commands::status;
use crate::session::Session;
use crate::status_bar::RefreshTrigger;

/// Arguments for the reverse command.
#[derive(Args)]
pub struct ReverseArgs {
    /// Set explicitly instead of toggling.
    #[arg(value_enum)]
    pub state: Option<Switch>,
}

/// Explicit on/off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

/// Menu label for the flag.
pub fn state_label(enabled: bool) -> &'static str {
    if enabled { "✓ Enabled" } else { "Disabled" }
}

/// Runs the reverse command.
pub async fn run(args: &ReverseArgs, cli: &Cli, session: &Session) -> Result<()> {
    let enabled = match args.state {
        Some(state) => {
            let enabled = state == Switch::On;
            session.set_reverse_display(enabled).await?;
            enabled
        }
        None => session.toggle_reverse_display().await?,
    };
    info!(enabled, "Reverse display updated");

    if !cli.quiet {
        println!("Reverse display: {}", state_label(enabled));
    }
    status::render(cli, session, RefreshTrigger::Automatic).await?;
    Ok(())
}
