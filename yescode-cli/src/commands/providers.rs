//! Providers command - switch provider alternatives.

use anyhow::Result;

use crate::Cli;
use crate::output::TextFormatter;
use crate::presenter::{ChoicePresenter, TerminalPresenter};
use crate::session::Session;
use crate::switch;

/// Runs the providers command.
pub async fn run(cli: &Cli, session: &Session) -> Result<()> {
    let presenter = TerminalPresenter::new(TextFormatter::new(cli.use_colors()));
    switch_providers(session, &presenter).await
}

/// Opens the provider switch flow for the session's key.
pub async fn switch_providers(session: &Session, presenter: &dyn ChoicePresenter) -> Result<()> {
    let api = session.api().await?;
    switch::run_switch(&api, presenter, session.environment().await).await;
    Ok(())
}
