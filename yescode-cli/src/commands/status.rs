//! Status command - one-shot balance refresh.

use anyhow::{Result, bail};
use tracing::debug;

use yescode_fetch::{FetchError, RetryStrategy};

use crate::output::{JsonFormatter, StatusOutput, TextFormatter};
use crate::session::Session;
use crate::status_bar::{
    FailureKind, RefreshState, RefreshTrigger, StatusBar, TerminalStatusDisplay, refresh,
};
use crate::{Cli, OutputFormat};

/// Runs the status command.
///
/// Fails with [`FetchError::NotConfigured`] when no key is set, so the
/// caller can exit with the matching code.
pub async fn run(cli: &Cli, session: &Session) -> Result<()> {
    match render(cli, session, RefreshTrigger::Automatic).await? {
        RefreshState::Failed(FailureKind::NotConfigured) => Err(FetchError::NotConfigured.into()),
        RefreshState::Failed(kind) => bail!("balance refresh failed ({kind:?})"),
        _ => Ok(()),
    }
}

/// Refreshes once and prints the result. Returns the final state.
///
/// A [`RefreshTrigger::Manual`] refresh shows the refreshing text first.
pub async fn render(cli: &Cli, session: &Session, trigger: RefreshTrigger) -> Result<RefreshState> {
    let formatter = TextFormatter::new(cli.use_colors());
    let mut display = TerminalStatusDisplay::progress(formatter.clone());
    let mut bar = StatusBar::new();
    let options = session.refresh_options().await;

    let state = refresh(
        &mut bar,
        &mut display,
        session,
        options,
        trigger,
        &RetryStrategy::default(),
    )
    .await;
    debug!(?state, "Refresh finished");

    match cli.format {
        OutputFormat::Text if cli.quiet => println!("{}", bar.text),
        OutputFormat::Text => println!("{}", formatter.format_status(&bar)),
        OutputFormat::Json => {
            let output = StatusOutput::new(
                &bar,
                options.mode,
                options.reverse,
                session.environment().await,
            );
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
        }
    }

    Ok(state)
}
