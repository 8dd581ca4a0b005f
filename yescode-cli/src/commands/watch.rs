//! Watch command - continuously refreshed status line.

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info};

use yescode_fetch::RetryStrategy;
use yescode_store::MIN_REFRESH_INTERVAL_SECS;

use crate::Cli;
use crate::output::TextFormatter;
use crate::presenter::{ChoicePresenter, NotifyLevel, TerminalPresenter};
use crate::session::Session;
use crate::status_bar::{
    FailureKind, RefreshState, RefreshTrigger, StatusBar, TerminalStatusDisplay, refresh,
};

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (defaults to the configured interval).
    #[arg(long, short)]
    pub interval: Option<u64>,
}

/// A line typed while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchInput {
    /// Refresh now.
    Refresh,
    /// Stop watching.
    Quit,
    /// Anything else.
    Ignored,
}

/// Interprets one line of stdin.
pub fn parse_input(line: &str) -> WatchInput {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "r" | "refresh" => WatchInput::Refresh,
        "q" | "quit" | "exit" => WatchInput::Quit,
        _ => WatchInput::Ignored,
    }
}

/// Runs the watch command.
///
/// The ticker is never reset by manual refreshes. Quitting stops
/// scheduling; a refresh already in flight completes first.
pub async fn run(args: &WatchArgs, cli: &Cli, session: &Session) -> Result<()> {
    let refresh_interval = match args.interval {
        Some(secs) => Duration::from_secs(secs.max(MIN_REFRESH_INTERVAL_SECS)),
        None => session.refresh_interval().await,
    };

    info!(interval = refresh_interval.as_secs(), "Starting watch mode");

    let formatter = TextFormatter::new(cli.use_colors());
    let presenter = TerminalPresenter::new(formatter.clone());
    let mut display = TerminalStatusDisplay::screen(formatter, refresh_interval.as_secs());
    let mut bar = StatusBar::new();
    let retry = RetryStrategy::default();
    let mut missing_key_notified = false;

    let mut ticker = interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut pending = Some(RefreshTrigger::Manual);

    loop {
        if let Some(trigger) = pending.take() {
            let options = session.refresh_options().await;
            let state = refresh(&mut bar, &mut display, session, options, trigger, &retry).await;

            if state == RefreshState::Failed(FailureKind::NotConfigured) && !missing_key_notified {
                missing_key_notified = true;
                presenter
                    .notify(
                        NotifyLevel::Warning,
                        "YesCode API Key not set. Run \"yescode key set\" in another terminal.",
                    )
                    .await;
            }
        }

        tokio::select! {
            _ = ticker.tick() => pending = Some(RefreshTrigger::Automatic),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_input(&line) {
                    WatchInput::Refresh => pending = Some(RefreshTrigger::Manual),
                    WatchInput::Quit => break,
                    WatchInput::Ignored => {}
                },
                Ok(None) | Err(_) => {
                    debug!("stdin closed, manual refresh disabled");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Watch mode stopped");
    Ok(())
}
