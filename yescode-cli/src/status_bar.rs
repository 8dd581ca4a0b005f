//! Status line refresh.
//!
//! [`refresh`] fetches the profile with a bounded retry, runs the balance
//! dispatcher and walks the [`StatusBar`] through its states, pushing every
//! visible change to a [`StatusDisplay`].
//!
//! ```text
//! Idle ──▶ Fetching ──▶ Success
//!              │  ▲
//!              ▼  │
//!           Retrying ──▶ Failed(Exhausted)
//!              │
//!              └──────▶ Failed(NotConfigured | Rejected | Data)
//! ```

use async_trait::async_trait;
use std::io::Write;
use tracing::{debug, info, instrument, warn};

use yescode_core::{BalanceResult, DisplayMode, ProfileResponse, calculate_balance};
use yescode_fetch::{FetchError, RetryOutcome, RetryStrategy};

use crate::output::TextFormatter;

/// Text shown before the first refresh.
pub const LOADING_TEXT: &str = "YesCode: Loading...";

/// Text shown while a manual refresh runs.
pub const REFRESHING_TEXT: &str = "⟳ YesCode...";

/// Text shown when no key is configured or the balance cannot be computed.
pub const ERROR_TEXT: &str = "YesCode: Error";

/// Text shown when the backend could not be reached.
pub const FETCH_ERROR_TEXT: &str = "YesCode: Fetch Error";

/// Tooltip shown when no key is configured.
pub const NOT_CONFIGURED_TOOLTIP: &str = "API key not set. Run \"yescode key set\".";

// ============================================================================
// Profile Source
// ============================================================================

/// Where the refresh gets its profile from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the profile once.
    async fn fetch_profile(&self) -> Result<ProfileResponse, FetchError>;
}

// ============================================================================
// State
// ============================================================================

/// Why the last refresh failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No API key.
    NotConfigured,
    /// Every attempt failed with a transient error.
    Exhausted,
    /// A non-transient fetch error, such as an unreadable keychain.
    Rejected,
    /// The profile lacked what the selected calculator needs.
    Data,
}

/// Refresh lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    /// Nothing fetched yet.
    Idle,
    /// A request is in flight.
    Fetching,
    /// The last refresh produced a balance.
    Success,
    /// Waiting before the next attempt.
    Retrying {
        /// Failed attempt number.
        attempt: u32,
        /// Attempts allowed.
        max: u32,
    },
    /// The last refresh gave up.
    Failed(FailureKind),
}

/// What the status line currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    pub text: String,
    pub tooltip: String,
    /// Highlight the line (low balance or error).
    pub warning: bool,
    pub state: RefreshState,
    /// Balance of the last successful refresh.
    pub last_result: Option<BalanceResult>,
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    /// Creates the initial bar.
    pub fn new() -> Self {
        Self {
            text: LOADING_TEXT.to_string(),
            tooltip: String::new(),
            warning: false,
            state: RefreshState::Idle,
            last_result: None,
        }
    }

    fn set(&mut self, text: impl Into<String>, tooltip: impl Into<String>, warning: bool) {
        self.text = text.into();
        self.tooltip = tooltip.into();
        self.warning = warning;
    }

    fn show_balance(&mut self, result: BalanceResult) {
        self.set(&result.display_text, &result.tooltip, result.is_low());
        self.state = RefreshState::Success;
        self.last_result = Some(result);
    }

    fn show_failure(&mut self, kind: FailureKind, text: &str, tooltip: String) {
        self.set(text, tooltip, true);
        self.state = RefreshState::Failed(kind);
        self.last_result = None;
    }
}

// ============================================================================
// Display Sink
// ============================================================================

/// Receives every visible change of the bar.
pub trait StatusDisplay {
    /// Renders the bar.
    fn show(&mut self, bar: &StatusBar);
}

/// Renders the bar on the terminal.
pub struct TerminalStatusDisplay {
    formatter: TextFormatter,
    style: DisplayStyle,
}

enum DisplayStyle {
    /// Full-screen redraw for `watch`.
    Screen { refresh_secs: u64 },
    /// Progress lines on stderr only; the caller prints the final result.
    Progress,
}

impl TerminalStatusDisplay {
    /// Redraws the whole screen on every change.
    pub fn screen(formatter: TextFormatter, refresh_secs: u64) -> Self {
        Self {
            formatter,
            style: DisplayStyle::Screen { refresh_secs },
        }
    }

    /// Reports retries on stderr and nothing else.
    pub fn progress(formatter: TextFormatter) -> Self {
        Self {
            formatter,
            style: DisplayStyle::Progress,
        }
    }
}

impl StatusDisplay for TerminalStatusDisplay {
    fn show(&mut self, bar: &StatusBar) {
        match self.style {
            DisplayStyle::Screen { refresh_secs } => {
                let mut out = std::io::stdout();
                let now = chrono::Local::now();
                let _ = write!(out, "\x1b[2J\x1b[H");
                let _ = writeln!(
                    out,
                    "YesCode Watch Mode - {} (refresh: {}s)",
                    now.format("%H:%M:%S"),
                    refresh_secs
                );
                let _ = writeln!(out, "{}", "─".repeat(50));
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", self.formatter.format_status(bar));
                let _ = writeln!(out);
                let _ = writeln!(out, "Press Enter or r to refresh, q to quit");
                let _ = out.flush();
            }
            DisplayStyle::Progress => {
                if let RefreshState::Retrying { .. } = bar.state {
                    eprintln!("{}", bar.text);
                }
            }
        }
    }
}

// ============================================================================
// Refresh
// ============================================================================

/// What to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
    pub mode: DisplayMode,
    pub reverse: bool,
}

/// Who asked for the refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The user; shows a spinner text first.
    Manual,
    /// The interval ticker; the old text stays until the result arrives.
    Automatic,
}

/// Refreshes the bar once.
///
/// Returns the final state.
#[instrument(skip_all, fields(mode = options.mode.as_str(), trigger = ?trigger))]
pub async fn refresh<S>(
    bar: &mut StatusBar,
    display: &mut dyn StatusDisplay,
    source: &S,
    options: RefreshOptions,
    trigger: RefreshTrigger,
    retry: &RetryStrategy,
) -> RefreshState
where
    S: ProfileSource + ?Sized,
{
    bar.state = RefreshState::Fetching;
    if trigger == RefreshTrigger::Manual {
        bar.text = REFRESHING_TEXT.to_string();
        display.show(bar);
    }

    let outcome = retry
        .run(
            |_| source.fetch_profile(),
            |attempt, max, _| {
                let message = format!("Fetch failed, retrying... ({attempt}/{max})");
                bar.set(&message, &message, false);
                bar.state = RefreshState::Retrying { attempt, max };
                display.show(bar);
            },
        )
        .await;

    match outcome {
        RetryOutcome::Success(profile) => match calculate_balance(&profile, options.mode, options.reverse) {
            Ok(result) => {
                debug!(text = %result.display_text, low = result.is_low(), "Balance refreshed");
                bar.show_balance(result);
            }
            Err(e) => {
                warn!(error = %e, "Balance calculation failed");
                bar.show_failure(FailureKind::Data, ERROR_TEXT, e.to_string());
            }
        },
        RetryOutcome::Aborted(FetchError::NotConfigured) => {
            info!("API key not configured");
            bar.show_failure(
                FailureKind::NotConfigured,
                ERROR_TEXT,
                NOT_CONFIGURED_TOOLTIP.to_string(),
            );
        }
        RetryOutcome::Aborted(e) => {
            warn!(error = %e, "Fetch failed");
            bar.show_failure(
                FailureKind::Rejected,
                FETCH_ERROR_TEXT,
                format!("Failed to fetch balance.\nError: {e}"),
            );
        }
        RetryOutcome::Exhausted {
            attempts,
            last_error,
        } => {
            bar.show_failure(
                FailureKind::Exhausted,
                FETCH_ERROR_TEXT,
                format!("Failed to fetch balance after {attempts} attempts.\nError: {last_error}"),
            );
        }
    }

    display.show(bar);
    bar.state
}

// ============================================================================
// Tests
// ============================================================================
