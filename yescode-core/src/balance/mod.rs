//! Balance calculators and the display-mode dispatcher.
//!
//! A [`ProfileResponse`] is turned into a single [`BalanceResult`]: the
//! status line text, a multi-line tooltip and the remaining percentage
//! used for low-balance warnings.
//!
//! Three calculators exist:
//! - **Subscription**: plan daily/weekly windows, tighter one wins.
//! - **Team**: per-user team budget, same selection rules.
//! - **Pay-as-you-go**: raw dollar balance.

pub mod format;
mod paygo;
mod subscription;
mod team;
mod window;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::ProfileResponse;

pub use paygo::calculate_paygo;
pub use subscription::calculate_subscription;
pub use team::calculate_team;

/// Warning threshold for daily/weekly balances, in percent remaining.
pub const LOW_PERCENT_THRESHOLD: f64 = 10.0;

/// Warning threshold for pay-as-you-go balances, in dollars.
pub const LOW_PAYGO_DOLLARS: f64 = 5.0;

// ============================================================================
// Display Mode
// ============================================================================

/// Which balance the user wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Pick based on the profile.
    #[default]
    Auto,
    /// Subscription plan.
    Subscription,
    /// Pay-as-you-go balance.
    Paygo,
    /// Team budget.
    Team,
}

impl DisplayMode {
    /// All modes in menu order.
    pub const ALL: [DisplayMode; 4] = [Self::Auto, Self::Subscription, Self::Paygo, Self::Team];

    /// Wire and settings name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Subscription => "subscription",
            Self::Paygo => "paygo",
            Self::Team => "team",
        }
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "Auto"),
            Self::Subscription => write!(f, "Subscription"),
            Self::Paygo => write!(f, "PayGo"),
            Self::Team => write!(f, "Team"),
        }
    }
}

impl std::str::FromStr for DisplayMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lower)
            .ok_or_else(|| CoreError::InvalidData(format!("unknown display mode: {s}")))
    }
}

// ============================================================================
// Result
// ============================================================================

/// Which metric a [`BalanceResult`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceKind {
    /// Daily window.
    #[serde(rename = "daily")]
    Daily,
    /// Weekly window.
    #[serde(rename = "weekly")]
    Weekly,
    /// Pay-as-you-go dollars.
    #[serde(rename = "payGo")]
    PayGo,
}

/// A rendered balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResult {
    /// Metric shown.
    #[serde(rename = "type")]
    pub kind: BalanceKind,
    /// Remaining percent for daily/weekly, raw dollars for pay-as-you-go.
    pub percentage: f64,
    /// Status line text.
    pub display_text: String,
    /// Newline separated details.
    pub tooltip: String,
}

impl BalanceResult {
    /// Returns true when the balance should be highlighted as low.
    pub fn is_low(&self) -> bool {
        match self.kind {
            BalanceKind::Daily | BalanceKind::Weekly => self.percentage < LOW_PERCENT_THRESHOLD,
            BalanceKind::PayGo => self.percentage < LOW_PAYGO_DOLLARS,
        }
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// The calculator a mode resolves to for a given profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    /// [`calculate_subscription`].
    Subscription,
    /// [`calculate_team`].
    Team,
    /// [`calculate_paygo`].
    PayGo,
}

/// Resolves a display mode against the profile.
///
/// Forced modes fall back when their data is absent. `payg_only` is only
/// consulted in [`DisplayMode::Auto`].
pub fn select_calculator(profile: &ProfileResponse, mode: DisplayMode) -> Calculator {
    let has_plan = profile.has_subscription();
    match mode {
        DisplayMode::Subscription if has_plan => Calculator::Subscription,
        DisplayMode::Subscription | DisplayMode::Paygo => Calculator::PayGo,
        DisplayMode::Team if profile.has_team() => Calculator::Team,
        DisplayMode::Team if has_plan => Calculator::Subscription,
        DisplayMode::Team => Calculator::PayGo,
        DisplayMode::Auto if profile.has_team() => Calculator::Team,
        DisplayMode::Auto if has_plan && !profile.is_payg_only() => Calculator::Subscription,
        DisplayMode::Auto => Calculator::PayGo,
    }
}

/// Computes the balance for the current time.
///
/// # Errors
///
/// Returns [`CoreError::MissingData`] when the selected calculator finds
/// its input incomplete (a team without a membership record).
pub fn calculate_balance(
    profile: &ProfileResponse,
    mode: DisplayMode,
    reverse: bool,
) -> Result<BalanceResult, CoreError> {
    calculate_balance_at(profile, mode, reverse, Utc::now())
}

/// Computes the balance with relative dates measured from `now`.
///
/// # Errors
///
/// See [`calculate_balance`].
pub fn calculate_balance_at(
    profile: &ProfileResponse,
    mode: DisplayMode,
    reverse: bool,
    now: DateTime<Utc>,
) -> Result<BalanceResult, CoreError> {
    match select_calculator(profile, mode) {
        Calculator::Subscription => calculate_subscription(profile, reverse, now),
        Calculator::Team => calculate_team(profile, reverse, now),
        Calculator::PayGo => Ok(calculate_paygo(profile)),
    }
}
