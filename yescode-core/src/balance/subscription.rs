//! Subscription balance calculator.

use chrono::{DateTime, Utc};

use super::BalanceResult;
use super::format::{next_reset, parse_timestamp};
use super::window::{QuotaView, Window};
use crate::error::CoreError;
use crate::models::ProfileResponse;

/// Renders the subscription plan's daily and weekly windows.
///
/// # Errors
///
/// Returns [`CoreError::MissingData`] when the profile has no plan.
pub fn calculate_subscription(
    profile: &ProfileResponse,
    reverse: bool,
    now: DateTime<Utc>,
) -> Result<BalanceResult, CoreError> {
    let plan = profile
        .subscription_plan
        .as_ref()
        .ok_or(CoreError::MissingData("Subscription"))?;

    let view = QuotaView {
        short_label: "Subs",
        mode_label: "Subscription Mode",
        owner_label: "Plan",
        owner_name: &plan.name,
        daily: Window {
            remaining: profile.subscription_balance,
            budget: plan.daily_balance,
        },
        weekly: Window {
            remaining: plan.weekly_limit - profile.current_week_spend,
            budget: plan.weekly_limit,
        },
        next_reset: next_reset(profile.last_week_reset.as_deref()),
        expiry: profile
            .subscription_expiry
            .as_deref()
            .and_then(parse_timestamp),
    };

    Ok(view.render(reverse, now))
}
