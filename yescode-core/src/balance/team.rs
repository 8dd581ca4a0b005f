//! Team balance calculator.

use chrono::{DateTime, Utc};

use super::BalanceResult;
use super::format::{next_reset, parse_timestamp};
use super::window::{QuotaView, Window};
use crate::error::CoreError;
use crate::models::ProfileResponse;

/// Renders the caller's per-user team budget.
///
/// # Errors
///
/// Returns [`CoreError::MissingData`] unless both the team and the
/// membership are present.
pub fn calculate_team(
    profile: &ProfileResponse,
    reverse: bool,
    now: DateTime<Utc>,
) -> Result<BalanceResult, CoreError> {
    let (Some(team), Some(membership)) = (&profile.current_team, &profile.team_membership) else {
        return Err(CoreError::MissingData("Team"));
    };

    let view = QuotaView {
        short_label: "Team",
        mode_label: "Team Mode",
        owner_label: "Group",
        owner_name: &team.name,
        daily: Window {
            remaining: team.per_user_daily_balance - membership.daily_subscription_spending,
            budget: team.per_user_daily_balance,
        },
        weekly: Window {
            remaining: team.weekly_limit - membership.current_week_spend,
            budget: team.weekly_limit,
        },
        next_reset: next_reset(membership.last_week_reset.as_deref()),
        expiry: membership.expires_at.as_deref().and_then(parse_timestamp),
    };

    Ok(view.render(reverse, now))
}
