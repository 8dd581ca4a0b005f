//! Account profile returned by `GET /api/v1/auth/profile`.

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Profile
// ============================================================================

/// Snapshot of the caller's balances, plan and team membership.
///
/// Fetched fresh on every refresh and never cached beyond the rendered
/// result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProfileResponse {
    /// Remaining daily subscription balance in dollars.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subscription_balance: f64,
    /// Pay-as-you-go balance in dollars.
    #[serde(default, deserialize_with = "null_as_default")]
    pub pay_as_you_go_balance: f64,
    /// Subscription spend in the current week.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_week_spend: f64,
    /// Active subscription plan, if any.
    #[serde(default)]
    pub subscription_plan: Option<SubscriptionPlan>,
    /// Which balance the backend charges first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub balance_preference: BalancePreference,
    /// Timestamp of the last weekly reset.
    #[serde(default)]
    pub last_week_reset: Option<String>,
    /// Subscription expiry timestamp.
    #[serde(default)]
    pub subscription_expiry: Option<String>,
    /// Team the caller currently belongs to.
    #[serde(default)]
    pub current_team: Option<Team>,
    /// Per-user membership record for `current_team`.
    #[serde(default)]
    pub team_membership: Option<TeamMembership>,
}

impl ProfileResponse {
    /// Returns true if a subscription plan is attached.
    pub fn has_subscription(&self) -> bool {
        self.subscription_plan.is_some()
    }

    /// Returns true if the caller is in a team.
    pub fn has_team(&self) -> bool {
        self.current_team.is_some()
    }

    /// Returns true if the account charges pay-as-you-go only.
    pub fn is_payg_only(&self) -> bool {
        self.balance_preference == BalancePreference::PaygOnly
    }

    /// Returns the team name when both the team and the membership are
    /// present, which is what team-mode CLI setup requires.
    pub fn active_team_name(&self) -> Option<&str> {
        match (&self.current_team, &self.team_membership) {
            (Some(team), Some(_)) => Some(team.name.as_str()),
            _ => None,
        }
    }
}

/// Subscription plan limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SubscriptionPlan {
    /// Plan name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Daily budget in dollars.
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_balance: f64,
    /// Weekly spend limit in dollars.
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_limit: f64,
}

/// Team-level limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Team {
    /// Team (group) name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Team-wide daily balance.
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_balance: f64,
    /// Daily budget of each member.
    #[serde(default, deserialize_with = "null_as_default")]
    pub per_user_daily_balance: f64,
    /// Weekly limit of each member.
    #[serde(default, deserialize_with = "null_as_default")]
    pub weekly_limit: f64,
}

/// The caller's membership in `current_team`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TeamMembership {
    /// Spend in the current week.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_week_spend: f64,
    /// Spend against today's per-user budget.
    #[serde(default, deserialize_with = "null_as_default")]
    pub daily_subscription_spending: f64,
    /// Membership expiry timestamp.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Timestamp of the last weekly reset.
    #[serde(default)]
    pub last_week_reset: Option<String>,
}

/// Balance preference flag.
///
/// Only `payg_only` changes behavior; any other value the backend sends
/// is treated as subscription-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BalancePreference {
    /// Charge pay-as-you-go only.
    PaygOnly,
    /// Charge the subscription first.
    #[default]
    #[serde(other)]
    SubscriptionFirst,
}
