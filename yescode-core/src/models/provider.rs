//! Provider routing types.
//!
//! Providers, their alternatives and the caller's current selections are
//! owned by the backend. Two paths exist:
//! - **User path**: alternatives keyed by provider ID.
//! - **Team path**: alternatives keyed by [`TeamProviderType`].

use serde::{Deserialize, Serialize};

use crate::balance::format::fixed;

// ============================================================================
// Envelope
// ============================================================================

/// The `{ "data": ... }` wrapper most endpoints respond with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    /// Wrapped payload.
    pub data: T,
}

// ============================================================================
// Provider
// ============================================================================

/// An upstream AI provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Provider {
    /// Backend identifier.
    pub id: i64,
    /// Provider family (`claude`, `openai`, `google`, ...).
    #[serde(rename = "type", default)]
    pub provider_type: String,
    /// Internal name.
    #[serde(default)]
    pub name: String,
    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Whether the provider is enabled.
    #[serde(default)]
    pub is_enabled: bool,
    /// Sort order in backend listings.
    #[serde(default)]
    pub sort_order: i64,
    /// Billing rate multiplier (1.0 = 100%).
    #[serde(default)]
    pub rate_multiplier: f64,
    /// Whether this is the pay-as-you-go default.
    #[serde(default)]
    pub is_payg_default: bool,
}

/// Formats a rate multiplier as a percentage with one decimal (`0.5` → `50.0%`).
///
/// Halves round away from zero, like the balance figures.
pub fn format_rate(rate_multiplier: f64) -> String {
    format!("{}%", fixed(rate_multiplier * 100.0, 1))
}

/// Which entitlement a provider is available through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    /// Subscription entitlement.
    Subscription,
    /// Pay-as-you-go entitlement.
    Payg,
    /// Team entitlement (still switched through the user path).
    Team,
    /// Empty or unknown source; treated as a plain user provider.
    #[default]
    #[serde(other)]
    User,
}

impl ProviderSource {
    /// Returns true for sources listed under the user-level section.
    pub fn is_user_level(&self) -> bool {
        !matches!(self, Self::Team)
    }

    /// Upper-case label shown next to a provider.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Subscription => "SUBSCRIPTION",
            Self::Payg => "PAYG",
            Self::Team => "TEAM",
            Self::User => "USER",
        }
    }
}

/// A provider as listed by `available-providers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// The provider itself.
    pub provider: Provider,
    /// Effective rate multiplier for the caller.
    #[serde(default)]
    pub rate_multiplier: f64,
    /// Whether this is the default provider.
    #[serde(default)]
    pub is_default: bool,
    /// Entitlement the provider comes from.
    #[serde(default)]
    pub source: ProviderSource,
}

/// Response of `GET /api/v1/user/available-providers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AvailableProviders {
    /// Whether the caller has pay-as-you-go balance.
    #[serde(default)]
    pub has_payg_balance: bool,
    /// Whether the caller has a subscription.
    #[serde(default)]
    pub has_subscription: bool,
    /// Whether the caller is a team member.
    #[serde(default)]
    pub is_team_member: bool,
    /// Providers the caller may route through.
    #[serde(default)]
    pub providers: Vec<ProviderInfo>,
}

impl AvailableProviders {
    /// Returns true if a team-sourced provider of the given type exists.
    pub fn has_team_provider(&self, provider_type: TeamProviderType) -> bool {
        self.providers.iter().any(|p| {
            p.source == ProviderSource::Team && p.provider.provider_type == provider_type.as_str()
        })
    }
}

// ============================================================================
// User Path
// ============================================================================

/// An alternative for a provider on the user path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAlternative {
    /// Record ID.
    pub id: i64,
    /// Base provider ID.
    pub provider_id: i64,
    /// Substitute provider ID.
    pub alternative_id: i64,
    /// Substitute provider.
    pub alternative: Provider,
    /// Label for the alternative.
    #[serde(default)]
    pub display_name: String,
    /// Whether the alternative is the provider itself.
    #[serde(default)]
    pub is_self: bool,
    /// Ordering priority.
    #[serde(default)]
    pub priority: i64,
}

/// The caller's current alternative for a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSelection {
    /// Record ID.
    pub id: i64,
    /// Owning user.
    #[serde(default)]
    pub user_id: i64,
    /// Base provider ID.
    pub provider_id: i64,
    /// Selected alternative ID.
    pub selected_alternative_id: i64,
    /// Selected alternative.
    pub selected_alternative: Provider,
}

// ============================================================================
// Team Path
// ============================================================================

/// The canonical team provider categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamProviderType {
    /// Anthropic Claude.
    Claude,
    /// `OpenAI`.
    #[serde(rename = "openai")]
    OpenAi,
    /// Google.
    Google,
}

impl TeamProviderType {
    /// All team types in menu order.
    pub const ALL: [TeamProviderType; 3] = [Self::Claude, Self::OpenAi, Self::Google];

    /// Wire name used in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::OpenAi => "openai",
            Self::Google => "google",
        }
    }

    /// Display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Claude => "Claude",
            Self::OpenAi => "OpenAI",
            Self::Google => "Google",
        }
    }

    /// Parses a wire name.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Sort rank for a provider type string; unknown types sort last.
    pub fn rank(value: &str) -> usize {
        Self::ALL
            .iter()
            .position(|t| t.as_str() == value)
            .unwrap_or(usize::MAX)
    }
}

impl std::fmt::Display for TeamProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A team-level alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProviderAlternative {
    /// Record ID.
    pub id: i64,
    /// Substitute provider ID.
    pub alternative_provider_id: i64,
    /// Substitute provider.
    pub alternative_provider: Provider,
    /// Label for the alternative.
    #[serde(default)]
    pub display_name: String,
    /// Ordering priority.
    #[serde(default)]
    pub priority: i64,
    /// Provider type string.
    #[serde(default)]
    pub provider_type: String,
}

/// Response of `GET /api/v1/user/team-provider-alternatives/{type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TeamProviderAlternatives {
    /// Alternatives for the type.
    #[serde(default)]
    pub data: Vec<TeamProviderAlternative>,
    /// Type echoed back.
    #[serde(default)]
    pub provider_type: String,
}

/// The caller's override for a team provider type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamProviderSelection {
    /// Record ID.
    pub id: i64,
    /// Owning user.
    #[serde(default)]
    pub user_id: i64,
    /// Provider type string.
    #[serde(default)]
    pub provider_type: String,
    /// Selected provider ID.
    pub selected_provider_id: i64,
    /// Selected provider.
    pub selected_provider: Provider,
}
