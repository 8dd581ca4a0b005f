//! Domain models for YesCode.
//!
//! Everything here mirrors what the backend sends; the client never
//! derives invariants of its own beyond matching IDs it got back.
//!
//! ## Submodules
//!
//! - [`profile`] - Account profile snapshot (balances, plan, team)
//! - [`provider`] - Providers, alternatives and current selections
//! - [`environment`] - Production/test backend selection

mod environment;
mod profile;
mod provider;

pub use environment::Environment;
pub use profile::{BalancePreference, ProfileResponse, SubscriptionPlan, Team, TeamMembership};
pub use provider::{
    AvailableProviders, DataEnvelope, Provider, ProviderAlternative, ProviderInfo,
    ProviderSelection, ProviderSource, TeamProviderAlternative, TeamProviderAlternatives,
    TeamProviderSelection, TeamProviderType, format_rate,
};
