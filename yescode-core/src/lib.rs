// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `YesCode` Core
//!
//! Domain types and pure logic for the `YesCode` balance monitor.
//!
//! This crate performs no I/O. It provides:
//!
//! - Backend models (profile, providers, environments)
//! - Balance calculators and the display-mode dispatcher
//! - One-click CLI setup command generation
//! - Error types
//!
//! ## Key Types
//!
//! ### Models
//! - [`ProfileResponse`] - Balances, plan and team membership
//! - [`Environment`] - Production or test backend
//! - [`AvailableProviders`] - Providers the caller may route through
//! - [`TeamProviderType`] - Team provider categories
//!
//! ### Balance
//! - [`DisplayMode`] - Which balance to show
//! - [`BalanceResult`] - Rendered status line and tooltip
//! - [`calculate_balance`] - Mode dispatcher
//!
//! ### Setup
//! - [`CliTool`], [`TargetOs`], [`SetupMode`]
//! - [`generate_setup_command`]

pub mod balance;
pub mod error;
pub mod models;
pub mod setup;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Profile
    BalancePreference,
    ProfileResponse,
    SubscriptionPlan,
    Team,
    TeamMembership,
    // Environment
    Environment,
    // Providers
    AvailableProviders,
    DataEnvelope,
    Provider,
    ProviderAlternative,
    ProviderInfo,
    ProviderSelection,
    ProviderSource,
    TeamProviderAlternative,
    TeamProviderAlternatives,
    TeamProviderSelection,
    TeamProviderType,
    format_rate,
};

// Re-export balance
pub use balance::{
    BalanceKind, BalanceResult, Calculator, DisplayMode, calculate_balance, calculate_balance_at,
    select_calculator,
};

// Re-export setup
pub use setup::{CliTool, SetupMode, TargetOs, generate_setup_command};
