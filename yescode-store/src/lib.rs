// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `YesCode` Store
//!
//! Persistent state for the `YesCode` balance monitor.
//!
//! This crate provides:
//!
//! - **`SettingsStore`**: User preferences with atomic JSON persistence
//! - **`CredentialStore`**: API key in the system keychain
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use yescode_store::SettingsStore;
//! use yescode_core::DisplayMode;
//!
//! let settings = SettingsStore::load_default().await;
//! settings.set_display_mode(DisplayMode::Team).await?;
//! ```

pub mod credentials;
pub mod error;
pub mod persistence;
pub mod settings_store;

pub use credentials::{API_KEY_ENV, CredentialStore, KeySource};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use settings_store::{
    DEFAULT_REFRESH_INTERVAL_SECS, LogLevel, MIN_REFRESH_INTERVAL_SECS, Settings, SettingsStore,
};

#[cfg(test)]
mod persistence_tests;
