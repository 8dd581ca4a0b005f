// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `YesCode` Fetch
//!
//! Backend access and host APIs for the `YesCode` balance monitor.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::keychain`] - Secure credential storage (system keychain)
//! - [`host::http`] - HTTP client with `X-API-Key` auth and domain allowlist
//!
//! ## Backend
//!
//! - [`api::YesCodeApi`] - Typed backend operations
//! - [`api::ApiClient`] - Reqwest implementation
//! - [`environment::detect_environment`] - Which backend a key belongs to
//! - [`retry::RetryStrategy`] - Bounded fixed-delay retry
//!
//! ## Example
//!
//! ```ignore
//! use yescode_fetch::{ApiClient, HttpClient, YesCodeApi};
//!
//! let http = HttpClient::new()?;
//! let api = ApiClient::new(http, "https://co.yes.vg", api_key);
//! let profile = api.profile().await?;
//! ```

pub mod api;
pub mod environment;
pub mod error;
pub mod host;
pub mod retry;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, KeychainError};

// Host APIs
pub use host::{
    http::HttpClient,
    keychain::{KeychainApi, MemoryKeychain, SystemKeychain},
};

// Backend
pub use api::{ApiClient, Presence, YesCodeApi, classify_status};
pub use environment::{EnvironmentProbe, detect_environment};
pub use retry::{RetryOutcome, RetryStrategy, Retryable};
