//! API key storage.
//!
//! The key is a secret and lives in the system keychain (service
//! `yescode`, account `api_key`). When the keychain has no entry, the
//! `YESCODE_API_KEY` environment variable is consulted.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use yescode_fetch::SystemKeychain;
//! use yescode_store::CredentialStore;
//!
//! let credentials = CredentialStore::new(Arc::new(SystemKeychain::new()));
//! credentials.store_api_key("sk-xxxxx").await?;
//! if let Some(key) = credentials.api_key().await? {
//!     // talk to the backend
//! }
//! ```

use std::sync::Arc;

use tracing::debug;
use yescode_fetch::KeychainApi;

use crate::error::StoreError;

/// Keychain service name.
pub const SERVICE: &str = "yescode";

/// Keychain account name.
pub const ACCOUNT: &str = "api_key";

/// Environment variable consulted when the keychain is empty.
pub const API_KEY_ENV: &str = "YESCODE_API_KEY";

/// Where a key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// System keychain.
    Keychain,
    /// `YESCODE_API_KEY`.
    Environment,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Keychain => write!(f, "keychain"),
            KeySource::Environment => write!(f, "{API_KEY_ENV}"),
        }
    }
}

/// API key store.
#[derive(Clone)]
pub struct CredentialStore {
    keychain: Arc<dyn KeychainApi>,
    env_var: Option<&'static str>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("env_var", &self.env_var)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a store with the environment fallback enabled.
    pub fn new(keychain: Arc<dyn KeychainApi>) -> Self {
        Self {
            keychain,
            env_var: Some(API_KEY_ENV),
        }
    }

    /// Disables the environment fallback.
    #[must_use]
    pub fn without_env_fallback(mut self) -> Self {
        self.env_var = None;
        self
    }

    /// Returns the API key and where it came from.
    ///
    /// # Errors
    ///
    /// Returns error if the keychain cannot be read.
    pub async fn api_key_with_source(&self) -> Result<Option<(String, KeySource)>, StoreError> {
        if let Some(key) = self.keychain.get(SERVICE, ACCOUNT).await? {
            let key = key.trim().to_string();
            if !key.is_empty() {
                return Ok(Some((key, KeySource::Keychain)));
            }
        }

        let from_env = self
            .env_var
            .and_then(|name| std::env::var(name).ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        if from_env.is_some() {
            debug!(var = API_KEY_ENV, "Using API key from environment");
        }
        Ok(from_env.map(|key| (key, KeySource::Environment)))
    }

    /// Returns the API key, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the keychain cannot be read.
    pub async fn api_key(&self) -> Result<Option<String>, StoreError> {
        Ok(self.api_key_with_source().await?.map(|(key, _)| key))
    }

    /// Stores the API key in the keychain.
    ///
    /// # Errors
    ///
    /// Returns error if the keychain cannot be written.
    pub async fn store_api_key(&self, api_key: &str) -> Result<(), StoreError> {
        self.keychain.set(SERVICE, ACCOUNT, api_key.trim()).await?;
        debug!("API key stored in keychain");
        Ok(())
    }

    /// Deletes the API key from the keychain.
    ///
    /// # Errors
    ///
    /// Returns error if the keychain cannot be written.
    pub async fn delete_api_key(&self) -> Result<(), StoreError> {
        self.keychain.delete(SERVICE, ACCOUNT).await?;
        debug!("API key deleted from keychain");
        Ok(())
    }

    /// Returns true if a key is available from any source.
    pub async fn has_api_key(&self) -> bool {
        matches!(self.api_key().await, Ok(Some(_)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use yescode_fetch::MemoryKeychain;

    fn store() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryKeychain::new())).without_env_fallback()
    }

    #[tokio::test]
    async fn test_absent_key_is_valid_state() {
        let credentials = store();
        assert_eq!(credentials.api_key().await.unwrap(), None);
        assert!(!credentials.has_api_key().await);
    }

    #[tokio::test]
    async fn test_store_and_delete() {
        let credentials = store();
        credentials.store_api_key("  sk-test \n").await.unwrap();
        assert_eq!(
            credentials.api_key_with_source().await.unwrap(),
            Some(("sk-test".to_string(), KeySource::Keychain))
        );

        credentials.delete_api_key().await.unwrap();
        assert!(!credentials.has_api_key().await);
    }

    #[test]
    fn test_key_source_display() {
        assert_eq!(KeySource::Keychain.to_string(), "keychain");
        assert_eq!(KeySource::Environment.to_string(), "YESCODE_API_KEY");
    }
}
