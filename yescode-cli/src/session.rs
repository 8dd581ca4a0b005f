//! Per-process context shared by every command.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use yescode_core::{DisplayMode, Environment, ProfileResponse};
use yescode_fetch::{ApiClient, FetchError, HttpClient, SystemKeychain, YesCodeApi};
use yescode_store::{CredentialStore, SettingsStore};

use crate::status_bar::{ProfileSource, RefreshOptions};

/// Domains the API key may be sent to.
const ALLOWED_DOMAINS: &[&str] = &["yes.vg"];

/// Settings, credentials and the HTTP client.
#[derive(Debug, Clone)]
pub struct Session {
    settings: SettingsStore,
    credentials: CredentialStore,
    http: HttpClient,
}

impl Session {
    /// Opens the session backed by the system keychain.
    ///
    /// `config` overrides the settings file location.
    pub async fn open(config: Option<PathBuf>) -> Result<Self> {
        let settings = match config {
            Some(path) => SettingsStore::load(path).await,
            None => SettingsStore::load_default().await,
        };
        let credentials = CredentialStore::new(Arc::new(SystemKeychain::new()));
        let http = HttpClient::new()?
            .with_allowed_domains(ALLOWED_DOMAINS.iter().map(ToString::to_string).collect());

        Ok(Self::new(settings, credentials, http))
    }

    /// Creates a session from parts.
    pub fn new(settings: SettingsStore, credentials: CredentialStore, http: HttpClient) -> Self {
        Self {
            settings,
            credentials,
            http,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Environment the stored key belongs to.
    pub async fn environment(&self) -> Environment {
        self.settings.environment().await
    }

    /// Base URL of the current environment.
    pub async fn base_url(&self) -> &'static str {
        self.environment().await.base_url()
    }

    /// Builds an API client for the stored key.
    ///
    /// # Errors
    ///
    /// [`FetchError::NotConfigured`] when no key is available. An
    /// unreadable keychain counts as no key.
    pub async fn api(&self) -> Result<ApiClient, FetchError> {
        let key = self.credentials.api_key().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read API key");
            None
        });
        let key = key.ok_or(FetchError::NotConfigured)?;
        Ok(ApiClient::new(self.http.clone(), self.base_url().await, key))
    }

    pub async fn display_mode(&self) -> DisplayMode {
        self.settings.display_mode().await
    }

    /// Persists a new display mode.
    pub async fn set_display_mode(&self, mode: DisplayMode) -> Result<()> {
        self.settings.set_display_mode(mode).await?;
        Ok(())
    }

    pub async fn reverse_display(&self) -> bool {
        self.settings.reverse_display().await
    }

    /// Persists the reverse flag.
    pub async fn set_reverse_display(&self, value: bool) -> Result<()> {
        self.settings.set_reverse_display(value).await?;
        Ok(())
    }

    /// Flips the reverse flag and returns the new value.
    pub async fn toggle_reverse_display(&self) -> Result<bool> {
        let value = !self.reverse_display().await;
        self.set_reverse_display(value).await?;
        Ok(value)
    }

    pub async fn refresh_interval(&self) -> Duration {
        self.settings.refresh_interval().await
    }

    /// Current mode and reverse flag.
    pub async fn refresh_options(&self) -> RefreshOptions {
        let settings = self.settings.get().await;
        RefreshOptions {
            mode: settings.display_mode,
            reverse: settings.reverse_display,
        }
    }
}

#[async_trait]
impl ProfileSource for Session {
    async fn fetch_profile(&self) -> Result<ProfileResponse, FetchError> {
        self.api().await?.profile().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use yescode_fetch::MemoryKeychain;

    fn session(dir: &tempfile::TempDir) -> Session {
        Session::new(
            SettingsStore::new(dir.path().join("settings.json")),
            CredentialStore::new(Arc::new(MemoryKeychain::new())).without_env_fallback(),
            HttpClient::new().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_api_requires_key() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);

        assert!(matches!(session.api().await, Err(FetchError::NotConfigured)));
        assert!(matches!(
            session.fetch_profile().await,
            Err(FetchError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_api_follows_environment() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);
        session.credentials().store_api_key("sk-test").await.unwrap();

        let api = session.api().await.unwrap();
        assert_eq!(api.base_url(), Environment::Production.base_url());

        session
            .settings()
            .set_environment(Environment::Test)
            .await
            .unwrap();
        let api = session.api().await.unwrap();
        assert_eq!(api.base_url(), Environment::Test.base_url());
    }

    #[tokio::test]
    async fn test_toggle_reverse_persists() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(&dir);

        assert!(session.toggle_reverse_display().await.unwrap());
        assert!(!session.toggle_reverse_display().await.unwrap());

        session.set_display_mode(DisplayMode::Team).await.unwrap();
        let options = session.refresh_options().await;
        assert_eq!(options.mode, DisplayMode::Team);
        assert!(!options.reverse);
    }
}
