//! HTTP client with tracing, `X-API-Key` auth and a domain allowlist.
//!
//! Every request carries the caller's API key in the `X-API-Key` header.
//! The allowlist keeps that key from being sent anywhere but the backend.

use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::FetchError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for `YesCode`.
const USER_AGENT: &str = concat!("yescode/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper with tracing, auth header and domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    #[must_use]
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), FetchError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(());
        };

        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| FetchError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs an authenticated GET request.
    #[instrument(skip(self, api_key), fields(url = %url))]
    pub async fn get(&self, url: &str, api_key: &str) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self
            .inner
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs an authenticated PUT request with a JSON body.
    #[instrument(skip(self, api_key, body), fields(url = %url))]
    pub async fn put_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        api_key: &str,
        body: &T,
    ) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("PUT request with JSON");

        let response = self
            .inner
            .put(url)
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs an authenticated DELETE request.
    #[instrument(skip(self, api_key), fields(url = %url))]
    pub async fn delete(&self, url: &str, api_key: &str) -> Result<Response, FetchError> {
        self.is_domain_allowed(url)?;
        debug!("DELETE request");

        let response = self
            .inner
            .delete(url)
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================
