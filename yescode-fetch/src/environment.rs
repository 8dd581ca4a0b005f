//! Detecting which backend an API key belongs to.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use yescode_core::Environment;

use crate::api::PROFILE_PATH;
use crate::host::HttpClient;

/// Checks whether an environment accepts a key.
#[async_trait]
pub trait EnvironmentProbe: Send + Sync {
    /// Returns true if `GET profile` on `environment` answers 2xx.
    async fn accepts_key(&self, environment: Environment, api_key: &str) -> bool;
}

#[async_trait]
impl EnvironmentProbe for HttpClient {
    async fn accepts_key(&self, environment: Environment, api_key: &str) -> bool {
        let url = format!("{}{PROFILE_PATH}", environment.base_url());
        match self.get(&url, api_key).await {
            Ok(response) => {
                debug!(%environment, status = %response.status(), "Probe answered");
                response.status().is_success()
            }
            Err(e) => {
                debug!(%environment, error = %e, "Probe failed");
                false
            }
        }
    }
}

/// Probes both environments concurrently.
///
/// Production wins when both accept the key. Returns `None` when neither
/// does.
#[instrument(skip(probe, api_key))]
pub async fn detect_environment<P>(probe: &P, api_key: &str) -> Option<Environment>
where
    P: EnvironmentProbe + ?Sized,
{
    let (production, test) = futures::join!(
        probe.accepts_key(Environment::Production, api_key),
        probe.accepts_key(Environment::Test, api_key),
    );

    let detected = if production {
        Some(Environment::Production)
    } else if test {
        Some(Environment::Test)
    } else {
        None
    };

    match detected {
        Some(environment) => info!(%environment, "API key environment detected"),
        None => warn!("API key rejected by every environment"),
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProbe {
        production: bool,
        test: bool,
    }

    #[async_trait]
    impl EnvironmentProbe for StubProbe {
        async fn accepts_key(&self, environment: Environment, _api_key: &str) -> bool {
            match environment {
                Environment::Production => self.production,
                Environment::Test => self.test,
            }
        }
    }

    async fn detect(production: bool, test: bool) -> Option<Environment> {
        detect_environment(&StubProbe { production, test }, "key").await
    }

    #[tokio::test]
    async fn test_production_wins() {
        assert_eq!(detect(true, true).await, Some(Environment::Production));
        assert_eq!(detect(true, false).await, Some(Environment::Production));
    }

    #[tokio::test]
    async fn test_test_only() {
        assert_eq!(detect(false, true).await, Some(Environment::Test));
    }

    #[tokio::test]
    async fn test_rejected_everywhere() {
        assert_eq!(detect(false, false).await, None);
    }
}
