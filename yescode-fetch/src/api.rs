//! Typed access to the `YesCode` backend.
//!
//! [`YesCodeApi`] is the seam the CLI talks through; [`ApiClient`] is the
//! reqwest-backed implementation. Tests substitute their own.
//!
//! Several lookups treat `404` as "nothing here" rather than a failure,
//! see [`classify_status`].

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};

use yescode_core::{
    AvailableProviders, DataEnvelope, ProfileResponse, ProviderAlternative, ProviderSelection,
    TeamProviderAlternative, TeamProviderAlternatives, TeamProviderSelection, TeamProviderType,
};

use crate::error::FetchError;
use crate::host::HttpClient;

/// Profile endpoint, also used to validate keys.
pub const PROFILE_PATH: &str = "/api/v1/auth/profile";

const AVAILABLE_PROVIDERS_PATH: &str = "/api/v1/user/available-providers";
const USER_ALTERNATIVES_PATH: &str = "/api/v1/user/provider-alternatives";
const TEAM_ALTERNATIVES_PATH: &str = "/api/v1/user/team-provider-alternatives";

// ============================================================================
// API Trait
// ============================================================================

/// Operations the backend offers.
#[async_trait]
pub trait YesCodeApi: Send + Sync {
    /// Fetches the caller's profile.
    async fn profile(&self) -> Result<ProfileResponse, FetchError>;

    /// Lists providers the caller may route through.
    async fn available_providers(&self) -> Result<AvailableProviders, FetchError>;

    /// Alternatives for a provider on the user path. Empty when the
    /// backend has none (`404`).
    async fn user_alternatives(&self, provider_id: i64)
    -> Result<Vec<ProviderAlternative>, FetchError>;

    /// Current user-path selection, `None` when unset (`404`).
    async fn current_user_selection(
        &self,
        provider_id: i64,
    ) -> Result<Option<ProviderSelection>, FetchError>;

    /// Selects an alternative on the user path.
    async fn set_user_selection(&self, provider_id: i64, alternative_id: i64)
    -> Result<(), FetchError>;

    /// Alternatives for a team provider type. Empty on `404`.
    async fn team_alternatives(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Vec<TeamProviderAlternative>, FetchError>;

    /// Current team-path override, `None` on `404` or `data: null`.
    async fn current_team_selection(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Option<TeamProviderSelection>, FetchError>;

    /// Overrides the provider for a team type.
    async fn set_team_selection(
        &self,
        provider_type: TeamProviderType,
        provider_id: i64,
    ) -> Result<(), FetchError>;

    /// Removes the override so the team default applies again.
    async fn reset_team_selection(&self, provider_type: TeamProviderType)
    -> Result<(), FetchError>;
}

// ============================================================================
// Status Handling
// ============================================================================

/// Whether a response carries the requested resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// 2xx.
    Found,
    /// 404 on an endpoint where that means "none".
    Missing,
}

/// Maps a status to [`Presence`] or a [`FetchError::Status`].
///
/// # Errors
///
/// Any non-2xx status, except `404` when `allow_missing` is set.
pub fn classify_status(status: StatusCode, allow_missing: bool) -> Result<Presence, FetchError> {
    if status.is_success() {
        Ok(Presence::Found)
    } else if allow_missing && status == StatusCode::NOT_FOUND {
        Ok(Presence::Missing)
    } else {
        Err(FetchError::Status {
            status: status.as_u16(),
        })
    }
}

/// Decodes a JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Decodes a body from an endpoint where `404` or an empty body means "none".
///
/// # Errors
///
/// Non-2xx statuses other than `404`, and malformed JSON.
pub fn decode_optional<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, FetchError> {
    match classify_status(status, true)? {
        Presence::Missing => Ok(None),
        Presence::Found if body.iter().all(u8::is_ascii_whitespace) => Ok(None),
        Presence::Found => Ok(Some(serde_json::from_slice(body)?)),
    }
}

/// Decodes a `{"data": ...}` selection, where `404` and `"data": null`
/// both mean nothing is selected.
///
/// # Errors
///
/// See [`decode_optional`].
pub fn decode_selection<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<Option<T>, FetchError> {
    let envelope: Option<DataEnvelope<Option<T>>> = decode_optional(status, body)?;
    Ok(envelope.and_then(|e| e.data))
}

/// Outcome of a selection reset. Nothing to reset is as good as a reset.
///
/// # Errors
///
/// Non-2xx statuses other than `404`.
pub fn reset_outcome(status: StatusCode) -> Result<(), FetchError> {
    classify_status(status, true).map(|_| ())
}

// ============================================================================
// Client
// ============================================================================

/// Reqwest-backed [`YesCodeApi`] bound to one environment and key.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    /// Creates a client.
    pub fn new(http: HttpClient, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let response = self.http.get(&self.url(path), &self.api_key).await?;
        classify_status(response.status(), false)?;
        decode(response).await
    }

    async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        let (status, body) = self.get_raw(path).await?;
        decode_optional(status, &body)
    }

    async fn get_selection<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, FetchError> {
        let (status, body) = self.get_raw(path).await?;
        decode_selection(status, &body)
    }

    async fn get_raw(&self, path: &str) -> Result<(StatusCode, Vec<u8>), FetchError> {
        let response = self.http.get(&self.url(path), &self.api_key).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path, "Resource not found");
        }
        Ok((status, response.bytes().await?.to_vec()))
    }

    async fn put(&self, path: &str, body: &serde_json::Value) -> Result<(), FetchError> {
        let response = self.http.put_json(&self.url(path), &self.api_key, body).await?;
        classify_status(response.status(), false).map(|_| ())
    }
}

#[async_trait]
impl YesCodeApi for ApiClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn profile(&self) -> Result<ProfileResponse, FetchError> {
        self.get_json(PROFILE_PATH).await
    }

    #[instrument(skip(self))]
    async fn available_providers(&self) -> Result<AvailableProviders, FetchError> {
        self.get_json(AVAILABLE_PROVIDERS_PATH).await
    }

    #[instrument(skip(self))]
    async fn user_alternatives(
        &self,
        provider_id: i64,
    ) -> Result<Vec<ProviderAlternative>, FetchError> {
        let path = format!("{USER_ALTERNATIVES_PATH}/{provider_id}");
        let envelope: Option<DataEnvelope<Vec<ProviderAlternative>>> =
            self.get_optional(&path).await?;
        Ok(envelope.map(|e| e.data).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn current_user_selection(
        &self,
        provider_id: i64,
    ) -> Result<Option<ProviderSelection>, FetchError> {
        let path = format!("{USER_ALTERNATIVES_PATH}/{provider_id}/selection");
        self.get_selection(&path).await
    }

    #[instrument(skip(self))]
    async fn set_user_selection(
        &self,
        provider_id: i64,
        alternative_id: i64,
    ) -> Result<(), FetchError> {
        let path = format!("{USER_ALTERNATIVES_PATH}/{provider_id}/selection");
        self.put(&path, &json!({ "selected_alternative_id": alternative_id }))
            .await
    }

    #[instrument(skip(self, provider_type), fields(provider_type = provider_type.as_str()))]
    async fn team_alternatives(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Vec<TeamProviderAlternative>, FetchError> {
        let path = format!("{TEAM_ALTERNATIVES_PATH}/{}", provider_type.as_str());
        let response: Option<TeamProviderAlternatives> = self.get_optional(&path).await?;
        Ok(response.map(|r| r.data).unwrap_or_default())
    }

    #[instrument(skip(self, provider_type), fields(provider_type = provider_type.as_str()))]
    async fn current_team_selection(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Option<TeamProviderSelection>, FetchError> {
        let path = format!("{TEAM_ALTERNATIVES_PATH}/{}/selection", provider_type.as_str());
        self.get_selection(&path).await
    }

    #[instrument(skip(self, provider_type), fields(provider_type = provider_type.as_str()))]
    async fn set_team_selection(
        &self,
        provider_type: TeamProviderType,
        provider_id: i64,
    ) -> Result<(), FetchError> {
        let path = format!("{TEAM_ALTERNATIVES_PATH}/{}/selection", provider_type.as_str());
        self.put(&path, &json!({ "selected_provider_id": provider_id }))
            .await
    }

    #[instrument(skip(self, provider_type), fields(provider_type = provider_type.as_str()))]
    async fn reset_team_selection(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<(), FetchError> {
        let path = format!("{TEAM_ALTERNATIVES_PATH}/{}/selection", provider_type.as_str());
        let response = self.http.delete(&self.url(&path), &self.api_key).await?;
        reset_outcome(response.status())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses_are_found() {
        assert_eq!(classify_status(StatusCode::OK, false).unwrap(), Presence::Found);
        assert_eq!(
            classify_status(StatusCode::NO_CONTENT, true).unwrap(),
            Presence::Found
        );
    }

    #[test]
    fn test_not_found_only_tolerated_when_allowed() {
        assert_eq!(
            classify_status(StatusCode::NOT_FOUND, true).unwrap(),
            Presence::Missing
        );
        assert!(classify_status(StatusCode::NOT_FOUND, false)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_other_errors_carry_status() {
        let err = classify_status(StatusCode::UNAUTHORIZED, true).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 401 }));
    }

    #[test]
    fn test_reset_tolerates_nothing_to_reset() {
        assert!(reset_outcome(StatusCode::NO_CONTENT).is_ok());
        assert!(reset_outcome(StatusCode::OK).is_ok());
        assert!(reset_outcome(StatusCode::NOT_FOUND).is_ok());
        let err = reset_outcome(StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500 }));
    }

    #[test]
    fn test_selection_missing_or_null_is_none() {
        let missing: Option<TeamProviderSelection> =
            decode_selection(StatusCode::NOT_FOUND, br#"{"error":"not found"}"#).unwrap();
        assert!(missing.is_none());

        let null: Option<TeamProviderSelection> =
            decode_selection(StatusCode::OK, br#"{"data":null}"#).unwrap();
        assert!(null.is_none());

        let empty: Option<ProviderSelection> =
            decode_selection(StatusCode::NO_CONTENT, b"").unwrap();
        assert!(empty.is_none());
    }

    #[test]
    fn test_selection_errors_propagate() {
        let err = decode_selection::<TeamProviderSelection>(StatusCode::FORBIDDEN, b"")
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 403 }));
        assert!(decode_selection::<TeamProviderSelection>(StatusCode::OK, b"{not json").is_err());
    }

    #[test]
    fn test_optional_decodes_body() {
        let ids: Option<Vec<i64>> = decode_optional(StatusCode::OK, b"[1, 2]").unwrap();
        assert_eq!(ids, Some(vec![1, 2]));
        let none: Option<Vec<i64>> = decode_optional(StatusCode::NOT_FOUND, b"[1]").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = ApiClient::new(HttpClient::new().unwrap(), "https://co.yes.vg", "sk-secret");
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk-secret"));
        assert_eq!(client.url(PROFILE_PATH), "https://co.yes.vg/api/v1/auth/profile");
    }
}
