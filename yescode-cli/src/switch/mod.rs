//! Provider switching.
//!
//! The backend routes each provider through one of its alternatives. Two
//! paths exist:
//!
//! - **User path**: per-provider alternatives, for every provider in
//!   `available-providers` (team-sourced ones included).
//! - **Team path**: a per-type override of the team default.
//!
//! Switching is only offered against production.

pub mod menu;
mod team;
mod user;

use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use yescode_core::{Environment, TeamProviderType};
use yescode_fetch::{FetchError, YesCodeApi};

use crate::presenter::{ChoicePresenter, NotifyLevel};

use self::menu::{MenuData, SwitchTarget, build_provider_menu};

/// Fetches everything the top-level menu needs.
///
/// Only the provider list is required; failed secondary lookups show as
/// "no alternatives" or "no selection".
pub async fn load_menu_data(api: &dyn YesCodeApi) -> Result<MenuData, FetchError> {
    let available = api.available_providers().await?;
    debug!(providers = available.providers.len(), "Available providers loaded");

    let mut team_alternatives = HashMap::new();
    for provider_type in TeamProviderType::ALL {
        match api.team_alternatives(provider_type).await {
            Ok(alternatives) => {
                team_alternatives.insert(provider_type, alternatives);
            }
            Err(e) => warn!(%provider_type, error = %e, "Failed to fetch team alternatives"),
        }
    }

    let lookups = available
        .providers
        .iter()
        .map(|p| api.current_user_selection(p.provider.id));
    let user_selections = join_all(lookups)
        .await
        .into_iter()
        .filter_map(|result| match result {
            Ok(selection) => selection,
            Err(e) => {
                warn!(error = %e, "Failed to fetch user selection");
                None
            }
        })
        .map(|selection| (selection.provider_id, selection))
        .collect();

    let mut team_selections = HashMap::new();
    for provider_type in TeamProviderType::ALL {
        match api.current_team_selection(provider_type).await {
            Ok(Some(selection)) => {
                team_selections.insert(provider_type, selection);
            }
            Ok(None) => {}
            Err(e) => warn!(%provider_type, error = %e, "Failed to fetch team selection"),
        }
    }

    Ok(MenuData {
        available,
        team_alternatives,
        user_selections,
        team_selections,
    })
}

/// Runs the whole switch flow: top-level menu, then the chosen path.
pub async fn run_switch(
    api: &dyn YesCodeApi,
    presenter: &dyn ChoicePresenter,
    environment: Environment,
) {
    if !environment.provider_switching_available() {
        presenter
            .notify(
                NotifyLevel::Info,
                "Provider switching is not available in Test environment.",
            )
            .await;
        return;
    }

    let data = match load_menu_data(api).await {
        Ok(data) => data,
        Err(e) => {
            presenter
                .notify(
                    NotifyLevel::Error,
                    &format!("Failed to fetch provider data: {e}"),
                )
                .await;
            return;
        }
    };

    let entries = build_provider_menu(&data);
    if entries.is_empty() {
        presenter
            .notify(NotifyLevel::Info, "No providers available to switch.")
            .await;
        return;
    }

    let choices: Vec<_> = entries.iter().map(|e| e.choice.clone()).collect();
    let Some(index) = presenter.pick("Select a provider to switch", &choices).await else {
        return;
    };

    match entries.get(index).and_then(|e| e.target.as_ref()) {
        Some(SwitchTarget::User { provider_id, name }) => {
            user::switch_user_provider(api, presenter, *provider_id, name).await;
        }
        Some(SwitchTarget::Team { provider_type }) => {
            team::switch_team_provider(api, presenter, *provider_type).await;
        }
        None => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, RecordingPresenter, provider, provider_info};
    use yescode_core::{AvailableProviders, ProviderSource};

    #[tokio::test]
    async fn test_unavailable_in_test_environment() {
        let api = MockApi::default();
        let presenter = RecordingPresenter::default();

        run_switch(&api, &presenter, Environment::Test).await;

        assert_eq!(
            presenter.notices(),
            vec![(
                NotifyLevel::Info,
                "Provider switching is not available in Test environment.".to_string()
            )]
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_provider_list_failure_stops() {
        let api = MockApi::default();
        let presenter = RecordingPresenter::default();

        run_switch(&api, &presenter, Environment::Production).await;

        let notices = presenter.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NotifyLevel::Error);
        assert!(notices[0].1.starts_with("Failed to fetch provider data"));
        assert!(presenter.picks().is_empty());
    }

    #[tokio::test]
    async fn test_empty_provider_list() {
        let api = MockApi {
            available: Some(AvailableProviders::default()),
            ..MockApi::default()
        };
        let presenter = RecordingPresenter::default();

        run_switch(&api, &presenter, Environment::Production).await;

        assert_eq!(
            presenter.notices(),
            vec![(NotifyLevel::Info, "No providers available to switch.".to_string())]
        );
    }

    #[tokio::test]
    async fn test_load_menu_data_collects_selections() {
        let mut api = MockApi {
            available: Some(AvailableProviders {
                providers: vec![
                    provider_info(provider(1, "claude", "Claude", 1.0), ProviderSource::Payg),
                    provider_info(provider(2, "openai", "Codex", 1.0), ProviderSource::Team),
                ],
                ..AvailableProviders::default()
            }),
            ..MockApi::default()
        };
        api.select_user_alternative(1, provider(7, "claude", "Claude Lite", 0.25));

        let data = load_menu_data(&api).await.unwrap();

        assert_eq!(data.user_selections.len(), 1);
        assert_eq!(data.user_selections[&1].selected_alternative_id, 7);
        assert!(data.team_selections.is_empty());
        assert_eq!(data.team_alternatives.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_pick_is_silent() {
        let api = MockApi {
            available: Some(AvailableProviders {
                providers: vec![provider_info(
                    provider(1, "claude", "Claude", 1.0),
                    ProviderSource::Payg,
                )],
                ..AvailableProviders::default()
            }),
            ..MockApi::default()
        };
        let presenter = RecordingPresenter::default();

        run_switch(&api, &presenter, Environment::Production).await;

        assert_eq!(presenter.picks().len(), 1);
        assert!(presenter.notices().is_empty());
        assert!(!api.calls().iter().any(|c| c.starts_with("alternatives")));
    }
}
