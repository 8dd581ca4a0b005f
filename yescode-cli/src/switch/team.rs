//! Team-path switching.

use tracing::{info, warn};

use yescode_core::TeamProviderType;
use yescode_fetch::YesCodeApi;

use super::menu::team_alternative_choices;
use crate::presenter::{ChoicePresenter, NotifyLevel};

/// Lets the user override, or reset, the provider for a team type.
pub(super) async fn switch_team_provider(
    api: &dyn YesCodeApi,
    presenter: &dyn ChoicePresenter,
    provider_type: TeamProviderType,
) {
    let alternatives = api.team_alternatives(provider_type).await.unwrap_or_else(|e| {
        warn!(%provider_type, error = %e, "Failed to fetch team alternatives");
        Vec::new()
    });
    let current = match api.current_team_selection(provider_type).await {
        Ok(selection) => selection.map(|s| s.selected_provider_id),
        Err(e) => {
            warn!(%provider_type, error = %e, "Failed to fetch team selection");
            None
        }
    };

    let choices = team_alternative_choices(&alternatives, current);
    let title = format!("Select an alternative for {provider_type}");
    let Some(index) = presenter.pick(&title, &choices).await else {
        return;
    };
    let Some(choice) = choices.get(index) else {
        return;
    };
    if choice.current {
        presenter
            .notify(NotifyLevel::Info, "This option is already active.")
            .await;
        return;
    }

    // Index 0 is the team default; the rest are shifted by one
    let Some(alternative) = index.checked_sub(1).and_then(|i| alternatives.get(i)) else {
        match api.reset_team_selection(provider_type).await {
            Ok(()) => {
                info!(%provider_type, "Team selection reset");
                presenter
                    .notify(
                        NotifyLevel::Info,
                        &format!("Successfully reset to team default for {provider_type}"),
                    )
                    .await;
            }
            Err(e) => {
                warn!(%provider_type, error = %e, "Failed to reset team selection");
                presenter
                    .notify(
                        NotifyLevel::Error,
                        &format!("Failed to reset to team default: {e}. Please try again."),
                    )
                    .await;
            }
        }
        return;
    };

    match api
        .set_team_selection(provider_type, alternative.alternative_provider_id)
        .await
    {
        Ok(()) => {
            info!(
                %provider_type,
                provider_id = alternative.alternative_provider_id,
                "Team selection updated"
            );
            presenter
                .notify(
                    NotifyLevel::Info,
                    &format!(
                        "Successfully switched {provider_type} to {}",
                        alternative.display_name
                    ),
                )
                .await;
        }
        Err(e) => {
            warn!(%provider_type, error = %e, "Failed to update team selection");
            presenter
                .notify(
                    NotifyLevel::Error,
                    &format!("Failed to switch provider: {e}. Please try again."),
                )
                .await;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
