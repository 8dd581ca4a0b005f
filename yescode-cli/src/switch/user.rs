//! User-path switching.

use tracing::{info, warn};

use yescode_fetch::YesCodeApi;

use super::menu::user_alternative_choices;
use crate::presenter::{ChoicePresenter, NotifyLevel};

/// Lets the user pick an alternative for one provider.
///
/// Providers without alternatives return silently.
pub(super) async fn switch_user_provider(
    api: &dyn YesCodeApi,
    presenter: &dyn ChoicePresenter,
    provider_id: i64,
    name: &str,
) {
    let alternatives = match api.user_alternatives(provider_id).await {
        Ok(alternatives) if alternatives.is_empty() => return,
        Ok(alternatives) => alternatives,
        Err(e) => {
            presenter
                .notify(
                    NotifyLevel::Error,
                    &format!("Failed to fetch alternatives: {e}"),
                )
                .await;
            return;
        }
    };

    let current = match api.current_user_selection(provider_id).await {
        Ok(selection) => selection.map(|s| s.selected_alternative_id),
        Err(e) => {
            warn!(provider_id, error = %e, "Failed to fetch current selection");
            None
        }
    };

    let choices = user_alternative_choices(&alternatives, current);
    let title = format!("Select an alternative for {name}");
    let Some(index) = presenter.pick(&title, &choices).await else {
        return;
    };
    let (Some(alternative), Some(choice)) = (alternatives.get(index), choices.get(index)) else {
        return;
    };

    if choice.current {
        presenter
            .notify(NotifyLevel::Info, "This alternative is already selected.")
            .await;
        return;
    }

    match api
        .set_user_selection(provider_id, alternative.alternative_id)
        .await
    {
        Ok(()) => {
            info!(provider_id, alternative_id = alternative.alternative_id, "User selection updated");
            presenter
                .notify(
                    NotifyLevel::Info,
                    &format!("Successfully switched {name} to {}", alternative.display_name),
                )
                .await;
        }
        Err(e) => {
            warn!(provider_id, error = %e, "Failed to update user selection");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockApi, RecordingPresenter, provider, user_alternative};

    fn api_with_alternatives() -> MockApi {
        let mut api = MockApi::default();
        api.user_alternatives.insert(
            1,
            vec![
                user_alternative(1, provider(1, "claude", "Claude", 1.0)),
                user_alternative(1, provider(7, "claude", "Claude Lite", 0.25)),
            ],
        );
        api
    }

    #[tokio::test]
    async fn test_no_alternatives_returns_silently() {
        let api = MockApi::default();
        let presenter = RecordingPresenter::default();

        switch_user_provider(&api, &presenter, 1, "Claude").await;

        assert!(presenter.picks().is_empty());
        assert!(presenter.notices().is_empty());
    }

    #[tokio::test]
    async fn test_switches_to_alternative() {
        let api = api_with_alternatives();
        let presenter = RecordingPresenter::default().pick_index(1);

        switch_user_provider(&api, &presenter, 1, "Claude").await;

        assert!(api.calls().contains(&"set_user_selection 1 7".to_string()));
        assert_eq!(
            presenter.notices(),
            vec![(
                NotifyLevel::Info,
                "Successfully switched Claude to Claude Lite".to_string()
            )]
        );
        let (title, _) = &presenter.picks()[0];
        assert_eq!(title, "Select an alternative for Claude");
    }

    #[tokio::test]
    async fn test_choosing_current_does_nothing() {
        let mut api = api_with_alternatives();
        api.select_user_alternative(1, provider(7, "claude", "Claude Lite", 0.25));
        let presenter = RecordingPresenter::default().pick_index(1);

        switch_user_provider(&api, &presenter, 1, "Claude").await;

        assert!(!api.calls().iter().any(|c| c.starts_with("set_user_selection")));
        assert_eq!(
            presenter.notices(),
            vec![(
                NotifyLevel::Info,
                "This alternative is already selected.".to_string()
            )]
        );
        assert!(presenter.picks()[0].1[1].current);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let api = MockApi {
            fail_writes: true,
            ..api_with_alternatives()
        };
        let presenter = RecordingPresenter::default().pick_index(1);

        switch_user_provider(&api, &presenter, 1, "Claude").await;

        let notices = presenter.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NotifyLevel::Error);
        assert!(notices[0].1.contains("Failed to switch provider"));
    }
}
