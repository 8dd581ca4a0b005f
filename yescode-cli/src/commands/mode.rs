//! Mode command - choose which balance the status line shows.

use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use yescode_core::{DisplayMode, ProfileResponse};
use yescode_fetch::YesCodeApi;
use yescode_store::SettingsStore;

use crate::output::TextFormatter;
use crate::presenter::{Choice, ChoicePresenter, NotifyLevel, TerminalPresenter};
use crate::session::Session;
use crate::status_bar::RefreshTrigger;
use crate::{Cli, commands::status};

/// Arguments for the mode command.
#[derive(Args)]
pub struct ModeArgs {
    /// auto, subscription, paygo or team. Shows a menu when omitted.
    pub mode: Option<DisplayMode>,
}

/// What to do before switching to a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeGuard {
    /// Switch silently.
    Proceed,
    /// Show the warning, then switch.
    Warn(&'static str),
    /// Switch only if the user accepts.
    Confirm(&'static str),
}

/// Checks a requested mode against the account.
pub fn mode_change_guard(profile: &ProfileResponse, mode: DisplayMode) -> ModeGuard {
    let has_plan = profile.has_subscription();
    let payg_only = profile.is_payg_only();

    match mode {
        DisplayMode::Subscription if !has_plan => {
            ModeGuard::Warn("No subscription found. Will fall back to PayGo mode.")
        }
        DisplayMode::Subscription if payg_only => ModeGuard::Confirm(
            "Your account is set to PayGo Only mode. Switching to Subscription display may show incorrect data.",
        ),
        DisplayMode::Paygo if has_plan && !payg_only => ModeGuard::Confirm(
            "Your account is set to Subscription First mode. Switching to PayGo display may not reflect your actual usage.",
        ),
        DisplayMode::Team if !profile.has_team() => {
            ModeGuard::Warn("No team found. Will fall back to available mode.")
        }
        _ => ModeGuard::Proceed,
    }
}

/// Builds the mode menu, in [`DisplayMode::ALL`] order.
pub fn build_mode_menu(profile: &ProfileResponse, current: DisplayMode) -> Vec<Choice> {
    let has_plan = profile.has_subscription();
    let payg_only = profile.is_payg_only();

    DisplayMode::ALL
        .into_iter()
        .map(|mode| {
            let description = match mode {
                DisplayMode::Auto => "Automatically detect mode based on account type",
                DisplayMode::Subscription if !has_plan => "❌ Not available (no subscription)",
                DisplayMode::Subscription if payg_only => {
                    "⚠️ Warning: Your account is set to PayGo Only mode"
                }
                DisplayMode::Subscription => "Always show subscription balance",
                DisplayMode::Paygo if has_plan && !payg_only => {
                    "⚠️ Warning: Your account is set to Subscription First mode"
                }
                DisplayMode::Paygo => "Always show pay-as-you-go balance",
                DisplayMode::Team if profile.has_team() => "Always show team balance",
                DisplayMode::Team => "❌ Not available (no team)",
            };
            let choice = Choice::item(mode.to_string())
                .with_description(description)
                .with_current(mode == current);
            if mode == current {
                choice.with_detail("✓ Currently selected")
            } else {
                choice
            }
        })
        .collect()
}

/// Runs the mode command.
pub async fn run(args: &ModeArgs, cli: &Cli, session: &Session) -> Result<()> {
    let presenter = TerminalPresenter::new(TextFormatter::new(cli.use_colors()));
    let api = session.api().await?;

    if change_mode(session.settings(), &api, &presenter, args.mode)
        .await?
        .is_some()
    {
        status::render(cli, session, RefreshTrigger::Automatic).await?;
    }
    Ok(())
}

/// Fetches the profile, lets the user pick a mode (unless `requested` is
/// given), applies the guard and persists the result.
///
/// Returns the new mode, or `None` when nothing changed.
pub async fn change_mode(
    settings: &SettingsStore,
    api: &dyn YesCodeApi,
    presenter: &dyn ChoicePresenter,
    requested: Option<DisplayMode>,
) -> Result<Option<DisplayMode>> {
    let profile = match api.profile().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "Failed to fetch profile for mode change");
            presenter
                .notify(
                    NotifyLevel::Error,
                    "Failed to fetch account data. Please try again.",
                )
                .await;
            return Ok(None);
        }
    };

    let mode = match requested {
        Some(mode) => mode,
        None => {
            let current = settings.display_mode().await;
            let choices = build_mode_menu(&profile, current);
            let Some(index) = presenter.pick("Select display mode", &choices).await else {
                return Ok(None);
            };
            let Some(mode) = DisplayMode::ALL.get(index).copied() else {
                return Ok(None);
            };
            mode
        }
    };

    match mode_change_guard(&profile, mode) {
        ModeGuard::Proceed => {}
        ModeGuard::Warn(message) => presenter.notify(NotifyLevel::Warning, message).await,
        ModeGuard::Confirm(message) => {
            if !presenter.confirm(message, "Continue Anyway").await {
                return Ok(None);
            }
        }
    }

    settings.set_display_mode(mode).await?;
    info!(mode = mode.as_str(), "Display mode changed");
    presenter
        .notify(
            NotifyLevel::Info,
            &format!("Display mode switched to: {mode}"),
        )
        .await;
    Ok(Some(mode))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use yescode_core::{BalancePreference, SubscriptionPlan, Team, TeamMembership};

    use crate::testing::{MockApi, RecordingPresenter};

    fn subscriber(preference: BalancePreference) -> ProfileResponse {
        ProfileResponse {
            subscription_plan: Some(SubscriptionPlan {
                name: "Pro".to_string(),
                daily_balance: 10.0,
                weekly_limit: 50.0,
            }),
            balance_preference: preference,
            ..ProfileResponse::default()
        }
    }

    fn store(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(dir.path().join("settings.json"))
    }

    #[test]
    fn test_guard_rules() {
        let paygo_only = ProfileResponse {
            balance_preference: BalancePreference::PaygOnly,
            ..ProfileResponse::default()
        };
        let sub_first = subscriber(BalancePreference::SubscriptionFirst);
        let sub_payg_only = subscriber(BalancePreference::PaygOnly);

        assert!(matches!(
            mode_change_guard(&paygo_only, DisplayMode::Subscription),
            ModeGuard::Warn(_)
        ));
        assert!(matches!(
            mode_change_guard(&sub_payg_only, DisplayMode::Subscription),
            ModeGuard::Confirm(_)
        ));
        assert_eq!(
            mode_change_guard(&sub_first, DisplayMode::Subscription),
            ModeGuard::Proceed
        );
        assert!(matches!(
            mode_change_guard(&sub_first, DisplayMode::Paygo),
            ModeGuard::Confirm(_)
        ));
        assert_eq!(
            mode_change_guard(&sub_payg_only, DisplayMode::Paygo),
            ModeGuard::Proceed
        );
        assert!(matches!(
            mode_change_guard(&sub_first, DisplayMode::Team),
            ModeGuard::Warn(_)
        ));
        assert_eq!(
            mode_change_guard(&sub_first, DisplayMode::Auto),
            ModeGuard::Proceed
        );
    }

    #[test]
    fn test_menu_markers() {
        let profile = ProfileResponse {
            current_team: Some(Team::default()),
            team_membership: Some(TeamMembership::default()),
            ..ProfileResponse::default()
        };

        let choices = build_mode_menu(&profile, DisplayMode::Team);
        let labels: Vec<&str> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Auto", "Subscription", "PayGo", "Team"]);
        assert_eq!(
            choices[1].description.as_deref(),
            Some("❌ Not available (no subscription)")
        );
        assert_eq!(
            choices[3].description.as_deref(),
            Some("Always show team balance")
        );
        assert!(choices[3].current);
        assert_eq!(choices[3].detail.as_deref(), Some("✓ Currently selected"));
        assert!(!choices[0].current);
    }

    #[tokio::test]
    async fn test_pick_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        let settings = store(&dir);
        let api = MockApi::with_profile(subscriber(BalancePreference::SubscriptionFirst));
        let presenter = RecordingPresenter::default().pick_index(1);

        let mode = change_mode(&settings, &api, &presenter, None).await.unwrap();

        assert_eq!(mode, Some(DisplayMode::Subscription));
        assert_eq!(settings.display_mode().await, DisplayMode::Subscription);
        assert_eq!(
            presenter.notices(),
            vec![(
                NotifyLevel::Info,
                "Display mode switched to: Subscription".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_declined_confirmation_keeps_mode() {
        let dir = tempfile::tempdir().unwrap();
        let settings = store(&dir);
        let api = MockApi::with_profile(subscriber(BalancePreference::SubscriptionFirst));
        let presenter = RecordingPresenter::default().confirm_with(false);

        let mode = change_mode(&settings, &api, &presenter, Some(DisplayMode::Paygo))
            .await
            .unwrap();

        assert_eq!(mode, None);
        assert_eq!(settings.display_mode().await, DisplayMode::Auto);
        assert_eq!(presenter.confirms().len(), 1);
    }

    #[tokio::test]
    async fn test_warning_then_proceed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = store(&dir);
        let api = MockApi::with_profile(ProfileResponse::default());
        let presenter = RecordingPresenter::default();

        let mode = change_mode(&settings, &api, &presenter, Some(DisplayMode::Team))
            .await
            .unwrap();

        assert_eq!(mode, Some(DisplayMode::Team));
        let notices = presenter.notices();
        assert_eq!(
            notices[0],
            (
                NotifyLevel::Warning,
                "No team found. Will fall back to available mode.".to_string()
            )
        );
        assert_eq!(notices[1].0, NotifyLevel::Info);
    }

    #[tokio::test]
    async fn test_profile_failure_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let settings = store(&dir);
        let api = MockApi::default();
        let presenter = RecordingPresenter::default();

        let mode = change_mode(&settings, &api, &presenter, None).await.unwrap();

        assert_eq!(mode, None);
        assert!(presenter.picks().is_empty());
        assert_eq!(presenter.notices()[0].0, NotifyLevel::Error);
    }
}
