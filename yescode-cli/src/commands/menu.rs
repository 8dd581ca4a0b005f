//! Menu command - the interactive main menu.
//!
//! Shows the status line, then loops over the menu until the user cancels.
//! Failures inside an action are reported and the menu is shown again.

use anyhow::Result;
use tracing::{debug, warn};

use crate::Cli;
use crate::commands::key::{KeyOutcome, apply_api_key};
use crate::commands::{mode, providers, reverse, setup, status};
use crate::output::TextFormatter;
use crate::presenter::{Choice, ChoicePresenter, NotifyLevel, TerminalPresenter};
use crate::session::Session;
use crate::status_bar::RefreshTrigger;

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Refresh,
    SwitchMode,
    SwitchProvider,
    SetApiKey,
    Setup,
    ToggleReverse,
}

impl MenuAction {
    /// Entries in menu order.
    pub const ALL: [MenuAction; 6] = [
        Self::Refresh,
        Self::SwitchMode,
        Self::SwitchProvider,
        Self::SetApiKey,
        Self::Setup,
        Self::ToggleReverse,
    ];

    /// How the status line is refreshed after this action.
    pub fn refresh_trigger(self) -> RefreshTrigger {
        match self {
            Self::Refresh => RefreshTrigger::Manual,
            _ => RefreshTrigger::Automatic,
        }
    }
}

/// Builds the main menu. `reverse` is the current reverse-display flag.
pub fn build_main_menu(reverse: bool) -> Vec<Choice> {
    MenuAction::ALL
        .into_iter()
        .map(|action| match action {
            MenuAction::Refresh => {
                Choice::item("Refresh Balance").with_description("Manually refresh balance data")
            }
            MenuAction::SwitchMode => Choice::item("Switch Display Mode")
                .with_description("Change between Auto/Subscription/PayGo/Team modes"),
            MenuAction::SwitchProvider => Choice::item("Switch Provider")
                .with_description("Choose provider alternatives for this key"),
            MenuAction::SetApiKey => {
                Choice::item("Set API Key").with_description("Configure your YesCode API key")
            }
            MenuAction::Setup => Choice::item("One-Click CLI Setup...")
                .with_description("Auto-execute or copy setup commands"),
            MenuAction::ToggleReverse => {
                Choice::item("Reverse Display").with_description(reverse::state_label(reverse))
            }
        })
        .collect()
}

/// Runs the menu command.
pub async fn run(cli: &Cli, session: &Session) -> Result<()> {
    let presenter = TerminalPresenter::new(TextFormatter::new(cli.use_colors()));
    status::render(cli, session, RefreshTrigger::Automatic).await?;

    loop {
        let choices = build_main_menu(session.reverse_display().await);
        let Some(action) = presenter
            .pick("YesCode Menu", &choices)
            .await
            .and_then(|index| MenuAction::ALL.get(index).copied())
        else {
            return Ok(());
        };
        debug!(?action, "Menu action selected");

        if let Err(e) = dispatch(action, cli, session, &presenter).await {
            warn!(error = %e, ?action, "Menu action failed");
            presenter.notify(NotifyLevel::Error, &e.to_string()).await;
        }
    }
}

/// Runs one menu action, re-rendering the status line when it changed.
pub async fn dispatch(
    action: MenuAction,
    cli: &Cli,
    session: &Session,
    presenter: &dyn ChoicePresenter,
) -> Result<()> {
    let trigger = action.refresh_trigger();
    match action {
        MenuAction::Refresh => {
            status::render(cli, session, trigger).await?;
        }
        MenuAction::SwitchMode => {
            let api = session.api().await?;
            if mode::change_mode(session.settings(), &api, presenter, None)
                .await?
                .is_some()
            {
                status::render(cli, session, trigger).await?;
            }
        }
        MenuAction::SwitchProvider => {
            providers::switch_providers(session, presenter).await?;
        }
        MenuAction::SetApiKey => {
            let outcome = apply_api_key(
                session.settings(),
                session.credentials(),
                session.http(),
                presenter,
                None,
            )
            .await?;
            if matches!(outcome, KeyOutcome::Saved(_)) {
                status::render(cli, session, trigger).await?;
            }
        }
        MenuAction::Setup => {
            setup::run_interactive(session, presenter).await?;
        }
        MenuAction::ToggleReverse => {
            session.toggle_reverse_display().await?;
            status::render(cli, session, trigger).await?;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        let labels: Vec<String> = build_main_menu(false)
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Refresh Balance",
                "Switch Display Mode",
                "Switch Provider",
                "Set API Key",
                "One-Click CLI Setup...",
                "Reverse Display"
            ]
        );
        assert_eq!(MenuAction::ALL.len(), labels.len());
    }

    #[test]
    fn test_only_refresh_is_manual() {
        assert_eq!(MenuAction::Refresh.refresh_trigger(), RefreshTrigger::Manual);
        for action in MenuAction::ALL.into_iter().skip(1) {
            assert_eq!(action.refresh_trigger(), RefreshTrigger::Automatic, "{action:?}");
        }
    }

    #[test]
    fn test_reverse_entry_reflects_state() {
        let off = build_main_menu(false);
        let on = build_main_menu(true);
        assert_eq!(off[5].description.as_deref(), Some("Disabled"));
        assert_eq!(on[5].description.as_deref(), Some("✓ Enabled"));
        assert!(off.iter().all(|c| !c.separator));
    }
}
