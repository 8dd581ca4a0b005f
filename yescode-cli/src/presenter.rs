//! Interactive choices, prompts and notifications.
//!
//! Commands talk to the user only through [`ChoicePresenter`], so menu
//! flows can be driven by a scripted presenter in tests. A cancelled
//! interaction (`None`/`false`) is always a silent no-op for the caller.

use async_trait::async_trait;
use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Input, Password, Select};
use tracing::{debug, warn};

use crate::output::TextFormatter;

// ============================================================================
// Types
// ============================================================================

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    /// Informational.
    Info,
    /// Something the user should know before going on.
    Warning,
    /// An operation failed.
    Error,
}

/// One entry of a pick list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Choice {
    /// Main label.
    pub label: String,
    /// Short text shown next to the label.
    pub description: Option<String>,
    /// Second line.
    pub detail: Option<String>,
    /// Marks the active option.
    pub current: bool,
    /// Section header; never selectable.
    pub separator: bool,
}

impl Choice {
    /// Creates a selectable entry.
    pub fn item(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Creates a section header.
    pub fn separator(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            separator: true,
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the detail line.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Sets the current marker.
    #[must_use]
    pub fn with_current(mut self, current: bool) -> Self {
        self.current = current;
        self
    }
}

/// Index of the first selectable entry at or after `from`, wrapping to
/// the top of the list.
pub fn first_selectable(choices: &[Choice], from: usize) -> Option<usize> {
    let after = choices.iter().enumerate().skip(from);
    let before = choices.iter().enumerate().take(from);
    after
        .chain(before)
        .find(|(_, c)| !c.separator)
        .map(|(i, _)| i)
}

/// What a pick list does with the row the user confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStep {
    /// A selectable entry.
    Chosen(usize),
    /// A section header; show the list again with the cursor here.
    Reopen(usize),
    /// Escape, or nothing selectable.
    Cancelled,
}

/// Resolves a confirmed row. Headers never count as a choice.
pub fn resolve_pick(choices: &[Choice], selected: Option<usize>) -> PickStep {
    let Some(index) = selected else {
        return PickStep::Cancelled;
    };
    match choices.get(index) {
        Some(choice) if !choice.separator => PickStep::Chosen(index),
        Some(_) => first_selectable(choices, index).map_or(PickStep::Cancelled, PickStep::Reopen),
        None => PickStep::Cancelled,
    }
}

/// How typed text is shown while the user enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Nothing is echoed.
    Hidden,
    /// Plain text input.
    Echoed,
}

impl PromptStyle {
    /// Secrets are never echoed.
    pub fn for_input(secret: bool) -> Self {
        if secret { Self::Hidden } else { Self::Echoed }
    }
}

// ============================================================================
// Presenter Trait
// ============================================================================

/// User interaction seam.
#[async_trait]
pub trait ChoicePresenter: Send + Sync {
    /// Shows a pick list. Returns the index of the chosen entry, never a
    /// separator, or `None` when cancelled.
    async fn pick(&self, title: &str, choices: &[Choice]) -> Option<usize>;

    /// Asks for free text. `None` when cancelled.
    async fn prompt(&self, message: &str, secret: bool) -> Option<String>;

    /// Asks a yes/no question. Returns true only when accepted.
    async fn confirm(&self, message: &str, accept_label: &str) -> bool;

    /// Shows a message.
    async fn notify(&self, level: NotifyLevel, message: &str);
}

// ============================================================================
// Terminal Presenter
// ============================================================================

/// [`ChoicePresenter`] on the terminal, backed by `dialoguer`.
///
/// Pick lists are navigated with the arrow keys; Escape cancels.
pub struct TerminalPresenter {
    formatter: TextFormatter,
}

impl TerminalPresenter {
    /// Creates a presenter.
    pub fn new(formatter: TextFormatter) -> Self {
        Self { formatter }
    }

    /// Runs a blocking `dialoguer` interaction off the runtime.
    ///
    /// A failed interaction (no terminal, read error) counts as cancelled.
    async fn interact<T, F>(&self, f: F) -> Option<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Theme) -> dialoguer::Result<T> + Send + 'static,
    {
        let colors = self.formatter.use_colors();
        let result = tokio::task::spawn_blocking(move || {
            let theme: Box<dyn Theme> = if colors {
                Box::new(ColorfulTheme::default())
            } else {
                Box::new(SimpleTheme)
            };
            f(theme.as_ref())
        })
        .await;

        match result {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!(error = %e, "Interaction failed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Interaction task failed");
                None
            }
        }
    }
}

#[async_trait]
impl ChoicePresenter for TerminalPresenter {
    async fn pick(&self, title: &str, choices: &[Choice]) -> Option<usize> {
        let mut cursor = first_selectable(choices, 0)?;
        let items: Vec<String> = choices
            .iter()
            .map(|c| self.formatter.format_menu_item(c))
            .collect();

        loop {
            let title = title.to_string();
            let items = items.clone();
            let selected = self
                .interact(move |theme| {
                    Select::with_theme(theme)
                        .with_prompt(title)
                        .items(&items)
                        .default(cursor)
                        .interact_opt()
                })
                .await?;

            match resolve_pick(choices, selected) {
                PickStep::Chosen(index) => return Some(index),
                PickStep::Reopen(index) => cursor = index,
                PickStep::Cancelled => return None,
            }
        }
    }

    async fn prompt(&self, message: &str, secret: bool) -> Option<String> {
        let message = message.to_string();
        let answer = match PromptStyle::for_input(secret) {
            PromptStyle::Hidden => {
                self.interact(move |theme| {
                    Password::with_theme(theme)
                        .with_prompt(message)
                        .allow_empty_password(true)
                        .interact()
                })
                .await
            }
            PromptStyle::Echoed => {
                self.interact(move |theme| {
                    Input::<String>::with_theme(theme)
                        .with_prompt(message)
                        .allow_empty(true)
                        .interact_text()
                })
                .await
            }
        };
        answer
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
    }

    async fn confirm(&self, message: &str, accept_label: &str) -> bool {
        eprintln!("{}", self.formatter.format_notice(NotifyLevel::Warning, message));
        let question = format!("{accept_label}?");
        self.interact(move |theme| {
            Confirm::with_theme(theme)
                .with_prompt(question)
                .default(false)
                .interact_opt()
        })
        .await
        .flatten()
        .unwrap_or(false)
    }

    async fn notify(&self, level: NotifyLevel, message: &str) {
        let text = self.formatter.format_notice(level, message);
        match level {
            NotifyLevel::Info => println!("{text}"),
            NotifyLevel::Warning | NotifyLevel::Error => eprintln!("{text}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<Choice> {
        vec![
            Choice::separator("User"),
            Choice::item("Claude Code"),
            Choice::item("Codex"),
            Choice::separator("Team"),
            Choice::item("Claude Code").with_description("TEAM"),
        ]
    }

    #[test]
    fn test_first_selectable_skips_headers() {
        let choices = sections();
        assert_eq!(first_selectable(&choices, 0), Some(1));
        assert_eq!(first_selectable(&choices, 3), Some(4));
        assert_eq!(first_selectable(&[Choice::separator("Empty")], 0), None);

        let trailing = vec![Choice::item("Only"), Choice::separator("End")];
        assert_eq!(first_selectable(&trailing, 1), Some(0));
    }

    #[test]
    fn test_header_is_never_chosen() {
        let choices = sections();
        assert_eq!(resolve_pick(&choices, Some(2)), PickStep::Chosen(2));
        assert_eq!(resolve_pick(&choices, Some(0)), PickStep::Reopen(1));
        assert_eq!(resolve_pick(&choices, Some(3)), PickStep::Reopen(4));
        assert_eq!(resolve_pick(&choices, None), PickStep::Cancelled);
        assert_eq!(resolve_pick(&choices, Some(9)), PickStep::Cancelled);
    }

    #[test]
    fn test_secret_input_is_hidden() {
        assert_eq!(PromptStyle::for_input(true), PromptStyle::Hidden);
        assert_eq!(PromptStyle::for_input(false), PromptStyle::Echoed);
    }

    #[test]
    fn test_builder() {
        let choice = Choice::item("Auto")
            .with_description("Automatically detect mode")
            .with_detail("✓ Currently selected")
            .with_current(true);
        assert!(choice.current);
        assert!(!choice.separator);
        assert_eq!(choice.detail.as_deref(), Some("✓ Currently selected"));
    }
}
