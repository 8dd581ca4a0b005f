//! Provider menu construction.
//!
//! Pure functions over already-fetched data, so the layout can be tested
//! without a backend.

use std::collections::HashMap;

use yescode_core::{
    AvailableProviders, Provider, ProviderInfo, ProviderSelection, TeamProviderAlternative,
    TeamProviderSelection, TeamProviderType, format_rate,
};

use crate::presenter::Choice;

/// Section headers.
pub const USER_SECTION: &str = "User-Level Providers";
pub const TEAM_USER_PATH_SECTION: &str = "Team Providers (User Path)";
pub const TEAM_PATH_SECTION: &str = "Team Providers (Team Path)";

/// Label of the entry that removes a team override.
pub const TEAM_DEFAULT_LABEL: &str = "Use Team Default";

/// Which switching path a menu entry leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchTarget {
    /// Per-provider alternatives.
    User {
        provider_id: i64,
        name: String,
    },
    /// Team-wide override for a provider type.
    Team { provider_type: TeamProviderType },
}

/// A menu entry and where it leads. Separators have no target.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub choice: Choice,
    pub target: Option<SwitchTarget>,
}

impl MenuEntry {
    fn separator(label: &str) -> Self {
        Self {
            choice: Choice::separator(label),
            target: None,
        }
    }
}

/// Everything the top-level menu shows.
#[derive(Debug, Clone, Default)]
pub struct MenuData {
    pub available: AvailableProviders,
    pub team_alternatives: HashMap<TeamProviderType, Vec<TeamProviderAlternative>>,
    /// Current user-path selection by base provider ID.
    pub user_selections: HashMap<i64, ProviderSelection>,
    pub team_selections: HashMap<TeamProviderType, TeamProviderSelection>,
}

/// `Currently: <name> (<rate> rate)`.
fn currently(provider: &Provider) -> String {
    format!(
        "Currently: {} ({} rate)",
        provider.display_name,
        format_rate(provider.rate_multiplier)
    )
}

fn user_entry(info: &ProviderInfo, description: &str, data: &MenuData) -> MenuEntry {
    let current = data
        .user_selections
        .get(&info.provider.id)
        .map_or(&info.provider, |s| &s.selected_alternative);

    MenuEntry {
        choice: Choice::item(&info.provider.display_name)
            .with_description(description)
            .with_detail(currently(current)),
        target: Some(SwitchTarget::User {
            provider_id: info.provider.id,
            name: info.provider.display_name.clone(),
        }),
    }
}

/// Builds the top-level provider menu.
///
/// Empty when there is nothing to switch.
pub fn build_provider_menu(data: &MenuData) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    let providers = &data.available.providers;

    let user_level: Vec<&ProviderInfo> =
        providers.iter().filter(|p| p.source.is_user_level()).collect();
    if !user_level.is_empty() {
        entries.push(MenuEntry::separator(USER_SECTION));
        for info in user_level {
            entries.push(user_entry(info, info.source.label(), data));
        }
    }

    let mut team_user_path: Vec<&ProviderInfo> =
        providers.iter().filter(|p| !p.source.is_user_level()).collect();
    team_user_path.sort_by_key(|p| TeamProviderType::rank(&p.provider.provider_type));
    if !team_user_path.is_empty() {
        entries.push(MenuEntry::separator(TEAM_USER_PATH_SECTION));
        for info in team_user_path {
            entries.push(user_entry(info, "TEAM (User Path)", data));
        }
    }

    let team_path: Vec<MenuEntry> = TeamProviderType::ALL
        .into_iter()
        .filter(|t| data.available.has_team_provider(*t))
        .map(|provider_type| {
            let has_alternatives = data
                .team_alternatives
                .get(&provider_type)
                .is_some_and(|alts| !alts.is_empty());
            let detail = match data.team_selections.get(&provider_type) {
                Some(selection) if has_alternatives => currently(&selection.selected_provider),
                _ => format!("Currently: {TEAM_DEFAULT_LABEL}"),
            };

            MenuEntry {
                choice: Choice::item(provider_type.display_name())
                    .with_description("TEAM")
                    .with_detail(detail),
                target: Some(SwitchTarget::Team { provider_type }),
            }
        })
        .collect();
    if !team_path.is_empty() {
        entries.push(MenuEntry::separator(TEAM_PATH_SECTION));
        entries.extend(team_path);
    }

    entries
}

// ============================================================================
// Alternative Menus
// ============================================================================

fn alternative_choice(display_name: &str, provider: &Provider, current: bool) -> Choice {
    let choice = Choice::item(display_name)
        .with_description(format!("{} rate", format_rate(provider.rate_multiplier)))
        .with_current(current);
    if provider.description.is_empty() {
        choice
    } else {
        choice.with_detail(&provider.description)
    }
}

/// Alternatives of a user-path provider, current one marked.
pub fn user_alternative_choices(
    alternatives: &[yescode_core::ProviderAlternative],
    current_alternative_id: Option<i64>,
) -> Vec<Choice> {
    alternatives
        .iter()
        .map(|alt| {
            alternative_choice(
                &alt.display_name,
                &alt.alternative,
                Some(alt.alternative_id) == current_alternative_id,
            )
        })
        .collect()
}

/// `Use Team Default` followed by the team alternatives.
///
/// The default entry is current when there is no override.
pub fn team_alternative_choices(
    alternatives: &[TeamProviderAlternative],
    current_provider_id: Option<i64>,
) -> Vec<Choice> {
    let mut choices = vec![
        Choice::item(TEAM_DEFAULT_LABEL)
            .with_description("Reset to team settings")
            .with_current(current_provider_id.is_none()),
    ];
    choices.extend(alternatives.iter().map(|alt| {
        alternative_choice(
            &alt.display_name,
            &alt.alternative_provider,
            Some(alt.alternative_provider_id) == current_provider_id,
        )
    }));
    choices
}

// ============================================================================
// Tests
// ============================================================================
