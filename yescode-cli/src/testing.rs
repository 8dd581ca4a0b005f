//! Test doubles for the backend and the presenter.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use yescode_core::{
    AvailableProviders, ProfileResponse, Provider, ProviderAlternative, ProviderInfo,
    ProviderSelection, ProviderSource, TeamProviderAlternative, TeamProviderSelection,
    TeamProviderType,
};
use yescode_fetch::{FetchError, YesCodeApi};

use crate::presenter::{ChoicePresenter, Choice, NotifyLevel};

// ============================================================================
// Fixtures
// ============================================================================

pub fn provider(id: i64, kind: &str, name: &str, rate: f64) -> Provider {
    Provider {
        id,
        provider_type: kind.to_string(),
        name: name.to_lowercase(),
        display_name: name.to_string(),
        is_enabled: true,
        rate_multiplier: rate,
        ..Provider::default()
    }
}

pub fn provider_info(provider: Provider, source: ProviderSource) -> ProviderInfo {
    ProviderInfo {
        rate_multiplier: provider.rate_multiplier,
        provider,
        is_default: false,
        source,
    }
}

pub fn user_alternative(provider_id: i64, alternative: Provider) -> ProviderAlternative {
    ProviderAlternative {
        id: alternative.id * 100,
        provider_id,
        alternative_id: alternative.id,
        display_name: alternative.display_name.clone(),
        is_self: alternative.id == provider_id,
        priority: 0,
        alternative,
    }
}

pub fn team_alternative(alternative: Provider) -> TeamProviderAlternative {
    TeamProviderAlternative {
        id: alternative.id * 100,
        alternative_provider_id: alternative.id,
        display_name: alternative.display_name.clone(),
        priority: 0,
        provider_type: alternative.provider_type.clone(),
        alternative_provider: alternative,
    }
}

// ============================================================================
// Mock API
// ============================================================================

/// In-memory backend. Missing profile or provider list answers `500`.
#[derive(Default)]
pub struct MockApi {
    pub profile: Option<ProfileResponse>,
    pub available: Option<AvailableProviders>,
    pub user_alternatives: HashMap<i64, Vec<ProviderAlternative>>,
    pub user_selections: HashMap<i64, ProviderSelection>,
    pub team_alternatives: HashMap<TeamProviderType, Vec<TeamProviderAlternative>>,
    pub team_selections: HashMap<TeamProviderType, TeamProviderSelection>,
    /// Makes every PUT/DELETE fail.
    pub fail_writes: bool,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockApi {
    /// Serves the given profile.
    pub fn with_profile(profile: ProfileResponse) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    /// Calls made so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn select_user_alternative(&mut self, provider_id: i64, alternative: Provider) {
        self.user_selections.insert(
            provider_id,
            ProviderSelection {
                id: 1,
                user_id: 1,
                provider_id,
                selected_alternative_id: alternative.id,
                selected_alternative: alternative,
            },
        );
    }

    pub fn select_team_provider(&mut self, provider_type: TeamProviderType, selected: Provider) {
        self.team_selections.insert(
            provider_type,
            TeamProviderSelection {
                id: 1,
                user_id: 1,
                provider_type: provider_type.as_str().to_string(),
                selected_provider_id: selected.id,
                selected_provider: selected,
            },
        );
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn write_result(&self) -> Result<(), FetchError> {
        if self.fail_writes {
            Err(FetchError::Status { status: 500 })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl YesCodeApi for MockApi {
    async fn profile(&self) -> Result<ProfileResponse, FetchError> {
        self.record("profile".to_string());
        self.profile
            .clone()
            .ok_or(FetchError::Status { status: 500 })
    }

    async fn available_providers(&self) -> Result<AvailableProviders, FetchError> {
        self.record("available_providers".to_string());
        self.available
            .clone()
            .ok_or(FetchError::Status { status: 500 })
    }

    async fn user_alternatives(
        &self,
        provider_id: i64,
    ) -> Result<Vec<ProviderAlternative>, FetchError> {
        self.record(format!("alternatives {provider_id}"));
        Ok(self
            .user_alternatives
            .get(&provider_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_user_selection(
        &self,
        provider_id: i64,
    ) -> Result<Option<ProviderSelection>, FetchError> {
        self.record(format!("user_selection {provider_id}"));
        Ok(self.user_selections.get(&provider_id).cloned())
    }

    async fn set_user_selection(
        &self,
        provider_id: i64,
        alternative_id: i64,
    ) -> Result<(), FetchError> {
        self.record(format!("set_user_selection {provider_id} {alternative_id}"));
        self.write_result()
    }

    async fn team_alternatives(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Vec<TeamProviderAlternative>, FetchError> {
        self.record(format!("team_alternatives {}", provider_type.as_str()));
        Ok(self
            .team_alternatives
            .get(&provider_type)
            .cloned()
            .unwrap_or_default())
    }

    async fn current_team_selection(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<Option<TeamProviderSelection>, FetchError> {
        self.record(format!("team_selection {}", provider_type.as_str()));
        Ok(self.team_selections.get(&provider_type).cloned())
    }

    async fn set_team_selection(
        &self,
        provider_type: TeamProviderType,
        provider_id: i64,
    ) -> Result<(), FetchError> {
        self.record(format!(
            "set_team_selection {} {provider_id}",
            provider_type.as_str()
        ));
        self.write_result()
    }

    async fn reset_team_selection(
        &self,
        provider_type: TeamProviderType,
    ) -> Result<(), FetchError> {
        self.record(format!("reset_team_selection {}", provider_type.as_str()));
        self.write_result()
    }
}

// ============================================================================
// Recording Presenter
// ============================================================================

/// Scripted presenter. Unscripted interactions behave as cancelled.
#[derive(Default)]
pub struct RecordingPresenter {
    pick_answers: Mutex<VecDeque<Option<usize>>>,
    prompt_answers: Mutex<VecDeque<Option<String>>>,
    confirm_answers: Mutex<VecDeque<bool>>,
    picks: Mutex<Vec<(String, Vec<Choice>)>>,
    prompts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
    notices: Mutex<Vec<(NotifyLevel, String)>>,
}

impl RecordingPresenter {
    pub fn pick_index(self, index: usize) -> Self {
        self.pick_answers.lock().unwrap().push_back(Some(index));
        self
    }

    pub fn answer(self, text: &str) -> Self {
        self.prompt_answers
            .lock()
            .unwrap()
            .push_back(Some(text.to_string()));
        self
    }

    pub fn confirm_with(self, accept: bool) -> Self {
        self.confirm_answers.lock().unwrap().push_back(accept);
        self
    }

    pub fn picks(&self) -> Vec<(String, Vec<Choice>)> {
        self.picks.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<(NotifyLevel, String)> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChoicePresenter for RecordingPresenter {
    async fn pick(&self, title: &str, choices: &[Choice]) -> Option<usize> {
        self.picks
            .lock()
            .unwrap()
            .push((title.to_string(), choices.to_vec()));
        let answer = self.pick_answers.lock().unwrap().pop_front().flatten()?;
        assert!(
            !choices[answer].separator,
            "separator picked: {}",
            choices[answer].label
        );
        Some(answer)
    }

    async fn prompt(&self, message: &str, _secret: bool) -> Option<String> {
        self.prompts.lock().unwrap().push(message.to_string());
        self.prompt_answers.lock().unwrap().pop_front().flatten()
    }

    async fn confirm(&self, message: &str, _accept_label: &str) -> bool {
        self.confirms.lock().unwrap().push(message.to_string());
        self.confirm_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false)
    }

    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((level, message.to_string()));
    }
}
