//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

use yescode_core::{BalanceResult, DisplayMode, Environment};

use crate::status_bar::{FailureKind, RefreshState, StatusBar};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for `status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub state: &'static str,
    pub text: String,
    pub tooltip: String,
    pub warning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceResult>,
    pub display_mode: DisplayMode,
    pub reverse_display: bool,
    pub environment: Environment,
}

impl StatusOutput {
    /// Builds the output from a finished refresh.
    pub fn new(
        bar: &StatusBar,
        display_mode: DisplayMode,
        reverse_display: bool,
        environment: Environment,
    ) -> Self {
        Self {
            state: state_name(&bar.state),
            text: bar.text.clone(),
            tooltip: bar.tooltip.clone(),
            warning: bar.warning,
            balance: bar.last_result.clone(),
            display_mode,
            reverse_display,
            environment,
        }
    }
}

/// JSON output for `key show`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatusOutput {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub environment: Environment,
    pub base_url: &'static str,
}

fn state_name(state: &RefreshState) -> &'static str {
    match state {
        RefreshState::Idle => "idle",
        RefreshState::Fetching => "fetching",
        RefreshState::Success => "ok",
        RefreshState::Retrying { .. } => "retrying",
        RefreshState::Failed(FailureKind::NotConfigured) => "not_configured",
        RefreshState::Failed(FailureKind::Exhausted | FailureKind::Rejected) => "fetch_error",
        RefreshState::Failed(FailureKind::Data) => "data_error",
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
