//! One-click CLI setup commands.
//!
//! Each supported coding CLI has an installer script hosted on the backend.
//! The generated command downloads it and passes the API endpoint and key.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// CLI Tools
// ============================================================================

/// Coding CLIs with an installer script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliTool {
    /// Claude Code.
    Claude,
    /// Codex CLI.
    Codex,
    /// Gemini CLI.
    Gemini,
    /// `OpenCode`.
    OpenCode,
    /// Droid.
    Droid,
}

impl CliTool {
    /// All tools in menu order.
    pub const ALL: [CliTool; 5] = [
        Self::Claude,
        Self::Codex,
        Self::Gemini,
        Self::OpenCode,
        Self::Droid,
    ];

    /// Short identifier used on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Codex => "codex",
            Self::Gemini => "gemini",
            Self::OpenCode => "opencode",
            Self::Droid => "droid",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Claude => "Claude Code",
            Self::Codex => "Codex",
            Self::Gemini => "Gemini CLI",
            Self::OpenCode => "OpenCode",
            Self::Droid => "Droid",
        }
    }

    /// Installer script name without extension.
    pub fn script_name(&self) -> &'static str {
        match self {
            Self::Claude => "setup-claude-code",
            Self::Codex => "setup-codex",
            Self::Gemini => "setup_gemini",
            Self::OpenCode => "setup-opencode",
            Self::Droid => "setup-droid",
        }
    }
}

impl std::fmt::Display for CliTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for CliTool {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tool| tool.id() == lower)
            .ok_or_else(|| CoreError::InvalidData(format!("unknown CLI tool: {s}")))
    }
}

// ============================================================================
// Target OS / Mode
// ============================================================================

/// Shell family the command is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// Linux and macOS (`bash`).
    Unix,
    /// Windows (`PowerShell`).
    Windows,
}

impl TargetOs {
    /// The OS this binary runs on.
    pub fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    /// The other shell family.
    pub fn other(&self) -> Self {
        match self {
            Self::Unix => Self::Windows,
            Self::Windows => Self::Unix,
        }
    }

    /// Label used in menus.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unix => "macOS/Linux",
            Self::Windows => "Windows",
        }
    }
}

impl std::str::FromStr for TargetOs {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unix" | "linux" | "macos" => Ok(Self::Unix),
            "windows" | "win" => Ok(Self::Windows),
            other => Err(CoreError::InvalidData(format!("unknown OS: {other}"))),
        }
    }
}

/// Whether the CLI is wired to the personal or the team endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SetupMode {
    /// Personal endpoint.
    #[default]
    User,
    /// Team endpoint.
    Team,
}

// ============================================================================
// Command Generation
// ============================================================================

/// Endpoint the CLI should talk to.
pub fn endpoint_url(tool: CliTool, mode: SetupMode, base_url: &str) -> String {
    match (mode, tool) {
        (SetupMode::Team, CliTool::Gemini) => format!("{base_url}/team/gemini"),
        (SetupMode::Team, _) => format!("{base_url}/team"),
        (SetupMode::User, CliTool::Gemini) => format!("{base_url}/gemini"),
        (SetupMode::User, _) => base_url.to_string(),
    }
}

/// Builds the one-line installer command.
///
/// The result embeds `api_key` verbatim.
pub fn generate_setup_command(
    tool: CliTool,
    os: TargetOs,
    mode: SetupMode,
    api_key: &str,
    base_url: &str,
) -> String {
    let url = endpoint_url(tool, mode, base_url);
    let script = tool.script_name();
    match os {
        TargetOs::Unix => {
            format!("curl -s {base_url}/{script}.sh | bash -s -- --url {url} --key {api_key}")
        }
        TargetOs::Windows => format!(
            "& {{ $base='{base_url}'; $url='{url}'; $key='{api_key}'; iwr -useb $base/{script}.ps1 | iex }}"
        ),
    }
}
