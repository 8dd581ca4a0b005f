//! Setup command - one-click configuration of coding CLIs.
//!
//! Generates the installer command for a CLI and either runs it in the
//! platform shell, copies it to the clipboard or prints it. Commands for
//! the other OS can only be copied or printed.

use anyhow::{Result, anyhow, bail};
use clap::Args;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use yescode_core::{CliTool, ProfileResponse, SetupMode, TargetOs, generate_setup_command};
use yescode_fetch::{FetchError, YesCodeApi};

use crate::Cli;
use crate::output::TextFormatter;
use crate::presenter::{Choice, ChoicePresenter, NotifyLevel, TerminalPresenter};
use crate::session::Session;

/// Arguments for the setup command.
#[derive(Args)]
pub struct SetupArgs {
    /// CLI to configure: claude, codex, gemini, opencode, droid. Shows a
    /// menu when omitted.
    #[arg(long, short)]
    pub tool: Option<CliTool>,

    /// Target OS: unix or windows (defaults to this machine).
    #[arg(long, requires = "tool")]
    pub os: Option<TargetOs>,

    /// Use the team endpoint.
    #[arg(long, requires = "tool")]
    pub team: bool,

    /// Copy the command to the clipboard.
    #[arg(long, requires = "tool", conflicts_with_all = ["execute", "print"])]
    pub copy: bool,

    /// Run the command in the platform shell.
    #[arg(long, requires = "tool", conflicts_with = "print")]
    pub execute: bool,

    /// Print the command (default).
    #[arg(long, requires = "tool")]
    pub print: bool,
}

/// What to do with a generated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    /// Run it in the platform shell.
    Execute,
    /// Put it on the clipboard.
    Copy,
    /// Write it to stdout.
    Print,
}

// ============================================================================
// Menus
// ============================================================================

/// Where a setup menu entry leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupTarget {
    /// Generate a command.
    Tool { tool: CliTool, mode: SetupMode },
    /// Open the menu for the other OS.
    AlternateOs,
}

/// A setup menu entry. Separators have no target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupEntry {
    pub choice: Choice,
    pub target: Option<SetupTarget>,
}

fn push_tools(entries: &mut Vec<SetupEntry>, mode: SetupMode, detail: &str) {
    for tool in CliTool::ALL {
        let choice = Choice::item(tool.display_name()).with_detail(detail);
        let choice = match mode {
            SetupMode::Team => choice.with_description("TEAM"),
            SetupMode::User => choice,
        };
        entries.push(SetupEntry {
            choice,
            target: Some(SetupTarget::Tool { tool, mode }),
        });
    }
}

fn push_sections(entries: &mut Vec<SetupEntry>, team_name: Option<&str>, detail: &str) {
    entries.push(SetupEntry {
        choice: Choice::separator("User"),
        target: None,
    });
    push_tools(entries, SetupMode::User, detail);

    if let Some(name) = team_name {
        entries.push(SetupEntry {
            choice: Choice::separator(format!("Team: {name}")),
            target: None,
        });
        push_tools(entries, SetupMode::Team, detail);
    }
}

/// Menu for this machine: user tools, team tools when the profile has an
/// active team, and an entry for the other OS.
pub fn build_setup_menu(os: TargetOs, team_name: Option<&str>) -> Vec<SetupEntry> {
    let mut entries = Vec::new();
    push_sections(&mut entries, team_name, &format!("Detected OS: {}", os.label()));

    let other = os.other().label();
    entries.push(SetupEntry {
        choice: Choice::item(format!("{other} Setup"))
            .with_description("Cross-platform")
            .with_detail(format!("Get setup commands for {other}")),
        target: Some(SetupTarget::AlternateOs),
    });
    entries
}

/// Menu for the other OS.
pub fn build_alternate_menu(os: TargetOs, team_name: Option<&str>) -> Vec<SetupEntry> {
    let mut entries = Vec::new();
    push_sections(
        &mut entries,
        team_name,
        &format!("Alternative OS: {}", os.label()),
    );
    entries
}

fn action_choices() -> Vec<Choice> {
    vec![
        Choice::item("Auto Execute").with_description("Run in a shell, the key never leaves it"),
        Choice::item("Copy Command").with_description("Copy to the clipboard"),
        Choice::item("Print Command").with_description("Print to the terminal"),
    ]
}

const ACTIONS: [SetupAction; 3] = [SetupAction::Execute, SetupAction::Copy, SetupAction::Print];

// ============================================================================
// Command
// ============================================================================

/// Runs the setup command.
pub async fn run(args: &SetupArgs, cli: &Cli, session: &Session) -> Result<()> {
    let presenter = TerminalPresenter::new(TextFormatter::new(cli.use_colors()));

    match args.tool {
        Some(tool) => run_direct(args, tool, session, &presenter).await,
        None => run_interactive(session, &presenter).await,
    }
}

/// Resolves the flags of a non-interactive invocation.
pub fn resolve_flags(args: &SetupArgs) -> Result<(TargetOs, SetupMode, SetupAction)> {
    let os = args.os.unwrap_or_else(TargetOs::current);
    let mode = if args.team { SetupMode::Team } else { SetupMode::User };
    let action = if args.execute {
        SetupAction::Execute
    } else if args.copy {
        SetupAction::Copy
    } else {
        SetupAction::Print
    };

    if action == SetupAction::Execute && os != TargetOs::current() {
        bail!(
            "setup commands for {} can only be copied or printed",
            os.label()
        );
    }
    Ok((os, mode, action))
}

async fn api_key(session: &Session) -> Result<String> {
    session
        .credentials()
        .api_key()
        .await?
        .ok_or_else(|| FetchError::NotConfigured.into())
}

async fn fetch_profile(api: &dyn YesCodeApi, presenter: &dyn ChoicePresenter) -> Option<ProfileResponse> {
    match api.profile().await {
        Ok(profile) => Some(profile),
        Err(e) => {
            debug!(error = %e, "Profile fetch failed");
            presenter
                .notify(
                    NotifyLevel::Error,
                    "Failed to fetch profile data. Please ensure your API key is set.",
                )
                .await;
            None
        }
    }
}

async fn run_direct(
    args: &SetupArgs,
    tool: CliTool,
    session: &Session,
    presenter: &dyn ChoicePresenter,
) -> Result<()> {
    let (os, mode, action) = resolve_flags(args)?;
    let key = api_key(session).await?;

    if mode == SetupMode::Team {
        let api = session.api().await?;
        let Some(profile) = fetch_profile(&api, presenter).await else {
            bail!("could not verify team membership");
        };
        if profile.active_team_name().is_none() {
            bail!("no active team membership");
        }
    }

    let command = generate_setup_command(tool, os, mode, &key, session.base_url().await);
    perform(action, tool, os, mode, &command, presenter).await
}

/// Interactive flow used by `setup` without flags and by the main menu.
pub async fn run_interactive(session: &Session, presenter: &dyn ChoicePresenter) -> Result<()> {
    let key = api_key(session).await?;
    let api = session.api().await?;
    let Some(profile) = fetch_profile(&api, presenter).await else {
        return Ok(());
    };
    let team_name = profile.active_team_name();
    let base_url = session.base_url().await;
    let os = TargetOs::current();

    let entries = build_setup_menu(os, team_name);
    let Some(target) = pick_target(presenter, "Configure CLI Environment", &entries).await else {
        return Ok(());
    };

    match target {
        SetupTarget::Tool { tool, mode } => {
            let title = match mode {
                SetupMode::User => format!("Setup {tool}"),
                SetupMode::Team => format!("Setup {tool} for Team"),
            };
            let Some(action) = presenter
                .pick(&title, &action_choices())
                .await
                .and_then(|i| ACTIONS.get(i).copied())
            else {
                return Ok(());
            };
            let command = generate_setup_command(tool, os, mode, &key, base_url);
            perform(action, tool, os, mode, &command, presenter).await
        }
        SetupTarget::AlternateOs => {
            let other = os.other();
            let entries = build_alternate_menu(other, team_name);
            let title = format!("Alternate OS Setup: {}", other.label());
            let Some(SetupTarget::Tool { tool, mode }) = pick_target(presenter, &title, &entries).await
            else {
                return Ok(());
            };
            let command = generate_setup_command(tool, other, mode, &key, base_url);
            perform(SetupAction::Copy, tool, other, mode, &command, presenter).await
        }
    }
}

async fn pick_target(
    presenter: &dyn ChoicePresenter,
    title: &str,
    entries: &[SetupEntry],
) -> Option<SetupTarget> {
    let choices: Vec<Choice> = entries.iter().map(|e| e.choice.clone()).collect();
    let index = presenter.pick(title, &choices).await?;
    entries.get(index).and_then(|e| e.target)
}

// ============================================================================
// Actions
// ============================================================================

async fn perform(
    action: SetupAction,
    tool: CliTool,
    os: TargetOs,
    mode: SetupMode,
    command: &str,
    presenter: &dyn ChoicePresenter,
) -> Result<()> {
    let what = match mode {
        SetupMode::User => format!("{tool} setup"),
        SetupMode::Team => format!("{tool} team setup"),
    };
    let key_warning = match mode {
        SetupMode::User => "⚠️  Command contains API key, use with caution.",
        SetupMode::Team => "⚠️  Command contains Team API key, use with caution.",
    };
    info!(tool = tool.id(), os = os.label(), ?mode, ?action, "Running CLI setup");

    match action {
        SetupAction::Execute => {
            presenter
                .notify(NotifyLevel::Info, &format!("{what} is running in the terminal..."))
                .await;
            let status = run_in_shell(os, command).await?;
            if !status.success() {
                presenter
                    .notify(NotifyLevel::Error, &format!("{what} exited with {status}"))
                    .await;
            }
        }
        SetupAction::Copy => match copy_to_clipboard(command.to_string()).await {
            Ok(ownership) => {
                presenter
                    .notify(
                        NotifyLevel::Warning,
                        &format!("{what} command copied to clipboard.\n{key_warning}"),
                    )
                    .await;
                if let Some(message) = ownership.paste_prompt() {
                    presenter.prompt(message, false).await;
                }
            }
            Err(e) => {
                presenter
                    .notify(
                        NotifyLevel::Warning,
                        &format!("Clipboard unavailable ({e}), printing the command instead.\n{key_warning}"),
                    )
                    .await;
                println!("{command}");
            }
        },
        SetupAction::Print => {
            presenter.notify(NotifyLevel::Warning, key_warning).await;
            println!("{command}");
        }
    }
    Ok(())
}

/// Runs `command` in the platform shell with inherited stdio.
#[instrument(skip(command))]
async fn run_in_shell(os: TargetOs, command: &str) -> Result<ExitStatus> {
    let mut process = match os {
        TargetOs::Unix => {
            let shell = which::which("bash").unwrap_or_else(|_| "sh".into());
            let mut process = Command::new(shell);
            process.arg("-c").arg(command);
            process
        }
        TargetOs::Windows => {
            let shell = which::which("pwsh").unwrap_or_else(|_| "powershell".into());
            let mut process = Command::new(shell);
            process.args(["-NoProfile", "-Command", command]);
            process
        }
    };

    let status = process
        .status()
        .await
        .map_err(|e| anyhow!("failed to start shell: {e}"))?;
    debug!(%status, "Setup shell exited");
    Ok(status)
}

/// Who keeps copied text available after the copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// The system clipboard took the text.
    Handed,
    /// A background thread of this process serves the text until another
    /// application replaces it. It disappears when the process exits.
    Held,
}

impl Ownership {
    /// Message that keeps the process alive until the user has pasted.
    pub fn paste_prompt(self) -> Option<&'static str> {
        match self {
            Self::Handed => None,
            Self::Held => Some("Paste the command where you need it, then press Enter"),
        }
    }
}

#[cfg(not(target_os = "linux"))]
async fn copy_to_clipboard(text: String) -> Result<Ownership> {
    tokio::task::spawn_blocking(move || -> Result<(), arboard::Error> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)
    })
    .await??;
    Ok(Ownership::Handed)
}

/// X11 and Wayland serve the clipboard from the process that set it, so
/// the owning thread waits until another application replaces the text.
#[cfg(target_os = "linux")]
async fn copy_to_clipboard(text: String) -> Result<Ownership> {
    use arboard::SetExtLinux;

    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));
        if let Err(e) = clipboard.set().wait().text(text) {
            tracing::warn!(error = %e, "Clipboard ownership lost");
        }
    });

    ready_rx
        .await
        .map_err(|_| anyhow!("clipboard thread exited"))??;
    Ok(Ownership::Held)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SetupArgs {
        SetupArgs {
            tool: Some(CliTool::Codex),
            os: None,
            team: false,
            copy: false,
            execute: false,
            print: false,
        }
    }

    fn labels(entries: &[SetupEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.choice.label.as_str()).collect()
    }

    #[test]
    fn test_menu_without_team() {
        let entries = build_setup_menu(TargetOs::Unix, None);
        assert_eq!(
            labels(&entries),
            vec![
                "User",
                "Claude Code",
                "Codex",
                "Gemini CLI",
                "OpenCode",
                "Droid",
                "Windows Setup"
            ]
        );
        assert!(entries[0].choice.separator);
        assert_eq!(
            entries[1].choice.detail.as_deref(),
            Some("Detected OS: macOS/Linux")
        );
        assert_eq!(entries.last().unwrap().target, Some(SetupTarget::AlternateOs));
    }

    #[test]
    fn test_menu_with_team() {
        let entries = build_setup_menu(TargetOs::Windows, Some("Acme"));
        let team_header = entries
            .iter()
            .position(|e| e.choice.label == "Team: Acme")
            .unwrap();
        assert!(entries[team_header].choice.separator);
        assert_eq!(
            entries[team_header + 1].target,
            Some(SetupTarget::Tool {
                tool: CliTool::Claude,
                mode: SetupMode::Team
            })
        );
        assert_eq!(
            entries[team_header + 1].choice.description.as_deref(),
            Some("TEAM")
        );
        assert_eq!(entries.last().unwrap().choice.label, "macOS/Linux Setup");
    }

    #[test]
    fn test_alternate_menu_has_no_further_alternate() {
        let entries = build_alternate_menu(TargetOs::Windows, None);
        assert!(entries.iter().all(|e| e.target != Some(SetupTarget::AlternateOs)));
        assert_eq!(
            entries[1].choice.detail.as_deref(),
            Some("Alternative OS: Windows")
        );
    }

    #[test]
    fn test_held_clipboard_waits_for_paste() {
        assert!(Ownership::Held.paste_prompt().is_some());
        assert_eq!(Ownership::Handed.paste_prompt(), None);
    }

    #[test]
    fn test_resolve_flags_defaults_to_print() {
        let (os, mode, action) = resolve_flags(&args()).unwrap();
        assert_eq!(os, TargetOs::current());
        assert_eq!(mode, SetupMode::User);
        assert_eq!(action, SetupAction::Print);
    }

    #[test]
    fn test_other_os_cannot_execute() {
        let args = SetupArgs {
            os: Some(TargetOs::current().other()),
            execute: true,
            ..args()
        };
        assert!(resolve_flags(&args).is_err());

        let args = SetupArgs {
            os: Some(TargetOs::current().other()),
            copy: true,
            team: true,
            ..args
        };
        let (_, mode, action) = resolve_flags(&args).unwrap();
        assert_eq!(mode, SetupMode::Team);
        assert_eq!(action, SetupAction::Copy);
    }
}
