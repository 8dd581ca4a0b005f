//! Key command - store, clear and inspect the API key.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use tracing::info;

use yescode_core::Environment;
use yescode_fetch::{EnvironmentProbe, detect_environment};
use yescode_store::{CredentialStore, SettingsStore};

use crate::output::{JsonFormatter, KeyStatusOutput, TextFormatter};
use crate::presenter::{ChoicePresenter, NotifyLevel, TerminalPresenter};
use crate::session::Session;
use crate::{Cli, OutputFormat};

/// Arguments for the key command.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub action: KeyAction,
}

/// Key subcommands.
#[derive(Subcommand)]
pub enum KeyAction {
    /// Validate and store an API key.
    Set {
        /// The key. Prompted for when omitted.
        #[arg(long)]
        key: Option<String>,
    },

    /// Remove the stored key.
    Clear,

    /// Show whether a key is configured.
    Show,
}

/// How `key set` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Stored for the detected environment.
    Saved(Environment),
    /// Nothing entered.
    Cancelled,
    /// Rejected by every environment.
    Invalid,
}

/// Runs the key command.
pub async fn run(args: &KeyArgs, cli: &Cli, session: &Session) -> Result<()> {
    let presenter = TerminalPresenter::new(TextFormatter::new(cli.use_colors()));

    match &args.action {
        KeyAction::Set { key } => {
            let outcome = apply_api_key(
                session.settings(),
                session.credentials(),
                session.http(),
                &presenter,
                key.clone(),
            )
            .await?;
            if outcome == KeyOutcome::Invalid {
                bail!("API key rejected by every environment");
            }
            Ok(())
        }
        KeyAction::Clear => {
            session.credentials().delete_api_key().await?;
            info!("API key cleared");
            presenter.notify(NotifyLevel::Info, "API key removed.").await;
            Ok(())
        }
        KeyAction::Show => show_key(cli, session).await,
    }
}

/// Validates a key against both environments and stores it.
///
/// Prompts when `key` is `None`. An empty answer leaves everything as it
/// was.
pub async fn apply_api_key<P>(
    settings: &SettingsStore,
    credentials: &CredentialStore,
    probe: &P,
    presenter: &dyn ChoicePresenter,
    key: Option<String>,
) -> Result<KeyOutcome>
where
    P: EnvironmentProbe + ?Sized,
{
    let key = match key {
        Some(key) => Some(key),
        None => presenter.prompt("Enter your YesCode API Key", true).await,
    };
    let key = key.map(|k| k.trim().to_string()).unwrap_or_default();
    if key.is_empty() {
        presenter
            .notify(NotifyLevel::Warning, "API Key not saved")
            .await;
        return Ok(KeyOutcome::Cancelled);
    }

    let Some(environment) = detect_environment(probe, &key).await else {
        presenter
            .notify(
                NotifyLevel::Error,
                "Invalid API Key. Please check and try again.",
            )
            .await;
        return Ok(KeyOutcome::Invalid);
    };

    credentials.store_api_key(&key).await?;
    settings.set_environment(environment).await?;
    info!(%environment, "API key stored");

    presenter
        .notify(
            NotifyLevel::Info,
            &format!(
                "API Key saved successfully! ({} Environment)",
                environment.label()
            ),
        )
        .await;
    Ok(KeyOutcome::Saved(environment))
}

async fn show_key(cli: &Cli, session: &Session) -> Result<()> {
    let found = session.credentials().api_key_with_source().await?;
    let environment = session.environment().await;
    let output = KeyStatusOutput {
        configured: found.is_some(),
        source: found.map(|(_, source)| source.to_string()),
        environment,
        base_url: environment.base_url(),
    };

    match cli.format {
        OutputFormat::Text => {
            match &output.source {
                Some(source) => println!("API key:     configured ({source})"),
                None => println!("API key:     not set"),
            }
            println!("Environment: {}", environment.label());
            println!("Endpoint:    {}", output.base_url);
        }
        OutputFormat::Json => {
            println!("{}", JsonFormatter::new(cli.pretty).format(&output)?);
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
    use async_trait::async_trait;
    use std::sync::Arc;
    use yescode_fetch::MemoryKeychain;

    use crate::testing::RecordingPresenter;

    struct StubProbe {
        production: bool,
        test: bool,
    }

    #[async_trait]
    impl EnvironmentProbe for StubProbe {
        async fn accepts_key(&self, environment: Environment, _api_key: &str) -> bool {
            match environment {
                Environment::Production => self.production,
                Environment::Test => self.test,
            }
        }
    }

    fn stores(dir: &tempfile::TempDir) -> (SettingsStore, CredentialStore) {
        (
            SettingsStore::new(dir.path().join("settings.json")),
            CredentialStore::new(Arc::new(MemoryKeychain::new())).without_env_fallback(),
        )
    }

    #[tokio::test]
    async fn test_empty_prompt_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, credentials) = stores(&dir);
        let presenter = RecordingPresenter::default().answer("   ");
        let probe = StubProbe {
            production: true,
            test: true,
        };

        let outcome = apply_api_key(&settings, &credentials, &probe, &presenter, None)
            .await
            .unwrap();

        assert_eq!(outcome, KeyOutcome::Cancelled);
        assert_eq!(presenter.prompts(), vec!["Enter your YesCode API Key"]);
        assert_eq!(
            presenter.notices(),
            vec![(NotifyLevel::Warning, "API Key not saved".to_string())]
        );
        assert!(!credentials.has_api_key().await);
    }

    #[tokio::test]
    async fn test_invalid_key_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, credentials) = stores(&dir);
        let presenter = RecordingPresenter::default();
        let probe = StubProbe {
            production: false,
            test: false,
        };

        let outcome = apply_api_key(
            &settings,
            &credentials,
            &probe,
            &presenter,
            Some("sk-bad".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(outcome, KeyOutcome::Invalid);
        assert!(presenter.prompts().is_empty());
        assert!(!credentials.has_api_key().await);
        assert_eq!(presenter.notices()[0].0, NotifyLevel::Error);
    }

    #[tokio::test]
    async fn test_test_environment_key() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, credentials) = stores(&dir);
        let presenter = RecordingPresenter::default().answer(" sk-test ");
        let probe = StubProbe {
            production: false,
            test: true,
        };

        let outcome = apply_api_key(&settings, &credentials, &probe, &presenter, None)
            .await
            .unwrap();

        assert_eq!(outcome, KeyOutcome::Saved(Environment::Test));
        assert_eq!(settings.environment().await, Environment::Test);
        assert_eq!(credentials.api_key().await.unwrap().as_deref(), Some("sk-test"));
        assert_eq!(
            presenter.notices(),
            vec![(
                NotifyLevel::Info,
                "API Key saved successfully! (Test Environment)".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_production_wins() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, credentials) = stores(&dir);
        let presenter = RecordingPresenter::default();
        let probe = StubProbe {
            production: true,
            test: true,
        };

        let outcome = apply_api_key(
            &settings,
            &credentials,
            &probe,
            &presenter,
            Some("sk-live".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(outcome, KeyOutcome::Saved(Environment::Production));
        assert_eq!(settings.environment().await, Environment::Production);
    }
}
