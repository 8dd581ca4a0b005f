//! User preferences store.
//!
//! Settings live in memory behind an `RwLock` and are written back to disk
//! by every setter.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use yescode_core::{DisplayMode, Environment};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Default seconds between automatic refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Shortest accepted refresh interval.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 10;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Backend the stored key belongs to.
    pub environment: Environment,

    /// Which balance the status line shows.
    pub display_mode: DisplayMode,

    /// Show used instead of remaining.
    pub reverse_display: bool,

    /// Seconds between automatic refreshes in `watch`.
    pub refresh_interval_secs: u64,

    /// Log level used when neither `YESCODE_LOG` nor `--verbose` is given.
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            display_mode: DisplayMode::default(),
            reverse_display: false,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            log_level: LogLevel::default(),
        }
    }
}

impl Settings {
    /// Refresh interval, floored at [`MIN_REFRESH_INTERVAL_SECS`].
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(MIN_REFRESH_INTERVAL_SECS))
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
}

impl SettingsStore {
    /// Creates a store with default settings that will save to `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            settings: Arc::new(RwLock::new(Settings::default())),
            path,
        }
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Self {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing file yields defaults; a corrupt one yields defaults with a
    /// warning and is overwritten on the next save.
    pub async fn load(path: PathBuf) -> Self {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json(&path).await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            })
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
        }
    }

    /// Path the store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Applies `f` and saves.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk. The in-memory
    /// change is kept.
    pub async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.save().await
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Restores defaults, keeping the environment of the stored key.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.update(|s| {
            *s = Settings {
                environment: s.environment,
                ..Settings::default()
            };
        })
        .await
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Gets the environment.
    pub async fn environment(&self) -> Environment {
        self.settings.read().await.environment
    }

    /// Sets the environment.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn set_environment(&self, environment: Environment) -> Result<(), StoreError> {
        self.update(|s| s.environment = environment).await
    }

    /// Gets the display mode.
    pub async fn display_mode(&self) -> DisplayMode {
        self.settings.read().await.display_mode
    }

    /// Sets the display mode.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn set_display_mode(&self, mode: DisplayMode) -> Result<(), StoreError> {
        self.update(|s| s.display_mode = mode).await
    }

    /// Gets the reverse display flag.
    pub async fn reverse_display(&self) -> bool {
        self.settings.read().await.reverse_display
    }

    /// Sets the reverse display flag.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn set_reverse_display(&self, value: bool) -> Result<(), StoreError> {
        self.update(|s| s.reverse_display = value).await
    }

    /// Gets the refresh interval.
    pub async fn refresh_interval(&self) -> Duration {
        self.settings.read().await.refresh_interval()
    }

    /// Sets the refresh interval in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] below the minimum interval, or an
    /// error if settings cannot be written to disk.
    pub async fn set_refresh_interval_secs(&self, secs: u64) -> Result<(), StoreError> {
        if secs < MIN_REFRESH_INTERVAL_SECS {
            return Err(StoreError::Config(format!(
                "refresh interval must be at least {MIN_REFRESH_INTERVAL_SECS} seconds"
            )));
        }
        self.update(|s| s.refresh_interval_secs = secs).await
    }

    /// Gets the log level.
    pub async fn log_level(&self) -> LogLevel {
        self.settings.read().await.log_level
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        (dir, store)
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.display_mode, DisplayMode::Auto);
        assert!(!settings.reverse_display);
        assert_eq!(settings.refresh_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_refresh_interval_floor() {
        let settings = Settings {
            refresh_interval_secs: 1,
            ..Settings::default()
        };
        assert_eq!(settings.refresh_interval(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_setters_persist() {
        let (_dir, store) = temp_store();

        store.set_display_mode(DisplayMode::Team).await.unwrap();
        store.set_reverse_display(true).await.unwrap();
        store.set_environment(Environment::Test).await.unwrap();

        let reloaded = SettingsStore::load(store.path().to_path_buf()).await;
        assert_eq!(reloaded.display_mode().await, DisplayMode::Team);
        assert!(reloaded.reverse_display().await);
        assert_eq!(reloaded.environment().await, Environment::Test);
    }

    #[tokio::test]
    async fn test_refresh_interval_validation() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.set_refresh_interval_secs(5).await,
            Err(StoreError::Config(_))
        ));
        store.set_refresh_interval_secs(120).await.unwrap();
        assert_eq!(store.refresh_interval().await, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_reset_keeps_environment() {
        let (_dir, store) = temp_store();
        store
            .update(|s| {
                s.environment = Environment::Test;
                s.display_mode = DisplayMode::Paygo;
                s.reverse_display = true;
            })
            .await
            .unwrap();

        store.reset().await.unwrap();

        let settings = store.get().await;
        assert_eq!(settings.environment, Environment::Test);
        assert_eq!(settings.display_mode, DisplayMode::Auto);
        assert!(!settings.reverse_display);
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Debug.to_string(), "debug");
        assert_eq!(LogLevel::default(), LogLevel::Warn);
    }
}
