//! Persistence round-trip and edge case tests.
//!
//! Tests file I/O and how settings survive missing, partial and corrupt
//! files.

use std::path::PathBuf;
use tempfile::TempDir;

use yescode_core::{DisplayMode, Environment};

use crate::persistence::{load_json, load_json_or_default, save_json};
use crate::settings_store::{LogLevel, Settings, SettingsStore};

// ============================================================================
// JSON Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_save_and_load_settings() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        environment: Environment::Test,
        display_mode: DisplayMode::Subscription,
        reverse_display: true,
        refresh_interval_secs: 300,
        log_level: LogLevel::Debug,
    };

    save_json(&file_path, &settings).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();

    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let nested_path = temp_dir.path().join("deeply").join("nested").join("settings.json");

    save_json(&nested_path, &Settings::default()).await.unwrap();
    assert!(nested_path.exists());
    // The temp file is renamed away
    assert!(!nested_path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_load_nonexistent_file() {
    let file_path = PathBuf::from("/nonexistent/path/settings.json");

    let result: Result<Settings, _> = load_json(&file_path).await;
    assert!(result.is_err());

    let settings: Settings = load_json_or_default(&file_path).await;
    assert_eq!(settings, Settings::default());
}

#[tokio::test]
async fn test_wire_format() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");

    let settings = Settings {
        display_mode: DisplayMode::Paygo,
        ..Settings::default()
    };
    save_json(&file_path, &settings).await.unwrap();

    let raw = tokio::fs::read_to_string(&file_path).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["display_mode"], "paygo");
    assert_eq!(value["environment"], "production");
    assert_eq!(value["refresh_interval_secs"], 60);
}

// ============================================================================
// Settings Store Edge Cases
// ============================================================================

#[tokio::test]
async fn test_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{ "reverse_display": true }"#)
        .await
        .unwrap();

    let store = SettingsStore::load(file_path).await;
    let settings = store.get().await;
    assert!(settings.reverse_display);
    assert_eq!(settings.display_mode, DisplayMode::Auto);
    assert_eq!(settings.refresh_interval_secs, 60);
}

#[tokio::test]
async fn test_corrupt_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, "{ not json").await.unwrap();

    let store = SettingsStore::load(file_path.clone()).await;
    assert_eq!(store.get().await, Settings::default());

    // The next save replaces the corrupt content
    store.set_reverse_display(true).await.unwrap();
    let loaded: Settings = load_json(&file_path).await.unwrap();
    assert!(loaded.reverse_display);
}

#[tokio::test]
async fn test_unknown_display_mode_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("settings.json");
    tokio::fs::write(&file_path, r#"{ "display_mode": "weekly" }"#)
        .await
        .unwrap();

    let store = SettingsStore::load(file_path).await;
    assert_eq!(store.display_mode().await, DisplayMode::Auto);
}
