//! Configuration loading tests
//!
//! Run with: cargo test --test config_tests

use fleetdesk::config::{self, loader, Config};
use fleetdesk::error::Error;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults_match_app_constants() {
    let config = Config::default();
    assert_eq!(config.api.timeout(), Duration::from_secs(30));
    assert_eq!(config.api.retry_count, 3);
    assert_eq!(config.api.retry_delay_ms, 1_000);
    assert_eq!(config.upload.max_size, 5 * 1024 * 1024);
    assert_eq!(config.upload.allowed_types, vec!["image/jpeg", "image/png"]);
    assert_eq!(config.validation.password.min_length, 8);
    assert_eq!(config.validation.trip.max_amount, 10_000.0);
    assert!(config.session.token_path.ends_with("sessionToken"));

    let policy = config.api.retry_policy();
    assert_eq!(policy.max_attempts(), 4);
    assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(1));
    assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(5));
    println!("✓ Config defaults match the app constants");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fleetdesk.toml");
    fs::write(
        &path,
        r#"
[api]
url = "https://script.example.com/macros/s/abc/exec"
timeout_ms = 5000

[validation.trip]
max_km = 500.0
"#,
    )
    .unwrap();

    let config = config::load_config_from_path(&path).unwrap();
    assert_eq!(config.api.url, "https://script.example.com/macros/s/abc/exec");
    assert_eq!(config.api.timeout(), Duration::from_secs(5));
    assert_eq!(config.api.retry_count, 3);
    assert_eq!(config.validation.trip.max_km, 500.0);
    assert_eq!(config.validation.trip.min_amount, 10.0);
    assert_eq!(config.upload.max_size, 5 * 1024 * 1024);
}

#[test]
fn test_env_interpolation_in_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fleetdesk.toml");
    fs::write(
        &path,
        r#"
[api]
url = "${FLEETDESK_CONFIG_TEST_URL:-http://fallback.example/exec}"
"#,
    )
    .unwrap();

    let config = config::load_config_from_path(&path).unwrap();
    assert_eq!(config.api.url, "http://fallback.example/exec");
}

#[test]
fn test_missing_file_is_config_not_found() {
    let dir = TempDir::new().unwrap();
    let err = config::load_config_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound));
    assert!(err.to_string().contains("fleetdesk init"));
}

#[test]
fn test_invalid_toml_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fleetdesk.toml");
    fs::write(&path, "[api\nurl = ").unwrap();

    let err = config::load_config_from_path(&path).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
    assert!(err.to_string().starts_with("TOML parse error"));
}

#[test]
fn test_wrong_types_are_rejected() {
    let err = loader::parse_config("[api]\nretry_count = \"three\"\n").unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
fn test_default_file_round_trips_through_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(loader::CONFIG_FILENAME);

    let mut config = loader::parse_config(loader::default_config_content()).unwrap();
    config.api.retry_count = 5;
    config.upload.allowed_types.push("image/webp".to_string());
    config::save_config(&config, &path).unwrap();

    let reloaded = config::load_config_from_path(&path).unwrap();
    assert_eq!(reloaded.api.retry_count, 5);
    assert_eq!(reloaded.upload.allowed_types.len(), 3);
    assert_eq!(reloaded.session.token_path, config.session.token_path);
}
