//! Integration tests for configuration loading.
//!
//! Priority: CLI > environment > config file > defaults

use hoshikuzu_cli::cli::DevArgs;
use hoshikuzu_cli::config::DevConfig;
use hoshikuzu_cli::{CliError, ConfigError};
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

fn args_for(dir: &TempDir) -> DevArgs {
    DevArgs {
        root: Some(dir.path().to_path_buf()),
        ..DevArgs::default()
    }
}

fn clear_env() {
    unsafe {
        std::env::remove_var("HOSHIKUZU_PORT");
        std::env::remove_var("HOSHIKUZU_NOTIFY_URL");
        std::env::remove_var("HOSHIKUZU_DEBOUNCE_MS");
    }
}

#[test]
#[serial]
fn test_defaults_without_file() {
    clear_env();
    let temp = TempDir::new().unwrap();

    let config = DevConfig::load(&args_for(&temp)).unwrap();
    assert_eq!(config.port, 5173);
    assert!(config.notify_url.is_none());
    assert_eq!(config.root, temp.path());
}

#[test]
#[serial]
fn test_file_overrides_defaults() {
    clear_env();
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("hoshikuzu.config.json"),
        r#"{
            "port": 4000,
            "host": "0.0.0.0",
            "notifyUrl": "http://localhost:9000",
            "debounceMs": 250
        }"#,
    )
    .unwrap();

    let config = DevConfig::load(&args_for(&temp)).unwrap();
    assert_eq!(config.port, 4000);
    assert_eq!(config.host.to_string(), "0.0.0.0");
    assert_eq!(config.notify_url.as_deref(), Some("http://localhost:9000"));
    assert_eq!(config.debounce_ms, 250);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("hoshikuzu.config.json"),
        r#"{ "port": 4000, "notifyUrl": "http://file:9000" }"#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("HOSHIKUZU_PORT", "4100");
        std::env::set_var("HOSHIKUZU_NOTIFY_URL", "http://env:9000");
    }
    let config = DevConfig::load(&args_for(&temp));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.port, 4100);
    assert_eq!(config.notify_url.as_deref(), Some("http://env:9000"));
}

#[test]
#[serial]
fn test_cli_overrides_env_and_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("hoshikuzu.config.json"),
        r#"{ "port": 4000, "notifyUrl": "http://file:9000" }"#,
    )
    .unwrap();

    unsafe {
        std::env::set_var("HOSHIKUZU_PORT", "4100");
    }
    let args = DevArgs {
        port: Some(4200),
        notify_url: Some("http://cli:9000".into()),
        ..args_for(&temp)
    };
    let config = DevConfig::load(&args);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.port, 4200);
    assert_eq!(config.notify_url.as_deref(), Some("http://cli:9000"));
}

#[test]
#[serial]
fn test_explicit_missing_config_file() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let args = DevArgs {
        config: Some(temp.path().join("nope.json")),
        ..args_for(&temp)
    };

    let err = DevConfig::load(&args).unwrap_err();
    assert!(matches!(err, CliError::Config(ConfigError::NotFound(_))));
}

#[test]
#[serial]
fn test_invalid_value_reports_field() {
    clear_env();
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("hoshikuzu.config.json"),
        r#"{ "port": "not-a-port" }"#,
    )
    .unwrap();

    let err = DevConfig::load(&args_for(&temp)).unwrap_err();
    match err {
        CliError::Config(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "port"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
#[serial]
fn test_root_must_exist() {
    clear_env();
    let temp = TempDir::new().unwrap();
    let args = DevArgs {
        root: Some(temp.path().join("missing")),
        ..DevArgs::default()
    };

    assert!(DevConfig::load(&args).is_err());
}
