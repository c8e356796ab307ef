//! Integration tests for configuration file resolution and persistence
//!
//! Tests that manipulate REWIND_CONFIG are marked with #[serial] so they run
//! sequentially, not in parallel.

use rewind_common::config::{
    load_or_default, resolve_config_path, write_toml_config, TomlConfig, TriggerMode,
    CONFIG_ENV_VAR,
};
use rewind_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_argument_has_priority() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let cli = PathBuf::from("/tmp/from-cli.toml");
    let resolved = resolve_config_path(Some(&cli));
    assert_eq!(resolved, Some(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_env_var_used_without_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");

    let resolved = resolve_config_path(None);
    assert_eq!(resolved, Some(PathBuf::from("/tmp/from-env.toml")));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_file_yields_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.toml");

    let config = load_or_default(Some(&missing)).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_invalid_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[rewind]\ngrace_seconds = 12.0\n").unwrap();

    let err = load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::Setting(_)), "got {:?}", err);
}

#[test]
fn test_write_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let mut config = TomlConfig::default();
    config.rewind.rewind_seconds = 5.0;
    config.rewind.trigger = TriggerMode::ComboReset;
    config.logging.level = "debug".to_string();

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!target.with_extension("toml.tmp").exists());

    let loaded = TomlConfig::load(&target).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_write_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("config.toml");

    let mut config = TomlConfig::default();
    config.rewind.grace_seconds = 0.0;

    assert!(write_toml_config(&config, &target).is_err());
    assert!(!target.exists());
}
