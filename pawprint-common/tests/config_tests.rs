//! Tests for project root resolution and config file lookup
//!
//! Tests that manipulate PAWPRINT_ROOT are marked with #[serial] so they
//! run sequentially, not in parallel.

use pawprint_common::config::{
    bootstrap, locate_config_file, resolve_root_folder, TomlConfig, CONFIG_FILE_NAME,
    ROOT_ENV_VAR,
};
use serial_test::serial;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_overrides_env_and_toml() {
    std::env::set_var(ROOT_ENV_VAR, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(Some(Path::new("/from/cli")), ROOT_ENV_VAR, &config).unwrap();
    assert_eq!(root, PathBuf::from("/from/cli"));

    std::env::remove_var(ROOT_ENV_VAR);
}

#[test]
#[serial]
fn test_env_overrides_toml() {
    std::env::set_var(ROOT_ENV_VAR, "/from/env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, ROOT_ENV_VAR, &config).unwrap();
    assert_eq!(root, PathBuf::from("/from/env"));

    std::env::remove_var(ROOT_ENV_VAR);
}

#[test]
#[serial]
fn test_toml_used_when_cli_and_env_absent() {
    std::env::remove_var(ROOT_ENV_VAR);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let root = resolve_root_folder(None, ROOT_ENV_VAR, &config).unwrap();
    assert_eq!(root, PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_current_dir_is_last_resort() {
    std::env::remove_var(ROOT_ENV_VAR);
    let root = resolve_root_folder(None, ROOT_ENV_VAR, &TomlConfig::default()).unwrap();
    assert_eq!(root, std::env::current_dir().unwrap());
}

#[test]
fn test_project_config_file_is_found() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&config_path, "[collection]\nid_prefix = \"paw\"\n").unwrap();

    let found = locate_config_file(None, temp_dir.path()).unwrap();
    assert_eq!(found, Some(config_path));
}

#[test]
#[serial]
fn test_bootstrap_applies_project_config() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"
[paths]
objects_dir = "assets/objects"

[geocode]
enabled = false
"#,
    )
    .unwrap();

    let boot = bootstrap(Some(temp_dir.path()), None).unwrap();
    let (config, paths) = (boot.config, boot.paths);
    assert_eq!(boot.config_file, Some(temp_dir.path().join(CONFIG_FILE_NAME)));
    assert!(!config.geocode.enabled);
    assert_eq!(paths.root, temp_dir.path());
    assert_eq!(paths.objects_dir, temp_dir.path().join("assets/objects"));
    assert_eq!(paths.worklist, temp_dir.path().join("_data/paw_prints.csv"));
}

#[test]
#[serial]
fn test_bootstrap_resolves_log_file_against_root() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[logging]\nfile = \"logs/pawprint.log\"\n",
    )
    .unwrap();

    let boot = bootstrap(Some(temp_dir.path()), None).unwrap();
    assert_eq!(
        boot.config.logging.file,
        Some(temp_dir.path().join("logs/pawprint.log"))
    );
}

#[test]
#[serial]
fn test_bootstrap_keeps_absolute_log_file() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let log_dir = TempDir::new().unwrap();
    let log_file = log_dir.path().join("run.log");
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        format!("[logging]\nfile = {:?}\n", log_file.to_string_lossy()),
    )
    .unwrap();

    let boot = bootstrap(Some(temp_dir.path()), None).unwrap();
    assert_eq!(boot.config.logging.file, Some(log_file));
}

#[test]
#[serial]
fn test_bootstrap_without_config_file() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();

    let boot = bootstrap(Some(temp_dir.path()), None).unwrap();
    assert_eq!(boot.config_file, None);
    assert_eq!(boot.config.logging.file, None);
}

#[test]
#[serial]
fn test_bootstrap_rejects_invalid_config() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "[collection]\nid_prefix = \"\"\n",
    )
    .unwrap();

    let result = bootstrap(Some(temp_dir.path()), None);
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_bootstrap_rejects_malformed_toml() {
    std::env::remove_var(ROOT_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "[geocode\nenabled = ").unwrap();

    let result = bootstrap(Some(temp_dir.path()), None);
    assert!(result.is_err());
}
