//! Tests for .octolink.yaml discovery and loading.

use octolink_cli::config::{ProjectConfig, CONFIG_FILE_NAME};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_discover_walks_up_to_parent() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        "base_url: https://ghe.example.com/api/v3\nclient_id: Iv1.abc\nscopes:\n  - repo\n  - read:user\n",
    )
    .unwrap();
    let nested = temp_dir.path().join("a").join("b");
    fs::create_dir_all(&nested).unwrap();

    let config = ProjectConfig::discover_from_path(&nested).unwrap();

    assert_eq!(
        config.base_url.as_deref(),
        Some("https://ghe.example.com/api/v3")
    );
    assert_eq!(config.client_id.as_deref(), Some("Iv1.abc"));
    assert_eq!(config.scopes, vec!["repo", "read:user"]);
}

#[test]
fn test_load_full_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &path,
        "base_url: https://api.github.com\nclient_id: client\nredirect_uri: http://localhost:8080/callback\nscopes:\n  - gist\nuser_agent: octolink-tests\ntimeout_secs: 10\n",
    )
    .unwrap();
    let expected = ProjectConfig {
        base_url: Some("https://api.github.com".to_string()),
        client_id: Some("client".to_string()),
        redirect_uri: Some("http://localhost:8080/callback".to_string()),
        scopes: vec!["gist".to_string()],
        user_agent: Some("octolink-tests".to_string()),
        timeout_secs: Some(10),
    };

    let loaded = ProjectConfig::load_from_file(&path).unwrap();

    assert_eq!(loaded, expected);
    let connection = loaded.connection_config(None).unwrap();
    assert_eq!(connection.timeout, Duration::from_secs(10));
    assert_eq!(connection.user_agent, "octolink-tests");
}

#[test]
fn test_invalid_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "base_url: not a url\n").unwrap();

    let error = ProjectConfig::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("base_url"));
}

#[test]
fn test_unknown_keys_are_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "client_secret: hunter2\n").unwrap();

    assert!(ProjectConfig::load_from_file(&path).is_err());
}
