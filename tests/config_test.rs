// tests/config_test.rs
use release_pilot::config::{load_config, Config};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_default_config() {
    let config = Config::default();
    assert_eq!(config.polling.max_attempts, 5);
    assert_eq!(config.polling.delay_ms, 10_000);
    assert!(config.repository.owner.is_empty());
    assert!(config.tracker.base_url.is_empty());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[repository]
owner = "rotabull"
name = "rotabull"

[tracker]
base_url = "https://app.clubhouse.io/rotabull/story/"

[polling]
max_attempts = 8
delay_ms = 2500
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.repository.owner, "rotabull");
    assert_eq!(config.repository.name, "rotabull");
    assert_eq!(
        config.tracker.base_url,
        "https://app.clubhouse.io/rotabull/story/"
    );
    assert_eq!(config.polling.max_attempts, 8);
    assert_eq!(config.polling.delay_ms, 2500);
}

#[test]
fn test_partial_file_keeps_polling_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[repository]\nowner = \"rotabull\"\nname = \"rotabull\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.polling.max_attempts, 5);
    assert_eq!(config.polling.delay_ms, 10_000);
}

#[test]
fn test_invalid_file_is_a_config_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"not valid toml [[[").unwrap();
    temp_file.flush().unwrap();

    let result = load_config(Some(temp_file.path().to_str().unwrap()));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .starts_with("Configuration error"));
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let result = load_config(Some("/nonexistent/releasepilot.toml"));
    assert!(result.is_err());
}

#[test]
fn test_validation_helpers() {
    let config: Config = toml::from_str(
        r#"
[repository]
owner = "rotabull"
name = "rotabull"

[tracker]
base_url = "https://app.clubhouse.io/rotabull/story/"
"#,
    )
    .unwrap();

    assert_eq!(
        config.require_repository().unwrap(),
        ("rotabull", "rotabull")
    );
    assert!(config.require_tracker_base_url().is_ok());

    let empty = Config::default();
    assert!(empty.require_repository().is_err());
    assert!(empty.require_tracker_base_url().is_err());
}
