use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleasePilotError, Result};

/// Environment variable carrying the source-hosting API token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable carrying the deployment-platform API key
pub const HEROKU_API_KEY_ENV: &str = "HEROKU_API_KEY";

/// Represents the complete configuration for release-pilot.
///
/// Credentials never live here; they come from the environment. The file
/// carries the stable coordinates: repository, tracker, polling cadence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub polling: PollingConfig,
}

/// Repository coordinates on the source host.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub name: String,
}

/// Ticket-tracker settings.
///
/// `base_url` is the fixed prefix under which story permalinks live; the
/// permalink extraction pattern is derived from it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub base_url: String,
}

/// Status-polling cadence for promotions and deployment checks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PollingConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

/// Returns the default number of poll re-checks after the initial one.
fn default_max_attempts() -> u32 {
    5
}

/// Returns the default delay between poll attempts, in milliseconds.
fn default_delay_ms() -> u64 {
    10_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        PollingConfig {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repository: RepositoryConfig::default(),
            tracker: TrackerConfig::default(),
            polling: PollingConfig::default(),
        }
    }
}

impl Config {
    /// Repository coordinates, validated non-empty
    pub fn require_repository(&self) -> Result<(&str, &str)> {
        if self.repository.owner.is_empty() || self.repository.name.is_empty() {
            return Err(ReleasePilotError::config(
                "repository.owner and repository.name must be set (releasepilot.toml)",
            ));
        }
        Ok((&self.repository.owner, &self.repository.name))
    }

    /// Tracker base URL, validated non-empty
    pub fn require_tracker_base_url(&self) -> Result<&str> {
        if self.tracker.base_url.is_empty() {
            return Err(ReleasePilotError::config(
                "tracker.base_url must be set (releasepilot.toml)",
            ));
        }
        Ok(&self.tracker.base_url)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasepilot.toml` in current directory
/// 3. `.releasepilot.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./releasepilot.toml").exists() {
        fs::read_to_string("./releasepilot.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".releasepilot.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| ReleasePilotError::config(format!("invalid configuration file: {}", e)))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_polling_cadence() {
        let config = Config::default();
        assert_eq!(config.polling.max_attempts, 5);
        assert_eq!(config.polling.delay_ms, 10_000);
    }

    #[test]
    fn test_require_repository_rejects_empty() {
        let config = Config::default();
        assert!(config.require_repository().is_err());
    }

    #[test]
    fn test_require_tracker_base_url_rejects_empty() {
        let config = Config::default();
        assert!(config.require_tracker_base_url().is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[repository]
owner = "rotabull"
name = "rotabull"

[tracker]
base_url = "https://app.clubhouse.io/rotabull/story/"

[polling]
max_attempts = 3
delay_ms = 500
"#,
        )
        .unwrap();

        assert_eq!(config.require_repository().unwrap(), ("rotabull", "rotabull"));
        assert_eq!(
            config.require_tracker_base_url().unwrap(),
            "https://app.clubhouse.io/rotabull/story/"
        );
        assert_eq!(config.polling.max_attempts, 3);
        assert_eq!(config.polling.delay_ms, 500);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
[repository]
owner = "rotabull"
name = "rotabull"
"#,
        )
        .unwrap();

        assert_eq!(config.polling.max_attempts, 5);
        assert!(config.tracker.base_url.is_empty());
    }
}
