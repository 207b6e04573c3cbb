use std::{env, fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file had an unsupported extension.
    #[error("unsupported configuration format; use 'yaml' or 'json'")]
    UnsupportedFormat,
    /// The configuration file failed to parse.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The main configuration structure for the Parley client.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the chat server hosting the stream and history endpoints.
    pub server_url: Url,

    /// Logging level.
    pub log_level: String,
}

impl Config {
    /// Generates a default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            server_url: Url::parse("http://localhost:8080").expect("default URL is valid"),
            log_level: "info".to_string(),
        }
    }

    /// Loads the configuration from a file, environment variables, or defaults.
    ///
    /// Resolution order: defaults, then the file (when provided), then
    /// `PARLEY_SERVER_URL` / `PARLEY_LOG_LEVEL` environment variables for
    /// values still at their defaults, then the explicit override.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the resolved configuration fails validation.
    pub fn load_config(
        config_path: Option<PathBuf>,
        server_override: Option<Url>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::with_defaults();
        let mut config = defaults.clone();

        if let Some(path) = config_path {
            let content = fs::read_to_string(&path)?;
            let file_config: Self = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yaml" | "yml") => {
                    serde_yml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
                }
                Some("json") => {
                    serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?
                }
                _ => return Err(ConfigError::UnsupportedFormat),
            };
            config = file_config;
        }

        if config.server_url == defaults.server_url
            && let Ok(raw) = env::var("PARLEY_SERVER_URL")
        {
            config.server_url = Url::parse(&raw)
                .map_err(|_| ConfigError::Invalid("PARLEY_SERVER_URL is not a valid URL".into()))?;
        }
        if config.log_level == defaults.log_level
            && let Ok(level) = env::var("PARLEY_LOG_LEVEL")
        {
            config.log_level = level;
        }

        if let Some(url) = server_override {
            config.server_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the resolved configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] when a value is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.server_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "server URL must be http or https, got '{}'",
                self.server_url.scheme()
            )));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log level must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::with_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.server_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_server_override_wins() {
        let url = Url::parse("https://chat.example.com").unwrap();
        let config = Config::load_config(None, Some(url.clone())).unwrap();
        assert_eq!(config.server_url, url);
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let config = Config {
            server_url: Url::parse("ftp://chat.example.com").unwrap(),
            log_level: "info".to_string(),
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_loads_yaml_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("parley_config_test.yaml");
        fs::write(
            &path,
            "server_url: \"https://room.example.com/\"\nlog_level: debug\n",
        )
        .unwrap();

        let config = Config::load_config(Some(path.clone()), None).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.server_url.as_str(), "https://room.example.com/");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let dir = std::env::temp_dir();
        let path = dir.join("parley_config_test.toml");
        fs::write(&path, "server_url = \"https://room.example.com/\"\n").unwrap();

        let result = Config::load_config(Some(path.clone()), None);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::UnsupportedFormat)));
    }
}
