//! Configuration management

use crate::plan::PlanError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration file read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "nightly-plan.yaml";

/// Environment variable overriding [`Config::server_url`]
pub const ENV_SERVER: &str = "NIGHTLY_PLAN_SERVER";
/// Environment variable overriding [`Config::credentials_file`]
pub const ENV_CREDENTIALS: &str = "NIGHTLY_PLAN_CREDENTIALS";
/// Environment variable overriding [`Config::log_level`]
pub const ENV_LOG: &str = "NIGHTLY_PLAN_LOG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the plan server
    pub server_url: String,
    /// Properties file holding `username` and `password`
    pub credentials_file: PathBuf,
    /// Log level
    pub log_level: String,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "https://bamboo.typo3.com:443".to_string(),
            credentials_file: PathBuf::from(".credentials"),
            log_level: "info".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or from [`DEFAULT_CONFIG_FILE`] when
    /// it exists, then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file cannot be read, or if
    /// any file read is not valid YAML.
    pub fn load(path: Option<&Path>) -> Result<Self, PlanError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Reads a YAML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_yaml(&content)
    }

    /// Parses YAML configuration; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Render`] if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment overrides looked up through `lookup`
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(server) = lookup(ENV_SERVER) {
            self.server_url = server;
        }
        if let Some(credentials) = lookup(ENV_CREDENTIALS) {
            self.credentials_file = PathBuf::from(credentials);
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }
        self
    }

    /// Parsed server URL
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Http`] if `server_url` is not a valid URL.
    pub fn server_url(&self) -> Result<Url, PlanError> {
        Url::parse(&self.server_url)
            .map_err(|e| PlanError::Http(format!("invalid server URL '{}': {e}", self.server_url)))
    }

    /// HTTP timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_url, "https://bamboo.typo3.com:443");
        assert_eq!(config.credentials_file, PathBuf::from(".credentials"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_partial_yaml() {
        let config = Config::from_yaml("server_url: https://ci.example.com\ntimeout_secs: 5\n").unwrap();
        assert_eq!(config.server_url, "https://ci.example.com");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_invalid_yaml() {
        assert!(matches!(
            Config::from_yaml("timeout_secs: [1"),
            Err(PlanError::Render(_))
        ));
    }

    #[test]
    fn test_config_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_SERVER, "http://localhost:8085"),
            (ENV_LOG, "debug"),
        ]);
        let config = Config::default().with_env_overrides(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.server_url, "http://localhost:8085");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.credentials_file, PathBuf::from(".credentials"));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "credentials_file: /etc/ci/credentials").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.credentials_file, PathBuf::from("/etc/ci/credentials"));
    }

    #[test]
    fn test_config_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/nightly-plan.yaml")));
        assert!(matches!(result, Err(PlanError::Io(_))));
    }

    #[test]
    fn test_server_url() {
        let url = Config::default().server_url().unwrap();
        assert_eq!(url.host_str(), Some("bamboo.typo3.com"));

        let config = Config {
            server_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.server_url().is_err());
    }
}
