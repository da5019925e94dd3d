//! Where and how to reach the API
//!
//! Later sources win: defaults, `~/.config/hubkit/config.toml`, `HUBKIT_*`
//! environment variables, command line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.github.com/";

const ENV_BASE_URL: &str = "HUBKIT_BASE_URL";
const ENV_USER_AGENT: &str = "HUBKIT_USER_AGENT";
const ENV_TIMEOUT: &str = "HUBKIT_TIMEOUT";

/// API endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the REST API (GitHub Enterprise uses `https://host/api/v3/`)
    pub base_url: String,

    /// Value sent in the `User-Agent` header
    pub user_agent: String,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("hubkit/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
}

impl Config {
    /// Read `~/.config/hubkit/config.toml`, or defaults when it is absent
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// `~/.config/hubkit/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hubkit").join("config.toml"))
    }

    /// Apply `HUBKIT_BASE_URL`, `HUBKIT_USER_AGENT` and `HUBKIT_TIMEOUT`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.api.base_url = base_url;
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            self.api.user_agent = user_agent;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.api.timeout = parse_timeout(&timeout)?;
        }
        Ok(self)
    }

    /// Apply values given on the command line
    pub fn with_cli_overrides(mut self, base_url: Option<String>, timeout: Option<Duration>) -> Self {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = timeout {
            self.api.timeout = timeout;
        }
        self
    }

    /// File, then environment, then command line
    pub fn load_with_overrides(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()?
            .with_cli_overrides(base_url, timeout))
    }
}

/// Parse a human-readable duration such as `30s` or `2m`
pub fn parse_timeout(value: &str) -> Result<Duration> {
    humantime_serde::re::humantime::parse_duration(value.trim())
        .map_err(|e| Error::Config(format!("Invalid timeout '{}': {}", value, e)))
}

/// Render a duration the way [`parse_timeout`] reads it
pub fn format_timeout(value: Duration) -> String {
    humantime_serde::re::humantime::format_duration(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_timeout_round_trips_through_text() {
        let timeout = parse_timeout(" 1m 30s ").unwrap();
        assert_eq!(timeout, Duration::from_secs(90));
        assert_eq!(format_timeout(timeout), "1m 30s");
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://api.github.com/");
        assert!(config.api.user_agent.starts_with("hubkit/"));
        assert_eq!(config.api.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let env = |name: &str| match name {
            "HUBKIT_USER_AGENT" => Some("from-env".to_string()),
            "HUBKIT_TIMEOUT" => Some("5s".to_string()),
            _ => None,
        };
        let config = Config::default().with_overrides_from(env).unwrap();

        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.user_agent, "from-env");
        assert_eq!(config.api.timeout, Duration::from_secs(5));

        let bad = |_: &str| Some("whenever".to_string());
        assert!(Config::default().with_overrides_from(bad).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(
            Some("https://ghe.example.com/api/v3/".to_string()),
            Some(Duration::from_secs(5)),
        );

        assert_eq!(config.api.base_url, "https://ghe.example.com/api/v3/");
        assert_eq!(config.api.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[api]
base_url = "https://ghe.example.com/api/v3/"
user_agent = "my-tool"
timeout = "1m 30s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://ghe.example.com/api/v3/");
        assert_eq!(config.api.user_agent, "my-tool");
        assert_eq!(config.api.timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[api]
timeout = "10s"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://api.github.com/");
        assert_eq!(config.api.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nuser_agent = \"from-file\"").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.api.user_agent, "from-file");
    }

    #[test]
    fn test_load_from_file_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
