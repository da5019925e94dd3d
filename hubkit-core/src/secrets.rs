//! Credentials for talking to GitHub
//!
//! Kept apart from [`Config`](crate::Config) so that a config file can be
//! shared without leaking tokens. The file lives at
//! `~/.config/hubkit/secrets.toml` and must not be readable by group or
//! others on Unix.
//!
//! ```toml
//! [github]
//! token = "ghp_..."
//! # or, for endpoints that need basic authentication
//! login = "octocat"
//! password = "..."
//! ```
//!
//! `GITHUB_TOKEN` in the environment wins over the file token.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Credentials, Error, Result};

/// Environment variable holding a token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

const TEMPLATE: &str = r#"# hubkit secrets - keep this file private (chmod 600)

[github]
# Personal access token, see https://github.com/settings/tokens
token = ""

# Basic authentication; only used when no token is set.
# Needed for the OAuth authorizations API.
# login = ""
# password = ""
"#;

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    pub github: GitHubSecrets,
}

/// The `[github]` table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    pub token: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl GitHubSecrets {
    /// Trim token and login; blank values count as absent
    fn normalize(&mut self) {
        self.token = non_blank(self.token.take());
        self.login = non_blank(self.login.take());
        self.password = self.password.take().filter(|p| !p.is_empty());
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Secrets {
    /// Load the default secrets file, or empty secrets if there is none
    pub fn load() -> Result<Self> {
        match Self::default_secrets_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => {
                debug!("No secrets file, continuing without stored credentials");
                Ok(Self::default())
            }
        }
    }

    /// Load a secrets file, refusing it if its permissions are too open
    pub fn load_from_file(path: &Path) -> Result<Self> {
        ensure_private(path)?;

        let contents = std::fs::read_to_string(path)?;
        let mut secrets: Secrets = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse secrets {}: {}", path.display(), e))
        })?;
        secrets.github.normalize();

        Ok(secrets)
    }

    /// `~/.config/hubkit/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hubkit").join("secrets.toml"))
    }

    /// Credentials to authenticate with, honoring `GITHUB_TOKEN`
    ///
    /// Order: environment token, file token, login and password, anonymous.
    pub fn credentials(&self) -> Credentials {
        self.resolve(std::env::var(TOKEN_ENV).ok())
    }

    fn resolve(&self, env_token: Option<String>) -> Credentials {
        if let Some(token) = non_blank(env_token) {
            debug!("Using token from {}", TOKEN_ENV);
            return Credentials::Token(token);
        }

        let github = &self.github;
        if let Some(token) = &github.token {
            debug!("Using token from secrets file");
            return Credentials::Token(token.clone());
        }

        match (&github.login, &github.password) {
            (Some(login), Some(password)) => {
                debug!(login = %login, "Using basic authentication");
                Credentials::Basic {
                    login: login.clone(),
                    password: password.clone(),
                }
            }
            _ => Credentials::Anonymous,
        }
    }

    /// Write a commented template to the default location
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;
        write_template(&path)?;
        Ok(path)
    }
}

/// Write the template with 0600 permissions; never overwrites
pub fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Config(format!(
            "Secrets file already exists at {}",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, TEMPLATE)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    warn!(path = %path.display(), "Created secrets template; add a token before use");
    Ok(())
}

#[cfg(unix)]
fn ensure_private(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(Error::Config(format!(
            "Secrets file {} has insecure permissions {:o}; run: chmod 600 {}",
            path.display(),
            mode,
            path.display()
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_private(_path: &Path) -> Result<()> {
    Ok(())
}
