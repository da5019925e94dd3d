//! Error types for GitHub operations

use std::fmt;

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Delivery channel of a two-factor code, from the `X-GitHub-OTP` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoFactorType {
    Sms,
    AuthenticatorApp,
    Unknown,
}

impl TwoFactorType {
    /// Parse the value of an `X-GitHub-OTP: required; <kind>` header
    ///
    /// Returns `None` when the header does not announce a required code.
    pub fn from_otp_header(value: &str) -> Option<Self> {
        let mut parts = value.split(';').map(str::trim);
        if !parts.next()?.eq_ignore_ascii_case("required") {
            return None;
        }

        Some(match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("sms") => TwoFactorType::Sms,
            Some("app") => TwoFactorType::AuthenticatorApp,
            _ => TwoFactorType::Unknown,
        })
    }
}

impl fmt::Display for TwoFactorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TwoFactorType::Sms => "sms",
            TwoFactorType::AuthenticatorApp => "app",
            TwoFactorType::Unknown => "unknown",
        })
    }
}

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required value was not supplied
    #[error("Argument '{0}' is required")]
    NullArgument(&'static str),

    /// A required string was empty
    #[error("Argument '{0}' must not be empty")]
    EmptyArgument(&'static str),

    /// A repository identifier was not in `owner/name` form
    #[error("Invalid repository '{0}'. Expected owner/name")]
    MalformedRepository(String),

    /// The API answered with an unexpected status
    #[error("GitHub API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// The server wants a two-factor code before it will answer
    #[error("Two-factor authentication code required (delivered via {0})")]
    TwoFactorRequired(TwoFactorType),

    /// The supplied two-factor code was rejected
    #[error("Two-factor authentication code was rejected")]
    TwoFactorChallengeFailed { code: String },

    /// Transport or configuration error
    #[error(transparent)]
    Core(#[from] hubkit_core::Error),

    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is a 404 from the API
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Whether the error was raised before any request was sent
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::NullArgument(_) | Error::EmptyArgument(_) | Error::MalformedRepository(_)
        )
    }
}
