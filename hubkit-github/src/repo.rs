//! Repository addressing
//!
//! Repository-scoped endpoints accept either `owner/name` or the numeric
//! repository id. Both resolve through [`RepoAddress::join`], so the only
//! difference between the two forms is the `repos/{owner}/{name}` versus
//! `repositories/{id}` prefix.

use std::borrow::Cow;
use std::fmt;

use crate::{validate, Error, Result};

/// Identifies a repository in a request path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepoAddress {
    /// `repos/{owner}/{name}`
    OwnerName { owner: String, name: String },
    /// `repositories/{id}`
    Id(i64),
}

impl RepoAddress {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepoAddress::OwnerName {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse a repository reference
    ///
    /// Supports formats:
    /// - owner/repo
    /// - https://github.com/owner/repo
    /// - git@github.com:owner/repo.git
    pub fn parse(value: &str) -> Result<Self> {
        let (owner, name) = parse_github_url(value)?;
        Ok(Self::new(owner, name))
    }

    /// Path prefix for this repository
    pub fn path(&self) -> Result<String> {
        match self {
            RepoAddress::OwnerName { owner, name } => {
                validate::not_empty(owner, "owner")?;
                validate::not_empty(name, "name")?;
                Ok(format!("repos/{}/{}", segment(owner), segment(name)))
            }
            RepoAddress::Id(id) => Ok(format!("repositories/{}", id)),
        }
    }

    /// Path of a resource below this repository
    pub fn join(&self, tail: &str) -> Result<String> {
        Ok(format!("{}/{}", self.path()?, tail))
    }
}

impl fmt::Display for RepoAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoAddress::OwnerName { owner, name } => write!(f, "{}/{}", owner, name),
            RepoAddress::Id(id) => write!(f, "repository {}", id),
        }
    }
}

impl From<(&str, &str)> for RepoAddress {
    fn from((owner, name): (&str, &str)) -> Self {
        Self::new(owner, name)
    }
}

impl From<(String, String)> for RepoAddress {
    fn from((owner, name): (String, String)) -> Self {
        Self::new(owner, name)
    }
}

impl From<i64> for RepoAddress {
    fn from(id: i64) -> Self {
        RepoAddress::Id(id)
    }
}

impl From<&RepoAddress> for RepoAddress {
    fn from(address: &RepoAddress) -> Self {
        address.clone()
    }
}

/// Percent-encode a caller value for use as one path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Percent-encode a git reference, keeping its `/` separators
pub(crate) fn ref_segments(value: &str) -> String {
    value.split('/').map(segment).collect::<Vec<_>>().join("/")
}

/// Validate an `owner/name` string without building an address
pub(crate) fn ensure_full_name(value: &str) -> Result<()> {
    match value.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(())
        }
        _ => Err(Error::MalformedRepository(value.to_string())),
    }
}

/// Parse a GitHub URL into owner and repo
fn parse_github_url(url: &str) -> Result<(String, String)> {
    if url.starts_with("https://") || url.starts_with("http://") {
        let parsed = url::Url::parse(url).map_err(|_| Error::MalformedRepository(url.to_string()))?;
        let path = parsed.path().trim_start_matches('/').trim_end_matches(".git");
        return split_owner_name(path, url);
    }

    if let Some(rest) = url.strip_prefix("git@") {
        return match rest.split_once(':') {
            Some((_, path)) => split_owner_name(path.trim_end_matches(".git"), url),
            None => Err(Error::MalformedRepository(url.to_string())),
        };
    }

    ensure_full_name(url)?;
    split_owner_name(url.trim_end_matches(".git"), url)
}

fn split_owner_name(path: &str, original: &str) -> Result<(String, String)> {
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) => Ok((owner.to_string(), name.to_string())),
        _ => Err(Error::MalformedRepository(original.to_string())),
    }
}
