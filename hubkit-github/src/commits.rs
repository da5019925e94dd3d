//! Repository commits

use chrono::{DateTime, SecondsFormat, Utc};
use hubkit_core::{ApiOptions, Parameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::User;
use crate::repo::ref_segments;
use crate::{validate, ApiConnection, Error, RepoAddress, Result};

/// Media type that makes the commit endpoint answer with just the SHA
const SHA_MEDIA_TYPE: &str = "application/vnd.github.v3.sha";

/// Filters for listing commits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitRequest {
    /// SHA or branch to start listing from
    pub sha: Option<String>,
    /// Only commits touching this path
    pub path: Option<String>,
    /// Login or email of the author
    pub author: Option<String>,
    pub committer: Option<String>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl CommitRequest {
    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        let fields = [
            ("sha", self.sha.clone()),
            ("path", self.path.clone()),
            ("author", self.author.clone()),
            ("committer", self.committer.clone()),
            ("since", self.since.map(timestamp)),
            ("until", self.until.map(timestamp)),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                params.insert(name.to_string(), value);
            }
        }
        params
    }
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Git identity attached to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    #[serde(default)]
    pub author: Option<Signature>,
    #[serde(default)]
    pub committer: Option<Signature>,
    #[serde(default)]
    pub comment_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitParent {
    pub sha: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFile {
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, ...
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changes: u64,
    #[serde(default)]
    pub patch: Option<String>,
    #[serde(default)]
    pub previous_filename: Option<String>,
}

/// A commit as the REST API describes it
///
/// `author` and `committer` are GitHub accounts and are missing when the
/// git identity does not map to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub commit: CommitDetails,
    #[serde(default)]
    pub author: Option<User>,
    #[serde(default)]
    pub committer: Option<User>,
    #[serde(default)]
    pub parents: Vec<CommitParent>,
    #[serde(default)]
    pub stats: Option<CommitStats>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

/// Result of comparing two commits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareResult {
    #[serde(default)]
    pub html_url: Option<String>,
    /// `ahead`, `behind`, `identical` or `diverged`
    pub status: String,
    pub ahead_by: u64,
    pub behind_by: u64,
    pub total_commits: u64,
    pub base_commit: GitHubCommit,
    pub merge_base_commit: GitHubCommit,
    #[serde(default)]
    pub commits: Vec<GitHubCommit>,
    #[serde(default)]
    pub files: Vec<CommitFile>,
}

#[derive(Debug, Clone)]
pub struct RepositoryCommitsClient {
    api: ApiConnection,
}

impl RepositoryCommitsClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Get one commit by SHA, branch or tag
    pub async fn get(&self, repo: impl Into<RepoAddress>, reference: &str) -> Result<GitHubCommit> {
        validate::not_empty(reference, "reference")?;
        let path = repo.into().join(&format!("commits/{}", ref_segments(reference)))?;
        self.api.get(&path, &Parameters::new()).await
    }

    pub async fn get_all(
        &self,
        repo: impl Into<RepoAddress>,
        request: &CommitRequest,
        options: &ApiOptions,
    ) -> Result<Vec<GitHubCommit>> {
        let path = repo.into().join("commits")?;
        debug!(path = %path, ?request, "Listing commits");
        let commits: Vec<GitHubCommit> = self
            .api
            .get_all(&path, &request.to_parameters(), options)
            .await?;
        info!(count = commits.len(), "Fetched commits");
        Ok(commits)
    }

    /// Compare `base` with `head`
    pub async fn compare(
        &self,
        repo: impl Into<RepoAddress>,
        base: &str,
        head: &str,
    ) -> Result<CompareResult> {
        validate::not_empty(base, "base")?;
        validate::not_empty(head, "head")?;
        let path = repo.into().join(&format!("compare/{}...{}", ref_segments(base), ref_segments(head)))?;
        self.api.get(&path, &Parameters::new()).await
    }

    /// Resolve a reference to its full commit SHA
    pub async fn get_sha1(&self, repo: impl Into<RepoAddress>, reference: &str) -> Result<String> {
        validate::not_empty(reference, "reference")?;
        let path = repo.into().join(&format!("commits/{}", ref_segments(reference)))?;
        let body = self
            .api
            .get_raw(&path, &Parameters::new(), Some(SHA_MEDIA_TYPE))
            .await?;
        let sha = String::from_utf8(body).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(sha.trim().to_string())
    }
}
