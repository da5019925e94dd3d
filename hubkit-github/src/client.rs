//! Entry point tying the resource clients to one connection

use std::sync::Arc;

use hubkit_core::{Config, Connection, Credentials, HttpConnection, Secrets};
use tracing::info;

use crate::authorizations::AuthorizationsClient;
use crate::commits::RepositoryCommitsClient;
use crate::followers::FollowersClient;
use crate::labels::IssuesLabelsClient;
use crate::members::OrganizationMembersClient;
use crate::runs::WorkflowRunsClient;
use crate::search::SearchClient;
use crate::starring::StarredClient;
use crate::watching::WatchedClient;
use crate::{ApiConnection, Result};

/// GitHub REST API client
///
/// Cheap to clone; every accessor hands out a client sharing the same
/// connection.
#[derive(Clone)]
pub struct GitHubClient {
    api: ApiConnection,
}

impl GitHubClient {
    /// Create a client talking HTTP to the configured API
    pub fn new(config: &Config, credentials: Credentials) -> Result<Self> {
        let connection = HttpConnection::new(&config.api, credentials)?;
        info!(base_url = %connection.base_url(), "Created GitHub client");
        Ok(Self::with_connection(Arc::new(connection)))
    }

    /// Create a client from the config file, environment and secrets
    ///
    /// Credentials are loaded from (in priority order):
    /// 1. GITHUB_TOKEN environment variable
    /// 2. ~/.config/hubkit/secrets.toml (token, then login + password)
    pub fn load() -> Result<Self> {
        let config = Config::load_with_overrides(None, None)?;
        let secrets = Secrets::load()?;
        Self::new(&config, secrets.credentials())
    }

    /// Create a client over any connection
    pub fn with_connection(connection: Arc<dyn Connection>) -> Self {
        Self {
            api: ApiConnection::new(connection),
        }
    }

    /// The JSON connection shared by all resource clients
    pub fn connection(&self) -> &ApiConnection {
        &self.api
    }

    /// GitHub Actions workflow runs
    pub fn actions(&self) -> WorkflowRunsClient {
        WorkflowRunsClient::new(self.api.clone())
    }

    pub fn search(&self) -> SearchClient {
        SearchClient::new(self.api.clone())
    }

    pub fn org_members(&self) -> OrganizationMembersClient {
        OrganizationMembersClient::new(self.api.clone())
    }

    pub fn followers(&self) -> FollowersClient {
        FollowersClient::new(self.api.clone())
    }

    pub fn starring(&self) -> StarredClient {
        StarredClient::new(self.api.clone())
    }

    pub fn watching(&self) -> WatchedClient {
        WatchedClient::new(self.api.clone())
    }

    pub fn authorizations(&self) -> AuthorizationsClient {
        AuthorizationsClient::new(self.api.clone())
    }

    /// Issue and repository labels
    pub fn labels(&self) -> IssuesLabelsClient {
        IssuesLabelsClient::new(self.api.clone())
    }

    pub fn commits(&self) -> RepositoryCommitsClient {
        RepositoryCommitsClient::new(self.api.clone())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use hubkit_core::{ApiConfig, Method};

    #[test]
    fn test_new_builds_http_client() {
        let config = Config {
            api: ApiConfig {
                base_url: "https://github.example.com/api/v3".to_string(),
                ..Default::default()
            },
        };
        let client = GitHubClient::new(&config, Credentials::Token("t".to_string())).unwrap();
        assert_eq!(format!("{:?}", client), "GitHubClient { .. }");
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = Config {
            api: ApiConfig {
                base_url: "not a url".to_string(),
                ..Default::default()
            },
        };
        assert!(GitHubClient::new(&config, Credentials::Anonymous).is_err());
    }

    #[tokio::test]
    async fn test_clients_share_connection() {
        let fake = FakeConnection::new();
        fake.respond(Method::Get, "user/following/octocat", 204, "");
        fake.respond(Method::Put, "user/starred/octocat/hello", 204, "");

        let client = fake.client();
        assert!(client.followers().is_following_for_current("octocat").await.unwrap());
        assert!(client.starring().star_repo("octocat", "hello").await.unwrap());
        assert_eq!(fake.requests().len(), 2);
    }
}
