//! Repository subscriptions (watching)

use chrono::{DateTime, Utc};
use hubkit_core::{ApiOptions, Parameters, Request};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Repository, User};
use crate::repo::segment;
use crate::status::{error_for, no_content_to_bool};
use crate::{validate, ApiConnection, RepoAddress, Result};

/// The caller's subscription to a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscribed: bool,
    pub ignored: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// Body for subscribing to a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NewSubscription {
    /// Receive notifications
    pub subscribed: bool,
    /// Block all notifications
    pub ignored: bool,
}

#[derive(Debug, Clone)]
pub struct WatchedClient {
    api: ApiConnection,
}

impl WatchedClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Users watching a repository
    pub async fn get_all_watchers(
        &self,
        repo: impl Into<RepoAddress>,
        options: &ApiOptions,
    ) -> Result<Vec<User>> {
        let path = repo.into().join("subscribers")?;
        let users: Vec<User> = self.api.get_all(&path, &Parameters::new(), options).await?;
        info!(count = users.len(), "Fetched watchers");
        Ok(users)
    }

    /// Repositories watched by the authenticated user
    pub async fn get_all_for_current(&self, options: &ApiOptions) -> Result<Vec<Repository>> {
        self.api
            .get_all("user/subscriptions", &Parameters::new(), options)
            .await
    }

    /// Repositories watched by `user`
    pub async fn get_all_for_user(&self, user: &str, options: &ApiOptions) -> Result<Vec<Repository>> {
        validate::not_empty(user, "user")?;
        let path = format!("users/{}/subscriptions", segment(user));
        self.api.get_all(&path, &Parameters::new(), options).await
    }

    /// Whether the authenticated user is subscribed
    ///
    /// A subscription that exists but ignores notifications counts as no.
    pub async fn check_watched(&self, repo: impl Into<RepoAddress>) -> Result<bool> {
        let path = repo.into().join("subscription")?;
        let response = self.api.send_raw(Request::get(path)).await?;
        match response.status {
            200 => {
                let subscription: Subscription = serde_json::from_slice(&response.body)?;
                Ok(subscription.subscribed)
            }
            404 => Ok(false),
            _ => Err(error_for(&response)),
        }
    }

    pub async fn watch_repo(
        &self,
        repo: impl Into<RepoAddress>,
        subscription: &NewSubscription,
    ) -> Result<Subscription> {
        let path = repo.into().join("subscription")?;
        self.api.put(&path, Some(subscription), None).await
    }

    pub async fn unwatch_repo(&self, repo: impl Into<RepoAddress>) -> Result<bool> {
        let path = repo.into().join("subscription")?;
        no_content_to_bool(&self.api.send_raw(Request::delete(path)).await?)
    }
}
