//! Stars

use hubkit_core::{ApiOptions, Parameters, Request};
use tracing::{debug, info};

use crate::models::{Repository, SortDirection, User};
use crate::repo::segment;
use crate::status::no_content_to_bool;
use crate::{validate, ApiConnection, RepoAddress, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarredSort {
    /// When the repository was starred
    Created,
    /// When the repository was last pushed to
    Updated,
}

impl StarredSort {
    pub fn as_str(self) -> &'static str {
        match self {
            StarredSort::Created => "created",
            StarredSort::Updated => "updated",
        }
    }
}

/// Ordering for starred repository listings; both values are always sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarredRequest {
    pub sort: StarredSort,
    pub direction: SortDirection,
}

impl Default for StarredRequest {
    fn default() -> Self {
        Self {
            sort: StarredSort::Created,
            direction: SortDirection::Asc,
        }
    }
}

impl StarredRequest {
    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        params.insert("sort".to_string(), self.sort.as_str().to_string());
        params.insert("direction".to_string(), self.direction.as_str().to_string());
        params
    }
}

#[derive(Debug, Clone)]
pub struct StarredClient {
    api: ApiConnection,
}

impl StarredClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Users who starred a repository
    pub async fn get_all_stargazers(
        &self,
        repo: impl Into<RepoAddress>,
        options: &ApiOptions,
    ) -> Result<Vec<User>> {
        let path = repo.into().join("stargazers")?;
        let users: Vec<User> = self.api.get_all(&path, &Parameters::new(), options).await?;
        info!(count = users.len(), "Fetched stargazers");
        Ok(users)
    }

    /// Repositories starred by the authenticated user
    pub async fn get_all_for_current(
        &self,
        request: &StarredRequest,
        options: &ApiOptions,
    ) -> Result<Vec<Repository>> {
        self.api
            .get_all("user/starred", &request.to_parameters(), options)
            .await
    }

    /// Repositories starred by `user`
    pub async fn get_all_for_user(
        &self,
        user: &str,
        request: &StarredRequest,
        options: &ApiOptions,
    ) -> Result<Vec<Repository>> {
        validate::not_empty(user, "user")?;
        let path = format!("users/{}/starred", segment(user));
        self.api.get_all(&path, &request.to_parameters(), options).await
    }

    /// Whether the authenticated user starred `owner/name`
    pub async fn check_starred(&self, owner: &str, name: &str) -> Result<bool> {
        let path = starred_path(owner, name)?;
        no_content_to_bool(&self.api.send_raw(Request::get(path)).await?)
    }

    pub async fn star_repo(&self, owner: &str, name: &str) -> Result<bool> {
        let path = starred_path(owner, name)?;
        debug!(owner, name, "Starring repository");
        no_content_to_bool(&self.api.send_raw(Request::put(path)).await?)
    }

    pub async fn remove_star_from_repo(&self, owner: &str, name: &str) -> Result<bool> {
        let path = starred_path(owner, name)?;
        no_content_to_bool(&self.api.send_raw(Request::delete(path)).await?)
    }
}

fn starred_path(owner: &str, name: &str) -> Result<String> {
    validate::not_empty(owner, "owner")?;
    validate::not_empty(name, "name")?;
    Ok(format!("user/starred/{}/{}", segment(owner), segment(name)))
}
