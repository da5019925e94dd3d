//! Followers of users and the users they follow

use hubkit_core::{ApiOptions, Parameters, Request};
use tracing::info;

use crate::models::User;
use crate::repo::segment;
use crate::status::no_content_to_bool;
use crate::{validate, ApiConnection, Result};

#[derive(Debug, Clone)]
pub struct FollowersClient {
    api: ApiConnection,
}

impl FollowersClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Followers of the authenticated user
    pub async fn get_all_for_current(&self, options: &ApiOptions) -> Result<Vec<User>> {
        self.list("user/followers", options).await
    }

    /// Followers of `login`
    pub async fn get_all(&self, login: &str, options: &ApiOptions) -> Result<Vec<User>> {
        validate::not_empty(login, "login")?;
        self.list(&format!("users/{}/followers", segment(login)), options).await
    }

    /// Users the authenticated user follows
    pub async fn get_all_following_for_current(&self, options: &ApiOptions) -> Result<Vec<User>> {
        self.list("user/following", options).await
    }

    /// Users `login` follows
    pub async fn get_all_following(&self, login: &str, options: &ApiOptions) -> Result<Vec<User>> {
        validate::not_empty(login, "login")?;
        self.list(&format!("users/{}/following", segment(login)), options).await
    }

    pub async fn is_following_for_current(&self, following: &str) -> Result<bool> {
        validate::not_empty(following, "following")?;
        self.check(format!("user/following/{}", segment(following))).await
    }

    pub async fn is_following(&self, login: &str, following: &str) -> Result<bool> {
        validate::not_empty(login, "login")?;
        validate::not_empty(following, "following")?;
        self.check(format!("users/{}/following/{}", segment(login), segment(following))).await
    }

    /// Follow `login` as the authenticated user
    pub async fn follow(&self, login: &str) -> Result<bool> {
        validate::not_empty(login, "login")?;
        let request = Request::put(format!("user/following/{}", segment(login)));
        no_content_to_bool(&self.api.send_raw(request).await?)
    }

    pub async fn unfollow(&self, login: &str) -> Result<()> {
        validate::not_empty(login, "login")?;
        self.api.delete(&format!("user/following/{}", segment(login))).await
    }

    async fn list(&self, path: &str, options: &ApiOptions) -> Result<Vec<User>> {
        let users: Vec<User> = self.api.get_all(path, &Parameters::new(), options).await?;
        info!(path, count = users.len(), "Fetched users");
        Ok(users)
    }

    async fn check(&self, path: String) -> Result<bool> {
        no_content_to_bool(&self.api.send_raw(Request::get(path)).await?)
    }
}
