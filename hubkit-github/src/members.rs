//! Organization membership

use hubkit_core::{ApiOptions, Parameters, Request};
use tracing::{debug, info};

use crate::models::User;
use crate::repo::segment;
use crate::status::{membership_to_bool, no_content_to_bool};
use crate::{validate, ApiConnection, Result};

/// `filter` values for listing members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersFilter {
    All,
    /// Members without two-factor authentication enabled
    TwoFactorAuthenticationDisabled,
}

impl MembersFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            MembersFilter::All => "all",
            MembersFilter::TwoFactorAuthenticationDisabled => "2fa_disabled",
        }
    }
}

/// `role` values for listing members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersRole {
    All,
    Admin,
    Member,
}

impl MembersRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MembersRole::All => "all",
            MembersRole::Admin => "admin",
            MembersRole::Member => "member",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizationMembersFilter {
    pub filter: Option<MembersFilter>,
    pub role: Option<MembersRole>,
}

impl OrganizationMembersFilter {
    pub fn to_parameters(&self) -> Parameters {
        let mut params = Parameters::new();
        if let Some(filter) = self.filter {
            params.insert("filter".to_string(), filter.as_str().to_string());
        }
        if let Some(role) = self.role {
            params.insert("role".to_string(), role.as_str().to_string());
        }
        params
    }
}

/// Client for `/orgs/{org}/members` and `/orgs/{org}/public_members`
#[derive(Debug, Clone)]
pub struct OrganizationMembersClient {
    api: ApiConnection,
}

impl OrganizationMembersClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// List members visible to the caller
    pub async fn get_all(
        &self,
        org: &str,
        filter: &OrganizationMembersFilter,
        options: &ApiOptions,
    ) -> Result<Vec<User>> {
        validate::not_empty(org, "org")?;
        let path = format!("orgs/{}/members", segment(org));
        let members: Vec<User> = self.api.get_all(&path, &filter.to_parameters(), options).await?;
        info!(org, count = members.len(), "Fetched organization members");
        Ok(members)
    }

    /// List members who made their membership public
    pub async fn get_all_public(&self, org: &str, options: &ApiOptions) -> Result<Vec<User>> {
        validate::not_empty(org, "org")?;
        let path = format!("orgs/{}/public_members", segment(org));
        self.api.get_all(&path, &Parameters::new(), options).await
    }

    /// Whether a user belongs to the organization
    ///
    /// A non-member caller is redirected to the public list, which counts
    /// as no.
    pub async fn check_member(&self, org: &str, user: &str) -> Result<bool> {
        let path = member_path(org, user, "members")?;
        let response = self.api.send_raw(Request::get(path)).await?;
        membership_to_bool(&response)
    }

    /// Whether a user's membership is public
    pub async fn check_member_public(&self, org: &str, user: &str) -> Result<bool> {
        let path = member_path(org, user, "public_members")?;
        let response = self.api.send_raw(Request::get(path)).await?;
        no_content_to_bool(&response)
    }

    /// Remove a user from the organization
    pub async fn delete(&self, org: &str, user: &str) -> Result<()> {
        let path = member_path(org, user, "members")?;
        debug!(org, user, "Removing organization member");
        self.api.delete(&path).await
    }

    /// Make a user's membership public
    pub async fn publicize(&self, org: &str, user: &str) -> Result<bool> {
        let path = member_path(org, user, "public_members")?;
        let response = self.api.send_raw(Request::put(path)).await?;
        no_content_to_bool(&response)
    }

    /// Hide a user's membership
    pub async fn conceal(&self, org: &str, user: &str) -> Result<()> {
        let path = member_path(org, user, "public_members")?;
        self.api.delete(&path).await
    }
}

fn member_path(org: &str, user: &str, collection: &str) -> Result<String> {
    validate::not_empty(org, "org")?;
    validate::not_empty(user, "user")?;
    Ok(format!("orgs/{}/{}/{}", segment(org), collection, segment(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use crate::Error;
    use hubkit_core::Method;

    #[tokio::test]
    async fn test_check_member_maps_status() {
        let fake = FakeConnection::new();
        let path = "orgs/org/members/username";
        fake.respond(Method::Get, path, 204, "");
        fake.respond(Method::Get, path, 404, "");
        fake.respond(Method::Get, path, 302, "");
        fake.respond(Method::Get, path, 409, "");

        let members = fake.client().org_members();
        assert!(members.check_member("org", "username").await.unwrap());
        assert!(!members.check_member("org", "username").await.unwrap());
        assert!(!members.check_member("org", "username").await.unwrap());

        let err = members.check_member("org", "username").await.unwrap_err();
        assert!(matches!(err, Error::Api { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_check_member_public_does_not_accept_redirect() {
        let fake = FakeConnection::new();
        let path = "orgs/org/public_members/username";
        fake.respond(Method::Get, path, 204, "");
        fake.respond(Method::Get, path, 302, "");

        let members = fake.client().org_members();
        assert!(members.check_member_public("org", "username").await.unwrap());
        assert!(members.check_member_public("org", "username").await.is_err());
    }

    #[tokio::test]
    async fn test_get_all_sends_filter_and_role() {
        let fake = FakeConnection::new();
        fake.respond(Method::Get, "orgs/org/members", 200, r#"[{"id": 1, "login": "octocat"}]"#);

        let filter = OrganizationMembersFilter {
            filter: Some(MembersFilter::TwoFactorAuthenticationDisabled),
            role: Some(MembersRole::Admin),
        };
        let members = fake
            .client()
            .org_members()
            .get_all("org", &filter, &ApiOptions::default())
            .await
            .unwrap();

        assert_eq!(members[0].login, "octocat");
        let request = fake.last_request();
        assert_eq!(request.query["filter"], "2fa_disabled");
        assert_eq!(request.query["role"], "admin");
    }

    #[tokio::test]
    async fn test_get_all_without_filter_sends_no_parameters() {
        let fake = FakeConnection::new();
        fake.respond(Method::Get, "orgs/org/members", 200, "[]");
        fake.respond(Method::Get, "orgs/org/public_members", 200, "[]");

        let members = fake.client().org_members();
        members
            .get_all("org", &OrganizationMembersFilter::default(), &ApiOptions::default())
            .await
            .unwrap();
        assert!(fake.last_request().query.is_empty());

        members.get_all_public("org", &ApiOptions::default()).await.unwrap();
        assert_eq!(fake.last_request().path, "orgs/org/public_members");
    }

    #[tokio::test]
    async fn test_publicize_and_conceal() {
        let fake = FakeConnection::new();
        let path = "orgs/org/public_members/username";
        fake.respond(Method::Put, path, 204, "");
        fake.respond(Method::Delete, path, 204, "");
        fake.respond(Method::Delete, "orgs/org/members/username", 204, "");

        let members = fake.client().org_members();
        assert!(members.publicize("org", "username").await.unwrap());
        members.conceal("org", "username").await.unwrap();
        members.delete("org", "username").await.unwrap();

        let methods: Vec<Method> = fake.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::Put, Method::Delete, Method::Delete]);
    }

    #[tokio::test]
    async fn test_empty_arguments_send_nothing() {
        let fake = FakeConnection::new();
        let members = fake.client().org_members();

        assert!(matches!(
            members.check_member("", "username").await,
            Err(Error::EmptyArgument("org"))
        ));
        assert!(matches!(
            members.publicize("org", "").await,
            Err(Error::EmptyArgument("user"))
        ));
        assert!(matches!(
            members.get_all_public("", &ApiOptions::default()).await,
            Err(Error::EmptyArgument("org"))
        ));
        assert!(fake.requests().is_empty());
    }
}
