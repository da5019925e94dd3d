//! OAuth authorizations and the two-factor challenge loop
//!
//! Endpoints that create authorizations with basic credentials may answer
//! `401` with `X-GitHub-OTP: required; <kind>`. The `*_with_two_factor`
//! variants hand that challenge to a caller-supplied handler, which either
//! asks for the code to be sent again or supplies one. A supplied code is
//! tried exactly once; a rejected code ends the flow with
//! [`Error::TwoFactorChallengeFailed`].

use std::future::Future;

use chrono::{DateTime, Utc};
use hubkit_core::{ApiOptions, Parameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TwoFactorType;
use crate::repo::segment;
use crate::{validate, ApiConnection, Error, Result};

/// What the two-factor handler wants to happen next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwoFactorChallengeResult {
    /// Trigger a fresh code and ask again
    RequestResendCode,
    /// Retry the request with this code
    Code(String),
}

/// The application an authorization was granted to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationApp {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub app: Option<AuthorizationApp>,
    /// Only present in the response that created the authorization
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub hashed_token: Option<String>,
    #[serde(default)]
    pub token_last_eight: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub note_url: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub user: Option<crate::models::User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating an authorization; `note` is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewAuthorization {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl NewAuthorization {
    pub fn new(note: impl Into<String>, scopes: &[&str]) -> Self {
        Self {
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            note: Some(note.into()),
            ..Default::default()
        }
    }
}

/// Body for updating an authorization; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorizationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_scopes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Serialize)]
struct ClientAuthorization<'a> {
    client_secret: &'a str,
    #[serde(flatten)]
    authorization: &'a NewAuthorization,
}

#[derive(Serialize)]
struct AccessToken<'a> {
    access_token: &'a str,
}

/// Client for `/authorizations` and `/applications/{client_id}/token`
#[derive(Debug, Clone)]
pub struct AuthorizationsClient {
    api: ApiConnection,
}

impl AuthorizationsClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    pub async fn get_all(&self, options: &ApiOptions) -> Result<Vec<Authorization>> {
        let authorizations: Vec<Authorization> = self
            .api
            .get_all("authorizations", &Parameters::new(), options)
            .await?;
        info!(count = authorizations.len(), "Fetched authorizations");
        Ok(authorizations)
    }

    pub async fn get(&self, id: i64) -> Result<Authorization> {
        self.api
            .get(&format!("authorizations/{}", id), &Parameters::new())
            .await
    }

    /// Create a personal authorization, sending `code` as the second factor
    /// when given
    pub async fn create(
        &self,
        authorization: &NewAuthorization,
        code: Option<&str>,
    ) -> Result<Authorization> {
        validate::required(authorization.note.as_deref(), "note")?;
        debug!(scopes = ?authorization.scopes, "Creating authorization");
        self.api
            .post_with_otp("authorizations", authorization, code)
            .await
    }

    /// [`create`](Self::create), answering two-factor challenges through
    /// `handler`
    pub async fn create_with_two_factor<F, Fut>(
        &self,
        authorization: &NewAuthorization,
        handler: F,
    ) -> Result<Authorization>
    where
        F: FnMut(TwoFactorType) -> Fut,
        Fut: Future<Output = Result<TwoFactorChallengeResult>>,
    {
        validate::required(authorization.note.as_deref(), "note")?;
        with_two_factor(
            move |code: Option<String>| async move {
                self.create(authorization, code.as_deref()).await
            },
            handler,
        )
        .await
    }

    /// Return the caller's authorization for an OAuth application, creating
    /// it if needed
    pub async fn get_or_create_application_authentication(
        &self,
        client_id: &str,
        client_secret: &str,
        authorization: &NewAuthorization,
        code: Option<&str>,
    ) -> Result<Authorization> {
        validate::not_empty(client_id, "clientId")?;
        validate::not_empty(client_secret, "clientSecret")?;
        validate::required(authorization.note.as_deref(), "note")?;

        let path = format!("authorizations/clients/{}", segment(client_id));
        let body = ClientAuthorization {
            client_secret,
            authorization,
        };
        debug!(client_id, "Getting or creating application authorization");
        self.api.put(&path, Some(&body), code).await
    }

    /// [`get_or_create_application_authentication`](Self::get_or_create_application_authentication),
    /// answering two-factor challenges through `handler`
    pub async fn get_or_create_application_authentication_with_two_factor<F, Fut>(
        &self,
        client_id: &str,
        client_secret: &str,
        authorization: &NewAuthorization,
        handler: F,
    ) -> Result<Authorization>
    where
        F: FnMut(TwoFactorType) -> Fut,
        Fut: Future<Output = Result<TwoFactorChallengeResult>>,
    {
        validate::not_empty(client_id, "clientId")?;
        validate::not_empty(client_secret, "clientSecret")?;
        validate::required(authorization.note.as_deref(), "note")?;

        with_two_factor(
            move |code: Option<String>| async move {
                self.get_or_create_application_authentication(
                    client_id,
                    client_secret,
                    authorization,
                    code.as_deref(),
                )
                .await
            },
            handler,
        )
        .await
    }

    pub async fn update(&self, id: i64, update: &AuthorizationUpdate) -> Result<Authorization> {
        self.api
            .patch(&format!("authorizations/{}", id), update)
            .await
    }

    pub async fn delete(&self, id: i64, code: Option<&str>) -> Result<()> {
        self.api
            .delete_with_otp(&format!("authorizations/{}", id), code)
            .await
    }

    /// Look up an OAuth token issued to the application
    pub async fn check_application_authentication(
        &self,
        client_id: &str,
        access_token: &str,
    ) -> Result<Authorization> {
        let path = token_path(client_id, access_token)?;
        self.api
            .post(&path, Some(&AccessToken { access_token }))
            .await
    }

    /// Replace an OAuth token with a new one
    pub async fn reset_application_authentication(
        &self,
        client_id: &str,
        access_token: &str,
    ) -> Result<Authorization> {
        let path = token_path(client_id, access_token)?;
        self.api.patch(&path, &AccessToken { access_token }).await
    }

    pub async fn revoke_application_authentication(
        &self,
        client_id: &str,
        access_token: &str,
    ) -> Result<()> {
        let path = token_path(client_id, access_token)?;
        self.api
            .delete_with_body(&path, &AccessToken { access_token })
            .await
    }
}

fn token_path(client_id: &str, access_token: &str) -> Result<String> {
    validate::not_empty(client_id, "clientId")?;
    validate::not_empty(access_token, "accessToken")?;
    Ok(format!("applications/{}/token", segment(client_id)))
}

/// Run `operation`, consulting `handler` whenever a second factor is needed
///
/// `operation` receives `None` for the plain attempt and for resend
/// requests, and `Some(code)` for the single attempt with a code.
async fn with_two_factor<T, Op, OpFut, F, Fut>(mut operation: Op, mut handler: F) -> Result<T>
where
    Op: FnMut(Option<String>) -> OpFut,
    OpFut: Future<Output = Result<T>>,
    F: FnMut(TwoFactorType) -> Fut,
    Fut: Future<Output = Result<TwoFactorChallengeResult>>,
{
    let mut challenge = match operation(None).await {
        Err(Error::TwoFactorRequired(kind)) => kind,
        other => return other,
    };

    loop {
        debug!(kind = %challenge, "Two-factor code required");
        match handler(challenge).await? {
            TwoFactorChallengeResult::RequestResendCode => match operation(None).await {
                Err(Error::TwoFactorRequired(kind)) => challenge = kind,
                other => return other,
            },
            TwoFactorChallengeResult::Code(code) => {
                return match operation(Some(code.clone())).await {
                    Ok(value) => {
                        info!("Two-factor challenge completed");
                        Ok(value)
                    }
                    Err(Error::TwoFactorRequired(_)) => {
                        Err(Error::TwoFactorChallengeFailed { code })
                    }
                    Err(err) if err.status() == Some(401) => {
                        Err(Error::TwoFactorChallengeFailed { code })
                    }
                    Err(err) => Err(err),
                };
            }
        }
    }
}
