//! Hubkit GitHub - typed clients for the GitHub REST API
//!
//! [`GitHubClient`] hands out one client per resource family. Every client
//! validates its arguments before building a request, turns query objects
//! into parameters, and maps response statuses to typed results.

mod authorizations;
mod client;
mod commits;
mod connection;
mod error;
mod followers;
mod labels;
mod members;
pub mod models;
mod repo;
mod runs;
pub mod search;
mod starring;
mod status;
#[cfg(test)]
mod testing;
pub mod validate;
mod watching;

pub use authorizations::{
    Authorization, AuthorizationApp, AuthorizationUpdate, AuthorizationsClient, NewAuthorization,
    TwoFactorChallengeResult,
};
pub use client::GitHubClient;
pub use commits::{
    CommitDetails, CommitFile, CommitParent, CommitRequest, CommitStats, CompareResult,
    GitHubCommit, RepositoryCommitsClient, Signature,
};
pub use connection::ApiConnection;
pub use error::{Error, Result, TwoFactorType};
pub use followers::FollowersClient;
pub use hubkit_core::ApiOptions;
pub use labels::{IssuesLabelsClient, Label, LabelUpdate, NewLabel};
pub use members::{MembersFilter, MembersRole, OrganizationMembersClient, OrganizationMembersFilter};
pub use repo::RepoAddress;
pub use runs::{
    CheckRunStatusFilter, EnvironmentApprovals, WorkflowRun, WorkflowRunUsage, WorkflowRunsClient,
    WorkflowRunsRequest, WorkflowRunsResponse,
};
pub use search::{SearchClient, SearchResults};
pub use starring::{StarredClient, StarredRequest, StarredSort};
pub use status::{membership_to_bool, no_content_to_bool, OTP_HEADER};
pub use watching::{NewSubscription, Subscription, WatchedClient};
