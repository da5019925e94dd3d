//! GitHub Actions workflow runs

use chrono::{DateTime, Utc};
use hubkit_core::{ApiOptions, Parameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Repository, User};
use crate::repo::segment;
use crate::search::DateRange;
use crate::{ApiConnection, RepoAddress, Result};

/// Status or conclusion filter for listing runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatusFilter {
    Requested,
    Queued,
    InProgress,
    Completed,
    Waiting,
    Pending,
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Skipped,
    Stale,
    Success,
    TimedOut,
}

impl CheckRunStatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Pending => "pending",
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Skipped => "skipped",
            Self::Stale => "stale",
            Self::Success => "success",
            Self::TimedOut => "timed_out",
        }
    }
}

impl std::str::FromStr for CheckRunStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        const ALL: [CheckRunStatusFilter; 14] = [
            CheckRunStatusFilter::Requested,
            CheckRunStatusFilter::Queued,
            CheckRunStatusFilter::InProgress,
            CheckRunStatusFilter::Completed,
            CheckRunStatusFilter::Waiting,
            CheckRunStatusFilter::Pending,
            CheckRunStatusFilter::ActionRequired,
            CheckRunStatusFilter::Cancelled,
            CheckRunStatusFilter::Failure,
            CheckRunStatusFilter::Neutral,
            CheckRunStatusFilter::Skipped,
            CheckRunStatusFilter::Stale,
            CheckRunStatusFilter::Success,
            CheckRunStatusFilter::TimedOut,
        ];
        ALL.into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown run status: {}", s))
    }
}

/// Filters for listing workflow runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowRunsRequest {
    /// Login of the user who triggered the run
    pub actor: Option<String>,
    pub branch: Option<String>,
    /// Triggering event, e.g. `push`
    pub event: Option<String>,
    pub status: Option<CheckRunStatusFilter>,
    pub created: Option<DateRange>,
    pub exclude_pull_requests: Option<bool>,
    pub check_suite_id: Option<i64>,
    pub head_sha: Option<String>,
}

impl WorkflowRunsRequest {
    /// Query parameters for the populated fields
    pub fn to_parameters(&self) -> Parameters {
        let mut parameters = Parameters::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                parameters.insert(key.to_string(), value);
            }
        };

        put("actor", self.actor.clone());
        put("branch", self.branch.clone());
        put("event", self.event.clone());
        put("status", self.status.map(|s| s.as_str().to_string()));
        put("created", self.created.as_ref().map(|c| c.to_string()));
        put(
            "exclude_pull_requests",
            self.exclude_pull_requests.map(|b| b.to_string()),
        );
        put("check_suite_id", self.check_suite_id.map(|id| id.to_string()));
        put("head_sha", self.head_sha.clone());

        parameters
    }
}

/// A single workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub head_branch: Option<String>,
    pub head_sha: String,
    pub run_number: i64,
    #[serde(default)]
    pub run_attempt: Option<i64>,
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    pub workflow_id: i64,
    #[serde(default)]
    pub check_suite_id: Option<i64>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub actor: Option<User>,
    #[serde(default)]
    pub repository: Option<Repository>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One page (or the merge of several) of workflow runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunsResponse {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

impl WorkflowRunsResponse {
    fn merge(pages: Vec<WorkflowRunsResponse>) -> Self {
        let total_count = pages.iter().map(|p| p.total_count).max().unwrap_or(0);
        let workflow_runs = pages.into_iter().flat_map(|p| p.workflow_runs).collect();
        Self {
            total_count,
            workflow_runs,
        }
    }
}

/// A past review of a run waiting on an environment protection rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentApprovals {
    pub state: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Billable time of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowRunUsage {
    #[serde(default)]
    pub run_duration_ms: Option<u64>,
    #[serde(default)]
    pub billable: serde_json::Map<String, serde_json::Value>,
}

/// Client for `/actions/runs` endpoints
#[derive(Debug, Clone)]
pub struct WorkflowRunsClient {
    api: ApiConnection,
}

impl WorkflowRunsClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// List runs in a repository
    pub async fn list(
        &self,
        repo: impl Into<RepoAddress>,
        request: &WorkflowRunsRequest,
        options: &ApiOptions,
    ) -> Result<WorkflowRunsResponse> {
        let path = repo.into().join("actions/runs")?;
        self.list_at(&path, request, options).await
    }

    /// List runs of one workflow, by id or file name
    pub async fn list_by_workflow(
        &self,
        repo: impl Into<RepoAddress>,
        workflow: &str,
        request: &WorkflowRunsRequest,
        options: &ApiOptions,
    ) -> Result<WorkflowRunsResponse> {
        crate::validate::not_empty(workflow, "workflow")?;
        let path = repo
            .into()
            .join(&format!("actions/workflows/{}/runs", segment(workflow)))?;
        self.list_at(&path, request, options).await
    }

    async fn list_at(
        &self,
        path: &str,
        request: &WorkflowRunsRequest,
        options: &ApiOptions,
    ) -> Result<WorkflowRunsResponse> {
        debug!(path, ?request, "Listing workflow runs");

        let pages = self
            .api
            .get_pages(path, &request.to_parameters(), options)
            .await?;
        let runs = WorkflowRunsResponse::merge(pages);

        info!(count = runs.workflow_runs.len(), total = runs.total_count, "Fetched workflow runs");
        Ok(runs)
    }

    /// Get a single run
    pub async fn get(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<WorkflowRun> {
        let path = run_path(repo, run_id, "")?;
        self.api.get(&path, &Parameters::new()).await
    }

    /// Delete a run
    pub async fn delete(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api.delete(&run_path(repo, run_id, "")?).await
    }

    /// Reviews of a run waiting on environment protection rules
    pub async fn get_review_history(
        &self,
        repo: impl Into<RepoAddress>,
        run_id: i64,
    ) -> Result<Vec<EnvironmentApprovals>> {
        let path = run_path(repo, run_id, "approvals")?;
        self.api.get(&path, &Parameters::new()).await
    }

    /// Approve a run from a first-time contributor's fork
    pub async fn approve(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api.post_empty(&run_path(repo, run_id, "approve")?).await
    }

    pub async fn cancel(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api.post_empty(&run_path(repo, run_id, "cancel")?).await
    }

    pub async fn rerun(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api.post_empty(&run_path(repo, run_id, "rerun")?).await
    }

    pub async fn rerun_failed_jobs(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api
            .post_empty(&run_path(repo, run_id, "rerun-failed-jobs")?)
            .await
    }

    /// Download the log archive (a zip file) of a run
    pub async fn get_logs(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<Vec<u8>> {
        let path = run_path(repo, run_id, "logs")?;
        let bytes = self.api.get_raw(&path, &Parameters::new(), None).await?;
        debug!(run_id, bytes = bytes.len(), "Downloaded run logs");
        Ok(bytes)
    }

    pub async fn delete_logs(&self, repo: impl Into<RepoAddress>, run_id: i64) -> Result<()> {
        self.api.delete(&run_path(repo, run_id, "logs")?).await
    }

    /// Billable time of a run
    pub async fn get_usage(
        &self,
        repo: impl Into<RepoAddress>,
        run_id: i64,
    ) -> Result<WorkflowRunUsage> {
        let path = run_path(repo, run_id, "timing")?;
        self.api.get(&path, &Parameters::new()).await
    }
}

fn run_path(repo: impl Into<RepoAddress>, run_id: i64, action: &str) -> Result<String> {
    let tail = if action.is_empty() {
        format!("actions/runs/{}", run_id)
    } else {
        format!("actions/runs/{}/{}", run_id, action)
    };
    repo.into().join(&tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use crate::Error;
    use chrono::{FixedOffset, TimeZone};
    use hubkit_core::{Method, Response};

    const REPO_ID: i64 = 1;

    fn run_json(id: i64) -> String {
        format!(
            r#"{{"id": {id}, "head_sha": "abc", "run_number": 1, "event": "push",
                "workflow_id": 9, "status": "completed", "conclusion": "success",
                "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:05:00Z"}}"#
        )
    }

    #[tokio::test]
    async fn test_approve() {
        let fake = FakeConnection::new();
        fake.respond(Method::Post, "repos/fake/repo/actions/runs/123/approve", 201, "");
        fake.respond(Method::Post, "repositories/1/actions/runs/123/approve", 201, "");

        let runs = fake.client().actions();
        runs.approve(("fake", "repo"), 123).await.unwrap();
        runs.approve(REPO_ID, 123).await.unwrap();

        let requests = fake.requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "repos/fake/repo/actions/runs/123/approve");
        assert_eq!(requests[1].path, "repositories/1/actions/runs/123/approve");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_list_with_request() {
        let fake = FakeConnection::new();
        let body = format!(r#"{{"total_count": 1, "workflow_runs": [{}]}}"#, run_json(5));
        fake.respond(Method::Get, "repos/fake/repo/actions/runs", 200, &body);
        fake.respond(Method::Get, "repositories/1/actions/runs", 200, &body);

        let request = WorkflowRunsRequest {
            branch: Some("main".to_string()),
            check_suite_id: Some(42),
            status: Some(CheckRunStatusFilter::InProgress),
            ..Default::default()
        };

        let runs = fake.client().actions();
        let response = runs
            .list(("fake", "repo"), &request, &ApiOptions::default())
            .await
            .unwrap();
        runs.list(REPO_ID, &request, &ApiOptions::default())
            .await
            .unwrap();

        assert_eq!(response.total_count, 1);
        assert_eq!(response.workflow_runs[0].id, 5);

        let mut expected = Parameters::new();
        expected.insert("branch".to_string(), "main".to_string());
        expected.insert("check_suite_id".to_string(), "42".to_string());
        expected.insert("status".to_string(), "in_progress".to_string());

        let requests = fake.requests();
        assert_eq!(requests[0].path, "repos/fake/repo/actions/runs");
        assert_eq!(requests[0].query, expected);
        assert_eq!(requests[1].path, "repositories/1/actions/runs");
        assert_eq!(requests[1].query, expected);
    }

    #[tokio::test]
    async fn test_list_merges_pages() {
        let fake = FakeConnection::new();
        fake.respond_with(
            Method::Get,
            "repos/fake/repo/actions/runs",
            Response::new(
                200,
                format!(r#"{{"total_count": 2, "workflow_runs": [{}]}}"#, run_json(1)),
            )
            .with_header(
                "link",
                "<https://api.github.com/repos/fake/repo/actions/runs?page=2>; rel=\"next\"",
            ),
        );
        fake.respond(
            Method::Get,
            "repos/fake/repo/actions/runs",
            200,
            &format!(r#"{{"total_count": 2, "workflow_runs": [{}]}}"#, run_json(2)),
        );

        let response = fake
            .client()
            .actions()
            .list(("fake", "repo"), &WorkflowRunsRequest::default(), &ApiOptions::default())
            .await
            .unwrap();

        assert_eq!(response.total_count, 2);
        let ids: Vec<i64> = response.workflow_runs.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_request_parameters_omit_unset_fields() {
        assert!(WorkflowRunsRequest::default().to_parameters().is_empty());

        let utc = FixedOffset::east_opt(0).unwrap();
        let request = WorkflowRunsRequest {
            actor: Some("octocat".to_string()),
            event: Some("push".to_string()),
            exclude_pull_requests: Some(false),
            head_sha: Some("abc".to_string()),
            created: Some(DateRange::GreaterThan(
                utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            )),
            ..Default::default()
        };
        let parameters = request.to_parameters();

        assert_eq!(parameters.len(), 5);
        assert_eq!(parameters["actor"], "octocat");
        assert_eq!(parameters["event"], "push");
        assert_eq!(parameters["exclude_pull_requests"], "false");
        assert_eq!(parameters["head_sha"], "abc");
        assert_eq!(parameters["created"], ">2024-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_run_actions_paths() {
        let fake = FakeConnection::new();
        let runs = fake.client().actions();

        for action in ["cancel", "rerun", "rerun-failed-jobs"] {
            fake.respond(
                Method::Post,
                &format!("repos/fake/repo/actions/runs/7/{}", action),
                201,
                "",
            );
            fake.respond(
                Method::Post,
                &format!("repositories/1/actions/runs/7/{}", action),
                201,
                "",
            );
        }

        runs.cancel(("fake", "repo"), 7).await.unwrap();
        runs.cancel(REPO_ID, 7).await.unwrap();
        runs.rerun(("fake", "repo"), 7).await.unwrap();
        runs.rerun(REPO_ID, 7).await.unwrap();
        runs.rerun_failed_jobs(("fake", "repo"), 7).await.unwrap();
        runs.rerun_failed_jobs(REPO_ID, 7).await.unwrap();

        let paths: Vec<String> = fake.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![
                "repos/fake/repo/actions/runs/7/cancel",
                "repositories/1/actions/runs/7/cancel",
                "repos/fake/repo/actions/runs/7/rerun",
                "repositories/1/actions/runs/7/rerun",
                "repos/fake/repo/actions/runs/7/rerun-failed-jobs",
                "repositories/1/actions/runs/7/rerun-failed-jobs",
            ]
        );
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let fake = FakeConnection::new();
        fake.respond(Method::Get, "repos/fake/repo/actions/runs/5", 200, &run_json(5));
        fake.respond(Method::Get, "repositories/1/actions/runs/5", 200, &run_json(5));
        fake.respond(Method::Delete, "repos/fake/repo/actions/runs/5", 204, "");
        fake.respond(Method::Delete, "repositories/1/actions/runs/5", 204, "");

        let runs = fake.client().actions();
        assert_eq!(runs.get(("fake", "repo"), 5).await.unwrap().id, 5);
        assert_eq!(runs.get(REPO_ID, 5).await.unwrap().conclusion.as_deref(), Some("success"));
        runs.delete(("fake", "repo"), 5).await.unwrap();
        runs.delete(REPO_ID, 5).await.unwrap();

        assert_eq!(fake.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_get_logs_returns_bytes() {
        let fake = FakeConnection::new();
        fake.respond_with(
            Method::Get,
            "repos/fake/repo/actions/runs/5/logs",
            Response::new(200, vec![0x50, 0x4b, 0x03, 0x04]),
        );
        fake.respond(Method::Delete, "repositories/1/actions/runs/5/logs", 204, "");

        let runs = fake.client().actions();
        let bytes = runs.get_logs(("fake", "repo"), 5).await.unwrap();
        assert_eq!(bytes, vec![0x50, 0x4b, 0x03, 0x04]);

        runs.delete_logs(REPO_ID, 5).await.unwrap();
        assert_eq!(fake.last_request().method, Method::Delete);
    }

    #[tokio::test]
    async fn test_review_history_and_usage() {
        let fake = FakeConnection::new();
        fake.respond(
            Method::Get,
            "repos/fake/repo/actions/runs/5/approvals",
            200,
            r#"[{"state": "approved", "comment": "ship it", "user": {"id": 1, "login": "octocat"}}]"#,
        );
        fake.respond(
            Method::Get,
            "repositories/1/actions/runs/5/timing",
            200,
            r#"{"run_duration_ms": 5000, "billable": {"UBUNTU": {"total_ms": 5000}}}"#,
        );

        let runs = fake.client().actions();
        let reviews = runs.get_review_history(("fake", "repo"), 5).await.unwrap();
        assert_eq!(reviews[0].state, "approved");

        let usage = runs.get_usage(REPO_ID, 5).await.unwrap();
        assert_eq!(usage.run_duration_ms, Some(5000));
        assert!(usage.billable.contains_key("UBUNTU"));
    }

    #[tokio::test]
    async fn test_list_by_workflow() {
        let fake = FakeConnection::new();
        let body = r#"{"total_count": 0, "workflow_runs": []}"#;
        fake.respond(Method::Get, "repos/fake/repo/actions/workflows/ci.yml/runs", 200, body);
        fake.respond(Method::Get, "repositories/1/actions/workflows/ci.yml/runs", 200, body);

        let runs = fake.client().actions();
        let request = WorkflowRunsRequest::default();
        let options = ApiOptions::new().page_size(10);
        runs.list_by_workflow(("fake", "repo"), "ci.yml", &request, &options)
            .await
            .unwrap();
        runs.list_by_workflow(REPO_ID, "ci.yml", &request, &options)
            .await
            .unwrap();

        assert_eq!(
            fake.last_request().query.get("per_page").map(String::as_str),
            Some("10")
        );
    }

    #[tokio::test]
    async fn test_empty_arguments_fail_before_request() {
        let fake = FakeConnection::new();
        let runs = fake.client().actions();

        let err = runs.approve(("", "repo"), 1).await.unwrap_err();
        assert!(matches!(err, Error::EmptyArgument("owner")));

        let err = runs.get(("fake", ""), 1).await.unwrap_err();
        assert!(matches!(err, Error::EmptyArgument("name")));

        let err = runs
            .list_by_workflow(
                ("fake", "repo"),
                "",
                &WorkflowRunsRequest::default(),
                &ApiOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyArgument("workflow")));

        assert!(fake.requests().is_empty());
    }

    #[test]
    fn test_status_filter_from_str() {
        assert_eq!(
            "in_progress".parse::<CheckRunStatusFilter>().unwrap(),
            CheckRunStatusFilter::InProgress
        );
        assert!("running".parse::<CheckRunStatusFilter>().is_err());
    }
}
