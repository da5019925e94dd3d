//! Issue labels

use hubkit_core::{ApiOptions, Parameters};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::repo::segment;
use crate::{validate, ApiConnection, RepoAddress, Result};

/// A label as defined on a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Hex color without the leading `#`
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default: bool,
}

/// Body for creating a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLabel {
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewLabel {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            description: None,
        }
    }
}

/// Body for updating a label; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelUpdate {
    #[serde(rename = "new_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Serialize)]
struct LabelNames<'a> {
    labels: &'a [&'a str],
}

/// Client for repository and issue labels
#[derive(Debug, Clone)]
pub struct IssuesLabelsClient {
    api: ApiConnection,
}

impl IssuesLabelsClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    /// Get a label by name
    pub async fn get(&self, repo: impl Into<RepoAddress>, name: &str) -> Result<Label> {
        validate::not_empty(name, "labelName")?;
        let path = repo.into().join(&format!("labels/{}", segment(name)))?;
        self.api.get(&path, &Parameters::new()).await
    }

    /// Every label defined on a repository
    pub async fn get_all_for_repository(
        &self,
        repo: impl Into<RepoAddress>,
        options: &ApiOptions,
    ) -> Result<Vec<Label>> {
        let path = repo.into().join("labels")?;
        let labels: Vec<Label> = self.api.get_all(&path, &Parameters::new(), options).await?;
        info!(count = labels.len(), "Fetched repository labels");
        Ok(labels)
    }

    /// Labels attached to an issue
    pub async fn get_all_for_issue(
        &self,
        repo: impl Into<RepoAddress>,
        number: u64,
        options: &ApiOptions,
    ) -> Result<Vec<Label>> {
        let path = issue_labels_path(repo, number)?;
        self.api.get_all(&path, &Parameters::new(), options).await
    }

    pub async fn create(&self, repo: impl Into<RepoAddress>, label: &NewLabel) -> Result<Label> {
        validate::not_empty(&label.name, "name")?;
        validate::not_empty(&label.color, "color")?;
        let path = repo.into().join("labels")?;
        debug!(name = %label.name, "Creating label");
        self.api.post(&path, Some(label)).await
    }

    pub async fn update(
        &self,
        repo: impl Into<RepoAddress>,
        name: &str,
        update: &LabelUpdate,
    ) -> Result<Label> {
        validate::not_empty(name, "labelName")?;
        let path = repo.into().join(&format!("labels/{}", segment(name)))?;
        self.api.patch(&path, update).await
    }

    pub async fn delete(&self, repo: impl Into<RepoAddress>, name: &str) -> Result<()> {
        validate::not_empty(name, "labelName")?;
        let path = repo.into().join(&format!("labels/{}", segment(name)))?;
        self.api.delete(&path).await
    }

    /// Add labels to an issue, keeping the ones it already has
    pub async fn add_to_issue(
        &self,
        repo: impl Into<RepoAddress>,
        number: u64,
        labels: &[&str],
    ) -> Result<Vec<Label>> {
        validate::not_empty_list(labels, "labels")?;
        let path = issue_labels_path(repo, number)?;
        self.api.post(&path, Some(&LabelNames { labels })).await
    }

    /// Remove one label from an issue, returning the labels left
    pub async fn remove_from_issue(
        &self,
        repo: impl Into<RepoAddress>,
        number: u64,
        name: &str,
    ) -> Result<Vec<Label>> {
        validate::not_empty(name, "labelName")?;
        let path = repo
            .into()
            .join(&format!("issues/{}/labels/{}", number, segment(name)))?;
        let response = self.api.send(hubkit_core::Request::delete(path)).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Replace every label on an issue
    pub async fn replace_all_for_issue(
        &self,
        repo: impl Into<RepoAddress>,
        number: u64,
        labels: &[&str],
    ) -> Result<Vec<Label>> {
        let path = issue_labels_path(repo, number)?;
        self.api.put(&path, Some(&LabelNames { labels }), None).await
    }

    pub async fn remove_all_from_issue(
        &self,
        repo: impl Into<RepoAddress>,
        number: u64,
    ) -> Result<()> {
        self.api.delete(&issue_labels_path(repo, number)?).await
    }
}

fn issue_labels_path(repo: impl Into<RepoAddress>, number: u64) -> Result<String> {
    repo.into().join(&format!("issues/{}/labels", number))
}
