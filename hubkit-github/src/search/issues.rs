//! Issue and pull request search request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    push_list, push_qualifier, push_repos, DateRange, Language, Range, SearchPaging, SearchRequest,
};
use crate::labels::Label;
use crate::models::User;
use crate::Result;

/// Restricts results to issues or pull requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTypeQualifier {
    Issue,
    PullRequest,
}

impl IssueTypeQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueTypeQualifier::Issue => "issue",
            IssueTypeQualifier::PullRequest => "pr",
        }
    }
}

/// Fields the term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueInQualifier {
    Title,
    Body,
    Comment,
}

impl AsRef<str> for IssueInQualifier {
    fn as_ref(&self) -> &str {
        match self {
            IssueInQualifier::Title => "title",
            IssueInQualifier::Body => "body",
            IssueInQualifier::Comment => "comment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }
}

/// Metadata an issue must lack, e.g. `no:label`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueNoMetadataQualifier {
    Label,
    Milestone,
    Assignee,
    Project,
}

impl IssueNoMetadataQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueNoMetadataQualifier::Label => "label",
            IssueNoMetadataQualifier::Milestone => "milestone",
            IssueNoMetadataQualifier::Assignee => "assignee",
            IssueNoMetadataQualifier::Project => "project",
        }
    }
}

/// `is:` flags; each one becomes its own qualifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueIsQualifier {
    Public,
    Private,
    Merged,
    Unmerged,
    Locked,
    Unlocked,
    Draft,
}

impl IssueIsQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueIsQualifier::Public => "public",
            IssueIsQualifier::Private => "private",
            IssueIsQualifier::Merged => "merged",
            IssueIsQualifier::Unmerged => "unmerged",
            IssueIsQualifier::Locked => "locked",
            IssueIsQualifier::Unlocked => "unlocked",
            IssueIsQualifier::Draft => "draft",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSearchSort {
    Comments,
    Created,
    Updated,
}

impl IssueSearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueSearchSort::Comments => "comments",
            IssueSearchSort::Created => "created",
            IssueSearchSort::Updated => "updated",
        }
    }
}

/// Search for issues and pull requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchIssuesRequest {
    pub term: String,
    /// `type:`
    pub issue_type: Option<IssueTypeQualifier>,
    /// `in:`
    pub in_fields: Vec<IssueInQualifier>,
    /// `author:`
    pub author: Option<String>,
    /// `assignee:`
    pub assignee: Option<String>,
    /// `mentions:`
    pub mentions: Option<String>,
    /// `commenter:`
    pub commenter: Option<String>,
    /// `involves:`
    pub involves: Option<String>,
    /// `state:`
    pub state: Option<ItemState>,
    /// One `label:` per entry
    pub labels: Vec<String>,
    /// `no:`
    pub no: Option<IssueNoMetadataQualifier>,
    /// `language:`
    pub language: Option<Language>,
    /// One `is:` per entry
    pub is: Vec<IssueIsQualifier>,
    /// `created:`
    pub created: Option<DateRange>,
    /// `updated:`
    pub updated: Option<DateRange>,
    /// `merged:`
    pub merged: Option<DateRange>,
    /// `closed:`
    pub closed: Option<DateRange>,
    /// `comments:`
    pub comments: Option<Range>,
    /// `user:`
    pub user: Option<String>,
    /// One `repo:` per entry, each `owner/name`
    pub repos: Vec<String>,
    /// `archived:`
    pub archived: Option<bool>,
    pub sort: Option<IssueSearchSort>,
    pub paging: SearchPaging,
}

impl SearchIssuesRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

impl SearchRequest for SearchIssuesRequest {
    fn term(&self) -> &str {
        &self.term
    }

    fn qualifiers(&self) -> Result<Vec<String>> {
        let mut q = Vec::new();
        push_qualifier(&mut q, "type", self.issue_type.map(IssueTypeQualifier::as_str));
        push_list(&mut q, "in", &self.in_fields);
        push_qualifier(&mut q, "author", self.author.as_deref());
        push_qualifier(&mut q, "assignee", self.assignee.as_deref());
        push_qualifier(&mut q, "mentions", self.mentions.as_deref());
        push_qualifier(&mut q, "commenter", self.commenter.as_deref());
        push_qualifier(&mut q, "involves", self.involves.as_deref());
        push_qualifier(&mut q, "state", self.state.map(ItemState::as_str));
        for label in &self.labels {
            push_qualifier(&mut q, "label", Some(label));
        }
        push_qualifier(&mut q, "no", self.no.map(IssueNoMetadataQualifier::as_str));
        push_qualifier(&mut q, "language", self.language.as_ref().map(Language::qualifier_value));
        for flag in &self.is {
            push_qualifier(&mut q, "is", Some(flag.as_str()));
        }
        push_qualifier(&mut q, "created", self.created);
        push_qualifier(&mut q, "updated", self.updated);
        push_qualifier(&mut q, "merged", self.merged);
        push_qualifier(&mut q, "closed", self.closed);
        push_qualifier(&mut q, "comments", self.comments);
        push_qualifier(&mut q, "user", self.user.as_deref());
        push_repos(&mut q, &self.repos)?;
        push_qualifier(&mut q, "archived", self.archived);
        Ok(q)
    }

    fn sort(&self) -> Option<&'static str> {
        self.sort.map(IssueSearchSort::as_str)
    }

    fn paging(&self) -> &SearchPaging {
        &self.paging
    }
}

/// An issue or pull request as returned by search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comments: u64,
    /// Present when the item is a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}
