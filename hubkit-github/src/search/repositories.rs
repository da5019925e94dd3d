//! Repository search request

use super::{push_list, push_qualifier, DateRange, Language, Range, SearchPaging, SearchRequest};
use crate::Result;

/// Fields the term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoInQualifier {
    Name,
    Description,
    Readme,
}

impl AsRef<str> for RepoInQualifier {
    fn as_ref(&self) -> &str {
        match self {
            RepoInQualifier::Name => "name",
            RepoInQualifier::Description => "description",
            RepoInQualifier::Readme => "readme",
        }
    }
}

/// Whether forks take part in the results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkQualifier {
    IncludeForks,
    OnlyForks,
}

impl ForkQualifier {
    pub fn as_str(self) -> &'static str {
        match self {
            ForkQualifier::IncludeForks => "true",
            ForkQualifier::OnlyForks => "only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoSearchSort {
    Stars,
    Forks,
    HelpWantedIssues,
    Updated,
}

impl RepoSearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            RepoSearchSort::Stars => "stars",
            RepoSearchSort::Forks => "forks",
            RepoSearchSort::HelpWantedIssues => "help-wanted-issues",
            RepoSearchSort::Updated => "updated",
        }
    }
}

/// Search for repositories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRepositoriesRequest {
    pub term: String,
    /// `in:`
    pub in_fields: Vec<RepoInQualifier>,
    /// `size:` in kilobytes
    pub size: Option<Range>,
    /// `forks:` fork count
    pub forks: Option<Range>,
    /// `fork:`
    pub fork: Option<ForkQualifier>,
    /// `stars:`
    pub stars: Option<Range>,
    /// `language:`
    pub language: Option<Language>,
    /// `user:`
    pub user: Option<String>,
    /// `org:`
    pub org: Option<String>,
    /// `topic:`
    pub topic: Option<String>,
    /// `created:`
    pub created: Option<DateRange>,
    /// `pushed:`
    pub pushed: Option<DateRange>,
    /// `archived:`
    pub archived: Option<bool>,
    pub sort: Option<RepoSearchSort>,
    pub paging: SearchPaging,
}

impl SearchRepositoriesRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

impl SearchRequest for SearchRepositoriesRequest {
    fn term(&self) -> &str {
        &self.term
    }

    fn qualifiers(&self) -> Result<Vec<String>> {
        let mut q = Vec::new();
        push_list(&mut q, "in", &self.in_fields);
        push_qualifier(&mut q, "size", self.size);
        push_qualifier(&mut q, "forks", self.forks);
        push_qualifier(&mut q, "fork", self.fork.map(ForkQualifier::as_str));
        push_qualifier(&mut q, "stars", self.stars);
        push_qualifier(&mut q, "language", self.language.as_ref().map(Language::qualifier_value));
        push_qualifier(&mut q, "user", self.user.as_deref());
        push_qualifier(&mut q, "org", self.org.as_deref());
        push_qualifier(&mut q, "topic", self.topic.as_deref());
        push_qualifier(&mut q, "created", self.created);
        push_qualifier(&mut q, "pushed", self.pushed);
        push_qualifier(&mut q, "archived", self.archived);
        Ok(q)
    }

    fn sort(&self) -> Option<&'static str> {
        self.sort.map(RepoSearchSort::as_str)
    }

    fn paging(&self) -> &SearchPaging {
        &self.paging
    }
}
