//! Code search request

use serde::{Deserialize, Serialize};

use super::{push_list, push_qualifier, push_repos, Language, Range, SearchPaging, SearchRequest};
use crate::models::Repository;
use crate::Result;

/// Where in a file the term is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeInQualifier {
    File,
    Path,
}

impl AsRef<str> for CodeInQualifier {
    fn as_ref(&self) -> &str {
        match self {
            CodeInQualifier::File => "file",
            CodeInQualifier::Path => "path",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSearchSort {
    Indexed,
}

impl CodeSearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            CodeSearchSort::Indexed => "indexed",
        }
    }
}

/// Search file contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCodeRequest {
    pub term: String,
    /// `in:`
    pub in_fields: Vec<CodeInQualifier>,
    /// `language:`
    pub language: Option<Language>,
    /// `fork:` whether forks are searched
    pub forks: Option<bool>,
    /// `size:` in bytes
    pub size: Option<Range>,
    /// `path:`
    pub path: Option<String>,
    /// `filename:`
    pub file_name: Option<String>,
    /// `extension:`
    pub extension: Option<String>,
    /// `user:`
    pub user: Option<String>,
    /// `org:`
    pub organization: Option<String>,
    /// One `repo:` per entry, each `owner/name`
    pub repos: Vec<String>,
    pub sort: Option<CodeSearchSort>,
    pub paging: SearchPaging,
}

impl SearchCodeRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

impl SearchRequest for SearchCodeRequest {
    fn term(&self) -> &str {
        &self.term
    }

    fn qualifiers(&self) -> Result<Vec<String>> {
        let mut q = Vec::new();
        push_list(&mut q, "in", &self.in_fields);
        push_qualifier(&mut q, "language", self.language.as_ref().map(Language::qualifier_value));
        push_qualifier(&mut q, "fork", self.forks);
        push_qualifier(&mut q, "size", self.size);
        push_qualifier(&mut q, "path", self.path.as_deref());
        push_qualifier(&mut q, "filename", self.file_name.as_deref());
        push_qualifier(&mut q, "extension", self.extension.as_deref());
        push_qualifier(&mut q, "user", self.user.as_deref());
        push_qualifier(&mut q, "org", self.organization.as_deref());
        push_repos(&mut q, &self.repos)?;
        Ok(q)
    }

    fn sort(&self) -> Option<&'static str> {
        self.sort.map(CodeSearchSort::as_str)
    }

    fn paging(&self) -> &SearchPaging {
        &self.paging
    }
}

/// A file matching a code search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCode {
    pub name: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub repository: Repository,
}
