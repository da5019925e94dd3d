//! User search request

use super::{push_list, push_qualifier, DateRange, Language, Range, SearchPaging, SearchRequest};
use crate::Result;

/// Restricts results to users or organizations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSearchType {
    User,
    Org,
}

impl AccountSearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountSearchType::User => "user",
            AccountSearchType::Org => "org",
        }
    }
}

/// Fields the term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInQualifier {
    Username,
    Email,
    Fullname,
}

impl AsRef<str> for UserInQualifier {
    fn as_ref(&self) -> &str {
        match self {
            UserInQualifier::Username => "Username",
            UserInQualifier::Email => "Email",
            UserInQualifier::Fullname => "Fullname",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersSearchSort {
    Followers,
    Repositories,
    Joined,
}

impl UsersSearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            UsersSearchSort::Followers => "followers",
            UsersSearchSort::Repositories => "repositories",
            UsersSearchSort::Joined => "joined",
        }
    }
}

/// Search for users, e.g. `github+repos:>5`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchUsersRequest {
    pub term: String,
    /// `type:`
    pub account_type: Option<AccountSearchType>,
    /// `in:`
    pub in_fields: Vec<UserInQualifier>,
    /// `repos:` number of public repositories
    pub repositories: Option<Range>,
    /// `location:`
    pub location: Option<String>,
    /// `language:`
    pub language: Option<Language>,
    /// `created:`
    pub created: Option<DateRange>,
    /// `followers:`
    pub followers: Option<Range>,
    pub sort: Option<UsersSearchSort>,
    pub paging: SearchPaging,
}

impl SearchUsersRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

impl SearchRequest for SearchUsersRequest {
    fn term(&self) -> &str {
        &self.term
    }

    fn qualifiers(&self) -> Result<Vec<String>> {
        let mut q = Vec::new();
        push_qualifier(&mut q, "type", self.account_type.map(AccountSearchType::as_str));
        push_list(&mut q, "in", &self.in_fields);
        push_qualifier(&mut q, "repos", self.repositories);
        push_qualifier(&mut q, "location", self.location.as_deref());
        push_qualifier(&mut q, "language", self.language.as_ref().map(Language::qualifier_value));
        push_qualifier(&mut q, "created", self.created);
        push_qualifier(&mut q, "followers", self.followers);
        Ok(q)
    }

    fn sort(&self) -> Option<&'static str> {
        self.sort.map(UsersSearchSort::as_str)
    }

    fn paging(&self) -> &SearchPaging {
        &self.paging
    }
}
