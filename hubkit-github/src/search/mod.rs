//! GitHub search API
//!
//! Every search request folds its qualifier fields into the single `q`
//! parameter: the free-text term first, then one `name:value` per populated
//! qualifier in field order, all joined with `+`. Values are not escaped
//! here; the request also carries the terms themselves so the transport
//! can form-encode each one.

mod code;
mod issues;
mod language;
mod range;
mod repositories;
mod users;

pub use code::{CodeInQualifier, CodeSearchSort, SearchCode, SearchCodeRequest};
pub use issues::{
    Issue, IssueInQualifier, IssueIsQualifier, IssueNoMetadataQualifier, IssueSearchSort,
    IssueTypeQualifier, ItemState, SearchIssuesRequest,
};
pub use language::Language;
pub use range::{DateRange, Range};
pub use repositories::{ForkQualifier, RepoInQualifier, RepoSearchSort, SearchRepositoriesRequest};
pub use users::{AccountSearchType, SearchUsersRequest, UserInQualifier, UsersSearchSort};

use hubkit_core::{Parameters, Request};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::{Repository, SortDirection, User};
use crate::{ApiConnection, Error, Result};

/// A page of search hits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<T>,
}

/// Paging shared by every search request
///
/// Unlike list endpoints, search always sends `page` and `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPaging {
    pub page: u32,
    pub per_page: u32,
    /// Only sent together with a sort field
    pub order: SortDirection,
}

impl Default for SearchPaging {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 100,
            order: SortDirection::Desc,
        }
    }
}

/// Shared behavior of the search request types
pub trait SearchRequest {
    /// Free-text part of the query; may be empty
    fn term(&self) -> &str;

    /// Rendered `name:value` qualifiers in field order
    ///
    /// Fails on malformed repository identifiers.
    fn qualifiers(&self) -> Result<Vec<String>>;

    /// Wire value of the sort field, if one is set
    fn sort(&self) -> Option<&'static str>;

    fn paging(&self) -> &SearchPaging;

    /// The free-text term, if any, followed by every qualifier
    fn terms(&self) -> Result<Vec<String>> {
        let term = self.term();
        let mut terms = Vec::new();
        if !term.is_empty() {
            terms.push(term.to_string());
        }
        terms.extend(self.qualifiers()?);
        Ok(terms)
    }

    /// The `q` parameter
    fn query(&self) -> Result<String> {
        Ok(self.terms()?.join("+"))
    }

    /// All query parameters for the request
    fn to_parameters(&self) -> Result<Parameters> {
        let query = self.query()?;
        if query.is_empty() {
            return Err(Error::EmptyArgument("term"));
        }

        let paging = self.paging();
        let mut parameters = Parameters::new();
        parameters.insert("q".to_string(), query);
        parameters.insert("page".to_string(), paging.page.to_string());
        parameters.insert("per_page".to_string(), paging.per_page.to_string());

        if let Some(sort) = self.sort() {
            parameters.insert("sort".to_string(), sort.to_string());
            parameters.insert("order".to_string(), paging.order.as_str().to_string());
        }

        Ok(parameters)
    }
}

/// Push `name:value` when the value is present
pub(crate) fn push_qualifier<V: ToString>(qualifiers: &mut Vec<String>, name: &str, value: Option<V>) {
    if let Some(value) = value {
        qualifiers.push(format!("{}:{}", name, value.to_string()));
    }
}

/// Push `name:a,b,c` when the list is non-empty
pub(crate) fn push_list<V: AsRef<str>>(qualifiers: &mut Vec<String>, name: &str, values: &[V]) {
    if !values.is_empty() {
        let joined = values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        qualifiers.push(format!("{}:{}", name, joined));
    }
}

/// Push one `repo:owner/name` per repository, rejecting malformed names
pub(crate) fn push_repos(qualifiers: &mut Vec<String>, repos: &[String]) -> Result<()> {
    for repo in repos {
        crate::repo::ensure_full_name(repo)?;
        qualifiers.push(format!("repo:{}", repo));
    }
    Ok(())
}

/// Client for the `/search` endpoints
#[derive(Debug, Clone)]
pub struct SearchClient {
    api: ApiConnection,
}

impl SearchClient {
    pub fn new(api: ApiConnection) -> Self {
        Self { api }
    }

    pub async fn search_users(&self, request: &SearchUsersRequest) -> Result<SearchResults<User>> {
        self.search("search/users", request).await
    }

    pub async fn search_repositories(
        &self,
        request: &SearchRepositoriesRequest,
    ) -> Result<SearchResults<Repository>> {
        self.search("search/repositories", request).await
    }

    pub async fn search_issues(&self, request: &SearchIssuesRequest) -> Result<SearchResults<Issue>> {
        self.search("search/issues", request).await
    }

    pub async fn search_code(&self, request: &SearchCodeRequest) -> Result<SearchResults<SearchCode>> {
        self.search("search/code", request).await
    }

    async fn search<T, R>(&self, path: &str, request: &R) -> Result<SearchResults<T>>
    where
        T: DeserializeOwned,
        R: SearchRequest,
    {
        let parameters = request.to_parameters()?;
        debug!(path, q = %parameters["q"], "Searching");

        let request = Request::get(path)
            .with_query(parameters)
            .with_search_terms(request.terms()?);
        let results: SearchResults<T> = self.api.fetch(request).await?;

        info!(
            path,
            total = results.total_count,
            count = results.items.len(),
            "Search completed"
        );
        Ok(results)
    }
}
