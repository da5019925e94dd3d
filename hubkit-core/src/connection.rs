//! The transport seam shared by every API client
//!
//! Clients build a [`Request`] with a path relative to the API root and hand
//! it to a [`Connection`]. The connection owns the base URL, authentication
//! and the wire; it returns whatever status the server answered with, so
//! status interpretation stays with the caller.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// Query parameters, keyed by their wire name
///
/// A `BTreeMap` keeps serialization order stable across calls.
pub type Parameters = BTreeMap<String, String>;

/// HTTP verbs used by the GitHub REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request against a path relative to the API root
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP verb
    pub method: Method,
    /// Relative path such as `repos/octocat/hello/labels`
    pub path: String,
    /// Query string parameters
    pub query: Parameters,
    /// Terms of the search `q` parameter
    ///
    /// When set, the transport sends `q` as these terms joined by `+`, each
    /// form-encoded on its own, so a `+` inside a term arrives as `%2B`.
    pub search_terms: Vec<String>,
    /// Extra headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Value>,
    /// Overrides the default `Accept` media type
    pub accept: Option<String>,
}

impl Request {
    /// Create a request with no query, headers or body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Parameters::new(),
            search_terms: Vec::new(),
            headers: Vec::new(),
            body: None,
            accept: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Replace the query parameters
    pub fn with_query(mut self, query: Parameters) -> Self {
        self.query = query;
        self
    }

    /// Send `q` as separately encoded terms
    pub fn with_search_terms(mut self, terms: Vec<String>) -> Self {
        self.search_terms = terms;
        self
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Request a specific media type
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// First header value matching `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }
}

/// A response as received from the server, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Add a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value matching `name` (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        header_get(&self.headers, name)
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

fn header_get<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// How requests authenticate
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication
    #[default]
    Anonymous,
    /// Personal access or OAuth token
    Token(String),
    /// Login and password
    Basic { login: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Anonymous => f.write_str("Anonymous"),
            Credentials::Token(_) => f.write_str("Token(..)"),
            Credentials::Basic { login, .. } => f
                .debug_struct("Basic")
                .field("login", login)
                .finish_non_exhaustive(),
        }
    }
}

/// Transport boundary for all API traffic
///
/// Implementations return `Ok` for every response the server produced,
/// including 4xx and 5xx; `Err` is reserved for failures to obtain one.
#[async_trait]
pub trait Connection: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response>;
}
