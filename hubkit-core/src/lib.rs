//! Hubkit Core - transport and configuration for the hubkit GitHub client
//!
//! This crate owns everything below the API surface: the [`Connection`]
//! seam and its reqwest-backed implementation, pagination options,
//! configuration and secrets loading.

pub mod config;
pub mod connection;
pub mod error;
pub mod http;
pub mod pagination;
pub mod secrets;

pub use config::{ApiConfig, Config};
pub use connection::{Connection, Credentials, Method, Parameters, Request, Response};
pub use error::{Error, Result};
pub use http::HttpConnection;
pub use pagination::{parse_link_header, ApiOptions, LinkPagination};
pub use secrets::{GitHubSecrets, Secrets};
