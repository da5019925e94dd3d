//! reqwest-backed [`Connection`]

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::{ApiConfig, Connection, Credentials, Error, Method, Parameters, Request, Response, Result};

/// Media type requested unless a request overrides it
pub const DEFAULT_ACCEPT: &str = "application/vnd.github+json";

/// A real HTTP connection to the API root in [`ApiConfig::base_url`]
#[derive(Clone)]
pub struct HttpConnection {
    client: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl HttpConnection {
    /// Build a connection from configuration and credentials
    pub fn new(config: &ApiConfig, credentials: Credentials) -> Result<Self> {
        // Status interpretation needs to see 3xx, e.g. the membership check
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parse_base_url(&config.base_url)?,
            credentials,
        })
    }

    /// The API root every request path is joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative request path and query into an absolute URL
    pub fn url_for(&self, path: &str, query: &Parameters) -> Result<Url> {
        self.resolve(path, query, &[])
    }

    /// The absolute URL a request is sent to, search terms included
    pub fn url_for_request(&self, request: &Request) -> Result<Url> {
        self.resolve(&request.path, &request.query, &request.search_terms)
    }

    fn resolve(&self, path: &str, query: &Parameters, search_terms: &[String]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Transport(format!("Invalid request path '{}': {}", path, e)))?;

        if !query.is_empty() {
            url.set_query(Some(&encode_query(query, search_terms)));
        }

        Ok(url)
    }
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn send(&self, request: Request) -> Result<Response> {
        let url = self.url_for_request(&request)?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        debug!(method = %request.method, url = %url, "Sending request");

        let accept = request.accept.as_deref().unwrap_or(DEFAULT_ACCEPT);
        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, accept);

        builder = match &self.credentials {
            Credentials::Anonymous => builder,
            Credentials::Token(token) => {
                builder.header(reqwest::header::AUTHORIZATION, format!("token {}", token))
            }
            Credentials::Basic { login, password } => builder.basic_auth(login, Some(password)),
        };

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        } else if matches!(request.method, Method::Put) {
            // PUT without a body must still send Content-Length: 0
            builder = builder.header(reqwest::header::CONTENT_LENGTH, "0");
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
            .to_vec();

        debug!(status, bytes = body.len(), "Received response");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    // Url::join drops the last segment of a base without a trailing slash
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };

    Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))
}

/// Form-encode parameters
///
/// With search terms, `q` is rebuilt from them: each term encoded on its own
/// and joined by a literal `+`, which the server reads as the separator.
fn encode_query(query: &Parameters, search_terms: &[String]) -> String {
    query
        .iter()
        .map(|(key, value)| {
            let encoded = if key == "q" && !search_terms.is_empty() {
                search_terms
                    .iter()
                    .map(|term| encode(term))
                    .collect::<Vec<_>>()
                    .join("+")
            } else {
                encode(value)
            };
            format!("{}={}", encode(key), encoded)
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn connection(base_url: &str) -> HttpConnection {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        HttpConnection::new(&config, Credentials::Anonymous).unwrap()
    }

    #[test]
    fn test_url_for_joins_relative_path() {
        let conn = connection("https://api.github.com/");
        let url = conn
            .url_for("repos/fake/repo/actions/runs", &Parameters::new())
            .unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/repos/fake/repo/actions/runs");
    }

    #[test]
    fn test_base_url_without_trailing_slash_keeps_prefix() {
        let conn = connection("https://ghe.example.com/api/v3");
        let url = conn.url_for("/user/followers", &Parameters::new()).unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/user/followers");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = HttpConnection::new(&config, Credentials::Anonymous).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    fn search_request(terms: &[&str]) -> Request {
        let terms: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
        let mut query = Parameters::new();
        query.insert("q".to_string(), terms.join("+"));
        query.insert("per_page".to_string(), "100".to_string());
        Request::get("search/users")
            .with_query(query)
            .with_search_terms(terms)
    }

    fn decoded_q(url: &Url) -> String {
        url.query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_default()
    }

    #[test]
    fn test_search_terms_keep_plus_separators() {
        let request = search_request(&["github", "language:\"Literate Haskell\""]);
        assert_eq!(
            encode_query(&request.query, &request.search_terms),
            "per_page=100&q=github+language%3A%22Literate+Haskell%22"
        );
    }

    #[test]
    fn test_plus_inside_a_term_is_escaped() {
        let conn = connection("https://api.github.com/");
        let request = search_request(&[
            "github",
            "created:>=2014-01-01T00:00:00+00:00",
            "language:C++",
        ]);

        let url = conn.url_for_request(&request).unwrap();
        assert_eq!(
            url.query(),
            Some(
                "per_page=100&q=github+created%3A%3E%3D2014-01-01T00%3A00%3A00%2B00%3A00\
                 +language%3AC%2B%2B"
            )
        );
        assert_eq!(
            decoded_q(&url),
            "github created:>=2014-01-01T00:00:00+00:00 language:C++"
        );
    }

    #[test]
    fn test_q_without_terms_is_a_plain_parameter() {
        let mut query = Parameters::new();
        query.insert("q".to_string(), "a+b".to_string());
        assert_eq!(encode_query(&query, &[]), "q=a%2Bb");
    }

    #[test]
    fn test_other_parameters_escape_plus() {
        let mut query = Parameters::new();
        query.insert("branch".to_string(), "feature+x".to_string());
        assert_eq!(encode_query(&query, &[]), "branch=feature%2Bx");
    }

    #[test]
    fn test_escaped_path_segments_stay_in_the_path() {
        let conn = connection("https://api.github.com/");
        let url = conn
            .url_for("repos/o/r/labels/needs%3Finfo", &Parameters::new())
            .unwrap();
        assert_eq!(url.path(), "/repos/o/r/labels/needs%3Finfo");
        assert_eq!(url.query(), None);

        let url = conn.url_for("repos/o/r/labels/lang%3AC%23", &Parameters::new()).unwrap();
        assert_eq!(url.path(), "/repos/o/r/labels/lang%3AC%23");
        assert_eq!(url.fragment(), None);
    }

    /// Answer each accepted connection with the next canned response,
    /// recording request lines
    async fn serve(responses: Vec<&'static str>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&seen);
        tokio::spawn(async move {
            for response in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = vec![0u8; 8192];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap();
                    read += n;
                    if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let head = String::from_utf8_lossy(&buf[..read]).into_owned();
                let line = head.lines().next().unwrap_or_default().to_string();
                recorded.lock().unwrap().push(line);
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (base_url, seen)
    }

    #[tokio::test]
    async fn test_redirects_are_returned_not_followed() {
        let (base_url, seen) = serve(vec![
            "HTTP/1.1 302 Found\r\nLocation: /orgs/org/public_members/user\r\n\
             Content-Length: 0\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
        ])
        .await;

        let response = connection(&base_url)
            .send(Request::get("orgs/org/members/user"))
            .await
            .unwrap();

        assert_eq!(response.status, 302);
        assert_eq!(response.header("location"), Some("/orgs/org/public_members/user"));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["GET /orgs/org/members/user HTTP/1.1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_search_terms_on_the_wire() {
        let (base_url, seen) = serve(vec![
            "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        ])
        .await;

        let request = search_request(&["created:>2014-01-01T00:00:00+00:00", "language:C++"]);
        let response = connection(&base_url).send(request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "GET /search/users?per_page=100&q=created%3A%3E2014-01-01T00%3A00%3A00%2B00%3A00\
                 +language%3AC%2B%2B HTTP/1.1"
                    .to_string()
            ]
        );
    }
}
