//! JSON layer over a raw [`Connection`]

use std::sync::Arc;

use hubkit_core::{parse_link_header, ApiOptions, Connection, Parameters, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::status::{ensure_success, OTP_HEADER};
use crate::Result;

/// Shared handle every resource client talks through
#[derive(Clone)]
pub struct ApiConnection {
    connection: Arc<dyn Connection>,
}

impl ApiConnection {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self { connection }
    }

    /// Send a request and return the response whatever its status
    pub async fn send_raw(&self, request: Request) -> Result<Response> {
        debug!(method = %request.method, path = %request.path, "API request");
        Ok(self.connection.send(request).await?)
    }

    /// Send a request and fail on any non-2xx status
    pub async fn send(&self, request: Request) -> Result<Response> {
        ensure_success(self.send_raw(request).await?)
    }

    /// GET a single JSON resource
    pub async fn get<T: DeserializeOwned>(&self, path: &str, parameters: &Parameters) -> Result<T> {
        self.fetch(Request::get(path).with_query(parameters.clone()))
            .await
    }

    /// Send a prepared request and decode the JSON response
    pub async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T> {
        decode(&self.send(request).await?)
    }

    /// GET every page of a JSON array endpoint
    pub async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &Parameters,
        options: &ApiOptions,
    ) -> Result<Vec<T>> {
        let pages: Vec<Vec<T>> = self.get_pages(path, parameters, options).await?;
        Ok(pages.into_iter().flatten().collect())
    }

    /// GET every page of an endpoint, one decoded value per page
    ///
    /// Follows `Link: rel="next"` until it disappears or `page_count` pages
    /// have been fetched.
    pub async fn get_pages<P: DeserializeOwned>(
        &self,
        path: &str,
        parameters: &Parameters,
        options: &ApiOptions,
    ) -> Result<Vec<P>> {
        let mut query = parameters.clone();
        options.apply(&mut query);

        let mut pages = Vec::new();
        loop {
            let response = self
                .send(Request::get(path).with_query(query.clone()))
                .await?;
            pages.push(decode(&response)?);

            if options.is_exhausted(pages.len()) {
                break;
            }

            let next = response
                .header("link")
                .and_then(|link| parse_link_header(link).next_page);
            match next {
                Some(page) => {
                    query.insert("page".to_string(), page.to_string());
                }
                None => break,
            }
        }

        debug!(path, pages = pages.len(), "Fetched pages");
        Ok(pages)
    }

    /// GET a body as raw bytes, optionally with a specific media type
    pub async fn get_raw(
        &self,
        path: &str,
        parameters: &Parameters,
        accept: Option<&str>,
    ) -> Result<Vec<u8>> {
        let mut request = Request::get(path).with_query(parameters.clone());
        if let Some(accept) = accept {
            request = request.with_accept(accept);
        }
        Ok(self.send(request).await?.body)
    }

    /// POST and decode the JSON response
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(with_json(Request::post(path), body)?).await?;
        decode(&response)
    }

    /// POST and decode the JSON response, sending a two-factor code if given
    pub async fn post_with_otp<T, B>(&self, path: &str, body: &B, otp: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_otp(with_json(Request::post(path), Some(body))?, otp);
        decode(&self.send(request).await?)
    }

    /// POST where the response has no interesting body
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.send(Request::post(path)).await?;
        Ok(())
    }

    /// PUT and decode the JSON response, sending a two-factor code if given
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>, otp: Option<&str>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = with_otp(with_json(Request::put(path), body)?, otp);
        decode(&self.send(request).await?)
    }

    /// PUT where the response has no interesting body
    pub async fn put_empty<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(with_json(Request::put(path), body)?).await?;
        Ok(())
    }

    /// PATCH and decode the JSON response
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(with_json(Request::patch(path), Some(body))?).await?;
        decode(&response)
    }

    /// DELETE a resource
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Request::delete(path)).await?;
        Ok(())
    }

    /// DELETE a resource, sending a two-factor code if given
    pub async fn delete_with_otp(&self, path: &str, otp: Option<&str>) -> Result<()> {
        self.send(with_otp(Request::delete(path), otp)).await?;
        Ok(())
    }

    /// DELETE with a JSON body
    pub async fn delete_with_body<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(with_json(Request::delete(path), Some(body))?).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConnection").finish_non_exhaustive()
    }
}

fn with_json<B: Serialize + ?Sized>(request: Request, body: Option<&B>) -> Result<Request> {
    match body {
        Some(body) => Ok(request.with_body(serde_json::to_value(body)?)),
        None => Ok(request),
    }
}

fn with_otp(request: Request, otp: Option<&str>) -> Request {
    match otp {
        Some(code) => request.with_header(OTP_HEADER, code),
        None => request,
    }
}

fn decode<T: DeserializeOwned>(response: &Response) -> Result<T> {
    Ok(serde_json::from_slice(&response.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeConnection;
    use crate::Error;
    use hubkit_core::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_all_follows_link_header() {
        let fake = FakeConnection::new();
        fake.respond_with(
            Method::Get,
            "user/followers",
            Response::new(200, r#"[1, 2]"#).with_header(
                "Link",
                "<https://api.github.com/user/followers?page=2>; rel=\"next\"",
            ),
        );
        fake.respond(Method::Get, "user/followers", 200, "[3]");

        let api = fake.api();
        let items: Vec<u32> = api
            .get_all("user/followers", &Parameters::new(), &ApiOptions::default())
            .await
            .unwrap();

        assert_eq!(items, vec![1, 2, 3]);
        let requests = fake.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].query.is_empty());
        assert_eq!(requests[1].query.get("page").map(String::as_str), Some("2"));
    }

    #[tokio::test]
    async fn test_get_pages_stops_at_page_count() {
        let fake = FakeConnection::new();
        fake.respond_with(
            Method::Get,
            "user/followers",
            Response::new(200, "[1]").with_header(
                "Link",
                "<https://api.github.com/user/followers?per_page=1&page=3>; rel=\"next\"",
            ),
        );

        let options = ApiOptions::new().start_page(2).page_size(1).page_count(1);
        let items: Vec<u32> = fake
            .api()
            .get_all("user/followers", &Parameters::new(), &options)
            .await
            .unwrap();

        assert_eq!(items, vec![1]);
        let request = fake.last_request();
        assert_eq!(request.query.get("page").map(String::as_str), Some("2"));
        assert_eq!(request.query.get("per_page").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn test_put_sends_otp_header_and_body() {
        let fake = FakeConnection::new();
        fake.respond(Method::Put, "authorizations/clients/id", 200, r#"{"ok":true}"#);

        let value: serde_json::Value = fake
            .api()
            .put(
                "authorizations/clients/id",
                Some(&json!({"client_secret": "s"})),
                Some("123456"),
            )
            .await
            .unwrap();

        assert_eq!(value, json!({"ok": true}));
        let request = fake.last_request();
        assert_eq!(request.header("x-github-otp"), Some("123456"));
        assert_eq!(request.body, Some(json!({"client_secret": "s"})));
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let fake = FakeConnection::new();
        fake.respond(Method::Delete, "repos/fake/repo/labels/bug", 404, "");

        let err = fake.api().delete("repos/fake/repo/labels/bug").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_raw_uses_accept_override() {
        let fake = FakeConnection::new();
        fake.respond(Method::Get, "repos/fake/repo/commits/main", 200, "abc123");

        let body = fake
            .api()
            .get_raw(
                "repos/fake/repo/commits/main",
                &Parameters::new(),
                Some("application/vnd.github.v3.sha"),
            )
            .await
            .unwrap();

        assert_eq!(body, b"abc123".to_vec());
        assert_eq!(
            fake.last_request().accept.as_deref(),
            Some("application/vnd.github.v3.sha")
        );
    }

    #[tokio::test]
    async fn test_transport_errors_are_wrapped() {
        let fake = FakeConnection::new();
        let err = fake.api().delete("nowhere").await.unwrap_err();
        assert!(matches!(err, Error::Core(hubkit_core::Error::Transport(_))));
    }
}
