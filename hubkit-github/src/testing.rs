//! In-memory connection for unit tests
//!
//! Records every request and answers from per-route FIFO queues. No
//! sockets, no loopback servers.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hubkit_core::{Connection, Method, Request, Response};

use crate::{ApiConnection, GitHubClient};

#[derive(Clone, Default)]
pub struct FakeConnection {
    inner: Arc<Mutex<FakeConnectionInner>>,
}

#[derive(Default)]
struct FakeConnectionInner {
    routes: HashMap<(Method, String), VecDeque<Response>>,
    requests: Vec<Request>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a method + path
    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.respond_with(method, path, Response::new(status, body));
    }

    /// Queue a fully built response for a method + path
    pub fn respond_with(&self, method: Method, path: &str, response: Response) {
        let mut inner = self.inner.lock().expect("fake connection lock poisoned");
        inner
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.inner
            .lock()
            .expect("fake connection lock poisoned")
            .requests
            .clone()
    }

    pub fn last_request(&self) -> Request {
        self.requests().pop().expect("no request was sent")
    }

    pub fn api(&self) -> ApiConnection {
        ApiConnection::new(Arc::new(self.clone()))
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_connection(Arc::new(self.clone()))
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn send(&self, request: Request) -> hubkit_core::Result<Response> {
        let mut inner = self.inner.lock().expect("fake connection lock poisoned");

        let key = (request.method, request.path.clone());
        inner.requests.push(request);

        inner
            .routes
            .get_mut(&key)
            .and_then(|queue| queue.pop_front())
            .ok_or_else(|| {
                hubkit_core::Error::Transport(format!("no fake response for {} {}", key.0, key.1))
            })
    }
}
