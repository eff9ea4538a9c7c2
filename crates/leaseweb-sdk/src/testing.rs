//! Recording mock transport for tests

use crate::error::Result;
use crate::transport::{ApiRequest, HttpResponse, Method, Transport};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Routes `(method, path)` to queued responses and records every request.
///
/// Responses queued for a route are returned in order; the last one keeps
/// being returned once the queue is down to it. Unrouted requests get a 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<HttpResponse>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a JSON response for a route.
    pub fn on(&self, method: Method, path: &str, status: u16, body: serde_json::Value) -> &Self {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.on_raw(method, path, status, body)
    }

    pub fn on_raw(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> &Self {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.into(),
            });
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recorded calls as `"METHOD path"`.
    pub fn call_log(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| format!("{} {}", c.method, c.path))
            .collect()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        let key = (request.method, request.path.clone());
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);

        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let response = match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| HttpResponse {
            status: 404,
            body: format!(
                r#"{{"errorCode":"404","errorMessage":"No mock route for {} {}"}}"#,
                key.0, key.1
            ),
        }))
    }
}
