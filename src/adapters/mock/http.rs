//! Recording [`HttpClient`] for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::traits::{HttpClient, HttpError, Request, Response};

/// Requests are recorded exactly as the facade built them.
pub type RecordedRequest = Request;

/// Canned outcome for a URL.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Any status, including errors.
    Success(Response),
    /// No response at all.
    Error(HttpError),
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<String, MockResponse>,
    fallback: Option<MockResponse>,
    latency: Option<Duration>,
    requests: Vec<Request>,
}

/// In-memory backend. Clones share routes and recorded requests.
///
/// A request URL matches a route when it equals it or starts with it; the
/// longest matching route wins, so `/api/models` and `/api/models/train` can
/// answer differently.
///
/// ```ignore
/// let mock = MockHttpClient::new();
/// mock.set_json("http://backend/api/health", 200, json!({"status": "ok"}));
///
/// let api = ApiFacade::new("http://backend", Arc::new(mock.clone()));
/// api.health_check().await?;
/// assert_eq!(mock.request_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded requests.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.lock().routes.insert(url.to_string(), response);
    }

    /// Answer `url` with `value` as a JSON body.
    pub fn set_json(&self, url: &str, status: u16, value: serde_json::Value) {
        self.set_response(url, MockResponse::Success(Response::from_json(status, &value)));
    }

    /// Answer for URLs no route matches.
    pub fn set_default_response(&self, response: MockResponse) {
        self.lock().fallback = Some(response);
    }

    /// Delay every answer by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.lock().latency = Some(latency);
    }

    pub fn get_requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn route(&self, url: &str) -> Option<MockResponse> {
        let state = self.lock();
        state
            .routes
            .iter()
            .filter(|(route, _)| url.starts_with(route.as_str()))
            .max_by_key(|(route, _)| route.len())
            .map(|(_, response)| response.clone())
            .or_else(|| state.fallback.clone())
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: Request) -> Result<Response, HttpError> {
        let url = request.url.clone();
        let latency = {
            let mut state = self.lock();
            state.requests.push(request);
            state.latency
        };
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }

        match self.route(&url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("no mock route for {}", url))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockHttpClient::new();
        mock.set_json("http://backend/api/clean", 200, json!({}));

        mock.execute(Request::post("http://backend/api/clean", r#"{"filter_invalid":true}"#))
            .await
            .unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].json_body(), Some(json!({"filter_invalid": true})));
    }

    #[tokio::test]
    async fn test_transport_error_route() {
        let mock = MockHttpClient::new();
        mock.set_response(
            "http://backend/api/health",
            MockResponse::Error(HttpError::Timeout("30s".into())),
        );

        let err = mock
            .execute(Request::get("http://backend/api/health"))
            .await
            .unwrap_err();
        assert_eq!(err, HttpError::Timeout("30s".into()));
    }

    #[tokio::test]
    async fn test_unrouted_url_errors() {
        let mock = MockHttpClient::new();
        let err = mock
            .execute(Request::get("http://backend/api/files"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no mock route"));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_longest_route_wins() {
        let mock = MockHttpClient::new();
        mock.set_json("http://backend/api/models", 200, json!({"which": "list"}));
        mock.set_json("http://backend/api/models/train", 200, json!({"which": "train"}));

        let list = mock
            .execute(Request::get("http://backend/api/models?subfolder=chiller"))
            .await
            .unwrap();
        let train = mock
            .execute(Request::post("http://backend/api/models/train", "{}"))
            .await
            .unwrap();

        assert_eq!(list.json::<serde_json::Value>().unwrap()["which"], "list");
        assert_eq!(train.json::<serde_json::Value>().unwrap()["which"], "train");
    }

    #[tokio::test]
    async fn test_fallback_response() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(Response::new(404, "")));

        let response = mock.execute(Request::get("http://backend/anything")).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockHttpClient::new();
        let other = mock.clone();
        mock.set_json("http://backend/", 200, json!({}));

        other.execute(Request::get("http://backend/api/health")).await.unwrap();
        assert_eq!(mock.request_count(), 1);

        mock.clear_requests();
        assert_eq!(other.request_count(), 0);
    }
}
