//! Common fixtures for integration tests.
//!
//! ```ignore
//! let (server, ctx) = common::start_backend().await;
//! Mock::given(method("GET")).and(path("/api/health")).respond_with(...).mount(&server).await;
//! ```

#![allow(dead_code)]

use std::time::Duration;

use hvacdash::app::AppContext;
use hvacdash::startup::DashboardConfig;
use wiremock::MockServer;

/// Canonical data root the facade falls back to.
pub const DATA_ROOT: &str = "data/CGMH-TY";

/// Config pointing at `uri` with a short poll interval and request timeout.
pub fn test_config(uri: &str) -> DashboardConfig {
    DashboardConfig::default()
        .with_api_url(uri)
        .with_poll_interval(Duration::from_millis(50))
        .with_request_timeout(Duration::from_secs(5))
}

/// Start a wiremock backend and a reqwest-backed context pointed at it.
pub async fn start_backend() -> (MockServer, AppContext) {
    let server = MockServer::start().await;
    let ctx = AppContext::from_config(test_config(&server.uri()))
        .expect("reqwest client should build");
    (server, ctx)
}

/// Context pointed at a port nothing listens on.
pub fn unreachable_context() -> AppContext {
    AppContext::from_config(test_config("http://127.0.0.1:9")).expect("reqwest client should build")
}

pub fn files(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
