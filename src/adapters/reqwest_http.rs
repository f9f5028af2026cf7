//! [`HttpClient`] backed by reqwest.

use async_trait::async_trait;
use std::time::Duration;

use crate::traits::{Headers, HttpClient, HttpError, Method, Request, Response};

/// Production transport.
///
/// ```ignore
/// use hvacdash::adapters::ReqwestHttpClient;
/// use hvacdash::traits::{HttpClient, Request};
///
/// let client = ReqwestHttpClient::with_timeout(Duration::from_secs(10))?;
/// let response = client.execute(Request::get("http://localhost:8000/api/health")).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client whose requests fail with [`HttpError::Timeout`] after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpError::from)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn builder(&self, request: Request) -> reqwest::RequestBuilder {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        let builder = request
            .headers
            .iter()
            .fold(builder, |b, (name, value)| b.header(name.as_str(), value.as_str()));
        match request.body {
            Some(body) => builder.body(body),
            None => builder,
        }
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            HttpError::Timeout(message)
        } else if err.is_connect() {
            HttpError::ConnectionFailed(message)
        } else if err.is_builder() || err.is_request() {
            HttpError::InvalidRequest(message)
        } else if err.is_body() || err.is_decode() {
            HttpError::Body(message)
        } else {
            HttpError::Other(message)
        }
    }
}

fn header_map(headers: &reqwest::header::HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect()
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: Request) -> Result<Response, HttpError> {
        let response = self.builder(request).send().await?;
        let status = response.status().as_u16();
        let headers = header_map(response.headers());
        let body = response.bytes().await?;

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
