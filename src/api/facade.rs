//! Typed facade over the processing backend.
//!
//! One method per backend capability, each a single round trip through the
//! injected [`HttpClient`]. The facade owns URL construction, payload
//! shaping, default merging and error normalization; it never hands a
//! backend error back as data.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{
    CleanConfig, CleanConfigPatch, CleanResult, ColumnStats, DataPreview, FileListing,
    ModelListing, OptimizationResult, OptimizeRequest, ParseRequest, ParseResult, TrainRequest,
    TrainResult, DEFAULT_PREVIEW_ROWS,
};
use crate::error::{ApiError, ApiResult};
use crate::health_check::HealthProbe;
use crate::traits::{merge_headers, Headers, HttpClient, Request, Response};

/// Backend URL used when no configuration is supplied.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Data directory listed and parsed when the caller names none.
pub const DEFAULT_DATA_ROOT: &str = "data/CGMH-TY";

/// Typed boundary to the processing backend.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use hvacdash::adapters::ReqwestHttpClient;
/// use hvacdash::api::{ApiFacade, CleanConfigPatch};
///
/// let api = ApiFacade::new("http://localhost:8000", Arc::new(ReqwestHttpClient::new()));
/// let listing = api.list_files(None, Some("2024-01")).await?;
/// let cleaned = api.clean_data(&CleanConfigPatch::new().filter_invalid(true)).await?;
/// ```
#[derive(Clone)]
pub struct ApiFacade {
    base_url: String,
    data_root: String,
    client: Arc<dyn HttpClient>,
    default_headers: Headers,
}

impl std::fmt::Debug for ApiFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiFacade")
            .field("base_url", &self.base_url)
            .field("data_root", &self.data_root)
            .field("default_headers", &self.default_headers)
            .finish_non_exhaustive()
    }
}

impl ApiFacade {
    /// Create a facade for `base_url` using the given HTTP client.
    pub fn new(base_url: impl Into<String>, client: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let mut default_headers = Headers::new();
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            base_url,
            data_root: DEFAULT_DATA_ROOT.to_string(),
            client,
            default_headers,
        }
    }

    /// Replace the canonical data root used when `data_dir` is omitted.
    pub fn with_data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    /// Add a header sent with every request. Overrides the canonical
    /// content type when named `Content-Type` in any case.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut extra = Headers::new();
        extra.insert(name.into(), value.into());
        self.default_headers = merge_headers(&self.default_headers, &extra);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn data_root(&self) -> &str {
        &self.data_root
    }

    // ---------------------------------------------------------------------
    // Operations
    // ---------------------------------------------------------------------

    /// Probe `GET /api/health`. Only the status is consulted.
    pub async fn health_check(&self) -> ApiResult<()> {
        let response = self.send(Request::get(self.url("/api/health", &[]))).await?;
        Self::check_status(&response)
    }

    /// List CSV files (inside `subfolder`) or subfolders (at the root) of
    /// `data_dir`, defaulting to the canonical data root.
    pub async fn list_files(
        &self,
        data_dir: Option<&str>,
        subfolder: Option<&str>,
    ) -> ApiResult<FileListing> {
        let mut query = vec![("data_dir", data_dir.unwrap_or(&self.data_root).to_string())];
        if let Some(folder) = non_empty(subfolder) {
            query.push(("subfolder", folder.to_string()));
        }
        self.get_json("/api/files", &query).await
    }

    /// Parse and merge `files` on the backend.
    pub async fn parse_files(
        &self,
        files: &[String],
        data_dir: Option<&str>,
        subfolder: Option<&str>,
    ) -> ApiResult<ParseResult> {
        let request = ParseRequest {
            files: files.to_vec(),
            data_dir: data_dir.unwrap_or(&self.data_root).to_string(),
            subfolder: non_empty(subfolder).map(str::to_string),
        };
        self.post_json("/api/parse", &request).await
    }

    /// Clean the parsed data. `patch` is merged over the canonical
    /// [`CleanConfig`] field by field before sending.
    pub async fn clean_data(&self, patch: &CleanConfigPatch) -> ApiResult<CleanResult> {
        let config = CleanConfig::merged(patch);
        self.post_json("/api/clean", &config).await
    }

    /// First `rows` rows of the current dataset (50 when omitted).
    pub async fn data_preview(&self, rows: Option<usize>) -> ApiResult<DataPreview> {
        let rows = rows.unwrap_or(DEFAULT_PREVIEW_ROWS);
        self.get_json("/api/data/preview", &[("rows", rows.to_string())])
            .await
    }

    /// Summary statistics for one column of the current dataset.
    pub async fn column_stats(&self, column: &str) -> ApiResult<ColumnStats> {
        self.get_json("/api/data/stats", &[("column", column.to_string())])
            .await
    }

    /// List trained models, optionally inside `subfolder`.
    pub async fn list_models(&self, subfolder: Option<&str>) -> ApiResult<ModelListing> {
        let query: Vec<(&str, String)> = non_empty(subfolder)
            .map(|folder| vec![("subfolder", folder.to_string())])
            .unwrap_or_default();
        self.get_json("/api/models", &query).await
    }

    /// Start training `model_name` with the given feature mapping.
    pub async fn train_model(
        &self,
        model_name: &str,
        feature_mapping: serde_json::Value,
    ) -> ApiResult<TrainResult> {
        let request = TrainRequest {
            model_name: model_name.to_string(),
            feature_mapping,
        };
        self.post_json("/api/models/train", &request).await
    }

    /// Ask `model_name` for optimized setpoints given current readings.
    pub async fn optimize(
        &self,
        model_name: &str,
        input_data: BTreeMap<String, f64>,
    ) -> ApiResult<OptimizationResult> {
        let request = OptimizeRequest {
            model_name: model_name.to_string(),
            input_data,
        };
        self.post_json("/api/optimize", &request).await
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    /// `base_url + path`, with URL-encoded query parameters.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&urlencoding::encode(key));
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Send `request` with the facade's default headers merged under its
    /// own, so a header set on the request overrides the default of the same
    /// name. Non-2xx responses are returned as-is; only transport failures
    /// become errors.
    pub async fn send(&self, mut request: Request) -> ApiResult<Response> {
        request.headers = merge_headers(&self.default_headers, &request.headers);
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "backend request");

        let outcome = self.client.execute(request).await;
        match &outcome {
            Ok(response) if response.is_success() => {
                debug!(%method, %url, status = response.status, "backend responded");
            }
            Ok(response) => {
                warn!(%method, %url, status = response.status, "backend returned an error status");
            }
            Err(err) => {
                warn!(%method, %url, error = %err, "backend unreachable");
            }
        }
        outcome.map_err(ApiError::from)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self.send(Request::get(self.url(path, query))).await?;
        Self::decode(&response)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::Transport(format!("could not encode request: {}", e)))?;
        let response = self.send(Request::post(self.url(path, &[]), body)).await?;
        Self::decode(&response)
    }

    fn check_status(response: &Response) -> ApiResult<()> {
        if response.is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response))
        }
    }

    fn decode<T: DeserializeOwned>(response: &Response) -> ApiResult<T> {
        Self::check_status(response)?;
        Ok(response.json()?)
    }
}

#[async_trait]
impl HealthProbe for ApiFacade {
    async fn probe(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
