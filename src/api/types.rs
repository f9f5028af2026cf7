//! Request and response schemas for the processing backend.
//!
//! Field names match the wire format. Response types default missing
//! collections so partially populated answers (the backend omits
//! `folder_counts` when listing a subfolder) still decode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of tabular preview data, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Canonical resample interval for cleaning.
pub const DEFAULT_RESAMPLE_INTERVAL: &str = "5m";

/// Number of rows requested by a data preview when the caller gives none.
pub const DEFAULT_PREVIEW_ROWS: usize = 50;

/// Options sent to `POST /api/clean`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanConfig {
    pub resample_interval: String,
    pub detect_frozen: bool,
    pub apply_steady_state: bool,
    pub apply_heat_balance: bool,
    pub apply_affinity: bool,
    pub filter_invalid: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            resample_interval: DEFAULT_RESAMPLE_INTERVAL.to_string(),
            detect_frozen: true,
            apply_steady_state: false,
            apply_heat_balance: false,
            apply_affinity: false,
            filter_invalid: false,
        }
    }
}

impl CleanConfig {
    /// Canonical defaults with every field set in `patch` overridden.
    pub fn merged(patch: &CleanConfigPatch) -> Self {
        let mut config = Self::default();
        config.apply(patch);
        config
    }

    /// Override the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &CleanConfigPatch) {
        if let Some(interval) = &patch.resample_interval {
            self.resample_interval = interval.clone();
        }
        if let Some(value) = patch.detect_frozen {
            self.detect_frozen = value;
        }
        if let Some(value) = patch.apply_steady_state {
            self.apply_steady_state = value;
        }
        if let Some(value) = patch.apply_heat_balance {
            self.apply_heat_balance = value;
        }
        if let Some(value) = patch.apply_affinity {
            self.apply_affinity = value;
        }
        if let Some(value) = patch.filter_invalid {
            self.filter_invalid = value;
        }
    }
}

/// A partial [`CleanConfig`]; unset fields keep their canonical default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resample_interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detect_frozen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_steady_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_heat_balance: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_affinity: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_invalid: Option<bool>,
}

impl CleanConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resample_interval(mut self, interval: impl Into<String>) -> Self {
        self.resample_interval = Some(interval.into());
        self
    }

    pub fn detect_frozen(mut self, enabled: bool) -> Self {
        self.detect_frozen = Some(enabled);
        self
    }

    pub fn apply_steady_state(mut self, enabled: bool) -> Self {
        self.apply_steady_state = Some(enabled);
        self
    }

    pub fn apply_heat_balance(mut self, enabled: bool) -> Self {
        self.apply_heat_balance = Some(enabled);
        self
    }

    pub fn apply_affinity(mut self, enabled: bool) -> Self {
        self.apply_affinity = Some(enabled);
        self
    }

    pub fn filter_invalid(mut self, enabled: bool) -> Self {
        self.filter_invalid = Some(enabled);
        self
    }
}

/// Answer of `GET /api/files`.
///
/// At the data root the backend lists `folders` with per-folder counts; inside
/// a subfolder it lists `files` and sets `current_folder`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileListing {
    pub files: Vec<String>,
    pub folders: Vec<String>,
    pub folder_counts: BTreeMap<String, u64>,
    pub total_files: u64,
    pub count: u64,
    pub current_folder: Option<String>,
    pub directory: Option<String>,
    pub base_dir: Option<String>,
    /// Inline problem report, e.g. a missing directory.
    pub error: Option<String>,
}

/// Body of `POST /api/parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub files: Vec<String>,
    pub data_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,
}

/// Answer of `POST /api/parse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    #[serde(default)]
    pub success: bool,
    pub row_count: u64,
    pub column_count: u64,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub preview: Vec<Row>,
    #[serde(default)]
    pub message: String,
}

/// Answer of `POST /api/clean`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanResult {
    #[serde(default)]
    pub success: bool,
    pub original_rows: u64,
    pub cleaned_rows: u64,
    /// Percentage of rows kept, 0-100.
    pub retention_rate: f64,
    #[serde(default)]
    pub message: String,
}

/// Answer of `GET /api/data/preview`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPreview {
    pub preview: Vec<Row>,
    pub total_rows: u64,
    pub columns: Vec<String>,
}

/// Answer of `GET /api/data/stats`. Numeric fields are absent for
/// non-numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub column: String,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub median: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub std: Option<f64>,
    #[serde(default)]
    pub count: u64,
}

/// A trained model as reported by `GET /api/models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub mape: Option<f64>,
    #[serde(default)]
    pub r2: Option<f64>,
    #[serde(default)]
    pub feature_count: u32,
    #[serde(default, rename = "created_at", alias = "training_date")]
    pub training_date: Option<String>,
}

/// Answer of `GET /api/models`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelListing {
    pub folders: Vec<String>,
    pub models: Vec<ModelInfo>,
    pub folder_counts: BTreeMap<String, u64>,
    pub total_models: u64,
    pub current_folder: Option<String>,
    pub directory: Option<String>,
    pub error: Option<String>,
}

/// Body of `POST /api/models/train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainRequest {
    pub model_name: String,
    pub feature_mapping: serde_json::Value,
}

/// Answer of `POST /api/models/train`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainResult {
    pub message: String,
    pub model_name: String,
    pub status: String,
}

/// Body of `POST /api/optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub model_name: String,
    pub input_data: BTreeMap<String, f64>,
}

/// One suggested setpoint change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub parameter: String,
    pub value: f64,
    #[serde(default)]
    pub savings: Option<String>,
}

/// Answer of `POST /api/optimize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    #[serde(default)]
    pub success: bool,
    pub predicted_power: f64,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}
