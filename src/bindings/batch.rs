//! Batch-mode bindings: file listing, parse, clean and dataset inspection.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::EndpointBinding;
use crate::api::{
    ApiFacade, CleanConfigPatch, CleanResult, ColumnStats, DataPreview, FileListing, ParseResult,
    Row,
};
use crate::error::ApiResult;
use crate::state::RequestLifecycle;

/// Files and folders under the data root.
#[derive(Debug)]
pub struct FileListBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<FileListing>,
}

impl FileListBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    /// Fetch the listing of `subfolder` (or the root folders when `None`).
    pub async fn fetch(
        &self,
        data_dir: Option<&str>,
        subfolder: Option<&str>,
    ) -> ApiResult<FileListing> {
        self.lifecycle
            .execute(|| self.api.list_files(data_dir, subfolder))
            .await
    }

    pub fn files(&self) -> Vec<String> {
        self.view(|listing| listing.files.clone())
    }

    pub fn folders(&self) -> Vec<String> {
        self.view(|listing| listing.folders.clone())
    }

    pub fn folder_counts(&self) -> BTreeMap<String, u64> {
        self.view(|listing| listing.folder_counts.clone())
    }

    pub fn total_files(&self) -> u64 {
        self.view(|listing| listing.total_files)
    }

    pub fn count(&self) -> u64 {
        self.view(|listing| listing.count)
    }

    pub fn current_folder(&self) -> Option<String> {
        self.view(|listing| listing.current_folder.clone())
    }

    /// Problem the backend reported inside a successful listing, such as a
    /// missing data directory or subfolder.
    pub fn listing_error(&self) -> Option<String> {
        self.view(|listing| listing.error.clone())
    }
}

impl EndpointBinding for FileListBinding {
    type Output = FileListing;

    fn lifecycle(&self) -> &RequestLifecycle<FileListing> {
        &self.lifecycle
    }
}

/// Parse-and-merge of selected CSV files.
#[derive(Debug)]
pub struct ParseBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<ParseResult>,
}

impl ParseBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn parse(
        &self,
        files: &[String],
        data_dir: Option<&str>,
        subfolder: Option<&str>,
    ) -> ApiResult<ParseResult> {
        self.lifecycle
            .execute(|| self.api.parse_files(files, data_dir, subfolder))
            .await
    }

    pub fn row_count(&self) -> u64 {
        self.view(|result| result.row_count)
    }

    pub fn columns(&self) -> Vec<String> {
        self.view(|result| result.columns.clone())
    }

    pub fn preview(&self) -> Vec<Row> {
        self.view(|result| result.preview.clone())
    }
}

impl EndpointBinding for ParseBinding {
    type Output = ParseResult;

    fn lifecycle(&self) -> &RequestLifecycle<ParseResult> {
        &self.lifecycle
    }
}

/// Cleaning of the parsed dataset.
#[derive(Debug)]
pub struct CleanBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<CleanResult>,
}

impl CleanBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn clean(&self, patch: &CleanConfigPatch) -> ApiResult<CleanResult> {
        self.lifecycle.execute(|| self.api.clean_data(patch)).await
    }

    /// Percentage of rows kept, `0.0` before any run.
    pub fn retention_rate(&self) -> f64 {
        self.view(|result| result.retention_rate)
    }
}

impl EndpointBinding for CleanBinding {
    type Output = CleanResult;

    fn lifecycle(&self) -> &RequestLifecycle<CleanResult> {
        &self.lifecycle
    }
}

#[derive(Debug)]
pub struct DataPreviewBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<DataPreview>,
}

impl DataPreviewBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn fetch(&self, rows: Option<usize>) -> ApiResult<DataPreview> {
        self.lifecycle.execute(|| self.api.data_preview(rows)).await
    }

    pub fn rows(&self) -> Vec<Row> {
        self.view(|preview| preview.preview.clone())
    }

    pub fn total_rows(&self) -> u64 {
        self.view(|preview| preview.total_rows)
    }
}

impl EndpointBinding for DataPreviewBinding {
    type Output = DataPreview;

    fn lifecycle(&self) -> &RequestLifecycle<DataPreview> {
        &self.lifecycle
    }
}

#[derive(Debug)]
pub struct ColumnStatsBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<ColumnStats>,
}

impl ColumnStatsBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn fetch(&self, column: &str) -> ApiResult<ColumnStats> {
        self.lifecycle.execute(|| self.api.column_stats(column)).await
    }
}

impl EndpointBinding for ColumnStatsBinding {
    type Output = ColumnStats;

    fn lifecycle(&self) -> &RequestLifecycle<ColumnStats> {
        &self.lifecycle
    }
}

/// Every binding reachable from batch mode.
#[derive(Debug)]
pub struct BatchBindings {
    pub files: FileListBinding,
    pub parse: ParseBinding,
    pub clean: CleanBinding,
    pub preview: DataPreviewBinding,
    pub stats: ColumnStatsBinding,
}

impl BatchBindings {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            files: FileListBinding::new(api.clone()),
            parse: ParseBinding::new(api.clone()),
            clean: CleanBinding::new(api.clone()),
            preview: DataPreviewBinding::new(api.clone()),
            stats: ColumnStatsBinding::new(api),
        }
    }
}
