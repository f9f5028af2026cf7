//! Backend API: the typed facade and its wire schemas.

pub mod facade;
pub mod types;

pub use facade::{ApiFacade, DEFAULT_API_URL, DEFAULT_DATA_ROOT};
pub use types::{
    CleanConfig, CleanConfigPatch, CleanResult, ColumnStats, DataPreview, FileListing, ModelInfo,
    ModelListing, OptimizationResult, ParseResult, Recommendation, Row, TrainResult,
};
