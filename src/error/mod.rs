//! Error types for the dashboard client.
//!
//! - **[`ApiError`]**: every backend failure, normalized to one message
//! - **[`NavigationError`]**: rejected mode/page transitions
//! - **[`ConfigError`]**: invalid environment configuration
//!
//! | Kind | Cause | Message |
//! |------|-------|---------|
//! | Transport | request never produced a response | transport error text |
//! | Protocol | non-2xx response | `detail` field or `HTTP <status>` |
//! | Decode | body is not the expected JSON | decode error text |

mod api;
mod config;
mod navigation;

pub use api::{ApiError, ApiResult};
pub use config::ConfigError;
pub use navigation::NavigationError;
