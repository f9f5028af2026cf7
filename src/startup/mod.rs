//! Startup: configuration loading.

pub mod config;

pub use config::{
    DashboardConfig, ENV_API_URL, ENV_DATA_DIR, ENV_POLL_SECS, ENV_TIMEOUT_SECS,
};
