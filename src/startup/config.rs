//! Dashboard configuration.
//!
//! Values come from the environment with local-development defaults.

use std::time::Duration;

use crate::api::{DEFAULT_API_URL, DEFAULT_DATA_ROOT};
use crate::error::ConfigError;
use crate::health_check::DEFAULT_POLL_INTERVAL;

/// Backend base URL.
pub const ENV_API_URL: &str = "HVACDASH_API_URL";
/// Data root listed and parsed by default.
pub const ENV_DATA_DIR: &str = "HVACDASH_DATA_DIR";
/// Health poll period in whole seconds.
pub const ENV_POLL_SECS: &str = "HVACDASH_POLL_SECS";
/// Per-request timeout in whole seconds.
pub const ENV_TIMEOUT_SECS: &str = "HVACDASH_TIMEOUT_SECS";

/// Configuration for one dashboard session.
///
/// # Example
///
/// ```ignore
/// use hvacdash::startup::DashboardConfig;
///
/// let config = DashboardConfig::default()
///     .with_api_url("http://plant-gw:8000")
///     .with_poll_interval(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend base URL (default: http://localhost:8000)
    pub api_url: String,
    /// Default data directory (default: data/CGMH-TY)
    pub data_root: String,
    /// Health poll period (default: 30s)
    pub poll_interval: Duration,
    /// HTTP timeout; `None` leaves the client default
    pub request_timeout: Option<Duration>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            data_root: DEFAULT_DATA_ROOT.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_data_root(mut self, data_root: impl Into<String>) -> Self {
        self.data_root = data_root.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Read configuration from the process environment.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = read(ENV_API_URL) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    var: ENV_API_URL.to_string(),
                    value: url,
                });
            }
            config.api_url = url;
        }

        if let Some(dir) = read(ENV_DATA_DIR) {
            config.data_root = dir;
        }

        if let Some(value) = read(ENV_POLL_SECS) {
            config.poll_interval = parse_seconds(ENV_POLL_SECS, &value)?;
        }

        if let Some(value) = read(ENV_TIMEOUT_SECS) {
            config.request_timeout = Some(parse_seconds(ENV_TIMEOUT_SECS, &value)?);
        }

        Ok(config)
    }
}

fn parse_seconds(var: &str, value: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidNumber {
        var: var.to_string(),
        value: value.to_string(),
    })?;
    if secs == 0 {
        return Err(ConfigError::ZeroDuration {
            var: var.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.data_root, "data/CGMH-TY");
        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_all_variables() {
        let config = DashboardConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://gw.plant:9000"),
            (ENV_DATA_DIR, "/srv/hvac"),
            (ENV_POLL_SECS, "5"),
            (ENV_TIMEOUT_SECS, " 12 "),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://gw.plant:9000");
        assert_eq!(config.data_root, "/srv/hvac");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(12)));
    }

    #[test]
    fn test_empty_values_keep_defaults() {
        let config =
            DashboardConfig::from_lookup(lookup(&[(ENV_API_URL, ""), (ENV_POLL_SECS, "  ")])).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_invalid_number() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENV_POLL_SECS, "thirty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: ENV_POLL_SECS.to_string(),
                value: "thirty".to_string()
            }
        );
    }

    #[test]
    fn test_zero_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroDuration {
                var: ENV_TIMEOUT_SECS.to_string()
            }
        );
    }

    #[test]
    fn test_url_scheme_required() {
        let err = DashboardConfig::from_lookup(lookup(&[(ENV_API_URL, "localhost:8000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_builder() {
        let config = DashboardConfig::new()
            .with_api_url("http://x")
            .with_data_root("d")
            .with_poll_interval(Duration::from_secs(1))
            .with_request_timeout(Duration::from_secs(2));
        assert_eq!(config.api_url, "http://x");
        assert_eq!(config.data_root, "d");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(2)));
    }
}
