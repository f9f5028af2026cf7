//! Root application scope.
//!
//! [`AppContext`] owns the backend facade and the navigation state and hands
//! out the bindings reachable from the active mode.

use std::sync::Arc;

use crate::adapters::ReqwestHttpClient;
use crate::api::ApiFacade;
use crate::bindings::{BatchBindings, OptimizationBindings};
use crate::error::NavigationError;
use crate::health_check::{ConnectionMonitor, MonitorHandle};
use crate::startup::DashboardConfig;
use crate::state::{Location, Mode, NavigationState, Page};
use crate::traits::{HttpClient, HttpError};

/// Process-wide dashboard context.
#[derive(Debug)]
pub struct AppContext {
    api: Arc<ApiFacade>,
    navigation: NavigationState,
    config: DashboardConfig,
}

impl AppContext {
    /// Build a context over an arbitrary HTTP client.
    pub fn new(config: DashboardConfig, client: Arc<dyn HttpClient>) -> Self {
        let api = ApiFacade::new(config.api_url.clone(), client).with_data_root(config.data_root.clone());
        Self {
            api: Arc::new(api),
            navigation: NavigationState::new(),
            config,
        }
    }

    /// Build a context backed by reqwest, honouring the configured timeout.
    pub fn from_config(config: DashboardConfig) -> Result<Self, HttpError> {
        let client = match config.request_timeout {
            Some(timeout) => ReqwestHttpClient::with_timeout(timeout)?,
            None => ReqwestHttpClient::new(),
        };
        tracing::debug!(api_url = %config.api_url, data_root = %config.data_root, "dashboard context created");
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn api(&self) -> &Arc<ApiFacade> {
        &self.api
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn location(&self) -> Location {
        self.navigation.location()
    }

    pub fn set_mode(&self, mode: Mode) {
        self.navigation.set_mode(mode);
    }

    pub fn set_page(&self, page: Page) -> Result<(), NavigationError> {
        self.navigation.set_page(page)
    }

    /// Fresh batch bindings. Fails unless batch mode is active.
    pub fn batch_bindings(&self) -> Result<BatchBindings, NavigationError> {
        self.require_mode(Mode::Batch)?;
        Ok(BatchBindings::new(self.api.clone()))
    }

    /// Fresh optimization bindings. Fails unless optimization mode is active.
    pub fn optimization_bindings(&self) -> Result<OptimizationBindings, NavigationError> {
        self.require_mode(Mode::Optimization)?;
        Ok(OptimizationBindings::new(self.api.clone()))
    }

    /// Start polling backend health at the configured period.
    ///
    /// Polling stops when the returned handle is dropped.
    pub fn start_monitor(&self) -> MonitorHandle {
        ConnectionMonitor::new(self.api.clone(), self.config.poll_interval).activate()
    }

    fn require_mode(&self, requested: Mode) -> Result<(), NavigationError> {
        let active = self.navigation.mode();
        if active == requested {
            Ok(())
        } else {
            Err(NavigationError::ModeMismatch { requested, active })
        }
    }
}
