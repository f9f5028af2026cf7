//! Optimization-mode bindings: model listing, training and setpoint
//! optimization.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::EndpointBinding;
use crate::api::{ApiFacade, ModelInfo, ModelListing, OptimizationResult, Recommendation, TrainResult};
use crate::error::ApiResult;
use crate::state::RequestLifecycle;

/// Trained models, grouped by folder.
#[derive(Debug)]
pub struct ModelListBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<ModelListing>,
}

impl ModelListBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn fetch(&self, subfolder: Option<&str>) -> ApiResult<ModelListing> {
        self.lifecycle.execute(|| self.api.list_models(subfolder)).await
    }

    pub fn models(&self) -> Vec<ModelInfo> {
        self.view(|listing| listing.models.clone())
    }

    pub fn folders(&self) -> Vec<String> {
        self.view(|listing| listing.folders.clone())
    }

    pub fn folder_counts(&self) -> BTreeMap<String, u64> {
        self.view(|listing| listing.folder_counts.clone())
    }

    pub fn total_models(&self) -> u64 {
        self.view(|listing| listing.total_models)
    }

    pub fn current_folder(&self) -> Option<String> {
        self.view(|listing| listing.current_folder.clone())
    }

    /// Problem the backend reported inside a successful listing.
    pub fn listing_error(&self) -> Option<String> {
        self.view(|listing| listing.error.clone())
    }

    /// Model with the lowest MAPE among those reporting one.
    pub fn best_model(&self) -> Option<ModelInfo> {
        self.view(|listing| {
            listing
                .models
                .iter()
                .filter(|m| m.mape.is_some())
                .min_by(|a, b| a.mape.partial_cmp(&b.mape).unwrap_or(std::cmp::Ordering::Equal))
                .cloned()
        })
    }
}

impl EndpointBinding for ModelListBinding {
    type Output = ModelListing;

    fn lifecycle(&self) -> &RequestLifecycle<ModelListing> {
        &self.lifecycle
    }
}

#[derive(Debug)]
pub struct TrainBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<TrainResult>,
}

impl TrainBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn train(
        &self,
        model_name: &str,
        feature_mapping: serde_json::Value,
    ) -> ApiResult<TrainResult> {
        self.lifecycle
            .execute(|| self.api.train_model(model_name, feature_mapping))
            .await
    }

    /// Backend-reported training status, empty before any request.
    pub fn status(&self) -> String {
        self.view(|result| result.status.clone())
    }
}

impl EndpointBinding for TrainBinding {
    type Output = TrainResult;

    fn lifecycle(&self) -> &RequestLifecycle<TrainResult> {
        &self.lifecycle
    }
}

#[derive(Debug)]
pub struct OptimizeBinding {
    api: Arc<ApiFacade>,
    lifecycle: RequestLifecycle<OptimizationResult>,
}

impl OptimizeBinding {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            api,
            lifecycle: RequestLifecycle::new(),
        }
    }

    pub async fn optimize(
        &self,
        model_name: &str,
        input_data: BTreeMap<String, f64>,
    ) -> ApiResult<OptimizationResult> {
        self.lifecycle
            .execute(|| self.api.optimize(model_name, input_data))
            .await
    }

    pub fn predicted_power(&self) -> Option<f64> {
        self.view(|result| Some(result.predicted_power))
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.view(|result| result.recommendations.clone())
    }
}

impl EndpointBinding for OptimizeBinding {
    type Output = OptimizationResult;

    fn lifecycle(&self) -> &RequestLifecycle<OptimizationResult> {
        &self.lifecycle
    }
}

/// Every binding reachable from optimization mode.
#[derive(Debug)]
pub struct OptimizationBindings {
    pub models: ModelListBinding,
    pub train: TrainBinding,
    pub optimize: OptimizeBinding,
}

impl OptimizationBindings {
    pub fn new(api: Arc<ApiFacade>) -> Self {
        Self {
            models: ModelListBinding::new(api.clone()),
            train: TrainBinding::new(api.clone()),
            optimize: OptimizeBinding::new(api),
        }
    }
}
