//! View-facing endpoint bindings.
//!
//! A binding pairs one [`ApiFacade`](crate::api::ApiFacade) method with one
//! [`RequestLifecycle`] and narrows the response to what a page reads.
//! Bindings are grouped per mode: [`BatchBindings`] and
//! [`OptimizationBindings`].

pub mod batch;
pub mod optimization;

use tokio::sync::watch;

use crate::state::{RequestLifecycle, RequestState};

pub use batch::{
    BatchBindings, CleanBinding, ColumnStatsBinding, DataPreviewBinding, FileListBinding,
    ParseBinding,
};
pub use optimization::{ModelListBinding, OptimizationBindings, OptimizeBinding, TrainBinding};

/// Common read surface of every binding.
pub trait EndpointBinding {
    /// Decoded response payload.
    type Output: Clone;

    fn lifecycle(&self) -> &RequestLifecycle<Self::Output>;

    fn loading(&self) -> bool {
        self.lifecycle().state().is_loading()
    }

    fn error(&self) -> Option<String> {
        self.lifecycle().state().error().map(str::to_string)
    }

    /// Full payload of the last successful call, if any.
    fn data(&self) -> Option<Self::Output> {
        self.lifecycle().state().data().cloned()
    }

    fn subscribe(&self) -> watch::Receiver<RequestState<Self::Output>> {
        self.lifecycle().subscribe()
    }

    /// Read a narrowed field from the payload, or `T::default()` before any
    /// data arrives.
    fn view<T: Default>(&self, project: impl FnOnce(&Self::Output) -> T) -> T {
        self.lifecycle()
            .state()
            .data()
            .map(project)
            .unwrap_or_default()
    }
}
