//! Observable client state.
//!
//! - [`RequestLifecycle`]: loading/error/data tracking for one backend call
//! - [`NavigationState`]: active mode and page

pub mod navigation;
pub mod request;

pub use navigation::{Location, Mode, NavigationState, Page};
pub use request::{RequestLifecycle, RequestState};
