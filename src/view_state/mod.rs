//! View selection.
//!
//! Maps the current page to whatever renders it, independent of the request
//! machinery.

pub mod dispatch;

pub use dispatch::{resolve_page, ViewDispatch, FALLBACK_PAGE};
