//! Test doubles.

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
