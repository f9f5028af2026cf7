//! Implementations of the [`HttpClient`](crate::traits::HttpClient) seam.
//!
//! - [`ReqwestHttpClient`]: real HTTP
//! - [`mock::MockHttpClient`]: recorded, scripted responses for tests

pub mod mock;
pub mod reqwest_http;

pub use mock::MockHttpClient;
pub use reqwest_http::ReqwestHttpClient;
