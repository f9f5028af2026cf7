//! Trait seams for dependency injection.
//!
//! - [`HttpClient`]: executes a [`Request`] against the backend

pub mod http;

pub use http::{merge_headers, Headers, HttpClient, HttpError, Method, Request, Response};
