//! Subtuber HTTP client
//!
//! One configured [`ApiClient`] carries the base URL, timeout and default
//! headers, injects the bearer token from a [`subtuber_core::TokenStore`] on
//! every request, and exposes one typed method per backend endpoint.

pub mod client;
pub mod error;
pub mod types;

pub use client::error::ClientError;
pub use client::{
    ApiClient, ApiClientBuilder, BASE_URL_ENV, DEFAULT_BASE_PATH, DEFAULT_TIMEOUT,
    base_path_from_env,
};
pub use error::{ApiError, Result};
