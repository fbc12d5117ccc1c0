//! Usage API client for Deepgram.
//!
//! Provides the request log DTOs and a `reqwest` client that lists requests
//! made against a project.

mod client;
mod model;

use async_trait::async_trait;
pub use client::UsageClient;
use deepgram_core::CoreError;
pub use model::{ListAllRequestsOptions, ListAllRequestsResponse, UsageRequest};
use thiserror::Error;

/// Errors that can occur when calling the usage API.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid request parameters: {0}")]
    InvalidParameters(#[from] CoreError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for usage operations.
pub type Result<T> = std::result::Result<T, UsageError>;

/// Trait for usage backends.
#[async_trait]
pub trait Usage: Send + Sync {
    /// List the requests made against `project_id`, filtered by `options`.
    async fn list_all_requests(
        &self,
        project_id: &str,
        options: &ListAllRequestsOptions,
    ) -> Result<ListAllRequestsResponse>;

    /// Returns the name of this backend for logging/debugging.
    fn name(&self) -> &str;
}
