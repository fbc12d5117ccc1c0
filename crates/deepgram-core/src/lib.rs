//! Core request plumbing for the Deepgram client.
//!
//! This crate turns option structs into query strings, builds the identity
//! string sent as the `User-Agent`, and holds the API credentials.

mod credentials;
mod params;
mod user_agent;

pub use credentials::{Credentials, CredentialsManager, DEFAULT_API_URL};
pub use params::{EncodedParam, ParamValue, QueryParams, encode_parameters};
use thiserror::Error;
pub use user_agent::{LIBRARY_VERSION, UserAgent, platform_version, user_agent};

/// Application name
pub const APP_NAME: &str = "deepgram";

/// Errors produced by the core helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to convert parameters: {0}")]
    InvalidParameters(#[from] serde_json::Error),

    #[error("Parameters must be an object or null, got {0}")]
    UnsupportedShape(&'static str),

    #[error("Library version metadata is missing")]
    MetadataMissing,
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
