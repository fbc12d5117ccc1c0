//! Client-side support for the Deepgram speech API.
//!
//! Re-exports the request plumbing, logging facade and usage client from the
//! member crates.

pub use deepgram_core::{
    APP_NAME, CoreError, Credentials, CredentialsManager, DEFAULT_API_URL, EncodedParam,
    LIBRARY_VERSION, ParamValue, QueryParams, UserAgent, encode_parameters, platform_version,
    user_agent,
};
pub use deepgram_logging::{
    DEFAULT_LOG_LEVEL, Level, LogContext, Logger, LoggerError, LoggerFactory, LoggerHandle,
    NullLogger, NullLoggerFactory, Record, TRACING_TARGET, TracingLoggerFactory, get_logger,
    init_tracing, set_factory,
};
pub use deepgram_usage::{
    ListAllRequestsOptions, ListAllRequestsResponse, Usage, UsageClient, UsageError, UsageRequest,
};

// Version from this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
