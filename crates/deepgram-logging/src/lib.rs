//! Logging facade for the Deepgram client crates.
//!
//! Library code never talks to a logging backend directly. Instead it asks
//! the registry for a [`LoggerHandle`] bound to a category and keeps it for
//! its lifetime. The backend is a pluggable [`LoggerFactory`]; until an
//! application installs one, every handle silently discards its records.

mod factory;
mod registry;

use std::fmt;
use std::sync::Arc;

pub use factory::{LoggerFactory, NullLoggerFactory, TracingLoggerFactory};
pub use registry::{LogContext, get_logger, set_factory};
use thiserror::Error;
pub use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter used by [`init_tracing`].
pub const LOG_ENV_VAR: &str = "DEEPGRAM_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// `tracing` target of every event emitted by [`TracingLoggerFactory`].
pub const TRACING_TARGET: &str = "deepgram";

/// Errors a [`LoggerFactory`] can report when asked for a logger.
///
/// These never reach callers of [`get_logger`]; the registry substitutes a
/// null handle instead.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Logger backend unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid logger category: {0:?}")]
    InvalidCategory(String),
}

/// A single log record handed to a [`Logger`].
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    level: Level,
    category: &'a str,
    args: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    pub fn new(level: Level, category: &'a str, args: fmt::Arguments<'a>) -> Self {
        Self {
            level,
            category,
            args,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn category(&self) -> &'a str {
        self.category
    }

    pub fn args(&self) -> &fmt::Arguments<'a> {
        &self.args
    }
}

/// Backend side of a logger handle.
pub trait Logger: Send + Sync {
    /// Whether records at `level` would be emitted.
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    /// Emit a record.
    fn log(&self, record: &Record<'_>);
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn log(&self, _record: &Record<'_>) {}
}

/// Shared handle through which a component emits log records.
///
/// Cloning is cheap and clones share identity (see [`LoggerHandle::ptr_eq`]).
#[derive(Clone)]
pub struct LoggerHandle {
    category: Arc<str>,
    inner: Arc<dyn Logger>,
}

impl LoggerHandle {
    pub fn new(category: impl Into<Arc<str>>, logger: Arc<dyn Logger>) -> Self {
        Self {
            category: category.into(),
            inner: logger,
        }
    }

    /// A handle that drops every record.
    pub fn null(category: impl Into<Arc<str>>) -> Self {
        Self::new(category, Arc::new(NullLogger))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.inner.enabled(level)
    }

    /// Returns true when both handles share the same backing logger.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.inner.enabled(level) {
            self.inner.log(&Record::new(level, &self.category, args));
        }
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(Level::ERROR, format_args!("{message}"));
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(Level::WARN, format_args!("{message}"));
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(Level::INFO, format_args!("{message}"));
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Level::DEBUG, format_args!("{message}"));
    }

    pub fn trace(&self, message: impl fmt::Display) {
        self.log(Level::TRACE, format_args!("{message}"));
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Install a `tracing` fmt subscriber filtered by [`LOG_ENV_VAR`].
///
/// Records routed through [`TracingLoggerFactory`] all share the
/// [`TRACING_TARGET`] target, with the logger category in a `category`
/// field. Filter them by target, e.g. `DEEPGRAM_LOG=deepgram=debug`; a
/// directive naming a crate path such as `deepgram_usage=debug` matches
/// nothing. Event fields cannot be used in filter directives.
///
/// Intended for binaries; libraries should leave subscriber setup to the
/// application. Returns false if a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
        )
        .try_init()
        .is_ok()
}
