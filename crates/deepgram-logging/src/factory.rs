//! Logger factories: the pluggable backend behind the registry.

use std::sync::Arc;

use tracing::{debug, error, info, trace, warn};

use crate::{Level, Logger, LoggerError, NullLogger, Record, TRACING_TARGET};

/// Produces loggers for named categories.
///
/// Implement this trait to route the client's log output into another
/// logging system.
pub trait LoggerFactory: Send + Sync {
    /// Create a logger for `category`.
    fn create_logger(&self, category: &str) -> Result<Arc<dyn Logger>, LoggerError>;

    /// Release any resources held by the factory.
    ///
    /// Called once when the factory is replaced. Loggers already handed out
    /// stay usable afterwards.
    fn dispose(&self) {}
}

/// Factory used before any other is installed. All of its loggers are silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLoggerFactory;

impl LoggerFactory for NullLoggerFactory {
    fn create_logger(&self, _category: &str) -> Result<Arc<dyn Logger>, LoggerError> {
        Ok(Arc::new(NullLogger))
    }
}

/// Factory forwarding records to `tracing` events.
///
/// Every event uses the [`TRACING_TARGET`] target; the category is attached
/// as a `category` field since `tracing` targets must be static.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLoggerFactory;

impl LoggerFactory for TracingLoggerFactory {
    fn create_logger(&self, category: &str) -> Result<Arc<dyn Logger>, LoggerError> {
        if category.trim().is_empty() {
            return Err(LoggerError::InvalidCategory(category.to_string()));
        }
        Ok(Arc::new(TracingLogger))
    }
}

struct TracingLogger;

impl Logger for TracingLogger {
    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::ERROR => tracing::enabled!(target: TRACING_TARGET, Level::ERROR),
            Level::WARN => tracing::enabled!(target: TRACING_TARGET, Level::WARN),
            Level::INFO => tracing::enabled!(target: TRACING_TARGET, Level::INFO),
            Level::DEBUG => tracing::enabled!(target: TRACING_TARGET, Level::DEBUG),
            _ => tracing::enabled!(target: TRACING_TARGET, Level::TRACE),
        }
    }

    fn log(&self, record: &Record<'_>) {
        let category = record.category();
        let message = record.args();
        match record.level() {
            Level::ERROR => error!(target: TRACING_TARGET, category = category, "{}", message),
            Level::WARN => warn!(target: TRACING_TARGET, category = category, "{}", message),
            Level::INFO => info!(target: TRACING_TARGET, category = category, "{}", message),
            Level::DEBUG => debug!(target: TRACING_TARGET, category = category, "{}", message),
            _ => trace!(target: TRACING_TARGET, category = category, "{}", message),
        }
    }
}
