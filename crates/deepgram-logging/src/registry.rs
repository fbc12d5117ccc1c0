//! Registry mapping logger categories to cached handles.
//!
//! Access is guarded by a `parking_lot::RwLock`. Replacing the factory and
//! clearing the cache happen under one write lock, so a lookup either sees
//! the old factory with its handles or the new factory with an empty cache.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::{LoggerFactory, LoggerHandle, NullLoggerFactory};

struct Inner {
    factory: Box<dyn LoggerFactory>,
    loggers: HashMap<String, LoggerHandle>,
}

/// A logging context: the active factory plus its handle cache.
///
/// Components may be given their own context; [`LogContext::global`] is the
/// process-wide one used by [`get_logger`] and [`set_factory`].
pub struct LogContext {
    inner: RwLock<Inner>,
}

static GLOBAL: Lazy<LogContext> = Lazy::new(LogContext::new);

impl LogContext {
    /// Create a context backed by [`NullLoggerFactory`].
    pub fn new() -> Self {
        Self::with_factory(NullLoggerFactory)
    }

    pub fn with_factory(factory: impl LoggerFactory + 'static) -> Self {
        Self {
            inner: RwLock::new(Inner {
                factory: Box::new(factory),
                loggers: HashMap::new(),
            }),
        }
    }

    /// The process-wide context.
    pub fn global() -> &'static LogContext {
        &GLOBAL
    }

    /// Install `factory`, dropping every cached handle.
    ///
    /// The previous factory is disposed after the lock is released.
    pub fn set_factory(&self, factory: impl LoggerFactory + 'static) {
        self.set_boxed_factory(Box::new(factory));
    }

    pub fn set_boxed_factory(&self, factory: Box<dyn LoggerFactory>) {
        let previous = {
            let mut inner = self.inner.write();
            inner.loggers.clear();
            std::mem::replace(&mut inner.factory, factory)
        };
        previous.dispose();
    }

    /// Return the cached handle for `category`, creating it on first use.
    ///
    /// Never fails: if the factory cannot produce a logger, a null handle is
    /// cached in its place.
    pub fn get_logger(&self, category: &str) -> LoggerHandle {
        if let Some(handle) = self.inner.read().loggers.get(category) {
            return handle.clone();
        }

        let mut inner = self.inner.write();
        let Inner { factory, loggers } = &mut *inner;
        match loggers.entry(category.to_string()) {
            Entry::Occupied(o) => o.get().clone(),
            Entry::Vacant(v) => {
                let handle = match factory.create_logger(category) {
                    Ok(logger) => LoggerHandle::new(category, logger),
                    Err(_) => LoggerHandle::null(category),
                };
                v.insert(handle.clone());
                handle
            }
        }
    }

    /// Number of cached handles.
    pub fn cached_len(&self) -> usize {
        self.inner.read().loggers.len()
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Install `factory` on the global context.
pub fn set_factory(factory: impl LoggerFactory + 'static) {
    LogContext::global().set_factory(factory);
}

/// Fetch a handle for `category` from the global context.
pub fn get_logger(category: &str) -> LoggerHandle {
    LogContext::global().get_logger(category)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::test_support::CapturingLogger;
    use crate::{Level, Logger, LoggerError};

    #[derive(Default)]
    struct CountingFactory {
        created: Arc<AtomicUsize>,
        disposed: Arc<AtomicUsize>,
    }

    impl LoggerFactory for CountingFactory {
        fn create_logger(&self, _category: &str) -> Result<Arc<dyn Logger>, LoggerError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(CapturingLogger::default()))
        }

        fn dispose(&self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FailingFactory;

    impl LoggerFactory for FailingFactory {
        fn create_logger(&self, _category: &str) -> Result<Arc<dyn Logger>, LoggerError> {
            Err(LoggerError::Unavailable("backend offline".into()))
        }
    }

    #[test]
    fn test_default_context_is_silent() {
        let context = LogContext::new();
        let logger = context.get_logger("x");
        assert!(!logger.is_enabled(Level::ERROR));
        logger.error("discarded");
    }

    #[test]
    fn test_handles_are_cached() {
        let factory = CountingFactory::default();
        let created = factory.created.clone();
        let context = LogContext::with_factory(factory);

        let first = context.get_logger("x");
        let second = context.get_logger("x");
        let other = context.get_logger("y");

        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&other));
        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(context.cached_len(), 2);
    }

    #[test]
    fn test_set_factory_invalidates_cache() {
        let old = CountingFactory::default();
        let disposed = old.disposed.clone();
        let context = LogContext::with_factory(old);
        let before = context.get_logger("x");

        context.set_factory(CountingFactory::default());
        assert_eq!(disposed.load(Ordering::SeqCst), 1);
        assert_eq!(context.cached_len(), 0);

        let after = context.get_logger("x");
        assert!(!before.ptr_eq(&after));
        assert!(after.ptr_eq(&context.get_logger("x")));
        // Old handles stay usable.
        before.info("still fine");
    }

    #[test]
    fn test_failing_factory_yields_null_handle() {
        let context = LogContext::with_factory(FailingFactory);
        let logger = context.get_logger("x");
        assert!(!logger.is_enabled(Level::ERROR));
        assert!(logger.ptr_eq(&context.get_logger("x")));
    }

    #[test]
    fn test_concurrent_lookups_share_handle() {
        let factory = CountingFactory::default();
        let created = factory.created.clone();
        let context = Arc::new(LogContext::with_factory(factory));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let context = context.clone();
                thread::spawn(move || context.get_logger("shared"))
            })
            .collect();
        let loggers: Vec<LoggerHandle> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(created.load(Ordering::SeqCst), 1);
        assert!(loggers.windows(2).all(|w| w[0].ptr_eq(&w[1])));
    }

    #[test]
    fn test_concurrent_set_and_get() {
        let context = Arc::new(LogContext::new());

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let context = context.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        context.set_factory(CountingFactory::default());
                    }
                })
            })
            .collect();
        let readers: Vec<_> = (0..4)
            .map(|i| {
                let context = context.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        context.get_logger(&format!("c{}", (i + j) % 3)).info("tick");
                    }
                })
            })
            .collect();

        for t in writers.into_iter().chain(readers) {
            t.join().unwrap();
        }
        assert!(context.cached_len() <= 3);
    }

    #[test]
    fn test_global_context() {
        let before = get_logger("deepgram::registry-test");
        assert!(before.ptr_eq(&get_logger("deepgram::registry-test")));

        set_factory(CountingFactory::default());
        let after = get_logger("deepgram::registry-test");
        assert!(!before.ptr_eq(&after));

        set_factory(NullLoggerFactory);
    }
}
