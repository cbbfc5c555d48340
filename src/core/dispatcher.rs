//! Fan-out of records to every admitting appender

use super::appender::Appender;
use super::bootstrap;
use super::error::Result;
use super::field::Field;
use super::level::Level;
use super::metrics::LoggerMetrics;
use super::record::Record;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Ordered set of independent sinks.
///
/// **Per-Appender Isolation**: each append runs under `catch_unwind`, so an
/// appender that errors or panics only loses its own copy of the record.
pub struct Dispatcher {
    appenders: Vec<Arc<dyn Appender>>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(appenders: Vec<Arc<dyn Appender>>) -> Self {
        Self {
            appenders,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    /// Same sinks plus one more; existing sinks and metrics are shared
    #[must_use]
    pub fn with_appender(&self, appender: Arc<dyn Appender>) -> Self {
        let mut appenders = self.appenders.clone();
        appenders.push(appender);
        Self {
            appenders,
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Whether any sink would accept a record of `level`
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.appenders.iter().any(|a| a.enabled(level))
    }

    pub fn dispatch(&self, record: &Record) {
        let mut has_error = false;

        for appender in self.appenders.iter().filter(|a| a.enabled(record.level)) {
            match catch_unwind(AssertUnwindSafe(|| appender.append(record))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    bootstrap::report(
                        Level::Error,
                        "log sink write failed",
                        &[Field::string("sink", appender.name()), Field::error(&e)],
                    );
                    has_error = true;
                }
                Err(panic) => {
                    bootstrap::report(
                        Level::Error,
                        "log sink panicked",
                        &[
                            Field::string("sink", appender.name()),
                            Field::string("panic", panic_message(panic.as_ref())),
                        ],
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    /// Flush every sink; the first failure is returned after all were tried
    pub fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for appender in &self.appenders {
            let result = catch_unwind(AssertUnwindSafe(|| appender.flush()))
                .unwrap_or_else(|panic| {
                    Err(super::error::LoggerError::other(format!(
                        "sink '{}' panicked during flush: {}",
                        appender.name(),
                        panic_message(panic.as_ref())
                    )))
                });
            if let Err(e) = result {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.appenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appenders.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.appenders.iter().map(|a| a.name()).collect()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
