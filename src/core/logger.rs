//! Logger handle and builder
//!
//! A [`Logger`] is a cheap, cloneable value: the sink set lives behind an
//! `Arc` and derivation (`with`, `with_caller_skip`, `with_appender`) returns
//! a new handle instead of touching the receiver. The console threshold is the
//! only state shared for writing; every handle derived from the same logger
//! sees its changes.

use super::appender::Appender;
use super::bootstrap;
use super::caller::Caller;
use super::config::{LoggerConfiguration, SinkConfig};
use super::dispatcher::Dispatcher;
use super::error::{LoggerError, Result};
use super::field::Field;
use super::level::{AtomicLevel, Level};
use super::metrics::LoggerMetrics;
use super::record::Record;
use super::stdlog::StdLogWriter;
use super::sugar::SugarLogger;
use crate::appenders::{Clock, ConsoleAppender, SystemClock};
use std::convert::Infallible;
use std::io::Write;
use std::panic::Location;
use std::sync::Arc;

#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    console_level: AtomicLevel,
    context: Arc<[Field]>,
    /// `None` reports the tracked call site; `Some(n)` walks the stack
    caller_skip: Option<usize>,
}

impl Logger {
    /// Build a logger from configuration.
    ///
    /// A file sink that cannot be opened is left out and reported as a warning
    /// line on stderr. Use [`Logger::try_new`] to fail instead.
    #[must_use]
    pub fn new(config: &LoggerConfiguration) -> Self {
        Self::builder().config(config.clone()).build()
    }

    /// Build a logger from configuration, failing on the first sink that
    /// cannot be opened
    pub fn try_new(config: &LoggerConfiguration) -> Result<Self> {
        Self::builder().config(config.clone()).try_build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        self.emit(level, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Debug, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Info, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Warn, message, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Error, message, fields, Location::caller());
    }

    /// Worse than an error for the caller; written with level `error`
    #[track_caller]
    pub fn critical(&self, message: &str, fields: &[Field]) {
        self.emit(Level::Error, message, fields, Location::caller());
    }

    /// Handle whose records carry `fields` before the call's own fields
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Self {
        if fields.is_empty() {
            return self.clone();
        }
        let mut context = Vec::with_capacity(self.context.len() + fields.len());
        context.extend_from_slice(&self.context);
        context.extend_from_slice(fields);
        Self {
            context: context.into(),
            ..self.clone()
        }
    }

    /// Handle reporting the call site `skip` frames further up the stack.
    /// Skips accumulate across derivations.
    #[must_use]
    pub fn with_caller_skip(&self, skip: usize) -> Self {
        if skip == 0 {
            return self.clone();
        }
        Self {
            caller_skip: Some(self.caller_skip.unwrap_or(0) + skip),
            ..self.clone()
        }
    }

    /// Handle resolving the call site from the stack rather than the
    /// tracked location, for entry points reached through foreign frames
    pub(crate) fn with_stack_caller(&self) -> Self {
        Self {
            caller_skip: Some(self.caller_skip.unwrap_or(0)),
            ..self.clone()
        }
    }

    /// Handle dispatching to this logger's sinks plus `appender`
    #[must_use]
    pub fn with_appender<A: Appender + 'static>(&self, appender: A) -> Self {
        Self {
            dispatcher: Arc::new(self.dispatcher.with_appender(Arc::new(appender))),
            ..self.clone()
        }
    }

    /// Change the console threshold by name; unknown names mean `info`
    pub fn set_console_level(&self, level: &str) {
        self.console_level.set_level(Level::from_name(level));
    }

    pub fn set_console_threshold(&self, level: Level) {
        self.console_level.set_level(level);
    }

    pub fn console_level(&self) -> Level {
        self.console_level.level()
    }

    pub fn sugar(&self) -> SugarLogger {
        SugarLogger::new(self.clone())
    }

    /// Writer turning each line into an `info` record tagged `source=stdlog`
    pub fn std_log_writer(&self) -> StdLogWriter {
        StdLogWriter::new(self.with_stack_caller(), Level::Info, &[])
    }

    pub fn std_log_writer_at(&self, level: Level, fields: &[Field]) -> StdLogWriter {
        StdLogWriter::new(self.with_stack_caller(), level, fields)
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        self.dispatcher.enabled(level)
    }

    pub fn flush(&self) -> Result<()> {
        self.dispatcher.flush()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.dispatcher.metrics()
    }

    /// Names of the attached sinks, in dispatch order
    pub fn sink_names(&self) -> Vec<&str> {
        self.dispatcher.names()
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        if !self.dispatcher.enabled(level) {
            return;
        }
        let caller = Caller::resolve(location, self.caller_skip);
        self.emit_with_caller(level, message, fields, caller);
    }

    pub(crate) fn emit_with_caller(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        caller: Caller,
    ) {
        let mut all = Vec::with_capacity(self.context.len() + fields.len());
        all.extend_from_slice(&self.context);
        all.extend_from_slice(fields);

        let record = Record::new(level, message)
            .with_caller(caller)
            .with_fields(all);
        self.dispatcher.dispatch(&record);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(&LoggerConfiguration::default())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.dispatcher.names())
            .field("console_level", &self.console_level.level())
            .field("context", &self.context)
            .field("caller_skip", &self.caller_skip)
            .finish()
    }
}

/// Builder for [`Logger`]
///
/// # Example
///
/// ```
/// use rust_logger_facade::appenders::MemoryWriter;
/// use rust_logger_facade::{Field, Logger, LoggerConfiguration};
///
/// let console = MemoryWriter::new();
/// let logger = Logger::builder()
///     .config(LoggerConfiguration::default())
///     .console_writer(console.clone())
///     .build();
///
/// logger.info("ready", &[Field::int("port", 8080i64)]);
/// assert!(console.contents().contains("\"port\":8080"));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfiguration,
    console_writer: Option<Box<dyn Write + Send>>,
    appenders: Vec<Arc<dyn Appender>>,
    clock: Arc<dyn Clock>,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoggerConfiguration::default(),
            console_writer: None,
            appenders: Vec::new(),
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Send console output somewhere other than stderr
    #[must_use = "builder methods return a new value"]
    pub fn console_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// Attach an extra sink after the configured ones
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Arc::new(appender));
        self
    }

    /// Time source for file rotation
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build, leaving out (and reporting) file sinks that cannot be opened
    pub fn build(self) -> Logger {
        let lenient = self.assemble(|sink: &SinkConfig, e: LoggerError| {
            bootstrap::report(
                Level::Warn,
                "log sink could not be opened, continuing without it",
                &[
                    Field::string("path", sink.path.display().to_string()),
                    Field::error(&e),
                ],
            );
            Ok::<(), Infallible>(())
        });
        match lenient {
            Ok(logger) => logger,
            Err(never) => match never {},
        }
    }

    /// Build, failing on the first file sink that cannot be opened
    pub fn try_build(self) -> Result<Logger> {
        self.assemble(|_: &SinkConfig, e: LoggerError| Err(e))
    }

    fn assemble<E>(
        self,
        mut on_open_error: impl FnMut(&SinkConfig, LoggerError) -> std::result::Result<(), E>,
    ) -> std::result::Result<Logger, E> {
        let console_level = AtomicLevel::new(self.config.console_threshold());
        let mut console = ConsoleAppender::new()
            .with_encoder(self.config.console_encoder())
            .with_level(console_level.clone());
        if let Some(writer) = self.console_writer {
            console = console.with_writer(writer);
        }

        let mut appenders: Vec<Arc<dyn Appender>> = vec![Arc::new(console)];
        for sink in self.config.file_sinks() {
            match sink.open(Arc::clone(&self.clock)) {
                Ok(appender) => appenders.push(Arc::new(appender)),
                Err(e) => on_open_error(&sink, e)?,
            }
        }
        appenders.extend(self.appenders);

        Ok(Logger {
            dispatcher: Arc::new(Dispatcher::new(appenders)),
            console_level,
            context: Arc::from(Vec::new()),
            caller_skip: None,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
