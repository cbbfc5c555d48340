//! Process-wide logging functions
//!
//! Until [`init_global_logger`] runs, every call here goes to the bootstrap
//! fallback: one JSON object per line on stderr. Installation happens once;
//! afterwards all calls route through the installed [`Logger`] and never
//! through the fallback again.
//!
//! Installation is synchronized, so it is safe to race with logging calls.
//! A call that observes the uninstalled state simply goes to the fallback.

use crate::core::bootstrap::{BootstrapLogger, STDERR_FALLBACK};
use crate::core::{Field, FieldValue, Level, Logger, LoggerError, Result};
use std::panic::Location;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Destination of the global functions in a given phase
pub trait LogBackend: Send + Sync {
    fn log_fields(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    );

    fn log_pairs(
        &self,
        level: Level,
        message: &str,
        args: &[FieldValue],
        location: &'static Location<'static>,
    );
}

impl LogBackend for BootstrapLogger {
    fn log_fields(&self, level: Level, message: &str, fields: &[Field], _: &'static Location<'static>) {
        self.log(level, message, fields);
    }

    fn log_pairs(
        &self,
        level: Level,
        message: &str,
        args: &[FieldValue],
        _: &'static Location<'static>,
    ) {
        BootstrapLogger::log_pairs(self, level, message, args);
    }
}

impl LogBackend for Logger {
    fn log_fields(
        &self,
        level: Level,
        message: &str,
        fields: &[Field],
        location: &'static Location<'static>,
    ) {
        self.emit(level, message, fields, location);
    }

    fn log_pairs(
        &self,
        level: Level,
        message: &str,
        args: &[FieldValue],
        location: &'static Location<'static>,
    ) {
        self.sugar().emit(level, message, args, location);
    }
}

fn backend() -> &'static dyn LogBackend {
    match GLOBAL.get() {
        Some(logger) => logger,
        None => &STDERR_FALLBACK,
    }
}

/// Install `logger` as the process-wide logger.
///
/// # Errors
///
/// [`LoggerError::AlreadyInitialized`] if a logger was installed before; the
/// first one stays in place.
pub fn init_global_logger(logger: Logger) -> Result<()> {
    GLOBAL
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

pub fn is_global_logger_initialized() -> bool {
    GLOBAL.get().is_some()
}

/// Handle to the installed logger, if any
pub fn global_logger() -> Option<Logger> {
    GLOBAL.get().cloned()
}

/// Installed logger reporting call sites `skip` frames further up
pub fn global_logger_with_skip(skip: usize) -> Option<Logger> {
    GLOBAL.get().map(|logger| logger.with_caller_skip(skip))
}

#[track_caller]
pub fn debug(message: &str, fields: &[Field]) {
    backend().log_fields(Level::Debug, message, fields, Location::caller());
}

#[track_caller]
pub fn info(message: &str, fields: &[Field]) {
    backend().log_fields(Level::Info, message, fields, Location::caller());
}

#[track_caller]
pub fn warn(message: &str, fields: &[Field]) {
    backend().log_fields(Level::Warn, message, fields, Location::caller());
}

#[track_caller]
pub fn error(message: &str, fields: &[Field]) {
    backend().log_fields(Level::Error, message, fields, Location::caller());
}

/// Written with level `error`
#[track_caller]
pub fn critical(message: &str, fields: &[Field]) {
    backend().log_fields(Level::Error, message, fields, Location::caller());
}

#[track_caller]
pub fn debug_w(message: &str, args: &[FieldValue]) {
    backend().log_pairs(Level::Debug, message, args, Location::caller());
}

#[track_caller]
pub fn info_w(message: &str, args: &[FieldValue]) {
    backend().log_pairs(Level::Info, message, args, Location::caller());
}

#[track_caller]
pub fn warn_w(message: &str, args: &[FieldValue]) {
    backend().log_pairs(Level::Warn, message, args, Location::caller());
}

#[track_caller]
pub fn error_w(message: &str, args: &[FieldValue]) {
    backend().log_pairs(Level::Error, message, args, Location::caller());
}

#[track_caller]
pub fn critical_w(message: &str, args: &[FieldValue]) {
    backend().log_pairs(Level::Error, message, args, Location::caller());
}

/// Send the fallback's lines (and the crate's own warnings) to `writer`
/// instead of stderr
#[cfg(any(test, feature = "test-util"))]
pub fn capture_fallback_output_for_test<W: std::io::Write + Send + 'static>(writer: W) {
    STDERR_FALLBACK.set_writer(Some(Box::new(writer)));
}

/// Raise the installed logger's console threshold to `error`
#[cfg(any(test, feature = "test-util"))]
pub fn globally_disable_debug_log_for_test() {
    if let Some(logger) = GLOBAL.get() {
        logger.set_console_threshold(Level::Error);
    }
}

/// Lower the installed logger's console threshold to `debug`
#[cfg(any(test, feature = "test-util"))]
pub fn globally_enable_debug_log_for_test() {
    if let Some(logger) = GLOBAL.get() {
        logger.set_console_threshold(Level::Debug);
    }
}
