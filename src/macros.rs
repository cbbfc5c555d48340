//! Logging macros with `format!`-style messages.
//!
//! Typed fields follow the format arguments after a `;`.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::appenders::MemoryWriter;
//! use rust_logger_facade::{info, Field, Logger};
//!
//! let console = MemoryWriter::new();
//! let logger = Logger::builder().console_writer(console.clone()).build();
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! info!(logger, "User {} logged in", "alice"; Field::int("attempt", 2i64));
//!
//! assert_eq!(console.lines().len(), 2);
//! ```

/// Log a formatted message at an explicit level.
///
/// ```
/// # use rust_logger_facade::{Level, Logger};
/// # let logger = Logger::default();
/// use rust_logger_facade::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.log($level, &format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, &format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_logger_facade::Logger;
/// # let logger = Logger::default();
/// use rust_logger_facade::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.debug(&format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(&format!($($arg)+), &[])
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.info(&format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(&format!($($arg)+), &[])
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.warn(&format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(&format!($($arg)+), &[])
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.error(&format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(&format!($($arg)+), &[])
    };
}

/// Log a critical message; it is written with level `error`.
///
/// ```
/// # use rust_logger_facade::Logger;
/// # let logger = Logger::default();
/// use rust_logger_facade::critical;
/// critical!(logger, "Database connection lost after {} retries", 3);
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {
        $logger.critical(&format!($fmt $(, $arg)*), &[$($field),+])
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.critical(&format!($($arg)+), &[])
    };
}

/// Build a wide-interface argument array of alternating keys and values.
///
/// ```
/// use rust_logger_facade::{kv, Logger};
///
/// let logger = Logger::default();
/// logger.sugar().info("request served", &kv!["path", "/health", "status", 200]);
/// ```
#[macro_export]
macro_rules! kv {
    ($($value:expr),* $(,)?) => {
        [$($crate::FieldValue::from($value)),*]
    };
}
