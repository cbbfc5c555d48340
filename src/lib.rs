//! # Rust Logger Facade
//!
//! Structured logging with several independently filtered sinks.
//!
//! ## Features
//!
//! - **Routing**: a console sink with a threshold adjustable at runtime, an
//!   optional console mirror file, and per-level files that receive exactly one
//!   severity
//! - **Daily rotation**: files named `<base>-YYYYMMDD.log`, pruned after a
//!   retention window
//! - **Never fails the caller**: encoding and sink errors degrade to a fixed
//!   line or a warning on stderr
//! - **Global functions**: usable before configuration through a JSON-on-stderr
//!   fallback
//!
//! ## Example
//!
//! ```
//! use rust_logger_facade::appenders::MemoryWriter;
//! use rust_logger_facade::{Field, Logger, LoggerConfiguration};
//!
//! let console = MemoryWriter::new();
//! let logger = Logger::builder()
//!     .config(LoggerConfiguration::default())
//!     .console_writer(console.clone())
//!     .build();
//!
//! let request = logger.with(&[Field::string("request_id", "r-17")]);
//! request.info("handled", &[Field::uint("status", 200u64)]);
//! request.critical("backend unreachable", &[]);
//!
//! let lines = console.lines();
//! assert!(lines[0].contains("\"request_id\":\"r-17\""));
//! assert!(lines[1].starts_with("{\"level\":\"error\""));
//! ```

pub mod appenders;
pub mod core;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Admission, Appender, AtomicLevel, Field, FieldValue, Level, Logger, LoggerBuilder,
        LoggerConfiguration, LoggerError, Result, SugarLogger,
    };
    pub use crate::global::{global_logger, init_global_logger};
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use self::core::{
    pair_key_values, redirect_std_log, Admission, Appender, AtomicLevel, BootstrapLogger, Caller,
    Encoder, Field, FieldValue, Level, Logger, LoggerBuilder, LoggerConfiguration, LoggerError,
    LoggerMetrics, OutputFormat, Record, Result, SinkConfig, StdLogBridge, StdLogWriter,
    SugarLogger, TimestampFormat, ENCODE_FAILURE_LINE, LEVEL_DEBUG, LEVEL_ERROR, LEVEL_INFO,
    LEVEL_WARN,
};
pub use global::{
    critical, critical_w, debug, debug_w, error, error_w, global_logger, global_logger_with_skip,
    info, info_w, init_global_logger, is_global_logger_initialized, warn, warn_w, LogBackend,
};
#[cfg(any(test, feature = "test-util"))]
pub use global::{
    capture_fallback_output_for_test, globally_disable_debug_log_for_test,
    globally_enable_debug_log_for_test,
};
