//! Core logger types and traits

pub mod appender;
pub mod bootstrap;
pub mod caller;
pub mod config;
pub mod dispatcher;
pub mod encoder;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod stdlog;
pub mod sugar;
pub mod timestamp;

pub use appender::{Admission, Appender};
pub use bootstrap::BootstrapLogger;
pub use caller::Caller;
pub use config::{LoggerConfiguration, SinkConfig};
pub use dispatcher::Dispatcher;
pub use encoder::{Encoder, OutputFormat, ENCODE_FAILURE_LINE, RESERVED_KEYS};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use level::{AtomicLevel, Level, LEVEL_DEBUG, LEVEL_ERROR, LEVEL_INFO, LEVEL_WARN};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::Record;
pub use stdlog::{redirect_std_log, StdLogBridge, StdLogWriter};
pub use sugar::{pair_key_values, SugarLogger};
pub use timestamp::TimestampFormat;
