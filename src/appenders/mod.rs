//! Appender implementations

pub mod console;
pub mod memory;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use memory::{MemoryAppender, MemoryWriter};
pub use rotating_file::{
    Clock, ManualClock, RotatingFileAppender, RotationPolicy, SystemClock,
    DEFAULT_MAX_HISTORY_DAYS,
};

pub use crate::core::Appender;
