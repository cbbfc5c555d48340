//! Console appender implementation

use crate::core::{Admission, Appender, AtomicLevel, Encoder, Level, Record, Result};
use parking_lot::Mutex;
use std::io::Write;

/// Writes to the process error stream, admitting records at or above a
/// threshold that can be changed while the logger is running.
pub struct ConsoleAppender {
    encoder: Encoder,
    level: AtomicLevel,
    /// `None` writes to stderr
    writer: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            encoder: Encoder::json(),
            level: AtomicLevel::new(Level::Debug),
            writer: None,
        }
    }

    /// Redirect output away from stderr
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logger_facade::appenders::{ConsoleAppender, MemoryWriter};
    ///
    /// let buffer = MemoryWriter::new();
    /// let appender = ConsoleAppender::new().with_writer(buffer.clone());
    /// ```
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Mutex::new(Box::new(writer)));
        self
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Use `level` as the threshold; clones of it adjust this appender
    #[must_use]
    pub fn with_level(mut self, level: AtomicLevel) -> Self {
        self.level = level;
        self
    }

    /// Shared handle to the admission threshold
    pub fn level(&self) -> AtomicLevel {
        self.level.clone()
    }

    pub fn admission(&self) -> Admission {
        Admission::from(self.level.clone())
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn enabled(&self, level: Level) -> bool {
        self.level.enabled(level)
    }

    fn append(&self, record: &Record) -> Result<()> {
        let mut line = self.encoder.encode_or_fallback(record);
        line.push('\n');

        match self.writer {
            Some(ref writer) => writer.lock().write_all(line.as_bytes())?,
            None => std::io::stderr().lock().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.writer {
            Some(ref writer) => writer.lock().flush()?,
            None => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
