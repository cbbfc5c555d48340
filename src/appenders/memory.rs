//! In-memory destination, for capturing encoded output

use crate::core::{Admission, Appender, Encoder, Level, Record, Result};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Cloneable byte buffer implementing [`Write`]; all clones share the buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Appender keeping encoded lines in a [`MemoryWriter`]
pub struct MemoryAppender {
    name: String,
    encoder: Encoder,
    admission: Admission,
    writer: MemoryWriter,
}

impl MemoryAppender {
    pub fn new(name: impl Into<String>, admission: Admission) -> Self {
        Self {
            name: name.into(),
            encoder: Encoder::json(),
            admission,
            writer: MemoryWriter::new(),
        }
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Handle to the captured output
    pub fn writer(&self) -> MemoryWriter {
        self.writer.clone()
    }
}

impl Appender for MemoryAppender {
    fn enabled(&self, level: Level) -> bool {
        self.admission.admits(level)
    }

    fn append(&self, record: &Record) -> Result<()> {
        let mut line = self.encoder.encode_or_fallback(record);
        line.push('\n');
        self.writer.buffer.lock().extend_from_slice(line.as_bytes());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
