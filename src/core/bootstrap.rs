//! Pre-configuration fallback logger
//!
//! Encodes `{level, msg, fields}` (or the flat key/value form for the
//! wide-interface calls) straight to stderr, one JSON object per line. A record
//! that cannot be encoded is replaced by [`ENCODE_FAILURE_LINE`]; nothing here
//! ever returns an error to the caller.

use super::encoder::{insert_field, ENCODE_FAILURE_LINE};
use super::error::Result;
use super::field::{fields_to_json_array, Field, FieldValue};
use super::level::Level;
use super::sugar::pair_key_values;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::io::Write;

/// The process-wide fallback instance, also used for the crate's own warnings
pub(crate) static STDERR_FALLBACK: BootstrapLogger = BootstrapLogger::stderr();

/// Report an internal condition (sink failure, rotation failure) as a JSON line on stderr
pub(crate) fn report(level: Level, message: &str, fields: &[Field]) {
    STDERR_FALLBACK.log(level, message, fields);
}

pub struct BootstrapLogger {
    /// `None` writes to the process error stream
    writer: Mutex<Option<Box<dyn Write + Send>>>,
}

impl BootstrapLogger {
    pub const fn stderr() -> Self {
        Self {
            writer: parking_lot::const_mutex(None),
        }
    }

    /// Fallback writing to an arbitrary destination instead of stderr
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Some(Box::new(writer))),
        }
    }

    /// Swap the destination; `None` goes back to stderr
    pub(crate) fn set_writer(&self, writer: Option<Box<dyn Write + Send>>) {
        *self.writer.lock() = writer;
    }

    pub fn log(&self, level: Level, message: &str, fields: &[Field]) {
        let line = Self::encode_fields(level, message, fields)
            .unwrap_or_else(|_| ENCODE_FAILURE_LINE.to_string());
        self.write_line(&line);
    }

    /// Wide-interface form: alternating keys and values, flattened into the object
    pub fn log_pairs(&self, level: Level, message: &str, pairs: &[FieldValue]) {
        let line = Self::encode_pairs(level, message, pairs)
            .unwrap_or_else(|_| ENCODE_FAILURE_LINE.to_string());
        self.write_line(&line);
    }

    fn encode_fields(level: Level, message: &str, fields: &[Field]) -> Result<String> {
        let mut obj = Self::header(level, message);
        if !fields.is_empty() {
            obj.insert("fields".to_string(), fields_to_json_array(fields)?);
        }
        Ok(serde_json::to_string(&Value::Object(obj))?)
    }

    fn encode_pairs(level: Level, message: &str, pairs: &[FieldValue]) -> Result<String> {
        let mut obj = Self::header(level, message);
        for field in pair_key_values(pairs) {
            insert_field(&mut obj, &field.key, field.value.to_json_value()?);
        }
        Ok(serde_json::to_string(&Value::Object(obj))?)
    }

    fn header(level: Level, message: &str) -> Map<String, Value> {
        let mut obj = Map::new();
        obj.insert("level".to_string(), Value::String(level.as_str().to_string()));
        obj.insert("msg".to_string(), Value::String(message.to_string()));
        obj
    }

    fn write_line(&self, line: &str) {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // Write failures have nowhere left to go.
        let mut writer = self.writer.lock();
        match writer.as_mut() {
            Some(writer) => {
                let _ = writer.write_all(buf.as_bytes());
            }
            None => {
                let _ = std::io::stderr().lock().write_all(buf.as_bytes());
            }
        }
    }
}

impl Default for BootstrapLogger {
    fn default() -> Self {
        Self::stderr()
    }
}
