//! Record encoders
//!
//! - Json: one object per line, `level`, `ts`, `caller`, `msg`, then the
//!   record's fields flattened as top-level keys
//! - Console: tab separated `ts level caller msg` followed by the fields as a
//!   JSON object

use super::error::Result;
use super::record::Record;
use super::timestamp::TimestampFormat;
use serde_json::{Map, Value};

/// Line written in place of a record that could not be encoded
pub const ENCODE_FAILURE_LINE: &str = r#"{"level":"error","msg":"failed to encode log message"}"#;

/// Keys the encoders write themselves; a field never replaces them
pub const RESERVED_KEYS: [&str; 4] = ["level", "ts", "caller", "msg"];

/// Insert a field into an encoded object. A field whose key is reserved is
/// kept under `fields.<key>` so the record's own value survives.
pub(crate) fn insert_field(obj: &mut Map<String, Value>, key: &str, value: Value) {
    if RESERVED_KEYS.contains(&key) {
        obj.insert(format!("fields.{}", key), value);
    } else {
        obj.insert(key.to_string(), value);
    }
}

/// Output format for encoded records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Machine-readable JSON, one object per line (default)
    #[default]
    Json,

    /// Human-readable tab separated text
    ///
    /// Example: `2025-01-08T10:30:45.123Z	info	src/main.rs:7	Request processed	{"id":3}`
    Console,
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    format: OutputFormat,
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl Encoder {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn json() -> Self {
        Self::new(OutputFormat::Json)
    }

    pub fn console() -> Self {
        Self::new(OutputFormat::Console)
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Colour the level name in console output (`console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Encode a record as a single line, without the trailing newline
    pub fn encode(&self, record: &Record) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.encode_json(record),
            OutputFormat::Console => self.encode_console(record),
        }
    }

    /// Encode a record, degrading to [`ENCODE_FAILURE_LINE`] on failure
    pub fn encode_or_fallback(&self, record: &Record) -> String {
        self.encode(record)
            .unwrap_or_else(|_| ENCODE_FAILURE_LINE.to_string())
    }

    fn encode_json(&self, record: &Record) -> Result<String> {
        let mut obj = Map::new();
        obj.insert(
            "level".to_string(),
            Value::String(record.level.as_str().to_string()),
        );
        obj.insert(
            "ts".to_string(),
            self.timestamp_format.to_json(&record.timestamp),
        );
        if let Some(ref caller) = record.caller {
            obj.insert("caller".to_string(), Value::String(caller.to_string()));
        }
        obj.insert("msg".to_string(), Value::String(record.message.clone()));

        for field in &record.fields {
            insert_field(&mut obj, &field.key, field.value.to_json_value()?);
        }

        Ok(serde_json::to_string(&Value::Object(obj))?)
    }

    fn encode_console(&self, record: &Record) -> Result<String> {
        let mut line = format!(
            "{}\t{}",
            self.timestamp_format.format(&record.timestamp),
            self.level_text(record)
        );
        if let Some(ref caller) = record.caller {
            line.push('\t');
            line.push_str(&caller.to_string());
        }
        line.push('\t');
        line.push_str(&sanitize_message(&record.message));

        if !record.fields.is_empty() {
            let mut obj = Map::new();
            for field in &record.fields {
                insert_field(&mut obj, &field.key, field.value.to_json_value()?);
            }
            line.push('\t');
            line.push_str(&serde_json::to_string(&Value::Object(obj))?);
        }

        Ok(line)
    }

    #[cfg(feature = "console")]
    fn level_text(&self, record: &Record) -> String {
        use colored::Colorize;
        if self.use_colors {
            record
                .level
                .as_str()
                .color(record.level.color_code())
                .to_string()
        } else {
            record.level.as_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_text(&self, record: &Record) -> String {
        record.level.as_str().to_string()
    }
}

/// Keep a record on one line in text output
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
