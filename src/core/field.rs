//! Typed key/value fields attached to log records

use super::error::{LoggerError, Result};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Bool(bool),
    Duration(Duration),
    /// Arbitrary serializable value, already converted to JSON
    Any(Value),
    /// Display text of an error
    Error(String),
    /// A value `serde_json` refused to represent; holds the reason
    Unencodable(String),
}

impl FieldValue {
    /// Capture an arbitrary serializable value.
    ///
    /// Conversion happens eagerly; a failure is kept as
    /// [`FieldValue::Unencodable`] and surfaces when the record is encoded.
    pub fn any<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => FieldValue::Any(v),
            Err(e) => FieldValue::Unencodable(e.to_string()),
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    pub fn to_json_value(&self) -> Result<Value> {
        Ok(match self {
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Uint(u) => Value::from(*u),
            FieldValue::Float(f) => float_value(*f),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Duration(d) => float_value(d.as_secs_f64()),
            FieldValue::Any(v) => v.clone(),
            FieldValue::Error(e) => Value::String(e.clone()),
            FieldValue::Unencodable(reason) => return Err(LoggerError::encode(reason.clone())),
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn float_value(f: f64) -> Value {
    match serde_json::Number::from_f64(f) {
        Some(n) => Value::Number(n),
        None if f.is_nan() => Value::String("NaN".to_string()),
        None if f > 0.0 => Value::String("+Inf".to_string()),
        None => Value::String("-Inf".to_string()),
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Uint(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
            FieldValue::Any(v) => write!(f, "{}", v),
            FieldValue::Error(e) => write!(f, "{}", e),
            FieldValue::Unencodable(reason) => write!(f, "<unencodable: {}>", reason),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::Uint(u64::from(u))
    }
}

impl From<usize> for FieldValue {
    fn from(u: usize) -> Self {
        FieldValue::Uint(u as u64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Any(v)
    }
}

/// A named value attached to a single log record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn int(key: impl Into<String>, value: impl Into<i64>) -> Self {
        Self::new(key, FieldValue::Int(value.into()))
    }

    pub fn uint(key: impl Into<String>, value: impl Into<u64>) -> Self {
        Self::new(key, FieldValue::Uint(value.into()))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float(value))
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }

    pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Self {
        Self::new(key, FieldValue::any(value))
    }

    /// Error field under the conventional `error` key
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Self::named_error("error", err)
    }

    pub fn named_error(key: impl Into<String>, err: &(dyn std::error::Error + '_)) -> Self {
        Self::new(key, FieldValue::Error(err.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Render fields as a JSON array of `{"key", "value"}` objects
pub(crate) fn fields_to_json_array(fields: &[Field]) -> Result<Value> {
    fields
        .iter()
        .map(|field| {
            let mut obj = serde_json::Map::new();
            obj.insert("key".to_string(), Value::String(field.key.clone()));
            obj.insert("value".to_string(), field.value.to_json_value()?);
            Ok(Value::Object(obj))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_typed_constructors() {
        assert_eq!(Field::int("n", 5i32).value, FieldValue::Int(5));
        assert_eq!(Field::uint("n", 5u32).value, FieldValue::Uint(5));
        assert_eq!(Field::string("s", "v").value, FieldValue::String("v".into()));
        assert_eq!(Field::bool("b", true).value, FieldValue::Bool(true));
    }

    #[test]
    fn test_json_values() {
        assert_eq!(FieldValue::Int(-3).to_json_value().unwrap(), Value::from(-3));
        assert_eq!(
            FieldValue::Duration(Duration::from_millis(1500))
                .to_json_value()
                .unwrap(),
            Value::from(1.5)
        );
        assert_eq!(
            FieldValue::Float(f64::NAN).to_json_value().unwrap(),
            Value::String("NaN".into())
        );
        assert_eq!(
            FieldValue::Float(f64::NEG_INFINITY).to_json_value().unwrap(),
            Value::String("-Inf".into())
        );
    }

    #[test]
    fn test_error_field_uses_error_key() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let field = Field::error(&io_err);
        assert_eq!(field.key, "error");
        assert_eq!(field.value, FieldValue::Error("missing file".into()));
    }

    #[test]
    fn test_any_with_serializable_value() {
        let field = Field::any("tags", &vec!["a", "b"]);
        assert_eq!(
            field.value.to_json_value().unwrap(),
            serde_json::json!(["a", "b"])
        );
    }

    #[test]
    fn test_any_with_unserializable_value() {
        let mut map = HashMap::new();
        map.insert(vec![1u8, 2], "bytes as key");

        let field = Field::any("bad", &map);
        assert!(matches!(field.value, FieldValue::Unencodable(_)));
        assert!(field.value.to_json_value().is_err());
    }

    #[test]
    fn test_fields_to_json_array() {
        let fields = vec![Field::int("user", 42i64), Field::string("role", "admin")];
        let json = fields_to_json_array(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"key": "user", "value": 42},
                {"key": "role", "value": "admin"}
            ])
        );
    }
}
