//! Logger configuration and the sink plan derived from it

use super::appender::Admission;
use super::encoder::Encoder;
use super::error::Result;
use super::level::Level;
use crate::appenders::{Clock, RotatingFileAppender, RotationPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration consumed by [`Logger::new`](crate::Logger::new).
///
/// ```
/// use rust_logger_facade::LoggerConfiguration;
///
/// let config = LoggerConfiguration::from_json_str(r#"{
///     "enableConsole": true,
///     "consoleFile": "/var/log/app/console.log",
///     "fileLevelConfig": {"error": "/var/log/app/error.log"},
///     "maxHistoryDays": 14
/// }"#).unwrap();
///
/// assert_eq!(config.file_sinks().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggerConfiguration {
    /// Mirror console output into `console_file`
    pub enable_console: bool,
    pub console_file: String,
    /// Level name to file path; each file receives exactly that level
    pub file_level_config: BTreeMap<String, String>,
    /// Retention for rotated files, 7 days when absent
    pub max_history_days: Option<u32>,
    /// Initial console threshold, `debug` when absent
    pub console_level: Option<String>,
    /// JSON console output when true, tab-separated text otherwise
    pub console_json: bool,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            enable_console: false,
            console_file: String::new(),
            file_level_config: BTreeMap::new(),
            max_history_days: None,
            console_level: None,
            console_json: true,
        }
    }
}

impl LoggerConfiguration {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn retention(&self) -> RotationPolicy {
        match self.max_history_days {
            Some(days) => RotationPolicy::new().with_max_age_days(days),
            None => RotationPolicy::default(),
        }
    }

    pub fn console_threshold(&self) -> Level {
        self.console_level
            .as_deref()
            .map(Level::from_name)
            .unwrap_or(Level::Debug)
    }

    pub fn console_encoder(&self) -> Encoder {
        if self.console_json {
            Encoder::json()
        } else {
            Encoder::console()
        }
    }

    /// File sinks in dispatch order: the console mirror first, then one per
    /// configured level.
    pub fn file_sinks(&self) -> Vec<SinkConfig> {
        let retention = self.retention();
        let mut sinks = Vec::with_capacity(self.file_level_config.len() + 1);

        if self.enable_console && !self.console_file.is_empty() {
            sinks.push(SinkConfig {
                path: PathBuf::from(&self.console_file),
                admission: Admission::threshold(Level::Debug),
                retention: retention.clone(),
            });
        }

        for (level, path) in &self.file_level_config {
            sinks.push(SinkConfig {
                path: PathBuf::from(path),
                admission: Admission::exact(Level::from_name(level)),
                retention: retention.clone(),
            });
        }

        sinks
    }
}

/// One rotated file destination with its admission rule
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub path: PathBuf,
    pub admission: Admission,
    pub retention: RotationPolicy,
}

impl SinkConfig {
    pub fn open(&self, clock: Arc<dyn Clock>) -> Result<RotatingFileAppender> {
        RotatingFileAppender::with_clock(
            &self.path,
            self.admission.clone(),
            self.retention.clone(),
            clock,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfiguration::default();
        assert!(config.file_sinks().is_empty());
        assert_eq!(config.console_threshold(), Level::Debug);
        assert_eq!(config.retention().max_age_days, 7);
        assert!(config.console_json);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config = LoggerConfiguration::from_json_str("{}").unwrap();
        assert_eq!(config, LoggerConfiguration::default());
    }

    #[test]
    fn test_mirror_requires_flag_and_path() {
        let mut config = LoggerConfiguration {
            console_file: "console.log".to_string(),
            ..Default::default()
        };
        assert!(config.file_sinks().is_empty());

        config.enable_console = true;
        let sinks = config.file_sinks();
        assert_eq!(sinks.len(), 1);
        for level in Level::ALL {
            assert!(sinks[0].admission.admits(level));
        }

        config.console_file.clear();
        assert!(config.file_sinks().is_empty());
    }

    #[test]
    fn test_level_sinks_are_exact() {
        let config = LoggerConfiguration::from_json_str(
            r#"{"fileLevelConfig": {"warn": "w.log", "Critical": "c.log"}}"#,
        )
        .unwrap();
        let sinks = config.file_sinks();
        assert_eq!(sinks.len(), 2);

        let critical = sinks
            .iter()
            .find(|s| s.path == PathBuf::from("c.log"))
            .unwrap();
        assert!(critical.admission.admits(Level::Error));
        assert!(!critical.admission.admits(Level::Warn));

        let warn = sinks
            .iter()
            .find(|s| s.path == PathBuf::from("w.log"))
            .unwrap();
        assert!(warn.admission.admits(Level::Warn));
        assert!(!warn.admission.admits(Level::Error));
    }

    #[test]
    fn test_retention_override() {
        let config = LoggerConfiguration::from_json_str(r#"{"maxHistoryDays": 0}"#).unwrap();
        assert_eq!(config.retention().max_age_days, 0);
    }

    #[test]
    fn test_console_options() {
        let config = LoggerConfiguration::from_json_str(
            r#"{"consoleLevel": "WARN", "consoleJson": false}"#,
        )
        .unwrap();
        assert_eq!(config.console_threshold(), Level::Warn);
        assert_eq!(config.console_encoder().format(), crate::OutputFormat::Console);
    }

    #[test]
    fn test_invalid_json() {
        assert!(LoggerConfiguration::from_json_str("{not json").is_err());
    }
}
