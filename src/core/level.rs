//! Severity levels and the level registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Level name constants accepted by configuration
pub const LEVEL_DEBUG: &str = "debug";
pub const LEVEL_INFO: &str = "info";
pub const LEVEL_WARN: &str = "warn";
pub const LEVEL_ERROR: &str = "error";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warn, Level::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => LEVEL_DEBUG,
            Level::Info => LEVEL_INFO,
            Level::Warn => LEVEL_WARN,
            Level::Error => LEVEL_ERROR,
        }
    }

    /// Lenient lookup used for configuration keys and `set_console_level`.
    ///
    /// Never fails: unknown names resolve to [`Level::Info`], and `critical`
    /// resolves to [`Level::Error`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(Level::Info)
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            _ => Level::Error,
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => Blue,
            Level::Info => Green,
            Level::Warn => Yellow,
            Level::Error => Red,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            LEVEL_DEBUG => Ok(Level::Debug),
            LEVEL_INFO => Ok(Level::Info),
            LEVEL_WARN | "warning" => Ok(Level::Warn),
            LEVEL_ERROR | "critical" => Ok(Level::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// A level threshold that can be changed at runtime and shared between clones.
///
/// Every clone observes the same value; reads happen on every dispatch so the
/// storage is a single atomic byte.
#[derive(Debug, Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicU8>,
}

impl AtomicLevel {
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[inline]
    pub fn level(&self) -> Level {
        Level::from_u8(self.inner.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: Level) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }

    /// True when `level` is at or above the current threshold
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known_levels() {
        assert_eq!(Level::from_name("debug"), Level::Debug);
        assert_eq!(Level::from_name("info"), Level::Info);
        assert_eq!(Level::from_name("warn"), Level::Warn);
        assert_eq!(Level::from_name("error"), Level::Error);
        assert_eq!(Level::from_name("ERROR"), Level::Error);
    }

    #[test]
    fn test_from_name_unknown_defaults_to_info() {
        assert_eq!(Level::from_name("verbose"), Level::Info);
        assert_eq!(Level::from_name(""), Level::Info);
    }

    #[test]
    fn test_critical_maps_to_error() {
        assert_eq!(Level::from_name("critical"), Level::Error);
        assert_eq!("CRITICAL".parse::<Level>(), Ok(Level::Error));
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert!("fatal".parse::<Level>().is_err());
    }

    #[test]
    fn test_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_default_and_serde_names() {
        assert_eq!(Level::default(), Level::Info);
        assert_eq!(serde_json::to_string(&Level::Warn).unwrap(), r#""warn""#);
        let parsed: Level = serde_json::from_str(r#""error""#).unwrap();
        assert_eq!(parsed, Level::Error);
    }

    #[test]
    fn test_atomic_level_shared_between_clones() {
        let level = AtomicLevel::new(Level::Debug);
        let other = level.clone();

        assert!(level.enabled(Level::Debug));
        other.set_level(Level::Error);

        assert_eq!(level.level(), Level::Error);
        assert!(!level.enabled(Level::Warn));
        assert!(level.enabled(Level::Error));
    }
}
