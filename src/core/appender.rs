//! Appender trait for log output destinations, and admission rules

use super::{error::Result, level::AtomicLevel, level::Level, record::Record};

/// A sink: one destination with its own encoder and admission rule.
///
/// Appenders are shared between logger handles and called from many threads,
/// so they take `&self` and serialize writes to their destination internally.
pub trait Appender: Send + Sync {
    /// Whether a record of `level` should be offered to this appender
    fn enabled(&self, level: Level) -> bool;
    fn append(&self, record: &Record) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Predicate deciding which severities reach an appender
#[derive(Debug, Clone)]
pub enum Admission {
    /// At or above a (possibly runtime adjustable) threshold
    AtLeast(AtomicLevel),
    /// Exactly one severity, never its neighbours
    Exactly(Level),
}

impl Admission {
    pub fn threshold(level: Level) -> Self {
        Admission::AtLeast(AtomicLevel::new(level))
    }

    pub fn exact(level: Level) -> Self {
        Admission::Exactly(level)
    }

    #[inline]
    pub fn admits(&self, level: Level) -> bool {
        match self {
            Admission::AtLeast(threshold) => threshold.enabled(level),
            Admission::Exactly(only) => level == *only,
        }
    }
}

impl From<AtomicLevel> for Admission {
    fn from(level: AtomicLevel) -> Self {
        Admission::AtLeast(level)
    }
}
