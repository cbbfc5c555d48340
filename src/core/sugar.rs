//! Wide-interface logger: alternating key/value arguments instead of typed fields

use super::field::{Field, FieldValue};
use super::level::Level;
use super::logger::Logger;
use std::panic::Location;

/// Pair alternating key/value arguments into fields.
///
/// A string in key position starts a pair. A non-string in key position is
/// kept under a synthesized `params<N>` key, as is a key left without a value
/// at the end. The empty string is an ordinary key. Nothing is dropped and
/// malformed input never fails.
///
/// ```
/// use rust_logger_facade::{pair_key_values, Field};
///
/// let fields = pair_key_values(&["user".into(), 42i64.into(), "extra".into()]);
/// assert_eq!(fields, vec![Field::int("user", 42i64), Field::string("params0", "extra")]);
/// ```
pub fn pair_key_values(args: &[FieldValue]) -> Vec<Field> {
    let mut fields = Vec::with_capacity(args.len() / 2 + 1);
    let mut pending_key: Option<&str> = None;
    let mut positional = 0usize;

    for arg in args {
        match pending_key.take() {
            Some(key) => fields.push(Field::new(key, arg.clone())),
            None => match arg.as_str() {
                Some(key) => pending_key = Some(key),
                None => {
                    fields.push(Field::new(format!("params{}", positional), arg.clone()));
                    positional += 1;
                }
            },
        }
    }

    if let Some(key) = pending_key {
        fields.push(Field::string(format!("params{}", positional), key));
    }

    fields
}

/// Logger accepting untyped key/value arguments, built with [`Logger::sugar`]
#[derive(Clone)]
pub struct SugarLogger {
    logger: Logger,
}

impl SugarLogger {
    pub(crate) fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// The typed logger this wraps
    pub fn desugar(&self) -> &Logger {
        &self.logger
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: &str, args: &[FieldValue]) {
        self.emit(level, message, args, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: &str, args: &[FieldValue]) {
        self.emit(Level::Debug, message, args, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: &str, args: &[FieldValue]) {
        self.emit(Level::Info, message, args, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str, args: &[FieldValue]) {
        self.emit(Level::Warn, message, args, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str, args: &[FieldValue]) {
        self.emit(Level::Error, message, args, Location::caller());
    }

    /// Rendered as `error`
    #[track_caller]
    pub fn critical(&self, message: &str, args: &[FieldValue]) {
        self.emit(Level::Error, message, args, Location::caller());
    }

    pub(crate) fn emit(
        &self,
        level: Level,
        message: &str,
        args: &[FieldValue],
        location: &'static Location<'static>,
    ) {
        if !self.logger.is_enabled(level) {
            return;
        }
        self.logger
            .emit(level, message, &pair_key_values(args), location);
    }
}
