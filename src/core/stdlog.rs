//! Bridges from conventional line-oriented logging into structured records

use super::caller::Caller;
use super::error::{LoggerError, Result};
use super::field::Field;
use super::level::Level;
use super::logger::Logger;
use std::io::{self, Write};
use std::panic::Location;

const SOURCE_KEY: &str = "source";
const SOURCE_VALUE: &str = "stdlog";

/// [`Write`] adapter: each complete line becomes one record.
///
/// Records carry `source=stdlog` and report the frame that wrote to the
/// adapter as their caller. A trailing partial line is held until the next
/// newline, [`flush`](Write::flush), or drop.
///
/// ```
/// use std::io::Write;
/// use rust_logger_facade::appenders::MemoryWriter;
/// use rust_logger_facade::Logger;
///
/// let console = MemoryWriter::new();
/// let logger = Logger::builder().console_writer(console.clone()).build();
///
/// let mut writer = logger.std_log_writer();
/// writeln!(writer, "legacy message").unwrap();
/// assert!(console.contents().contains("\"source\":\"stdlog\""));
/// ```
pub struct StdLogWriter {
    logger: Logger,
    level: Level,
    fields: Vec<Field>,
    pending: Vec<u8>,
}

impl StdLogWriter {
    pub(crate) fn new(logger: Logger, level: Level, fields: &[Field]) -> Self {
        let mut all = Vec::with_capacity(fields.len() + 1);
        all.push(Field::string(SOURCE_KEY, SOURCE_VALUE));
        all.extend_from_slice(fields);
        Self {
            logger,
            level,
            fields: all,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    fn emit_line(&self, line: &[u8]) {
        let text = String::from_utf8_lossy(line);
        let text = text.trim_end_matches(['\r', '\n']);
        self.logger
            .emit(self.level, text, &self.fields, Location::caller());
    }
}

impl Write for StdLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit_line(&line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        Ok(())
    }
}

impl Drop for StdLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// [`log::Log`] implementation forwarding the `log` facade into a [`Logger`]
pub struct StdLogBridge {
    logger: Logger,
}

impl StdLogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

fn map_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warn,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl log::Log for StdLogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.logger.is_enabled(map_level(metadata.level()))
    }

    fn log(&self, record: &log::Record<'_>) {
        let level = map_level(record.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let caller = match (record.file(), record.line()) {
            (Some(file), Some(line)) => Caller::new(file, line),
            _ => Caller::new(record.target(), 0),
        };
        let fields = [
            Field::string(SOURCE_KEY, SOURCE_VALUE),
            Field::string("target", record.target()),
        ];
        self.logger
            .emit_with_caller(level, &record.args().to_string(), &fields, caller);
    }

    fn flush(&self) {
        let _ = self.logger.flush();
    }
}

/// Route the `log` crate facade into `logger`. Only one call per process
/// can succeed.
pub fn redirect_std_log(logger: &Logger) -> Result<()> {
    log::set_boxed_logger(Box::new(StdLogBridge::new(logger.clone())))
        .map_err(|e| LoggerError::other(format!("cannot redirect standard logging: {}", e)))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
