//! Rotating file appender with date-stamped file names
//!
//! A configured path `logs/app.log` is written as `logs/app-20250108.log`.
//! The file switches at each UTC day boundary, and files of the same pattern
//! older than the retention window are removed whenever a new file is opened.

use crate::core::bootstrap;
use crate::core::{Admission, Appender, Encoder, Field, Level, LoggerError, Record, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default retention window, in days
pub const DEFAULT_MAX_HISTORY_DAYS: u32 = 7;

const DATE_FORMAT: &str = "%Y%m%d";

/// Source of the current time for rotation decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Retention settings for rotated files
///
/// # Examples
///
/// ```
/// use rust_logger_facade::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new().with_max_age_days(30);
/// assert_eq!(policy.max_age_days, 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Files dated more than this many days before today are removed; 0 keeps everything
    pub max_age_days: u32,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_HISTORY_DAYS,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }
}

/// Maps a configured path to its dated file names
#[derive(Debug, Clone)]
struct FilePattern {
    dir: PathBuf,
    stem: String,
}

impl FilePattern {
    fn new(path: &Path) -> Self {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(".log")
            .map(str::to_string)
            .unwrap_or(file_name);
        Self { dir, stem }
    }

    fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}-{}.log", self.stem, date.format(DATE_FORMAT)))
    }

    /// Date embedded in a file name produced by this pattern
    fn date_of(&self, file_name: &str) -> Option<NaiveDate> {
        let date = file_name
            .strip_prefix(self.stem.as_str())?
            .strip_prefix('-')?
            .strip_suffix(".log")?;
        if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
    }
}

struct ActiveFile {
    date: NaiveDate,
    path: PathBuf,
    file: File,
}

/// Rotating file appender
///
/// # Examples
///
/// ```no_run
/// use rust_logger_facade::appenders::{RotatingFileAppender, RotationPolicy};
/// use rust_logger_facade::{Admission, Level};
///
/// // Only warnings, kept for 30 days, in /var/log/app/warn-YYYYMMDD.log
/// let appender = RotatingFileAppender::with_policy(
///     "/var/log/app/warn.log",
///     Admission::exact(Level::Warn),
///     RotationPolicy::new().with_max_age_days(30),
/// )
/// .unwrap();
/// ```
pub struct RotatingFileAppender {
    name: String,
    pattern: FilePattern,
    encoder: Encoder,
    admission: Admission,
    policy: RotationPolicy,
    clock: Arc<dyn Clock>,
    active: Mutex<ActiveFile>,
}

impl RotatingFileAppender {
    /// # Errors
    ///
    /// Returns error if the directory or today's file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P, admission: Admission) -> Result<Self> {
        Self::with_policy(path, admission, RotationPolicy::default())
    }

    /// # Errors
    ///
    /// Returns error if the directory or today's file cannot be created or opened
    pub fn with_policy<P: AsRef<Path>>(
        path: P,
        admission: Admission,
        policy: RotationPolicy,
    ) -> Result<Self> {
        Self::with_clock(path, admission, policy, Arc::new(SystemClock))
    }

    /// # Errors
    ///
    /// Returns error if the directory or today's file cannot be created or opened
    pub fn with_clock<P: AsRef<Path>>(
        path: P,
        admission: Admission,
        policy: RotationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let name = path.as_ref().display().to_string();
        let pattern = FilePattern::new(path.as_ref());

        fs::create_dir_all(&pattern.dir).map_err(|e| {
            LoggerError::sink_open(
                name.clone(),
                format!("Failed to create directory '{}': {}", pattern.dir.display(), e),
            )
        })?;

        let today = clock.now().date_naive();
        let active = Self::open(&pattern, today)
            .map_err(|e| LoggerError::sink_open(name.clone(), e.to_string()))?;

        let appender = Self {
            name,
            pattern,
            encoder: Encoder::json(),
            admission,
            policy,
            clock,
            active: Mutex::new(active),
        };
        appender.prune(today);
        Ok(appender)
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> PathBuf {
        self.active.lock().path.clone()
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    fn open(pattern: &FilePattern, date: NaiveDate) -> std::io::Result<ActiveFile> {
        let path = pattern.path_for(date);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(ActiveFile { date, path, file })
    }

    /// Switch to the file for `today`; on failure keep the current file
    fn rotate(&self, active: &mut ActiveFile, today: NaiveDate) {
        match Self::open(&self.pattern, today) {
            Ok(next) => {
                let _ = active.file.flush();
                *active = next;
                self.prune(today);
            }
            Err(e) => {
                let err = LoggerError::rotation(
                    self.pattern.path_for(today).display().to_string(),
                    e.to_string(),
                );
                bootstrap::report(
                    Level::Warn,
                    "log rotation failed, continuing with current file",
                    &[Field::string("sink", self.name.as_str()), Field::error(&err)],
                );
            }
        }
    }

    /// Remove files of this pattern dated before the retention window
    fn prune(&self, today: NaiveDate) {
        if self.policy.max_age_days == 0 {
            return;
        }
        let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(self.policy.max_age_days)))
        else {
            return;
        };

        let entries = match fs::read_dir(&self.pattern.dir) {
            Ok(entries) => entries,
            Err(e) => {
                let err = LoggerError::io_operation(
                    "pruning old log files",
                    format!("cannot list '{}'", self.pattern.dir.display()),
                    e,
                );
                bootstrap::report(Level::Warn, "log retention skipped", &[Field::error(&err)]);
                return;
            }
        };

        for entry in entries.filter_map(|e| e.ok()) {
            let file_name = entry.file_name();
            let expired = self
                .pattern
                .date_of(&file_name.to_string_lossy())
                .is_some_and(|date| date < cutoff);
            if !expired {
                continue;
            }
            if let Err(e) = fs::remove_file(entry.path()) {
                let err = LoggerError::io_operation(
                    "pruning old log files",
                    format!("cannot remove '{}'", entry.path().display()),
                    e,
                );
                bootstrap::report(Level::Warn, "log retention failed", &[Field::error(&err)]);
            }
        }
    }
}

impl Appender for RotatingFileAppender {
    fn enabled(&self, level: Level) -> bool {
        self.admission.admits(level)
    }

    fn append(&self, record: &Record) -> Result<()> {
        let mut line = self.encoder.encode_or_fallback(record);
        line.push('\n');

        let mut active = self.active.lock();
        let today = self.clock.now().date_naive();
        if today != active.date {
            self.rotate(&mut active, today);
        }

        active.file.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation(
                "writing log record",
                format!("cannot write to '{}'", active.path.display()),
                e,
            )
        })
    }

    fn flush(&self) -> Result<()> {
        self.active.lock().file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        let _ = self.active.get_mut().file.flush();
    }
}
