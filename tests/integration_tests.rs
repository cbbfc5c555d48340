//! Integration tests for the logger facade
//!
//! These tests verify:
//! - Exact-level file sinks versus the threshold console sink
//! - Runtime console threshold changes
//! - Derived handles and caller reporting
//! - Thread safety of sink writes
//! - Degraded startup when a sink cannot be opened

use rust_logger_facade::appenders::{ManualClock, MemoryWriter};
use rust_logger_facade::{kv, Field, FieldValue, Level, Logger, LoggerConfiguration};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

/// Lines of the dated file produced for `<dir>/<base>.log`
fn read_sink(dir: &Path, base: &str) -> Vec<Value> {
    let prefix = format!("{}-", base);
    let mut lines = Vec::new();
    for entry in fs::read_dir(dir).expect("Failed to list temp dir") {
        let entry = entry.expect("Failed to read entry");
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) && name.ends_with(".log") {
            let content = fs::read_to_string(entry.path()).expect("Failed to read log file");
            lines.extend(
                content
                    .lines()
                    .map(|l| serde_json::from_str::<Value>(l).expect("Line is not JSON")),
            );
        }
    }
    lines
}

fn parse_lines(writer: &MemoryWriter) -> Vec<Value> {
    writer
        .lines()
        .iter()
        .map(|l| serde_json::from_str(l).expect("Line is not JSON"))
        .collect()
}

fn per_level_config(dir: &Path) -> LoggerConfiguration {
    let mut config = LoggerConfiguration::default();
    for level in ["debug", "info", "warn", "error"] {
        config.file_level_config.insert(
            level.to_string(),
            dir.join(format!("{}.log", level)).display().to_string(),
        );
    }
    config
}

fn build(config: &LoggerConfiguration) -> (Logger, MemoryWriter) {
    let console = MemoryWriter::new();
    let logger = Logger::builder()
        .config(config.clone())
        .console_writer(console.clone())
        .try_build()
        .expect("Failed to build logger");
    (logger, console)
}

#[test]
fn test_per_level_files_are_exact_match() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, console) = build(&per_level_config(temp_dir.path()));

    logger.debug("d", &[]);
    logger.info("i", &[]);
    logger.warn("w", &[]);
    logger.error("e", &[]);
    logger.flush().expect("Failed to flush");

    for (base, msg) in [("debug", "d"), ("info", "i"), ("warn", "w"), ("error", "e")] {
        let lines = read_sink(temp_dir.path(), base);
        assert_eq!(lines.len(), 1, "{} sink should hold exactly one record", base);
        assert_eq!(lines[0]["msg"], msg);
        assert_eq!(lines[0]["level"], base);
    }

    assert_eq!(console.lines().len(), 4);
}

#[test]
fn test_console_level_suppresses_console_but_not_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, console) = build(&per_level_config(temp_dir.path()));

    logger.set_console_level("error");
    logger.info("file only", &[]);
    logger.flush().expect("Failed to flush");

    assert!(console.lines().is_empty());
    let info = read_sink(temp_dir.path(), "info");
    assert_eq!(info.len(), 1);
    assert_eq!(info[0]["msg"], "file only");
}

#[test]
fn test_console_mirror_admits_everything_and_ignores_console_level() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = LoggerConfiguration {
        enable_console: true,
        console_file: temp_dir.path().join("console.log").display().to_string(),
        ..Default::default()
    };
    let (logger, console) = build(&config);

    logger.set_console_level("warn");
    logger.debug("mirror sees debug", &[]);
    logger.warn("both see warn", &[]);
    logger.flush().expect("Failed to flush");

    let mirrored = read_sink(temp_dir.path(), "console");
    assert_eq!(mirrored.len(), 2);
    assert_eq!(parse_lines(&console).len(), 1);
}

#[test]
fn test_critical_is_written_as_error_everywhere() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, console) = build(&per_level_config(temp_dir.path()));

    logger.critical("on fire", &[]);
    logger.sugar().critical("still on fire", &[]);
    logger.flush().expect("Failed to flush");

    let errors = read_sink(temp_dir.path(), "error");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|l| l["level"] == "error"));
    assert!(parse_lines(&console).iter().all(|l| l["level"] == "error"));
}

#[test]
fn test_fields_never_replace_level_or_message() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, console) = build(&per_level_config(temp_dir.path()));

    logger.critical("db down", &[Field::string("level", "debug")]);
    logger.sugar().critical("db down", &kv!["msg", "hijacked"]);
    logger
        .with(&[Field::string("level", "info")])
        .critical("db down", &[]);
    logger.flush().expect("Failed to flush");

    let console_lines = parse_lines(&console);
    let error_lines = read_sink(temp_dir.path(), "error");
    assert_eq!(console_lines.len(), 3);
    assert_eq!(error_lines.len(), 3);
    for line in console_lines.iter().chain(error_lines.iter()) {
        assert_eq!(line["level"], "error");
        assert_eq!(line["msg"], "db down");
    }
    assert_eq!(console_lines[0]["fields.level"], "debug");
    assert_eq!(console_lines[1]["fields.msg"], "hijacked");
    assert!(read_sink(temp_dir.path(), "debug").is_empty());
}

#[test]
fn test_rotated_name_uses_clock_date() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let clock = ManualClock::new(
        chrono::DateTime::parse_from_rfc3339("2025-03-14T08:00:00Z")
            .expect("Valid timestamp")
            .with_timezone(&chrono::Utc),
    );
    let mut config = LoggerConfiguration::default();
    config.file_level_config.insert(
        "warn".to_string(),
        temp_dir.path().join("warn.log").display().to_string(),
    );

    let logger = Logger::builder()
        .config(config)
        .console_writer(MemoryWriter::new())
        .clock(Arc::new(clock))
        .try_build()
        .expect("Failed to build logger");
    logger.warn("dated", &[]);

    assert!(temp_dir.path().join("warn-20250314.log").exists());
}

#[test]
fn test_with_fields_do_not_leak_to_parent() {
    let (logger, console) = build(&LoggerConfiguration::default());

    let child = logger.with(&[Field::string("component", "db")]);
    child.info("child", &[Field::int("rows", 3i64)]);
    logger.info("parent", &[]);

    let lines = parse_lines(&console);
    assert_eq!(lines[0]["component"], "db");
    assert_eq!(lines[0]["rows"], 3);
    assert!(lines[1].get("component").is_none());
}

#[test]
fn test_sugar_malformed_pairs() {
    let (logger, console) = build(&LoggerConfiguration::default());

    logger.sugar().info(
        "msg",
        &[FieldValue::from("user"), FieldValue::from(42i64), FieldValue::from("extra")],
    );

    let line = &parse_lines(&console)[0];
    assert_eq!(line["level"], "info");
    assert_eq!(line["msg"], "msg");
    assert_eq!(line["user"], 42);
    assert_eq!(line["params0"], "extra");
}

#[test]
fn test_unencodable_field_yields_fallback_line() {
    let (logger, console) = build(&LoggerConfiguration::default());
    let mut bad = HashMap::new();
    bad.insert((1, 2), "tuple keys cannot be JSON object keys");

    logger.info("will not encode", &[Field::any("payload", &bad)]);

    assert_eq!(console.lines(), vec![rust_logger_facade::ENCODE_FAILURE_LINE]);
}

#[inline(never)]
fn log_through_helper(logger: &Logger) {
    logger.with_caller_skip(1).info("from helper", &[]);
}

#[test]
fn test_caller_skip_reports_helper_caller() {
    let (logger, console) = build(&LoggerConfiguration::default());

    log_through_helper(&logger);
    let expected = line!() - 1;

    let caller = parse_lines(&console)[0]["caller"]
        .as_str()
        .expect("caller is a string")
        .to_string();
    assert!(
        caller.ends_with(&format!("integration_tests.rs:{}", expected)),
        "unexpected caller {}",
        caller
    );
}

#[test]
fn test_concurrent_writes_do_not_interleave() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (logger, console) = build(&per_level_config(temp_dir.path()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.with(&[Field::int("thread", t as i64)]);
            thread::spawn(move || {
                for i in 0..200 {
                    logger.info("concurrent", &[Field::int("i", i as i64)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.flush().expect("Failed to flush");

    assert_eq!(parse_lines(&console).len(), 1600);
    assert_eq!(read_sink(temp_dir.path(), "info").len(), 1600);
    assert_eq!(logger.metrics().total_logged(), 1600);
}

#[test]
fn test_unopenable_sink_is_skipped_by_lenient_constructor() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = temp_dir.path().join("plain-file");
    fs::write(&blocker, "not a directory").expect("Failed to write file");

    let mut config = per_level_config(temp_dir.path());
    config.file_level_config.insert(
        "error".to_string(),
        blocker.join("error.log").display().to_string(),
    );

    assert!(Logger::try_new(&config).is_err());

    let console = MemoryWriter::new();
    let logger = Logger::builder()
        .config(config)
        .console_writer(console.clone())
        .build();
    logger.error("still logged", &[]);
    logger.info("to file", &[]);
    logger.flush().expect("Failed to flush");

    assert_eq!(console.lines().len(), 2);
    assert_eq!(read_sink(temp_dir.path(), "info").len(), 1);
    assert!(!logger.sink_names().iter().any(|n| n.contains("plain-file")));
}

#[test]
fn test_configuration_from_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let json = serde_json::json!({
        "enableConsole": false,
        "fileLevelConfig": {"error": temp_dir.path().join("errors.log")},
        "maxHistoryDays": 3,
        "consoleLevel": "warn"
    })
    .to_string();

    let config = LoggerConfiguration::from_json_str(&json).expect("Valid configuration");
    let (logger, console) = build(&config);

    assert_eq!(logger.console_level(), Level::Warn);
    logger.info("below console threshold", &[]);
    logger.error("recorded", &[]);
    logger.flush().expect("Failed to flush");

    assert_eq!(console.lines().len(), 1);
    assert_eq!(read_sink(temp_dir.path(), "errors").len(), 1);
}

#[test]
fn test_console_text_encoding() {
    let config = LoggerConfiguration {
        console_json: false,
        ..Default::default()
    };
    let console = MemoryWriter::new();
    let logger = Logger::builder()
        .config(config)
        .console_writer(console.clone())
        .build();

    logger.warn("plain text", &[Field::bool("ok", false)]);

    let line = console.lines().remove(0);
    let parts: Vec<&str> = line.split('\t').collect();
    assert_eq!(parts.len(), 5);
    assert!(parts[1].contains("warn"));
    assert_eq!(parts[3], "plain text");
    assert_eq!(parts[4], r#"{"ok":false}"#);
}
