//! Call-site capture
//!
//! The common path costs nothing: every emitting method is `#[track_caller]`,
//! so the location of the user's call is known statically. A handle derived
//! with a caller skip instead walks the live call stack, ignoring frames of
//! this crate and of the standard library, and reports the frame `skip` levels
//! above the first user frame.

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;

const CRATE_PREFIX: &str = concat!(env!("CARGO_CRATE_NAME"), "::");
const RUNTIME_PREFIXES: [&str; 4] = ["std::", "core::", "alloc::", "backtrace::"];

/// Source location reported as the `caller` of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Resolve the caller for an emission.
    ///
    /// With no skip the tracked location is used as-is. With a skip the stack
    /// is walked; if symbols or line info are unavailable the tracked location
    /// is used instead.
    pub fn resolve(tracked: &'static Location<'static>, skip: Option<usize>) -> Self {
        match skip {
            None => Self::from_location(tracked),
            Some(skip) => {
                Self::from_stack(skip).unwrap_or_else(|| Self::from_location(tracked))
            }
        }
    }

    fn from_stack(skip: usize) -> Option<Self> {
        let rendered = Backtrace::force_capture().to_string();
        let found = user_frames(&rendered)
            .nth(skip)
            .and_then(|(_, location)| location)
            .and_then(parse_location);
        found
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Iterate `(symbol, location)` pairs of frames that belong to user code.
///
/// Works on the short rendering of `std::backtrace::Backtrace`:
///
/// ```text
///    3: app::handlers::create_user
///              at ./src/handlers.rs:42:9
/// ```
fn user_frames(rendered: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    let mut frames: Vec<(&str, Option<&str>)> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                if last.1.is_none() {
                    last.1 = Some(location);
                }
            }
        } else if let Some((index, symbol)) = trimmed.split_once(": ") {
            if !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()) {
                frames.push((symbol, None));
            }
        }
    }
    frames
        .into_iter()
        .filter(|(symbol, _)| !is_internal_frame(symbol))
}

fn is_internal_frame(symbol: &str) -> bool {
    let symbol = symbol.trim_start_matches('<');
    symbol.starts_with(CRATE_PREFIX)
        || RUNTIME_PREFIXES.iter().any(|p| symbol.starts_with(p))
        || symbol.starts_with("__rust")
        || symbol.starts_with("rust_begin_unwind")
}

/// Parse `path:line:column` (column optional)
fn parse_location(location: &str) -> Option<Caller> {
    let location = location.strip_prefix("./").unwrap_or(location);
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;
    match (parts.next(), middle.parse::<u32>()) {
        (Some(file), Ok(line)) => Some(Caller::new(file, line)),
        _ => last.parse::<u32>().ok().map(|line| Caller::new(middle, line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace::Backtrace::create
             at /rustc/abc/library/std/src/backtrace.rs:331:13
   1: rust_logger_facade::core::caller::Caller::from_stack
             at ./src/core/caller.rs:50:24
   2: <rust_logger_facade::core::stdlog::StdLogWriter as std::io::Write>::write
             at ./src/core/stdlog.rs:40:9
   3: app::helpers::log_failure
             at ./src/helpers.rs:12:5
   4: app::main
             at ./src/main.rs:7:5
   5: core::ops::function::FnOnce::call_once
             at /rustc/abc/library/core/src/ops/function.rs:250:5";

    #[test]
    fn test_user_frames_skip_crate_and_runtime() {
        let frames: Vec<_> = user_frames(RENDERED).collect();
        assert_eq!(
            frames,
            vec![
                ("app::helpers::log_failure", Some("./src/helpers.rs:12:5")),
                ("app::main", Some("./src/main.rs:7:5")),
            ]
        );
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            parse_location("./src/main.rs:7:5"),
            Some(Caller::new("src/main.rs", 7))
        );
        assert_eq!(
            parse_location("/abs/path/lib.rs:120"),
            Some(Caller::new("/abs/path/lib.rs", 120))
        );
        assert_eq!(parse_location("no-location"), None);
    }

    #[test]
    fn test_resolve_without_skip_uses_tracked_location() {
        let location = Location::caller();
        let caller = Caller::resolve(location, None);
        assert_eq!(caller.line, location.line());
        assert!(caller.file.ends_with("caller.rs"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Caller::new("src/main.rs", 7).to_string(), "src/main.rs:7");
    }
}
