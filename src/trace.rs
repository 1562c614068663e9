//! Event tracing for step-by-step inspection of a search.
//!
//! When the `trace` feature is enabled, the engine writes one tagged line per
//! decision to a [`TraceWriter`]. Serial runs produce a deterministic trace
//! that can be diffed between versions; parallel runs produce the same
//! multiset of lines in a scheduling-dependent order.
//!
//! ```text
//! TRACE PRUNE depth=<d> lo=<f> min_ub=<f>
//! TRACE IMPROVE depth=<d> ub=<f> evicted=<n>
//! TRACE LEAF depth=<d> x=<interval> y=<interval> lb=<f> ub=<f>
//! TRACE STALE depth=<d> lb=<f>
//! TRACE UNRESOLVED depth=<d> x=<interval> y=<interval> f=<interval>
//! ```

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A thread-safe buffer that collects trace lines.
pub struct TraceWriter {
    buffer: Mutex<String>,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(String::with_capacity(64 * 1024)),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write a trace line.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.buffer();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Write a trace line using format args.
    pub fn write_fmt(&self, args: std::fmt::Arguments<'_>) {
        let mut buf = self.buffer();
        let _ = buf.write_fmt(args);
        buf.push('\n');
    }

    /// All collected trace output.
    pub fn get_output(&self) -> String {
        self.buffer().clone()
    }

    /// Trace output as a vector of lines.
    pub fn get_lines(&self) -> Vec<String> {
        self.buffer().lines().map(|s| s.to_string()).collect()
    }

    /// Number of lines starting with `TRACE <tag>`.
    pub fn count_tag(&self, tag: &str) -> usize {
        let prefix = format!("TRACE {} ", tag);
        self.buffer().lines().filter(|l| l.starts_with(&prefix)).count()
    }

    /// Write trace output to stderr for debugging.
    pub fn dump_to_stderr(&self) {
        let buf = self.buffer();
        let _ = std::io::stderr().write_all(buf.as_bytes());
    }
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Conditional trace output (only active with the `trace` feature).
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if let Some(ref tw) = $tracer {
            tw.write_fmt(format_args!($($arg)*));
        }
    };
}

/// No-op when the `trace` feature is disabled.
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {};
}
