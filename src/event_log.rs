//! Ring buffer of recent meter events for on-screen log viewing.
//!
//! Holds the last [`LOG_CAPACITY`] lines, each stamped with the millisecond
//! clock value it was recorded at. Lines longer than [`LOG_LINE_LENGTH`] are
//! truncated, and pushing into a full log drops the oldest line. Nothing here
//! allocates, so the same log works in the simulator and on the Pico.
//!
//! # Usage
//!
//! ```ignore
//! let mut log = EventLog::new();
//! log.push(now_ms, "Frame drawn");
//! log.push_fmt(now_ms, format_args!("{step}"));
//! for entry in log.iter() {
//!     // entry.at_ms, entry.text()
//! }
//! ```

use core::fmt::{self, Write};

use heapless::{Deque, String};

/// Maximum number of lines kept.
pub const LOG_CAPACITY: usize = 14;

/// Maximum characters per line.
pub const LOG_LINE_LENGTH: usize = 32;

/// One timestamped log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Clock value when the line was recorded, in milliseconds.
    pub at_ms: u64,
    text: String<LOG_LINE_LENGTH>,
}

impl LogEntry {
    /// The (possibly truncated) message.
    #[inline]
    pub fn text(&self) -> &str { self.text.as_str() }
}

/// Fixed-capacity event log, oldest line first.
pub struct EventLog {
    lines: Deque<LogEntry, LOG_CAPACITY>,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self { Self { lines: Deque::new() } }

    /// Record a plain message.
    pub fn push(
        &mut self,
        at_ms: u64,
        msg: &str,
    ) {
        self.push_fmt(at_ms, format_args!("{msg}"));
    }

    /// Record a formatted message. Output past the line length is dropped.
    pub fn push_fmt(
        &mut self,
        at_ms: u64,
        args: fmt::Arguments<'_>,
    ) {
        let mut line = Truncating(String::new());
        line.write_fmt(args).ok();

        if self.lines.is_full() {
            self.lines.pop_front();
        }
        self.lines.push_back(LogEntry { at_ms, text: line.0 }).ok();
    }

    /// Iterate over lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.lines.iter() }

    /// The most recent line, if any.
    pub fn latest(&self) -> Option<&LogEntry> { self.lines.back() }

    /// Number of lines held.
    #[inline]
    pub fn len(&self) -> usize { self.lines.len() }

    /// Whether the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    /// Drop every line.
    pub fn clear(&mut self) { self.lines.clear(); }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

/// Writer that keeps whatever fits and silently drops the rest.
struct Truncating(String<LOG_LINE_LENGTH>);

impl Write for Truncating {
    fn write_str(
        &mut self,
        s: &str,
    ) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
