//! Levelled event log for the on-screen log page.
//!
//! A `heapless` ring of short, timestamped lines. Every entry is mirrored to
//! the `log` facade so a host backend (the simulator's tracing subscriber)
//! sees the same stream.

use core::fmt::Write;

use embedded_graphics::pixelcolor::Rgb565;
use heapless::{Deque, String};

use crate::colors::{GRAY, GREEN, LIGHT_GRAY, RED, YELLOW};

/// Maximum number of entries kept.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per message.
pub const LOG_MSG_LEN: usize = 48;

/// Entry severity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Display color on the log page.
    pub const fn color(self) -> Rgb565 {
        match self {
            Self::Trace => GRAY,
            Self::Debug => LIGHT_GRAY,
            Self::Info => GREEN,
            Self::Warn => YELLOW,
            Self::Error => RED,
        }
    }

    /// Single-character prefix.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }

    const fn as_log(self) -> log::Level {
        match self {
            Self::Trace => log::Level::Trace,
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warn => log::Level::Warn,
            Self::Error => log::Level::Error,
        }
    }
}

/// One log line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Truncated to [`LOG_MSG_LEN`] characters.
    pub message: String<LOG_MSG_LEN>,
    /// Session clock.
    pub timestamp_ms: u64,
}

impl LogEntry {
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u64,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Ring buffer of recent entries; the oldest is dropped when full.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    entries: Deque<LogEntry, LOG_ENTRIES>,
}

impl EventLog {
    pub const fn new() -> Self { Self { entries: Deque::new() } }

    /// Record a message and mirror it to the `log` facade.
    pub fn push(
        &mut self,
        level: LogLevel,
        timestamp_ms: u64,
        message: &str,
    ) {
        log::log!(target: "ghost", level.as_log(), "{message}");
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry::new(level, message, timestamp_ms)).ok();
    }

    /// Record a formatted message. Text past the line length is cut.
    pub fn push_fmt(
        &mut self,
        level: LogLevel,
        timestamp_ms: u64,
        args: core::fmt::Arguments<'_>,
    ) {
        let mut line: String<LOG_MSG_LEN> = String::new();
        // Overflow just truncates
        line.write_fmt(args).ok();
        self.push(level, timestamp_ms, &line);
    }

    pub fn info(
        &mut self,
        timestamp_ms: u64,
        message: &str,
    ) {
        self.push(LogLevel::Info, timestamp_ms, message);
    }

    pub fn warn(
        &mut self,
        timestamp_ms: u64,
        message: &str,
    ) {
        self.push(LogLevel::Warn, timestamp_ms, message);
    }

    pub fn error(
        &mut self,
        timestamp_ms: u64,
        message: &str,
    ) {
        self.push(LogLevel::Error, timestamp_ms, message);
    }

    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.entries.iter() }

    /// Most recent entry.
    pub fn last(&self) -> Option<&LogEntry> { self.entries.back() }

    pub fn clear(&mut self) { self.entries.clear(); }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iterate_in_order() {
        let mut log = EventLog::new();
        log.info(0, "first");
        log.warn(10, "second");
        let levels: std::vec::Vec<LogLevel> = log.iter().map(|e| e.level).collect();
        assert_eq!(levels, [LogLevel::Info, LogLevel::Warn]);
        assert_eq!(log.last().unwrap().message.as_str(), "second");
    }

    #[test]
    fn test_oldest_dropped_when_full() {
        let mut log = EventLog::new();
        for i in 0..(LOG_ENTRIES as u64 + 3) {
            log.info(i, "tick");
        }
        assert_eq!(log.len(), LOG_ENTRIES);
        assert_eq!(log.iter().next().unwrap().timestamp_ms, 3);
    }

    #[test]
    fn test_long_messages_truncated() {
        let long = "x".repeat(LOG_MSG_LEN * 2);
        let entry = LogEntry::new(LogLevel::Error, &long, 0);
        assert_eq!(entry.message.len(), LOG_MSG_LEN);
    }

    #[test]
    fn test_push_fmt() {
        let mut log = EventLog::new();
        log.push_fmt(LogLevel::Info, 5, format_args!("base {:.1}", 12.345));
        assert_eq!(log.last().unwrap().message.as_str(), "base 12.3");
    }

    #[test]
    fn test_level_prefix_and_order() {
        assert_eq!(LogLevel::Warn.prefix(), 'W');
        assert!(LogLevel::Error > LogLevel::Info);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
