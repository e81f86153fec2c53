//! Log entry structure

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::backtrace::Backtrace;
use std::panic::Location;

/// Source location of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }

    /// `<parent dir>/<file>:<line>`, dropping the rest of the path
    pub fn short(&self) -> String {
        let path = self.file.replace('\\', "/");
        let trimmed = match path.rfind('/') {
            Some(last) => match path[..last].rfind('/') {
                Some(prev) => &path[prev + 1..],
                None => path.as_str(),
            },
            None => path.as_str(),
        };
        format!("{}:{}", trimmed, self.line)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub logger_name: Option<String>,
    pub caller: Option<Caller>,
    pub context: LogContext,
    pub stacktrace: Option<String>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Local::now(),
            logger_name: None,
            caller: None,
            context: LogContext::new(),
            stacktrace: None,
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = Some(name.into());
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = context;
        self
    }

    /// Capture the current stack regardless of `RUST_BACKTRACE`
    pub fn with_stacktrace(mut self) -> Self {
        self.stacktrace = Some(Backtrace::force_capture().to_string());
        self
    }
}
