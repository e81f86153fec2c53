//! Main logger implementation

use super::{
    encoder::Encoder,
    error::Result,
    log_context::LogContext,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
};
use crate::appenders::{FileHandle, WriteDestination};
use std::panic::Location;
use std::sync::Arc;

/// Records at or above this level carry a stack trace
pub const STACKTRACE_LEVEL: LogLevel = LogLevel::DPanic;

/// An immutable logger: level, encoder and destination are fixed at
/// construction. Reconfiguring means building a new one.
pub struct Logger {
    name: Option<String>,
    min_level: LogLevel,
    encoder: Encoder,
    destination: WriteDestination,
    stacktrace_level: LogLevel,
    development: bool,
}

impl Logger {
    /// Pure construction; opens nothing and writes nothing
    #[must_use]
    pub fn new(level: LogLevel, encoder: Encoder, destination: WriteDestination) -> Self {
        Self {
            name: None,
            min_level: level,
            encoder,
            destination,
            stacktrace_level: STACKTRACE_LEVEL,
            development: false,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.min_level
    }

    pub fn encoder(&self) -> Encoder {
        self.encoder
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// File handles written by this logger
    pub fn files(&self) -> &[Arc<FileHandle>] {
        self.destination.files()
    }

    pub fn destination(&self) -> &WriteDestination {
        &self.destination
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), LogContext::new(), Location::caller());
    }

    /// Log with structured context fields
    #[track_caller]
    pub fn log_with_context(&self, level: LogLevel, message: impl AsRef<str>, context: LogContext) {
        self.emit(level, message.as_ref(), context, Location::caller());
    }

    fn emit(
        &self,
        level: LogLevel,
        message: &str,
        context: LogContext,
        location: &'static Location<'static>,
    ) {
        if !self.enabled(level) {
            return;
        }

        let mut entry = LogEntry::new(level, message)
            .with_caller(Caller::from_location(location))
            .with_context(context);
        if let Some(ref name) = self.name {
            entry = entry.with_logger_name(name.clone());
        }
        if level >= self.stacktrace_level {
            entry = entry.with_stacktrace();
        }
        self.write_entry(&entry);
    }

    /// Encode and write an already-built entry, bypassing the level check
    pub fn write_entry(&self, entry: &LogEntry) -> bool {
        let line = self.encoder.encode(entry);
        self.destination.write(line.as_bytes())
    }

    /// Block until every destination has been flushed
    pub fn sync(&self) -> Result<()> {
        self.destination.sync()
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    /// Logs at dpanic; panics afterwards only in development mode
    #[track_caller]
    pub fn dpanic(&self, message: impl AsRef<str>) {
        self.dpanic_with_context(message, LogContext::new());
    }

    #[track_caller]
    pub fn dpanic_with_context(&self, message: impl AsRef<str>, context: LogContext) {
        let message = message.as_ref();
        self.emit(LogLevel::DPanic, message, context, Location::caller());
        if self.development {
            let _ = self.sync();
            panic!("{}", message);
        }
    }

    /// Logs at panic, then panics with the message
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>) -> ! {
        self.panic_with_context(message, LogContext::new())
    }

    #[track_caller]
    pub fn panic_with_context(&self, message: impl AsRef<str>, context: LogContext) -> ! {
        let message = message.as_ref();
        self.emit(LogLevel::Panic, message, context, Location::caller());
        let _ = self.sync();
        panic!("{}", message);
    }

    /// Logs at fatal, then exits the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>) -> ! {
        self.fatal_with_context(message, LogContext::new())
    }

    #[track_caller]
    pub fn fatal_with_context(&self, message: impl AsRef<str>, context: LogContext) -> ! {
        self.emit(LogLevel::Fatal, message.as_ref(), context, Location::caller());
        let _ = self.sync();
        std::process::exit(1);
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use cli_tpl::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .encoder(Encoder::Json)
    ///     .build();
    /// assert!(logger.enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Info, Encoder::Console, WriteDestination::stdout())
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("encoder", &self.encoder)
            .field("appenders", &self.destination.appender_names())
            .field("development", &self.development)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use cli_tpl::prelude::*;
///
/// let logger = Logger::builder()
///     .name("worker")
///     .min_level(LogLevel::Warn)
///     .destination(WriteDestination::stdout())
///     .build();
/// assert_eq!(logger.name(), Some("worker"));
/// ```
pub struct LoggerBuilder {
    name: Option<String>,
    min_level: LogLevel,
    encoder: Encoder,
    destination: Option<WriteDestination>,
    development: bool,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            name: None,
            min_level: LogLevel::Info,
            encoder: Encoder::Console,
            destination: None,
            development: false,
        }
    }

    /// Emitted under the `logger` key
    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = encoder;
        self
    }

    /// Defaults to stdout
    #[must_use = "builder methods return a new value"]
    pub fn destination(mut self, destination: WriteDestination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Make `dpanic` panic after logging
    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut logger = Logger::new(
            self.min_level,
            self.encoder,
            self.destination.unwrap_or_default(),
        );
        logger.name = self.name;
        logger.development = self.development;
        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
