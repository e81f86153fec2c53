//! # cli-tpl
//!
//! A command-line application template: flag parsing, YAML configuration
//! with hot reload, and a structured logger that can be replaced while the
//! program runs.
//!
//! ## Features
//!
//! - **Hot-swappable logger**: level, encoding and outputs are rebuilt and
//!   swapped atomically; in-flight log calls finish on the logger they loaded
//! - **Deferred close**: file handles stay open for one extra generation
//! - **Config watch**: editing the config file re-runs every registered
//!   reload callback; a failing callback never stops the others
//!
//! ```no_run
//! use cli_tpl::prelude::*;
//!
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .encoder(Encoder::Json)
//!     .build();
//! cli_tpl::set_default_logger(logger);
//! cli_tpl::info("ready");
//! ```

pub mod appenders;
pub mod cli;
pub mod config;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{build_outputs, ConsoleAppender, FileAppender, FileHandle, WriteDestination};
    pub use crate::config::{register_watch_func, start_watch_config, ConfigStore, ConfigWatcher};
    pub use crate::core::{
        build_encoder, build_level, Appender, Encoder, FieldValue, LogContext, LogEntry, LogLevel,
        Logger, LoggerBuilder, LoggerError, LoggerRegistry, Result,
    };
}

pub use appenders::{build_outputs, ConsoleAppender, FileAppender, FileHandle, WriteDestination};
pub use config::{register_watch_func, start_watch_config, ConfigStore, ConfigWatcher, WatchDispatcher};
pub use crate::core::registry::{
    debug, default_logger, dpanic, error, fatal, info, log, log_with_context, panic, registry,
    set_default_logger, sync, warn,
};
pub use crate::core::{
    build_encoder, build_level, Appender, Caller, Encoder, EncoderConfig, FieldValue, LevelEncoding,
    LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerRegistry, Result,
    RETAINED_GENERATIONS, STACKTRACE_LEVEL, SUPPORTED_LEVELS, TIME_LAYOUT,
};
