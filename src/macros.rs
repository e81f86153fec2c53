//! Logging macros with `format!`-style arguments.
//!
//! Without a target the record goes to the process-wide active logger. A
//! leading `logger: <expr>,` sends it to that logger instead.
//!
//! # Examples
//!
//! ```
//! use cli_tpl::prelude::*;
//! use cli_tpl::{info, warn};
//!
//! // through the active logger
//! let port = 8080;
//! info!("listening on port {}", port);
//!
//! // through an explicit logger
//! let logger = Logger::builder().min_level(LogLevel::Debug).build();
//! warn!(logger: logger, "retry {} of {}", 3, 5);
//! ```

/// Log at a given level.
///
/// ```
/// use cli_tpl::{log, LogLevel};
/// log!(LogLevel::Info, "Simple message");
/// log!(LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::log($level, format!($($arg)+))
    };
}

#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at dpanic. Panics afterwards only if the logger is in development
/// mode.
#[macro_export]
macro_rules! dpanic {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.dpanic(format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::dpanic(format!($($arg)+))
    };
}

/// Log at fatal and exit the process with status 1.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::fatal(format!($($arg)+))
    };
}
