//! Error types for the logger and configuration layers

use super::encoder::{Encoder, SUPPORTED_FORMATS};
use super::log_level::SUPPORTED_LEVELS;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level name outside the supported set
    #[error("unrecognized level: {level}, supported values: {}", SUPPORTED_LEVELS.join(","))]
    InvalidLevel { level: String },

    /// Encoding name outside the supported set
    ///
    /// Carries the console encoder so callers that want to keep going still
    /// have something usable.
    #[error("unrecognized format: {format}, supported values: {}", SUPPORTED_FORMATS.join(","))]
    InvalidFormat { format: String, fallback: Encoder },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Write attempted on a file handle whose generation was retired
    #[error("file output '{path}' is already closed")]
    FileClosed { path: String },

    /// Config file could not be parsed as YAML
    #[error("failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Config file extension is not one we read
    #[error("unsupported config type for '{path}', supported extensions: yaml")]
    UnsupportedConfigType { path: String },

    /// File watcher could not be set up
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            level: level.into(),
        }
    }

    pub fn invalid_format(format: impl Into<String>) -> Self {
        LoggerError::InvalidFormat {
            format: format.into(),
            fallback: Encoder::default(),
        }
    }

    pub fn file_closed(path: impl Into<String>) -> Self {
        LoggerError::FileClosed { path: path.into() }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for bad level or format names
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidLevel { .. } | LoggerError::InvalidFormat { .. }
        )
    }

    /// The default encoder handed back alongside an unrecognized format
    pub fn fallback_encoder(&self) -> Option<&Encoder> {
        match self {
            LoggerError::InvalidFormat { fallback, .. } => Some(fallback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_lists_supported_values() {
        let err = LoggerError::invalid_level("verbose");
        assert_eq!(
            err.to_string(),
            "unrecognized level: verbose, supported values: debug,info,warn,error,dpanic,panic,fatal"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_format_carries_fallback() {
        let err = LoggerError::invalid_format("xml");
        assert_eq!(
            err.to_string(),
            "unrecognized format: xml, supported values: json,console"
        );
        assert_eq!(err.fallback_encoder(), Some(&Encoder::Console));
    }

    #[test]
    fn test_format_error_names_every_buildable_format() {
        let text = LoggerError::invalid_format("yaml").to_string();
        for name in SUPPORTED_FORMATS {
            assert!(crate::core::build_encoder(name).is_ok());
            assert!(text.contains(name));
        }
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log output", "/var/log/app.log", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log output"));
        assert!(!err.is_validation());
        assert!(err.fallback_encoder().is_none());
    }
}
