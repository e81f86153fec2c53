//! Core logger types and traits

pub mod appender;
pub mod encoder;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod registry;

pub use appender::Appender;
pub use encoder::{build_encoder, Encoder, EncoderConfig, LevelEncoding, SUPPORTED_FORMATS, TIME_LAYOUT};
pub use error::{LoggerError, Result};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::{Caller, LogEntry};
pub use log_level::{build_level, LogLevel, SUPPORTED_LEVELS};
pub use logger::{Logger, LoggerBuilder, STACKTRACE_LEVEL};
pub use registry::{LoggerRegistry, RETAINED_GENERATIONS};
