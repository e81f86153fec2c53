//! Appender trait for log output destinations

use super::error::Result;

/// One write destination; receives records that are already encoded
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &[u8]) -> Result<()>;
    /// Block until everything written so far has reached the destination
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
