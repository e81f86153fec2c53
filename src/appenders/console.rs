//! Console appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::io::Write;

/// Which standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    stream: ConsoleStream,
}

impl ConsoleAppender {
    pub fn stdout() -> Self {
        Self {
            stream: ConsoleStream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: ConsoleStream::Stderr,
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        let written = match self.stream {
            ConsoleStream::Stdout => std::io::stdout().lock().write_all(record),
            ConsoleStream::Stderr => std::io::stderr().lock().write_all(record),
        };
        written.map_err(|e| LoggerError::io_operation("writing log record", self.name(), e))
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }
}
