//! File appender implementation
//!
//! A [`FileHandle`] is shared between the appender that writes through it
//! and the registry generation that decides when it is closed. Closing is
//! explicit; after [`FileHandle::close`] every write fails with
//! [`LoggerError::FileClosed`].

use crate::core::{Appender, LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FileHandle {
    /// Open `path` for appending, creating it and any missing parent
    /// directories
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation("creating log directory", parent.display().to_string(), e)
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::io_operation("opening log output", path.display().to_string(), e))?;

        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_all(&self, buf: &[u8]) -> Result<()> {
        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| LoggerError::file_closed(self.path.display().to_string()))?;
        file.write_all(buf)?;
        Ok(())
    }

    /// fsync; a closed handle has nothing left to sync
    pub fn sync(&self) -> Result<()> {
        if let Some(file) = self.file.lock().as_mut() {
            file.flush()?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Close the handle; returns false if it was already closed
    pub fn close(&self) -> bool {
        match self.file.lock().take() {
            Some(file) => {
                let _ = file.sync_all();
                true
            }
            None => false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }
}

pub struct FileAppender {
    handle: Arc<FileHandle>,
}

impl FileAppender {
    pub fn from_handle(handle: Arc<FileHandle>) -> Self {
        Self { handle }
    }
}

impl Appender for FileAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.handle.write_all(record)
    }

    fn flush(&mut self) -> Result<()> {
        self.handle.sync()
    }

    fn name(&self) -> &str {
        "file"
    }
}
