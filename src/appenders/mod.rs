//! Appender implementations and output construction

pub mod console;
pub mod file;

pub use console::{ConsoleAppender, ConsoleStream};
pub use file::{FileAppender, FileHandle};

pub use crate::core::Appender;

use crate::core::Result;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// One entry of an output list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl OutputTarget {
    /// `stdout` and `stderr` are the streams; anything else is a path
    pub fn parse(target: &str) -> Self {
        match target {
            "stdout" => OutputTarget::Stdout,
            "stderr" => OutputTarget::Stderr,
            path => OutputTarget::File(PathBuf::from(path)),
        }
    }
}

/// Parse a comma-separated output list, skipping blank entries
pub fn parse_targets(list: &str) -> Vec<OutputTarget> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(OutputTarget::parse)
        .collect()
}

/// The fan-out a logger writes every record to
pub struct WriteDestination {
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    files: Vec<Arc<FileHandle>>,
}

impl WriteDestination {
    /// Destination without file handles to track
    pub fn new(appenders: Vec<Box<dyn Appender>>) -> Self {
        Self {
            appenders: Mutex::new(appenders),
            files: Vec::new(),
        }
    }

    pub fn stdout() -> Self {
        Self::new(vec![Box::new(ConsoleAppender::stdout())])
    }

    /// File handles this destination writes to, one per distinct path
    pub fn files(&self) -> &[Arc<FileHandle>] {
        &self.files
    }

    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Write a record to every appender
    ///
    /// A failing appender is reported on stderr and does not stop the rest.
    /// Returns false if any appender failed.
    pub fn write(&self, record: &[u8]) -> bool {
        let mut appenders = self.appenders.lock();
        let mut ok = true;
        for (idx, appender) in appenders.iter_mut().enumerate() {
            if let Err(e) = appender.append(record) {
                eprintln!("[LOGGER ERROR] Appender #{} ({}) failed: {}", idx, appender.name(), e);
                ok = false;
            }
        }
        ok
    }

    /// Flush every appender, returning the first error after trying all
    pub fn sync(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        let mut first_err = None;
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for WriteDestination {
    fn default() -> Self {
        Self::stdout()
    }
}

/// Build a destination from target strings
///
/// `open` lists handles that are still open and may be shared instead of
/// opening the same path again. Any open failure aborts the whole call; files
/// opened earlier in the call are closed when the partial result is dropped.
/// An empty list means stdout.
pub fn build_outputs<S: AsRef<str>>(targets: &[S], open: &[Arc<FileHandle>]) -> Result<WriteDestination> {
    let mut parsed: Vec<OutputTarget> = targets
        .iter()
        .map(|t| t.as_ref().trim())
        .filter(|t| !t.is_empty())
        .map(OutputTarget::parse)
        .collect();
    if parsed.is_empty() {
        parsed.push(OutputTarget::Stdout);
    }

    let mut appenders: Vec<Box<dyn Appender>> = Vec::with_capacity(parsed.len());
    let mut files: Vec<Arc<FileHandle>> = Vec::new();

    for target in parsed {
        match target {
            OutputTarget::Stdout => appenders.push(Box::new(ConsoleAppender::stdout())),
            OutputTarget::Stderr => appenders.push(Box::new(ConsoleAppender::stderr())),
            OutputTarget::File(path) => {
                let existing = files
                    .iter()
                    .chain(open.iter())
                    .find(|h| h.path() == path.as_path() && !h.is_closed())
                    .cloned();
                let handle = match existing {
                    Some(handle) => handle,
                    None => Arc::new(FileHandle::open(path)?),
                };
                if !files.iter().any(|h| Arc::ptr_eq(h, &handle)) {
                    files.push(Arc::clone(&handle));
                }
                appenders.push(Box::new(FileAppender::from_handle(handle)));
            }
        }
    }

    Ok(WriteDestination {
        appenders: Mutex::new(appenders),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            parse_targets("stdout, stderr,logs/app.log,"),
            vec![
                OutputTarget::Stdout,
                OutputTarget::Stderr,
                OutputTarget::File(PathBuf::from("logs/app.log")),
            ]
        );
    }

    #[test]
    fn test_streams_open_no_files() -> Result<()> {
        let dest = build_outputs(&["stdout", "stderr"], &[])?;
        assert!(dest.files().is_empty());
        assert_eq!(dest.appender_names(), ["stdout", "stderr"]);
        Ok(())
    }

    #[test]
    fn test_empty_list_means_stdout() -> Result<()> {
        let dest = build_outputs::<&str>(&[], &[])?;
        assert_eq!(dest.appender_names(), ["stdout"]);
        Ok(())
    }

    #[test]
    fn test_failure_returns_no_partial_set() -> Result<()> {
        let dir = tempdir()?;
        let good = dir.path().join("good.log");
        // a regular file cannot act as a parent directory
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "")?;
        let bad = blocker.join("bad.log");

        let result = build_outputs(
            &[good.to_str().unwrap(), bad.to_str().unwrap()],
            &[],
        );
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_open_handles_are_reused() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let target = path.to_str().unwrap();

        let first = build_outputs(&[target], &[])?;
        let second = build_outputs(&[target], first.files())?;

        assert_eq!(second.files().len(), 1);
        assert!(Arc::ptr_eq(&first.files()[0], &second.files()[0]));
        Ok(())
    }

    #[test]
    fn test_duplicate_targets_share_one_handle() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dup.log");
        let target = path.to_str().unwrap();

        let dest = build_outputs(&[target, target], &[])?;
        assert_eq!(dest.files().len(), 1);
        assert!(dest.write(b"line\n"));
        dest.sync()?;
        assert_eq!(fs::read_to_string(&path)?, "line\nline\n");
        Ok(())
    }

    #[test]
    fn test_closed_handle_not_reused() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("app.log");
        let target = path.to_str().unwrap();

        let first = build_outputs(&[target], &[])?;
        first.files()[0].close();
        let second = build_outputs(&[target], first.files())?;

        assert!(!Arc::ptr_eq(&first.files()[0], &second.files()[0]));
        assert!(!second.files()[0].is_closed());
        Ok(())
    }
}
