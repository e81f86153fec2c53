//! Process-wide active logger
//!
//! [`LoggerRegistry`] owns the active [`Logger`] behind an atomic swap and the
//! file handles of the last two installations. Installing generation N
//! closes generation N-2, so a log call that loaded the outgoing logger just
//! before a swap still finds its files open.
//!
//! The package-level functions at the bottom of this module delegate to the
//! global registry.

use super::{
    error::Result,
    log_context::LogContext,
    log_level::LogLevel,
    logger::Logger,
};
use crate::appenders::{self, FileHandle, WriteDestination};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Generations whose file handles stay open
pub const RETAINED_GENERATIONS: usize = 2;

#[derive(Default)]
struct Generations {
    retained: VecDeque<Vec<Arc<FileHandle>>>,
    installs: u64,
}

impl Generations {
    fn holds(&self, handle: &Arc<FileHandle>) -> bool {
        self.retained
            .iter()
            .flatten()
            .any(|h| Arc::ptr_eq(h, handle))
    }

    fn open_handles(&self) -> Vec<Arc<FileHandle>> {
        let mut handles: Vec<Arc<FileHandle>> = Vec::new();
        for handle in self.retained.iter().flatten() {
            if !handle.is_closed() && !handles.iter().any(|h| Arc::ptr_eq(h, handle)) {
                handles.push(Arc::clone(handle));
            }
        }
        handles
    }
}

pub struct LoggerRegistry {
    active: ArcSwap<Logger>,
    generations: Mutex<Generations>,
}

impl LoggerRegistry {
    /// The initial logger counts as the first generation
    pub fn new(initial: Logger) -> Self {
        let mut generations = Generations::default();
        generations.retained.push_back(initial.files().to_vec());
        Self {
            active: ArcSwap::from_pointee(initial),
            generations: Mutex::new(generations),
        }
    }

    /// The logger active at call time
    ///
    /// The returned `Arc` keeps working after a swap; its files stay open
    /// for one more installation.
    pub fn current(&self) -> Arc<Logger> {
        self.active.load_full()
    }

    /// Build a destination, sharing handles that retained generations
    /// already have open for the same path
    pub fn build_outputs<S: AsRef<str>>(&self, targets: &[S]) -> Result<WriteDestination> {
        let open = self.generations.lock().open_handles();
        appenders::build_outputs(targets, &open)
    }

    /// Replace the active logger
    ///
    /// Syncs the outgoing logger, swaps, then closes the handles of the
    /// generation that just fell out of the retention window unless a
    /// retained generation still writes to them. Returns the outgoing logger.
    pub fn install(&self, logger: Logger) -> Arc<Logger> {
        let mut generations = self.generations.lock();

        let outgoing = self.active.load_full();
        if let Err(e) = outgoing.sync() {
            eprintln!("[LOGGER WARNING] Failed to sync outgoing logger: {}", e);
        }

        let files = logger.files().to_vec();
        self.active.store(Arc::new(logger));
        generations.retained.push_back(files);
        generations.installs += 1;

        while generations.retained.len() > RETAINED_GENERATIONS {
            let Some(retired) = generations.retained.pop_front() else {
                break;
            };
            for handle in retired {
                if !generations.holds(&handle) {
                    handle.close();
                }
            }
        }

        outgoing
    }

    /// Number of installs since construction
    pub fn installs(&self) -> u64 {
        self.generations.lock().installs
    }

    /// Distinct file handles still open across retained generations
    pub fn open_files(&self) -> Vec<Arc<FileHandle>> {
        self.generations.lock().open_handles()
    }

    /// Flush the active logger
    pub fn sync(&self) -> Result<()> {
        self.current().sync()
    }
}

impl Default for LoggerRegistry {
    /// info level, console encoding, stdout
    fn default() -> Self {
        Self::new(Logger::default())
    }
}

static REGISTRY: Lazy<Arc<LoggerRegistry>> = Lazy::new(|| Arc::new(LoggerRegistry::default()));

/// The process-wide registry behind the package-level log functions
pub fn registry() -> Arc<LoggerRegistry> {
    Arc::clone(&REGISTRY)
}

/// Install `logger` as the process-wide active logger
pub fn set_default_logger(logger: Logger) -> Arc<Logger> {
    REGISTRY.install(logger)
}

pub fn default_logger() -> Arc<Logger> {
    REGISTRY.current()
}

/// Flush the process-wide active logger
pub fn sync() -> Result<()> {
    REGISTRY.sync()
}

#[track_caller]
pub fn log(level: LogLevel, message: impl AsRef<str>) {
    REGISTRY.current().log(level, message);
}

#[track_caller]
pub fn log_with_context(level: LogLevel, message: impl AsRef<str>, context: LogContext) {
    REGISTRY.current().log_with_context(level, message, context);
}

#[track_caller]
pub fn debug(message: impl AsRef<str>) {
    REGISTRY.current().debug(message);
}

#[track_caller]
pub fn info(message: impl AsRef<str>) {
    REGISTRY.current().info(message);
}

#[track_caller]
pub fn warn(message: impl AsRef<str>) {
    REGISTRY.current().warn(message);
}

#[track_caller]
pub fn error(message: impl AsRef<str>) {
    REGISTRY.current().error(message);
}

#[track_caller]
pub fn dpanic(message: impl AsRef<str>) {
    REGISTRY.current().dpanic(message);
}

#[track_caller]
pub fn panic(message: impl AsRef<str>) -> ! {
    REGISTRY.current().panic(message)
}

#[track_caller]
pub fn fatal(message: impl AsRef<str>) -> ! {
    REGISTRY.current().fatal(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Encoder;
    use std::fs;
    use tempfile::TempDir;

    fn file_logger(registry: &LoggerRegistry, path: &std::path::Path) -> Logger {
        let dest = registry
            .build_outputs(&[path.to_str().unwrap()])
            .expect("outputs");
        Logger::new(LogLevel::Info, Encoder::Json, dest)
    }

    #[test]
    fn test_install_swaps_active_logger() {
        let registry = LoggerRegistry::default();
        let before = registry.current();

        let outgoing = registry.install(Logger::builder().min_level(LogLevel::Error).build());

        assert!(Arc::ptr_eq(&before, &outgoing));
        assert_eq!(registry.current().level(), LogLevel::Error);
        assert_eq!(registry.installs(), 1);
    }

    #[test]
    fn test_generation_n_minus_2_closed() {
        let dir = TempDir::new().unwrap();
        let registry = LoggerRegistry::default();

        let a = file_logger(&registry, &dir.path().join("a.log"));
        let f1 = Arc::clone(&a.files()[0]);
        registry.install(a);

        let b = file_logger(&registry, &dir.path().join("b.log"));
        let f2 = Arc::clone(&b.files()[0]);
        registry.install(b);
        assert!(!f1.is_closed(), "A's files survive B's install");

        let c = file_logger(&registry, &dir.path().join("c.log"));
        registry.install(c);
        assert!(f1.is_closed(), "A's files close on C's install");
        assert!(!f2.is_closed());
    }

    #[test]
    fn test_same_config_twice_keeps_one_handle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("same.log");
        let registry = LoggerRegistry::default();

        registry.install(file_logger(&registry, &path));
        registry.install(file_logger(&registry, &path));
        registry.install(file_logger(&registry, &path));

        let open = registry.open_files();
        assert_eq!(open.len(), 1);
        assert!(!open[0].is_closed());

        registry.current().info("still writable");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("still writable"));
    }

    #[test]
    fn test_outgoing_logger_writes_after_swap() {
        let dir = TempDir::new().unwrap();
        let registry = LoggerRegistry::default();

        registry.install(file_logger(&registry, &dir.path().join("old.log")));
        let held = registry.current();

        registry.install(file_logger(&registry, &dir.path().join("new.log")));
        held.info("late write");

        let content = fs::read_to_string(dir.path().join("old.log")).unwrap();
        assert!(content.contains("late write"));
    }
}
