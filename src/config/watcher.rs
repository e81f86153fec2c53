//! Configuration file watcher for hot reload.
//!
//! [`WatchRegistry`] holds named reload callbacks. [`WatchDispatcher`] turns
//! one change event into a store reload plus one run of every callback.
//! [`ConfigWatcher`] wires a `notify` watcher to a dispatcher thread.

use super::store::ConfigStore;
use crate::core::{LogContext, LogLevel, LoggerRegistry, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Events for the config file that arrive within this window after the
/// first one are folded into a single dispatch
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// A reload callback
pub type WatchFunc = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Outcome of one dispatch, one entry per callback
pub type DispatchReport = Vec<(String, Result<()>)>;

/// Named reload callbacks; registering an existing name replaces it
#[derive(Default)]
pub struct WatchRegistry {
    funcs: RwLock<HashMap<String, WatchFunc>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, name: impl Into<String>, func: F)
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        self.funcs.write().insert(name.into(), Arc::new(func));
    }

    pub fn names(&self) -> Vec<String> {
        self.funcs.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.funcs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.read().is_empty()
    }

    /// Copy out the callbacks so none run under the lock
    fn snapshot(&self) -> Vec<(String, WatchFunc)> {
        self.funcs
            .read()
            .iter()
            .map(|(name, func)| (name.clone(), Arc::clone(func)))
            .collect()
    }
}

static WATCH_FUNCS: Lazy<Arc<WatchRegistry>> = Lazy::new(|| Arc::new(WatchRegistry::new()));

/// Process-wide callback registry used by [`start_watch_config`]
pub fn watch_funcs() -> Arc<WatchRegistry> {
    Arc::clone(&WATCH_FUNCS)
}

/// Register a callback run on every config file change
///
/// `name` only labels the callback in log output; reusing one replaces the
/// earlier callback.
pub fn register_watch_func<F>(name: impl Into<String>, func: F)
where
    F: Fn() -> Result<()> + Send + Sync + 'static,
{
    WATCH_FUNCS.register(name, func);
}

/// Start watching the store's file with the process-wide callbacks and
/// logger; the store must have a backing file
pub fn start_watch_config(store: Arc<ConfigStore>) -> Result<ConfigWatcher> {
    let dispatcher = WatchDispatcher::new(store, watch_funcs(), crate::core::registry::registry());
    ConfigWatcher::start(Arc::new(dispatcher), DEFAULT_DEBOUNCE)
}

/// File operation reported in the `operation` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Create,
    Write,
    Remove,
    Rename,
    Chmod,
}

impl ChangeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeOp::Create => "create",
            ChangeOp::Write => "write",
            ChangeOp::Remove => "remove",
            ChangeOp::Rename => "rename",
            ChangeOp::Chmod => "chmod",
        }
    }

    /// A file renamed onto the watched name counts as created
    pub fn from_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeOp::Create),
            EventKind::Remove(_) => Some(ChangeOp::Remove),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(ChangeOp::Chmod),
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Some(ChangeOp::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeOp::Rename),
            EventKind::Modify(_) => Some(ChangeOp::Write),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    /// Only new content triggers a reload
    pub fn triggers_reload(&self) -> bool {
        matches!(self, ChangeOp::Create | ChangeOp::Write)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub op: ChangeOp,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(op: ChangeOp, path: impl Into<PathBuf>) -> Self {
        Self {
            op,
            path: path.into(),
        }
    }

    /// Absolute path with forward slashes
    pub fn display_path(&self) -> String {
        let absolute = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&self.path))
                .unwrap_or_else(|_| self.path.clone())
        };
        absolute.to_string_lossy().replace('\\', "/")
    }
}

/// Runs every registered callback for a change event
pub struct WatchDispatcher {
    store: Arc<ConfigStore>,
    funcs: Arc<WatchRegistry>,
    logger: Arc<LoggerRegistry>,
}

impl WatchDispatcher {
    pub fn new(store: Arc<ConfigStore>, funcs: Arc<WatchRegistry>, logger: Arc<LoggerRegistry>) -> Self {
        Self {
            store,
            funcs,
            logger,
        }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Reload the store, log the trigger, run the callbacks
    ///
    /// A store read failure is logged and the callbacks still run against
    /// the previous values.
    pub fn handle_event(&self, event: &ChangeEvent) -> DispatchReport {
        if let Err(e) = self.store.reload() {
            self.logger.current().log_with_context(
                LogLevel::Error,
                "config file read failed",
                LogContext::new().with_field("detail", e.to_string()),
            );
        }

        self.logger.current().log_with_context(
            LogLevel::Warn,
            "config update trigger",
            LogContext::new()
                .with_field("operation", event.op.as_str())
                .with_field("filename", event.display_path()),
        );

        self.dispatch()
    }

    /// Run every callback; a failure is logged and the rest still run
    pub fn dispatch(&self) -> DispatchReport {
        let mut report = Vec::new();
        for (name, func) in self.funcs.snapshot() {
            let result = func();
            // reload callbacks may have swapped the logger
            let logger = self.logger.current();
            match &result {
                Ok(()) => logger.log_with_context(
                    LogLevel::Warn,
                    "config reload success",
                    LogContext::new()
                        .with_field("name", name.as_str())
                        .with_field("detail", "success"),
                ),
                Err(e) => logger.log_with_context(
                    LogLevel::Warn,
                    "config reload ignored",
                    LogContext::new()
                        .with_field("name", name.as_str())
                        .with_field("detail", e.to_string()),
                ),
            }
            report.push((name, result));
        }
        report
    }
}

/// Keeps a config file watch alive; dropping it stops the watch
pub struct ConfigWatcher {
    path: PathBuf,
    watcher: Option<RecommendedWatcher>,
    worker: Option<thread::JoinHandle<()>>,
}

impl ConfigWatcher {
    /// Watch the dispatcher's config file
    ///
    /// The parent directory is watched so that editors which save by
    /// writing a new file and renaming it over the old one are seen.
    pub fn start(dispatcher: Arc<WatchDispatcher>, debounce: Duration) -> Result<Self> {
        let path = dispatcher
            .store()
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| crate::core::LoggerError::other("no config file to watch"))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| crate::core::LoggerError::other("config path has no file name"))?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = unbounded::<ChangeEvent>();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => forward_event(&event, &file_name, &tx),
                Err(e) => eprintln!("[LOGGER ERROR] Config watch error: {}", e),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let worker = thread::Builder::new()
            .name("config-watch".to_string())
            .spawn(move || run_dispatch_loop(&dispatcher, &rx, debounce))?;

        Ok(Self {
            path,
            watcher: Some(watcher),
            worker: Some(worker),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop watching and wait for an in-progress dispatch to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // dropping the watcher drops the sender, which ends the loop
        drop(self.watcher.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                eprintln!("[LOGGER ERROR] Config watch thread panicked");
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        drop(self.watcher.take());
        // detach: a stuck callback must not block the caller
        drop(self.worker.take());
    }
}

fn forward_event(event: &Event, file_name: &std::ffi::OsStr, tx: &Sender<ChangeEvent>) {
    let Some(mut op) = ChangeOp::from_kind(&event.kind) else {
        return;
    };
    // a two-sided rename reports [from, to]; landing on the config name
    // replaces its content
    if let EventKind::Modify(ModifyKind::Name(RenameMode::Both)) = event.kind {
        if event.paths.last().and_then(|p| p.file_name()) == Some(file_name) {
            op = ChangeOp::Create;
        }
    }
    if !op.triggers_reload() {
        return;
    }
    if let Some(path) = event.paths.iter().rev().find(|p| p.file_name() == Some(file_name)) {
        let _ = tx.send(ChangeEvent::new(op, path.clone()));
    }
}

fn run_dispatch_loop(dispatcher: &WatchDispatcher, rx: &Receiver<ChangeEvent>, debounce: Duration) {
    while let Ok(first) = rx.recv() {
        let deadline = Instant::now() + debounce;
        loop {
            match rx.recv_deadline(deadline) {
                Ok(_) => continue,
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        dispatcher.handle_event(&first);
    }
}
