//! YAML configuration and hot reload

pub mod store;
pub mod watcher;

pub use store::{ConfigStore, SUPPORTED_EXTENSIONS};
pub use watcher::{
    register_watch_func, start_watch_config, watch_funcs, ChangeEvent, ChangeOp, ConfigWatcher,
    DispatchReport, WatchDispatcher, WatchFunc, WatchRegistry, DEFAULT_DEBOUNCE,
};
