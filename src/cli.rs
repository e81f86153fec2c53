//! Command-line surface: flags, startup and the command tree

use crate::config::{ConfigStore, ConfigWatcher, WatchDispatcher, WatchRegistry, DEFAULT_DEBOUNCE};
use crate::core::{build_encoder, build_level, Logger, LoggerRegistry, Result};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const VERSION: &str = "v0.0.1";

pub const BIND_LOG_LEVEL: &str = "global.log.level";
pub const BIND_LOG_FORMAT: &str = "global.log.format";
pub const BIND_LOG_OUTPUT: &str = "global.log.output";

/// Name the log reload callback is registered under
pub const LOG_WATCH_NAME: &str = "global.log";

pub const DEFAULT_CONFIG: &str = include_str!("../etc/default.yaml");

const ROOT_ITERATIONS: usize = 10_000;
const ROOT_INTERVAL: Duration = Duration::from_secs(1);

/// flag id, bound config key
const LOG_FLAGS: [(&str, &str); 3] = [
    ("log-level", BIND_LOG_LEVEL),
    ("log-format", BIND_LOG_FORMAT),
    ("log-output", BIND_LOG_OUTPUT),
];

pub fn build_cli() -> Command {
    Command::new("cli-tpl")
        .about("Simple Command-Line Interface Template")
        .disable_version_flag(true)
        .disable_help_subcommand(true)
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("version message"),
        )
        .arg(
            Arg::new("config-file")
                .short('c')
                .long("config-file")
                .global(true)
                .help("config file (yaml)"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .default_value("info")
                .global(true)
                .help("log level"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .default_value("console")
                .global(true)
                .help("log format (console|json)"),
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .default_value("stdout")
                .global(true)
                .help("log output, comma-separated: stdout, stderr or file paths"),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration operation")
                .subcommand(Command::new("default").about("Display default configuration")),
        )
}

/// Bind the log flags into `store`
///
/// A flag typed on the command line overrides the file; otherwise its
/// default only fills keys the file lacks.
pub fn bind_flags(store: &ConfigStore, matches: &ArgMatches) {
    for (id, key) in LOG_FLAGS {
        if let Some(value) = matches.get_one::<String>(id) {
            let explicit = matches.value_source(id) == Some(ValueSource::CommandLine);
            store.bind(key, value.as_str(), explicit);
        }
    }
}

/// Build a logger from the store's log settings and install it
///
/// Nothing is installed unless level, format and every output are valid.
pub fn set_default_logger(store: &ConfigStore, registry: &LoggerRegistry) -> Result<()> {
    let level = build_level(&store.get_string(BIND_LOG_LEVEL))?;
    let encoder = build_encoder(&store.get_string(BIND_LOG_FORMAT))?;
    let output = store.get_string(BIND_LOG_OUTPUT);
    let targets: Vec<&str> = output.split(',').collect();
    let destination = registry.build_outputs(&targets)?;

    registry.install(Logger::new(level, encoder, destination));
    Ok(())
}

/// A started application: configured logger plus an optional config watch
pub struct App {
    store: Arc<ConfigStore>,
    registry: Arc<LoggerRegistry>,
    watcher: Option<ConfigWatcher>,
}

impl App {
    /// Start against the process-wide logger and callback registries
    pub fn startup(matches: &ArgMatches) -> Result<Self> {
        Self::startup_with(
            matches,
            crate::core::registry::registry(),
            crate::config::watch_funcs(),
        )
    }

    /// Load the config file if one was given, install the logger, and
    /// watch the file for changes
    pub fn startup_with(
        matches: &ArgMatches,
        registry: Arc<LoggerRegistry>,
        funcs: Arc<WatchRegistry>,
    ) -> Result<Self> {
        let config_file = matches
            .get_one::<String>("config-file")
            .filter(|path| !path.is_empty());

        let store = match config_file {
            Some(path) => ConfigStore::load(path)?,
            None => ConfigStore::new(),
        };
        bind_flags(&store, matches);
        let store = Arc::new(store);

        set_default_logger(&store, &registry)?;

        let watcher = if config_file.is_some() {
            {
                let store = Arc::clone(&store);
                let registry = Arc::clone(&registry);
                funcs.register(LOG_WATCH_NAME, move || set_default_logger(&store, &registry));
            }
            let dispatcher = WatchDispatcher::new(Arc::clone(&store), funcs, Arc::clone(&registry));
            Some(ConfigWatcher::start(Arc::new(dispatcher), DEFAULT_DEBOUNCE)?)
        } else {
            None
        };

        Ok(Self {
            store,
            registry,
            watcher,
        })
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// The root command: log on an interval
    pub fn run_root(&self, iterations: usize, interval: Duration) {
        for i in 0..iterations {
            if i > 0 {
                thread::sleep(interval);
            }
            self.registry.current().info("root command run");
        }
    }

    /// Stop the watch and flush the active logger
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(watcher) = self.watcher.take() {
            watcher.stop();
        }
        self.registry.sync()
    }
}

/// Run the command line, returning the process exit code
pub fn execute<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match build_cli().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return code;
        }
    };

    if matches.get_flag("version") {
        println!("{}", VERSION);
        return 0;
    }

    let app = match App::startup(&matches) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    match matches.subcommand() {
        Some(("config", sub)) => match sub.subcommand() {
            Some(("default", _)) => println!("{}", DEFAULT_CONFIG),
            _ => print_config_help(),
        },
        _ => app.run_root(ROOT_ITERATIONS, ROOT_INTERVAL),
    }

    if let Err(e) = app.shutdown() {
        eprintln!("[LOGGER WARNING] Failed to sync logger on exit: {}", e);
    }
    0
}

/// `config` alone shows its own usage
fn print_config_help() {
    let mut cli = build_cli();
    if let Some(config) = cli.find_subcommand_mut("config") {
        let _ = config.print_help();
    }
}
