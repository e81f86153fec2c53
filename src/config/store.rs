//! YAML-backed key/value store addressed by dotted keys
//!
//! Lookup precedence for [`ConfigStore::get_string`]:
//! 1. a flag explicitly set on the command line
//! 2. the value in the config file
//! 3. the flag's default

use crate::core::{LoggerError, Result};
use parking_lot::RwLock;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions accepted by [`ConfigStore::load`]
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["yaml", "yml"];

#[derive(Debug, Clone)]
struct FlagBinding {
    value: String,
    explicit: bool,
}

#[derive(Debug, Default)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    values: RwLock<Value>,
    bindings: RwLock<HashMap<String, FlagBinding>>,
}

impl ConfigStore {
    /// A store with no backing file
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` into a new store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_yaml(&path)?;
        Ok(Self {
            path: Some(path),
            values: RwLock::new(values),
            bindings: RwLock::new(HashMap::new()),
        })
    }

    /// Parse YAML text into a store with no backing file
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let values = parse_yaml(yaml, "<inline>")?;
        Ok(Self {
            path: None,
            values: RwLock::new(values),
            bindings: RwLock::new(HashMap::new()),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the backing file; on failure the previous values stay
    pub fn reload(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let values = read_yaml(path)?;
        *self.values.write() = values;
        Ok(())
    }

    /// Bind a flag to `key`
    ///
    /// `explicit` marks a value the user typed; it wins over the file.
    /// Otherwise the value is only a fallback for a key the file lacks.
    pub fn bind(&self, key: impl Into<String>, value: impl Into<String>, explicit: bool) {
        self.bindings.write().insert(
            key.into(),
            FlagBinding {
                value: value.into(),
                explicit,
            },
        );
    }

    /// The file's value for `key`, ignoring bindings
    pub fn get(&self, key: &str) -> Option<Value> {
        lookup(&self.values.read(), key).cloned()
    }

    /// Resolve `key` to a string; missing keys yield `""`
    pub fn get_string(&self, key: &str) -> String {
        let binding = self.bindings.read().get(key).cloned();
        if let Some(FlagBinding {
            value,
            explicit: true,
        }) = binding
        {
            return value;
        }
        if let Some(value) = self.get(key).and_then(|v| stringify(&v)) {
            return value;
        }
        binding.map(|b| b.value).unwrap_or_default()
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e));
    if !supported {
        return Err(LoggerError::UnsupportedConfigType {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| {
        LoggerError::io_operation("reading config file", path.display().to_string(), e)
    })?;
    parse_yaml(&content, &path.display().to_string())
}

fn parse_yaml(content: &str, origin: &str) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(content).map_err(|source| LoggerError::ConfigParse {
        path: origin.to_string(),
        source,
    })
}

/// Walk a dotted key; segments match mapping keys case-insensitively
fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let mut node = root;
    for segment in key.split('.') {
        let mapping = node.as_mapping()?;
        node = mapping.iter().find_map(|(k, v)| {
            k.as_str()
                .filter(|k| k.eq_ignore_ascii_case(segment))
                .map(|_| v)
        })?;
    }
    if node.is_null() {
        None
    } else {
        Some(node)
    }
}

/// Scalars become their text; a list of scalars becomes a comma-separated
/// string
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Sequence(items) => {
            let parts: Option<Vec<String>> = items.iter().map(stringify).collect();
            parts.map(|p| p.join(","))
        }
        Value::Tagged(tagged) => stringify(&tagged.value),
        Value::Null | Value::Mapping(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "global:\n  log:\n    level: debug\n    format: json\n    output:\n      - stdout\n      - logs/app.log\n";

    #[test]
    fn test_dotted_lookup() {
        let store = ConfigStore::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(store.get_string("global.log.level"), "debug");
        assert_eq!(store.get_string("global.log.format"), "json");
        assert_eq!(store.get_string("global.log.output"), "stdout,logs/app.log");
        assert_eq!(store.get_string("global.log.missing"), "");
    }

    #[test]
    fn test_keys_case_insensitive() {
        let store = ConfigStore::from_yaml_str("Global:\n  Log:\n    Level: warn\n").unwrap();
        assert_eq!(store.get_string("global.log.level"), "warn");
    }

    #[test]
    fn test_precedence() {
        let store = ConfigStore::from_yaml_str(SAMPLE).unwrap();

        // default flag value loses to the file
        store.bind("global.log.level", "info", false);
        assert_eq!(store.get_string("global.log.level"), "debug");

        // explicit flag wins over the file
        store.bind("global.log.level", "error", true);
        assert_eq!(store.get_string("global.log.level"), "error");

        // default fills a key the file lacks
        store.bind("global.log.extra", "fallback", false);
        assert_eq!(store.get_string("global.log.extra"), "fallback");
    }

    #[test]
    fn test_null_value_falls_back_to_default() {
        let store = ConfigStore::from_yaml_str("global:\n  log:\n    level:\n").unwrap();
        store.bind("global.log.level", "info", false);
        assert_eq!(store.get_string("global.log.level"), "info");
    }

    #[test]
    fn test_load_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "global:\n  log:\n    level: info\n").unwrap();

        let store = ConfigStore::load(&path).unwrap();
        assert_eq!(store.get_string("global.log.level"), "info");

        fs::write(&path, "global:\n  log:\n    level: debug\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get_string("global.log.level"), "debug");
    }

    #[test]
    fn test_reload_failure_keeps_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.yaml");
        fs::write(&path, "global:\n  log:\n    level: warn\n").unwrap();
        let store = ConfigStore::load(&path).unwrap();

        fs::write(&path, "global: [unclosed\n").unwrap();
        assert!(matches!(store.reload(), Err(LoggerError::ConfigParse { .. })));
        assert_eq!(store.get_string("global.log.level"), "warn");
    }

    #[test]
    fn test_rejects_non_yaml_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            ConfigStore::load(&path),
            Err(LoggerError::UnsupportedConfigType { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigStore::load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }
}
