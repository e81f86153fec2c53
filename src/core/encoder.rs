//! Record encoders
//!
//! Two encodings share one fixed [`EncoderConfig`]:
//! - Console: tab-separated text with a capitalized level
//! - Json: one flat object per line with a lowercase level

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;

/// Timestamp layout shared by both encodings (`2025-01-08 10:30:45`)
pub const TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats accepted by [`build_encoder`]
pub const SUPPORTED_FORMATS: [&str; 2] = ["json", "console"];

/// How the level is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEncoding {
    Lowercase,
    Capital,
}

/// Key names and rendering rules; identical for every encoding except
/// `level_encoding`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: &'static str,
    pub level_key: &'static str,
    pub name_key: &'static str,
    pub caller_key: &'static str,
    pub message_key: &'static str,
    pub stacktrace_key: &'static str,
    pub time_layout: &'static str,
    pub level_encoding: LevelEncoding,
    pub console_separator: &'static str,
    pub line_ending: &'static str,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "time",
            level_key: "level",
            name_key: "logger",
            caller_key: "caller",
            message_key: "message",
            stacktrace_key: "stacktrace",
            time_layout: TIME_LAYOUT,
            level_encoding: LevelEncoding::Lowercase,
            console_separator: "\t",
            line_ending: "\n",
        }
    }
}

/// Output encoding for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoder {
    /// Example: `{"level":"info","time":"2025-01-08 10:30:45","caller":"src/main.rs:12","message":"started"}`
    Json,

    /// Example: `2025-01-08 10:30:45\tINFO\tsrc/main.rs:12\tstarted`
    #[default]
    Console,
}

impl Encoder {
    pub fn name(&self) -> &'static str {
        match self {
            Encoder::Json => "json",
            Encoder::Console => "console",
        }
    }

    pub fn config(&self) -> EncoderConfig {
        let mut config = EncoderConfig::default();
        if *self == Encoder::Console {
            config.level_encoding = LevelEncoding::Capital;
        }
        config
    }

    /// Encode a record, including the trailing line ending
    pub fn encode(&self, entry: &LogEntry) -> String {
        let config = self.config();
        let mut line = match self {
            Encoder::Json => Self::encode_json(entry, &config),
            Encoder::Console => Self::encode_console(entry, &config),
        };
        line.push_str(config.line_ending);
        line
    }

    fn level_str(entry: &LogEntry, config: &EncoderConfig) -> &'static str {
        match config.level_encoding {
            LevelEncoding::Lowercase => entry.level.as_str(),
            LevelEncoding::Capital => entry.level.to_str(),
        }
    }

    fn encode_json(entry: &LogEntry, config: &EncoderConfig) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            config.level_key.to_string(),
            serde_json::Value::String(Self::level_str(entry, config).to_string()),
        );
        json_obj.insert(
            config.time_key.to_string(),
            serde_json::Value::String(entry.timestamp.format(config.time_layout).to_string()),
        );
        if let Some(ref name) = entry.logger_name {
            json_obj.insert(
                config.name_key.to_string(),
                serde_json::Value::String(name.clone()),
            );
        }
        if let Some(caller) = entry.caller {
            json_obj.insert(
                config.caller_key.to_string(),
                serde_json::Value::String(caller.short()),
            );
        }
        json_obj.insert(
            config.message_key.to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for (key, value) in entry.context.fields() {
            json_obj.insert(key.clone(), value.to_json_value());
        }

        if let Some(ref stack) = entry.stacktrace {
            json_obj.insert(
                config.stacktrace_key.to_string(),
                serde_json::Value::String(stack.clone()),
            );
        }

        serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
    }

    fn encode_console(entry: &LogEntry, config: &EncoderConfig) -> String {
        let mut parts = vec![
            entry.timestamp.format(config.time_layout).to_string(),
            Self::level_str(entry, config).to_string(),
        ];

        if let Some(ref name) = entry.logger_name {
            parts.push(name.clone());
        }
        if let Some(caller) = entry.caller {
            parts.push(caller.short());
        }
        parts.push(entry.message.clone());

        if !entry.context.is_empty() {
            let fields = serde_json::Value::Object(entry.context.to_json_object());
            parts.push(serde_json::to_string(&fields).unwrap_or_default());
        }

        let mut line = parts.join(config.console_separator);
        if let Some(ref stack) = entry.stacktrace {
            line.push('\n');
            line.push_str(stack.trim_end());
        }
        line
    }
}

/// Look up an encoder by name
///
/// On an unrecognized name the error carries the console encoder, see
/// [`LoggerError::fallback_encoder`].
pub fn build_encoder(format: &str) -> Result<Encoder> {
    match format {
        "json" => Ok(Encoder::Json),
        "console" => Ok(Encoder::Console),
        _ => Err(LoggerError::invalid_format(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_context::LogContext;
    use crate::core::log_entry::Caller;
    use crate::core::log_level::LogLevel;
    use chrono::{Local, TimeZone};

    fn fixed_entry(level: LogLevel) -> LogEntry {
        let mut entry = LogEntry::new(level, "config reload success").with_caller(Caller {
            file: "src/config/watcher.rs",
            line: 88,
        });
        entry.timestamp = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        entry
    }

    #[test]
    fn test_build_encoder_names() {
        assert_eq!(build_encoder("json").unwrap(), Encoder::Json);
        assert_eq!(build_encoder("console").unwrap(), Encoder::Console);
    }

    #[test]
    fn test_build_encoder_unknown_returns_console_fallback() {
        let err = build_encoder("Console").unwrap_err();
        assert!(err.is_validation());
        let fallback = err.fallback_encoder().copied().expect("fallback present");
        assert_eq!(fallback, Encoder::Console);
        assert!(fallback.encode(&fixed_entry(LogLevel::Info)).contains("INFO"));
    }

    #[test]
    fn test_config_constant_across_formats() {
        let json = Encoder::Json.config();
        let console = Encoder::Console.config();
        assert_eq!(json.time_key, console.time_key);
        assert_eq!(json.time_layout, console.time_layout);
        assert_eq!(json.level_encoding, LevelEncoding::Lowercase);
        assert_eq!(console.level_encoding, LevelEncoding::Capital);
    }

    #[test]
    fn test_json_key_order() {
        let entry = fixed_entry(LogLevel::Warn).with_context(
            LogContext::new()
                .with_field("name", "global.log")
                .with_field("detail", "success"),
        );
        let line = Encoder::Json.encode(&entry);
        assert!(line.ends_with('\n'));
        assert_eq!(
            line.trim_end(),
            r#"{"level":"warn","time":"2025-01-08 10:30:45","caller":"config/watcher.rs:88","message":"config reload success","name":"global.log","detail":"success"}"#
        );
    }

    #[test]
    fn test_console_layout() {
        let entry = fixed_entry(LogLevel::Info).with_context(LogContext::new().with_field("name", "global.log"));
        let line = Encoder::Console.encode(&entry);
        assert_eq!(
            line,
            "2025-01-08 10:30:45\tINFO\tconfig/watcher.rs:88\tconfig reload success\t{\"name\":\"global.log\"}\n"
        );
    }

    #[test]
    fn test_logger_name_emitted_when_set() {
        let entry = fixed_entry(LogLevel::Info).with_logger_name("root");
        let parsed: serde_json::Value =
            serde_json::from_str(Encoder::Json.encode(&entry).trim_end()).unwrap();
        assert_eq!(parsed["logger"], "root");

        let unnamed: serde_json::Value =
            serde_json::from_str(Encoder::Json.encode(&fixed_entry(LogLevel::Info)).trim_end()).unwrap();
        assert!(unnamed.get("logger").is_none());
    }

    #[test]
    fn test_stacktrace_placement() {
        let mut entry = fixed_entry(LogLevel::DPanic);
        entry.stacktrace = Some("0: frame_a\n1: frame_b\n".to_string());

        let console = Encoder::Console.encode(&entry);
        assert!(console.starts_with("2025-01-08 10:30:45\tDPANIC\t"));
        assert!(console.ends_with("\n0: frame_a\n1: frame_b\n"));

        let json: serde_json::Value =
            serde_json::from_str(Encoder::Json.encode(&entry).trim_end()).unwrap();
        assert_eq!(json["stacktrace"], "0: frame_a\n1: frame_b\n");
    }
}
