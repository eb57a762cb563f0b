//! Logging configuration structures for declarative setup

use crate::logging::{LogFormat, LogOutput};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;

/// Logging configuration for the portal gate
///
/// Loadable from the `[logging]` section of `portal.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum log level to capture
    pub level: LogLevel,
    /// Where logs should be sent
    pub outputs: Vec<LogOutput>,
    /// Default format for all outputs (can be overridden per output)
    pub format: LogFormat,
    /// Context fields added to every log entry
    pub context_fields: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            outputs: vec![LogOutput::Stderr { format: None }],
            format: LogFormat::Human,
            context_fields: HashMap::new(),
        }
    }
}

/// Log levels in order of severity (compatible with standard log crate)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Trace => LogLevel::Trace,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl LoggingConfig {
    /// JSON to stdout, info level
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            outputs: vec![LogOutput::Stdout { format: Some(LogFormat::Json) }],
            format: LogFormat::Json,
            context_fields: HashMap::new(),
        }
    }

    /// Human-readable to stderr, debug level
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            outputs: vec![LogOutput::Stderr { format: Some(LogFormat::Human) }],
            format: LogFormat::Human,
            context_fields: HashMap::new(),
        }
    }

    /// Append to a file
    pub fn with_file_output(mut self, path: &str) -> Self {
        self.outputs.push(LogOutput::File { path: path.to_string(), format: None });
        self
    }

    /// Add a context field that appears in every log entry
    pub fn with_context_field(mut self, key: &str, value: &str) -> Self {
        self.context_fields.insert(key.to_string(), value.to_string());
        self
    }

    /// Set the minimum log level
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("PORTAL_LOG_LEVEL") {
            if let Ok(level) = level.parse() {
                self.level = level;
            }
        }
        if let Ok(format) = env::var("PORTAL_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.format = format;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_config() {
        let config = LoggingConfig::production();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LoggingConfig::development()
            .with_file_output("./logs/portal.log")
            .with_context_field("service", "portal")
            .with_level(LogLevel::Warn);

        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.outputs.len(), 2);
        assert_eq!(config.context_fields.get("service"), Some(&"portal".to_string()));
    }

    #[test]
    fn test_toml_section() {
        let config: LoggingConfig = toml::from_str(
            r#"
level = "debug"
format = "logfmt"
outputs = [{ type = "file", path = "/tmp/portal.log" }]
"#,
        )
        .unwrap();

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Logfmt);
        assert!(matches!(config.outputs[0], LogOutput::File { .. }));
    }
}
