//! Log formatting options for different output styles

use crate::logging::destinations::LogEntry;
use serde::{Deserialize, Serialize};

/// How logs should be formatted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// {"timestamp":"2024-01-15T10:30:00Z","level":"INFO","message":"Role loaded",
    ///  "principal":"a@corp.com"}
    Json,

    /// 2024-01-15 10:30:00.000 INFO  [portal_rbac::cache] Role loaded principal=a@corp.com
    Human,

    /// timestamp=2024-01-15T10:30:00Z level=INFO target=portal_rbac::cache message="Role loaded"
    Logfmt,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "human" | "text" => Ok(LogFormat::Human),
            "logfmt" => Ok(LogFormat::Logfmt),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

impl LogFormat {
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self {
            LogFormat::Json => format_json(entry),
            LogFormat::Human => format_human(entry),
            LogFormat::Logfmt => format_logfmt(entry),
        }
    }
}

fn level_label(entry: &LogEntry) -> String {
    format!("{:?}", entry.level).to_uppercase()
}

fn plain_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_json(entry: &LogEntry) -> String {
    let mut json = serde_json::Map::new();

    json.insert("timestamp".to_string(), entry.timestamp.to_rfc3339().into());
    json.insert("level".to_string(), level_label(entry).into());
    json.insert("message".to_string(), entry.message.clone().into());
    json.insert("target".to_string(), entry.target.clone().into());

    if let Some((file, line)) = &entry.location {
        json.insert("file".to_string(), file.clone().into());
        json.insert("line".to_string(), (*line).into());
    }

    for (key, value) in &entry.fields {
        json.insert(key.clone(), value.clone());
    }

    serde_json::to_string(&json).unwrap_or_else(|_| "Failed to serialize log entry".to_string())
}

fn format_human(entry: &LogEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
    let mut message =
        format!("{} {:5} [{}] {}", timestamp, level_label(entry), entry.target, entry.message);

    let mut keys: Vec<&String> = entry.fields.keys().collect();
    keys.sort();
    for key in keys {
        message.push_str(&format!(" {}={}", key, plain_value(&entry.fields[key])));
    }

    message
}

fn format_logfmt(entry: &LogEntry) -> String {
    let quote = |s: &str| format!("\"{}\"", s.replace('"', "\\\""));

    let mut parts = vec![
        format!("timestamp={}", entry.timestamp.to_rfc3339()),
        format!("level={}", level_label(entry)),
        format!("target={}", entry.target),
        format!("message={}", quote(&entry.message)),
    ];

    let mut keys: Vec<&String> = entry.fields.keys().collect();
    keys.sort();
    for key in keys {
        let value = match &entry.fields[key] {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            other => quote(&plain_value(other)),
        };
        parts.push(format!("{}={}", key, value));
    }

    parts.join(" ")
}
