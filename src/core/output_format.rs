//! Line formats used by the stream and file senders
//!
//! - Text: `[2025-01-08T10:30:45.123Z] [INFO] service - Request processed`
//! - Json: one object per line, structured content merged in
//! - Logfmt: `key=value` pairs

use super::fields::MESSAGE_KEY;
use super::priority::Priority;
use super::timestamp::TimestampFormat;
use crate::message::{Composer, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message as a sender is about to write it.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub name: &'a str,
    pub priority: Priority,
    pub message: &'a Message,
    pub timestamp: DateTime<Utc>,
}

impl<'a> Record<'a> {
    pub fn new(name: &'a str, priority: Priority, message: &'a Message) -> Self {
        Self {
            name,
            priority,
            message,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Logfmt,
}

impl OutputFormat {
    pub fn format(&self, record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(record, timestamp_format),
            OutputFormat::Json => format_json(record, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(record, timestamp_format),
        }
    }
}

/// Text form without the timestamp and level prefix, shared with the
/// colored console output.
pub(crate) fn text_body(record: &Record<'_>) -> String {
    let text = record.message.string();
    if record.name.is_empty() {
        text
    } else {
        format!("{} - {}", record.name, text)
    }
}

fn format_text(record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
    format!(
        "[{}] [{}] {}",
        timestamp_format.format(&record.timestamp),
        record.priority,
        text_body(record)
    )
}

fn structured_body(message: &Message) -> serde_json::Map<String, serde_json::Value> {
    match message.raw() {
        serde_json::Value::Object(object) => object,
        other => {
            let mut object = serde_json::Map::new();
            object.insert(MESSAGE_KEY.to_string(), other);
            object
        }
    }
}

fn format_json(record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
    let mut object = serde_json::Map::new();
    object.insert(
        "timestamp".to_string(),
        timestamp_format.to_json(&record.timestamp),
    );
    object.insert(
        "level".to_string(),
        serde_json::Value::String(record.priority.to_string()),
    );
    object.insert(
        "logger".to_string(),
        serde_json::Value::String(record.name.to_string()),
    );
    for (key, value) in structured_body(record.message) {
        object.entry(key).or_insert(value);
    }

    serde_json::to_string(&serde_json::Value::Object(object)).unwrap_or_default()
}

fn format_logfmt(record: &Record<'_>, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_value(&timestamp_format.format(&record.timestamp))
        ),
        format!("level={}", record.priority),
        format!("logger={}", escape_value(record.name)),
    ];

    for (key, value) in structured_body(record.message) {
        let value = match value {
            serde_json::Value::String(s) => quote_value(&s),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Null => "null".to_string(),
            nested => quote_value(&nested.to_string()),
        };
        parts.push(format!("{}={}", escape_key(&key), value));
    }

    parts.join(" ")
}

fn escape_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn escape_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=']) {
        quote_value(value)
    } else {
        value.to_string()
    }
}

fn quote_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
