//! Shared types for logpane
//!
//! This crate contains the log message model and the filter configuration
//! shared by the logpane crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Severity
// ============================================================================

/// Log severity level in the primary convention.
///
/// The discriminants are part of the contract: filtering compares raw
/// integer severities against these values, so the ordering
/// `Unknown < Debug < Info < Warn < Error < Fatal` must hold numerically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(i32)]
pub enum LogLevel {
    #[default]
    Unknown = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    /// All levels, lowest first
    pub const ALL: [LogLevel; 6] = [
        Self::Unknown,
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Fatal,
    ];

    /// Numeric value in the primary convention
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Look up the level with the given primary value
    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.value() == value)
    }

    /// Parse log level from common formats
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "debug" | "dbg" | "debg" | "trace" => Self::Debug,
            "info" | "inf" | "information" => Self::Info,
            "warn" | "warning" | "wrn" => Self::Warn,
            "error" | "err" | "erro" => Self::Error,
            "fatal" | "panic" | "critical" | "crit" | "ftl" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    /// Short display string (3 chars)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "???",
            Self::Debug => "DBG",
            Self::Info => "INF",
            Self::Warn => "WRN",
            Self::Error => "ERR",
            Self::Fatal => "FTL",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Log Messages
// ============================================================================

/// Message payload as delivered by a data source
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),

    /// Multi-line payload split by the source
    Lines(Vec<String>),

    /// Anything else the source hands over
    Structured(serde_json::Value),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// A single log message
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct LogMessage {
    /// Time the message was logged (if the source provides one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp: Option<DateTime<Utc>>,

    /// Raw severity in the convention of the originating source
    #[serde(default)]
    pub level: i32,

    /// Logger or component name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Message content
    #[serde(default)]
    pub msg: MessageContent,

    /// Source file that emitted the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Line in `file`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl LogMessage {
    /// Create a message with a level, optional name and text content
    pub fn new(level: i32, name: Option<&str>, msg: impl Into<MessageContent>) -> Self {
        Self {
            stamp: None,
            level,
            name: name.map(str::to_string),
            msg: msg.into(),
            file: None,
            line: None,
        }
    }
}

/// A log message together with where and when it was received
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogMessageEvent {
    /// Topic or channel the message arrived on
    #[serde(default)]
    pub topic: String,

    /// Time the message was received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_time: Option<DateTime<Utc>>,

    /// Identifier of the originating data source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<String>,

    pub message: LogMessage,
}

impl LogMessageEvent {
    pub fn new(topic: impl Into<String>, message: LogMessage) -> Self {
        Self {
            topic: topic.into(),
            receive_time: None,
            data_source_id: None,
            message,
        }
    }

    /// Attach the originating data source
    pub fn with_data_source(mut self, data_source_id: impl Into<String>) -> Self {
        self.data_source_id = Some(data_source_id.into());
        self
    }
}

// ============================================================================
// Filter Configuration
// ============================================================================

/// Settings for one filtering pass
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum severity, expressed in the primary convention
    #[serde(deserialize_with = "deserialize_level")]
    pub min_log_level: i32,

    /// Case-insensitive search terms, combined with OR
    pub search_terms: Vec<String>,

    /// Data source whose severity convention applies
    pub data_source_id: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::Debug.value(),
            search_terms: Vec::new(),
            data_source_id: None,
        }
    }
}

impl FilterConfig {
    pub fn new(min_log_level: i32) -> Self {
        Self {
            min_log_level,
            ..Self::default()
        }
    }

    /// Set the search terms
    pub fn with_search_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Set the data source id
    pub fn with_data_source(mut self, data_source_id: impl Into<String>) -> Self {
        self.data_source_id = Some(data_source_id.into());
        self
    }
}

/// Accepts either an integer or a level name
fn deserialize_level<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum LevelSpec {
        Value(i32),
        Name(String),
    }

    Ok(match LevelSpec::deserialize(deserializer)? {
        LevelSpec::Value(value) => value,
        LevelSpec::Name(name) => LogLevel::from_str(&name).value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_is_numeric() {
        let values: Vec<i32> = LogLevel::ALL.iter().map(|l| l.value()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
        assert!(LogLevel::Warn > LogLevel::Info);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(LogLevel::from_value(3), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_value(30), None);
        assert_eq!(LogLevel::from_value(-1), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(LogLevel::from_str("WARNING"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str(" err "), LogLevel::Error);
        assert_eq!(LogLevel::from_str("critical"), LogLevel::Fatal);
        assert_eq!(LogLevel::from_str("verbose"), LogLevel::Unknown);
    }

    #[test]
    fn test_message_content_shapes() {
        let text: MessageContent = serde_json::from_str(r#""hello""#).unwrap();
        assert_eq!(text, MessageContent::Text("hello".to_string()));

        let lines: MessageContent = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(
            lines,
            MessageContent::Lines(vec!["a".to_string(), "b".to_string()])
        );

        let structured: MessageContent = serde_json::from_str(r#"{"msg":"x"}"#).unwrap();
        assert!(matches!(structured, MessageContent::Structured(_)));
    }

    #[test]
    fn test_event_deserialize() {
        let json = r#"{
            "topic": "/rosout",
            "data_source_id": "ros2-socket",
            "message": {"level": 30, "name": "talker", "msg": "low battery"}
        }"#;
        let event: LogMessageEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.topic, "/rosout");
        assert_eq!(event.data_source_id.as_deref(), Some("ros2-socket"));
        assert_eq!(event.message.level, 30);
        assert_eq!(event.message.name.as_deref(), Some("talker"));
        assert!(event.receive_time.is_none());
    }

    #[test]
    fn test_filter_config_defaults() {
        let config: FilterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, FilterConfig::default());
        assert_eq!(config.min_log_level, 1);
    }

    #[test]
    fn test_filter_config_level_by_name() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"min_log_level": "warn", "search_terms": ["x"]}"#).unwrap();
        assert_eq!(config.min_log_level, LogLevel::Warn.value());
        assert_eq!(config.search_terms, vec!["x".to_string()]);
    }
}
