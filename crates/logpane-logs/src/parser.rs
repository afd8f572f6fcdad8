use std::io::BufRead;

use chrono::{DateTime, Utc};
use thiserror::Error;

use logpane_types::{LogLevel, LogMessage, LogMessageEvent};

/// Topic assigned to events built from plain text lines
pub const TEXT_TOPIC: &str = "stdin";

/// Errors produced while reading an event stream
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: invalid event JSON: {source}")]
    InvalidJson {
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of reading a whole stream
#[derive(Debug, Default)]
pub struct ParseSummary {
    pub events: Vec<LogMessageEvent>,

    /// Lines that could not be parsed
    pub skipped: usize,
}

/// Parser for newline-delimited log message events.
///
/// Lines starting with `{` are decoded as JSON events. Any other non-blank
/// line becomes a text event with a level and timestamp detected from its
/// content.
#[derive(Clone, Debug, Default)]
pub struct EventParser {
    /// Data source applied to events that do not name one
    default_data_source: Option<String>,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag events lacking a data source with `data_source_id`
    pub fn with_default_data_source(mut self, data_source_id: Option<String>) -> Self {
        self.default_data_source = data_source_id;
        self
    }

    /// Parse a single line; blank lines yield `None`
    pub fn parse_line(
        &self,
        raw: &str,
        line_number: u64,
    ) -> Result<Option<LogMessageEvent>, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mut event = if trimmed.starts_with('{') {
            serde_json::from_str::<LogMessageEvent>(trimmed).map_err(|source| {
                ParseError::InvalidJson {
                    line: line_number,
                    source,
                }
            })?
        } else {
            Self::parse_text(trimmed)
        };

        if event.data_source_id.is_none() {
            event.data_source_id = self.default_data_source.clone();
        }

        Ok(Some(event))
    }

    /// Read every event from `reader`, skipping lines that fail to parse
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<ParseSummary, ParseError> {
        let mut summary = ParseSummary::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index as u64 + 1;
            match self.parse_line(&line, line_number) {
                Ok(Some(event)) => summary.events.push(event),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("skipping input: {}", e);
                    summary.skipped += 1;
                }
            }
        }

        tracing::debug!(
            events = summary.events.len(),
            skipped = summary.skipped,
            "parsed event stream"
        );
        Ok(summary)
    }

    /// Build an event from a plain text line
    fn parse_text(line: &str) -> LogMessageEvent {
        let (stamp, content) = Self::extract_timestamp(line);
        let level = Self::extract_level_from_text(content);
        let mut message = LogMessage::new(level.value(), None, content);
        message.stamp = stamp;
        LogMessageEvent::new(TEXT_TOPIC, message)
    }

    /// Extract an RFC 3339 timestamp from the beginning of a line
    fn extract_timestamp(raw: &str) -> (Option<DateTime<Utc>>, &str) {
        let Some((first, rest)) = raw.split_once(char::is_whitespace) else {
            return (None, raw);
        };
        match DateTime::parse_from_rfc3339(first) {
            Ok(ts) => (Some(ts.with_timezone(&Utc)), rest.trim_start()),
            Err(_) => (None, raw),
        }
    }

    /// Extract log level from plain text patterns
    fn extract_level_from_text(content: &str) -> LogLevel {
        let upper = content.to_uppercase();

        let markers = [
            ("FATAL", LogLevel::Fatal),
            ("PANIC", LogLevel::Fatal),
            ("CRITICAL", LogLevel::Fatal),
            ("ERROR", LogLevel::Error),
            ("ERR", LogLevel::Error),
            ("WARNING", LogLevel::Warn),
            ("WARN", LogLevel::Warn),
            ("INFO", LogLevel::Info),
            ("DEBUG", LogLevel::Debug),
            ("TRACE", LogLevel::Debug),
        ];

        // Bracketed patterns win over anything else in the line: [ERROR], [WARN]
        for (marker, level) in markers {
            if upper.contains(&format!("[{marker}]")) {
                return level;
            }
        }

        // Colon patterns: ERROR:, WARN:
        for (marker, level) in markers {
            if upper.contains(&format!("{marker}:")) {
                return level;
            }
        }

        // Level word at start of line
        let first_word = upper.split_whitespace().next().unwrap_or("");
        markers
            .iter()
            .find(|(marker, _)| first_word == *marker)
            .map_or(LogLevel::Unknown, |(_, level)| *level)
    }
}
