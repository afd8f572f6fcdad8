//! Rendering of filtered events for the terminal

use std::io::Write;

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use logpane_logs::{
    DefaultNormalizer, LevelCounts, LogLevel, LogMessageEvent, MessageNormalizer,
    SeverityConvention,
};

/// Widest logger name column before names are left unpadded
const MAX_NAME_WIDTH: usize = 24;

/// Write events as `time LVL name  message` lines
pub fn write_text<'a, W, I>(out: &mut W, events: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a LogMessageEvent>,
    I::IntoIter: Clone,
{
    let events = events.into_iter();
    let name_width = events
        .clone()
        .map(|e| e.message.name.as_deref().map_or(0, UnicodeWidthStr::width))
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    for event in events {
        writeln!(out, "{}", format_line(event, name_width))?;
    }
    Ok(())
}

/// Write events as newline-delimited JSON
pub fn write_json<'a, W, I>(out: &mut W, events: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a LogMessageEvent>,
{
    for event in events {
        serde_json::to_writer(&mut *out, event)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Format a single event
pub fn format_line(event: &LogMessageEvent, name_width: usize) -> String {
    let message = &event.message;
    let time = message
        .stamp
        .or(event.receive_time)
        .map(|t| t.format("%H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| "--:--:--.---".to_string());
    let level = SeverityConvention::for_data_source(event.data_source_id.as_deref())
        .normalize(message.level);
    let name = message.name.as_deref().unwrap_or("");
    let padding = name_width.saturating_sub(name.width());
    // One event per output line
    let text = DefaultNormalizer
        .normalize(message)
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ");

    format!(
        "{} {} {}{}  {}",
        time,
        level.as_str(),
        name,
        " ".repeat(padding),
        text
    )
}

/// One-line summary of per-level counts
pub fn format_counts(counts: &LevelCounts) -> String {
    LogLevel::ALL
        .iter()
        .map(|level| format!("{}={}", level.as_str(), counts.get(*level)))
        .collect::<Vec<_>>()
        .join(" ")
        + &format!(" total={}", counts.total())
}
