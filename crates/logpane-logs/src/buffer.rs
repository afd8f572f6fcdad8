use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use logpane_types::{FilterConfig, LogLevel, LogMessageEvent};

use crate::filter::MessageFilter;
use crate::normalizer::MessageNormalizer;
use crate::severity::SeverityConvention;

/// Thread-safe ring buffer of received log message events
#[derive(Clone)]
pub struct LogBuffer {
    /// Internal storage
    events: Arc<RwLock<VecDeque<LogMessageEvent>>>,

    /// Maximum capacity
    capacity: usize,
}

impl LogBuffer {
    /// Create a new log buffer with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Push a new event, evicting oldest if at capacity
    pub fn push(&self, event: LogMessageEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.write();
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    /// Push every event in order
    pub fn extend<I>(&self, iter: I)
    where
        I: IntoIterator<Item = LogMessageEvent>,
    {
        for event in iter {
            self.push(event);
        }
    }

    /// Get all events (cloned for rendering)
    pub fn all(&self) -> Vec<LogMessageEvent> {
        self.events.read().iter().cloned().collect()
    }

    /// Get the events passing `config`
    pub fn filtered(&self, config: &FilterConfig) -> Vec<LogMessageEvent> {
        self.filtered_with(&MessageFilter::new(), config)
    }

    /// Get the events passing `config`, searching with a custom normalizer
    pub fn filtered_with<N: MessageNormalizer>(
        &self,
        filter: &MessageFilter<N>,
        config: &FilterConfig,
    ) -> Vec<LogMessageEvent> {
        let events = self.events.read();
        let (front, back) = events.as_slices();
        let mut result = filter.filter(front, config).to_vec();
        result.extend(filter.filter(back, config).to_vec());
        tracing::debug!(
            total = events.len(),
            matched = result.len(),
            "filtered log buffer"
        );
        result
    }

    /// Get event count per normalized log level
    pub fn level_counts(&self) -> LevelCounts {
        let events = self.events.read();
        let mut counts = LevelCounts::default();

        for event in events.iter() {
            let convention = SeverityConvention::for_data_source(event.data_source_id.as_deref());
            match convention.normalize(event.message.level) {
                LogLevel::Debug => counts.debug += 1,
                LogLevel::Info => counts.info += 1,
                LogLevel::Warn => counts.warn += 1,
                LogLevel::Error => counts.error += 1,
                LogLevel::Fatal => counts.fatal += 1,
                LogLevel::Unknown => counts.unknown += 1,
            }
        }

        counts
    }

    /// Total event count
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Maximum number of events kept
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear all events
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Get the last N events
    pub fn tail(&self, n: usize) -> Vec<LogMessageEvent> {
        let events = self.events.read();
        let start = events.len().saturating_sub(n);
        events.iter().skip(start).cloned().collect()
    }
}

/// Counts per log level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub debug: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub fatal: usize,
    pub unknown: usize,
}

impl LevelCounts {
    pub fn total(&self) -> usize {
        self.debug + self.info + self.warn + self.error + self.fatal + self.unknown
    }

    /// Count for a single level
    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
            LogLevel::Fatal => self.fatal,
            LogLevel::Unknown => self.unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logpane_types::{LogMessage, MessageContent};

    fn event(level: i32, text: &str) -> LogMessageEvent {
        LogMessageEvent::new("/rosout", LogMessage::new(level, Some("node"), text))
    }

    #[test]
    fn test_evicts_oldest() {
        let buffer = LogBuffer::new(2);
        buffer.extend([event(1, "a"), event(2, "b"), event(3, "c")]);
        let texts: Vec<_> = buffer.all().into_iter().map(|e| e.message.msg).collect();
        assert_eq!(texts, vec![MessageContent::from("b"), MessageContent::from("c")]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let buffer = LogBuffer::new(0);
        buffer.push(event(1, "a"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_filtered_preserves_order_across_wrap() {
        let buffer = LogBuffer::new(3);
        for (level, text) in [(4, "a"), (1, "b"), (4, "c"), (4, "d"), (1, "e"), (4, "f")] {
            buffer.push(event(level, text));
        }
        let matched: Vec<_> = buffer
            .filtered(&FilterConfig::new(LogLevel::Error.value()))
            .into_iter()
            .map(|e| e.message.msg)
            .collect();
        assert_eq!(matched, vec![MessageContent::from("d"), MessageContent::from("f")]);
    }

    #[test]
    fn test_filtered_inactive_returns_everything() {
        let buffer = LogBuffer::new(10);
        buffer.extend([event(0, "a"), event(5, "b")]);
        assert_eq!(buffer.filtered(&FilterConfig::default()), buffer.all());
    }

    #[test]
    fn test_level_counts_use_source_convention() {
        let buffer = LogBuffer::new(10);
        buffer.push(event(4, "primary error"));
        buffer.push(event(40, "ros2 error").with_data_source("ros2-socket"));
        buffer.push(event(4, "odd ros2").with_data_source("ros2-socket"));
        buffer.push(event(2, "info"));

        let counts = buffer.level_counts();
        assert_eq!(counts.get(LogLevel::Error), 2);
        assert_eq!(counts.info, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_tail_and_clear() {
        let buffer = LogBuffer::new(10);
        buffer.extend([event(1, "a"), event(1, "b"), event(1, "c")]);
        assert_eq!(buffer.tail(2).len(), 2);
        assert_eq!(buffer.tail(10).len(), 3);
        buffer.clear();
        assert_eq!(buffer.len(), 0);
    }
}
