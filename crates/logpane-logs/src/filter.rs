use logpane_types::{FilterConfig, LogLevel, LogMessage, LogMessageEvent};

use crate::normalizer::{DefaultNormalizer, MessageNormalizer};
use crate::severity::effective_threshold;

/// Thresholds at or below this value do not filter by severity
const BASELINE_MIN_LEVEL: i32 = LogLevel::Debug.value();

/// Whether `config` would exclude anything at all
pub fn has_active_filters(config: &FilterConfig) -> bool {
    config.min_log_level > BASELINE_MIN_LEVEL || !config.search_terms.is_empty()
}

/// Severity and text filter over log message events
#[derive(Clone, Debug, Default)]
pub struct MessageFilter<N = DefaultNormalizer> {
    normalizer: N,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: MessageNormalizer> MessageFilter<N> {
    /// Create a filter that searches the text produced by `normalizer`
    pub fn with_normalizer(normalizer: N) -> Self {
        Self { normalizer }
    }

    /// Select the events that pass `config`, keeping their order.
    ///
    /// When the config filters nothing the input slice itself is returned.
    pub fn filter<'a>(
        &self,
        events: &'a [LogMessageEvent],
        config: &FilterConfig,
    ) -> FilteredMessages<'a> {
        if !has_active_filters(config) {
            return FilteredMessages::Unfiltered(events);
        }

        let threshold = effective_threshold(config.min_log_level, config.data_source_id.as_deref());
        let terms: Vec<String> = config
            .search_terms
            .iter()
            .map(|term| term.to_lowercase())
            .collect();

        tracing::trace!(
            threshold,
            terms = terms.len(),
            events = events.len(),
            "filtering log messages"
        );

        let matched = events
            .iter()
            .filter(|event| {
                let message = &event.message;
                if message.level < threshold {
                    return false;
                }
                terms.is_empty() || self.matches_terms(message, &terms)
            })
            .collect();

        FilteredMessages::Matched(matched)
    }

    fn matches_terms(&self, message: &LogMessage, terms: &[String]) -> bool {
        let name = message.name.as_deref().unwrap_or("").to_lowercase();
        let content = self.normalizer.normalize(message).to_lowercase();
        terms
            .iter()
            .any(|term| name.contains(term.as_str()) || content.contains(term.as_str()))
    }
}

/// Filter `events` with the default normalizer
pub fn filter_messages<'a>(
    events: &'a [LogMessageEvent],
    config: &FilterConfig,
) -> FilteredMessages<'a> {
    MessageFilter::new().filter(events, config)
}

/// Result of a filtering pass, borrowing from the input
#[derive(Clone, Debug)]
pub enum FilteredMessages<'a> {
    /// No filter was active; this is the input slice
    Unfiltered(&'a [LogMessageEvent]),

    /// Events that passed, in input order
    Matched(Vec<&'a LogMessageEvent>),
}

impl<'a> FilteredMessages<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Unfiltered(events) => events.len(),
            Self::Matched(events) => events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the input was returned without inspection
    pub fn is_unfiltered(&self) -> bool {
        matches!(self, Self::Unfiltered(_))
    }

    pub fn iter(&self) -> Iter<'a, '_> {
        match self {
            Self::Unfiltered(events) => Iter::All(events.iter()),
            Self::Matched(events) => Iter::Matched(events.iter()),
        }
    }

    /// Clone the selected events
    pub fn to_vec(&self) -> Vec<LogMessageEvent> {
        self.iter().cloned().collect()
    }
}

impl<'a, 's> IntoIterator for &'s FilteredMessages<'a> {
    type Item = &'a LogMessageEvent;
    type IntoIter = Iter<'a, 's>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the events of a [`FilteredMessages`]
#[derive(Clone)]
pub enum Iter<'a, 's> {
    All(std::slice::Iter<'a, LogMessageEvent>),
    Matched(std::slice::Iter<'s, &'a LogMessageEvent>),
}

impl<'a> Iterator for Iter<'a, '_> {
    type Item = &'a LogMessageEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::All(iter) => iter.next(),
            Self::Matched(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::All(iter) => iter.size_hint(),
            Self::Matched(iter) => iter.size_hint(),
        }
    }
}
