//! Log processing for logpane
//!
//! This crate provides severity translation, message normalization,
//! filtering, buffering, and parsing of log message events.

mod buffer;
mod filter;
mod normalizer;
mod parser;
mod severity;

pub use buffer::{LevelCounts, LogBuffer};
pub use filter::{FilteredMessages, Iter, MessageFilter, filter_messages, has_active_filters};
pub use normalizer::{DefaultNormalizer, MessageNormalizer};
pub use parser::{EventParser, ParseError, ParseSummary, TEXT_TOPIC};
pub use severity::{ROS2_DATA_SOURCE_IDS, SeverityConvention, effective_threshold};

// Re-export types used in our public API
pub use logpane_types::{FilterConfig, LogLevel, LogMessage, LogMessageEvent, MessageContent};
