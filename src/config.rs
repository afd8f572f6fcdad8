//! Config file support
//!
//! Settings are read from an optional TOML file and then overridden by
//! command-line flags.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use logpane_logs::{FilterConfig, LogMessageEvent};

/// Default number of events kept in the buffer
pub const DEFAULT_BUFFER_SIZE: usize = 10_000;

/// Contents of a logpane config file
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub buffer_size: usize,
    pub filter: FilterConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            filter: FilterConfig::default(),
        }
    }
}

impl FileConfig {
    /// Load the config from `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Command-line values that take precedence over the file
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub min_log_level: Option<i32>,
    pub search_terms: Vec<String>,
    pub data_source_id: Option<String>,
    pub buffer_size: Option<usize>,
}

impl FileConfig {
    /// Apply command-line overrides
    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(level) = overrides.min_log_level {
            self.filter.min_log_level = level;
        }
        if !overrides.search_terms.is_empty() {
            self.filter.search_terms = overrides.search_terms;
        }
        if overrides.data_source_id.is_some() {
            self.filter.data_source_id = overrides.data_source_id;
        }
        if let Some(size) = overrides.buffer_size {
            self.buffer_size = size;
        }
        self
    }
}

/// Take the data source from the events when none was configured.
///
/// The events must agree on a single id; a mix of severity scales cannot be
/// filtered with one threshold.
pub fn resolve_data_source(filter: &mut FilterConfig, events: &[LogMessageEvent]) -> Result<()> {
    if filter.data_source_id.is_some() {
        return Ok(());
    }

    let mut ids = events.iter().filter_map(|e| e.data_source_id.as_deref());
    let Some(first) = ids.next() else {
        return Ok(());
    };
    if let Some(other) = ids.find(|id| *id != first) {
        bail!(
            "events come from several data sources ('{}', '{}'); pass --data-source",
            first,
            other
        );
    }

    tracing::debug!(data_source_id = first, "using data source from events");
    filter.data_source_id = Some(first.to_string());
    Ok(())
}
