//! Engine tuning constants and the runtime [`SearchConfig`].
//!
//! The constants are the defaults; a `SearchConfig` can override them per
//! engine, e.g. from a JSON file handed to the CLI.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// Maximum number of documents returned by a single top-K query.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Relevances closer than this are considered equal and ordered by rating.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Number of independently locked buckets in the parallel relevance accumulator.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Width of the request telemetry window, in requests ("minutes in a day").
pub const NO_RESULT_WINDOW: u64 = 1440;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_results: usize,
    pub relevance_epsilon: f64,
    pub bucket_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            bucket_count: DEFAULT_BUCKET_COUNT,
        }
    }
}

impl SearchConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SearchConfig = serde_json::from_str(json)
            .map_err(|e| SearchError::invalid(format!("malformed search config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bucket_count == 0 {
            return Err(SearchError::invalid("bucket_count must be positive"));
        }
        if self.relevance_epsilon.is_nan() || self.relevance_epsilon < 0.0 {
            return Err(SearchError::invalid("relevance_epsilon must be non-negative"));
        }
        Ok(())
    }
}
