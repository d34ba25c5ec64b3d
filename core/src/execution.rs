use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects how a single call is executed. Never mixed within one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    /// Single-threaded and deterministic.
    #[default]
    Sequential,
    /// Work split across the rayon pool.
    Parallel,
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionPolicy::Sequential => f.write_str("seq"),
            ExecutionPolicy::Parallel => f.write_str("par"),
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seq" | "sequential" => Ok(ExecutionPolicy::Sequential),
            "par" | "parallel" => Ok(ExecutionPolicy::Parallel),
            other => Err(SearchError::invalid(format!("unknown execution policy '{other}'"))),
        }
    }
}
