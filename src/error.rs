//! Error types for the interval branch-and-bound search.
//!
//! Numeric edge cases (infinite bounds, NaN, empty intervals) are never errors:
//! they are values with defined propagation rules. Only invalid inputs,
//! precondition violations by the objective, and infrastructure failures
//! surface here.

use thiserror::Error;

/// Errors that can occur while setting up or running a search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Invalid domain for axis {axis}: [{lo}, {hi}] must be finite and non-empty")]
    InvalidDomain { axis: char, lo: f64, hi: f64 },

    #[error("Invalid threshold {0}: must be finite and > 0")]
    InvalidThreshold(f64),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),

    #[error("Objective returned ill-formed enclosure {value} over box {x} x {y}")]
    IllFormedEnclosure { x: String, y: String, value: String },

    #[error("Inconsistent bound on finalized minimizer: lower {lower} > upper {upper}")]
    InconsistentBound { lower: f64, upper: f64 },

    #[error("Thread pool construction failed: {0}")]
    ThreadPool(String),

    #[error("Worker {rank} failed: {source}")]
    Worker {
        rank: usize,
        #[source]
        source: Box<SearchError>,
    },

    #[error("Protocol channel closed: {0}")]
    ChannelClosed(&'static str),
}

impl SearchError {
    /// Returns true if the error is a contract violation by the objective
    /// rather than a configuration mistake.
    pub fn is_objective_violation(&self) -> bool {
        match self {
            Self::IllFormedEnclosure { .. } | Self::InconsistentBound { .. } => true,
            Self::Worker { source, .. } => source.is_objective_violation(),
            _ => false,
        }
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
