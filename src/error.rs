//! Error types for the local search engine.

use thiserror::Error;

/// Errors raised by runners, solvers, parameter handling and the batch
/// driver.
#[derive(Debug, Error)]
pub enum LocalSearchError {
    /// A parameter requested from a [`ParameterBox`](crate::params::ParameterBox)
    /// was never set.
    #[error("parameter not found: {0}")]
    ParameterNotFound(String),

    /// A parameter exists but holds a value of another kind.
    #[error("parameter '{name}' has type {found}, expected {expected}")]
    ParameterTypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// No runner registered under this name.
    #[error("runner not found: {0}")]
    RunnerNotFound(String),

    /// A runner exists under this name but is of another kind.
    #[error("runner '{name}' is a {found}, expected {expected}")]
    RunnerTypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A runner was started before a current state was set.
    #[error("runner '{0}' has no current state")]
    StateNotSet(String),

    /// A solver was started without any runner attached.
    #[error("solver has no runners")]
    NoRunners,

    /// The incrementally tracked cost diverged from a full recomputation.
    #[error(
        "cost drift after move {mv} at iteration {iteration}: tracked {tracked}, computed {computed}"
    )]
    CostDrift {
        mv: String,
        iteration: u64,
        tracked: f64,
        computed: f64,
    },

    /// Cached redundant data disagrees with the primary state.
    #[error("redundant state data out of sync after move {mv} at iteration {iteration}")]
    RedundantDataMismatch { mv: String, iteration: u64 },

    /// An output manager failed to translate or parse a solution.
    #[error("output error: {0}")]
    Output(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for local search operations.
pub type Result<T> = std::result::Result<T, LocalSearchError>;
