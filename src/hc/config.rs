//! Hill Climbing configuration.

use crate::error::{LocalSearchError, Result};
use crate::params::{ParameterBox, MAX_IDLE_ITERATION};

/// Configuration for Hill Climbing.
///
/// # Examples
///
/// ```
/// use u_localsearch::hc::HillClimbingConfig;
///
/// let config = HillClimbingConfig::default().with_max_idle_iteration(5000);
/// assert_eq!(config.max_idle_iteration, 5000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbingConfig {
    /// Iterations without a strict improvement before stopping.
    pub max_idle_iteration: u64,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            max_idle_iteration: 1000,
        }
    }
}

impl HillClimbingConfig {
    pub fn with_max_idle_iteration(mut self, n: u64) -> Self {
        self.max_idle_iteration = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_idle_iteration == 0 {
            return Err("max_idle_iteration must be positive".into());
        }
        Ok(())
    }

    /// Reads the required idle limit from `params`.
    pub fn apply(&mut self, params: &ParameterBox) -> Result<()> {
        let next = Self {
            max_idle_iteration: params.natural(MAX_IDLE_ITERATION)?,
        };
        next.validate().map_err(LocalSearchError::InvalidConfig)?;
        *self = next;
        Ok(())
    }
}
