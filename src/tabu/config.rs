//! Tabu Search configuration.

use crate::error::{LocalSearchError, Result};
use crate::params::{ParameterBox, MAX_IDLE_ITERATION, MAX_TENURE, MIN_TENURE, NEIGHBORS_SAMPLED};

/// Configuration parameters for Tabu Search.
///
/// # Examples
///
/// ```
/// use u_localsearch::tabu::TabuSearchConfig;
///
/// let config = TabuSearchConfig::default()
///     .with_tenure(5, 10)
///     .with_max_idle_iteration(1000);
/// assert_eq!(config.min_tenure, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuSearchConfig {
    /// Shortest number of iterations a performed move stays tabu.
    pub min_tenure: usize,
    /// Longest number of iterations a performed move stays tabu.
    pub max_tenure: usize,
    /// Iterations without improving the best state before stopping.
    pub max_idle_iteration: u64,
    /// Sample this many moves per iteration instead of scanning the whole
    /// neighborhood.
    pub sampled_neighbors: Option<usize>,
}

impl Default for TabuSearchConfig {
    fn default() -> Self {
        Self {
            min_tenure: 5,
            max_tenure: 10,
            max_idle_iteration: 200,
            sampled_neighbors: None,
        }
    }
}

impl TabuSearchConfig {
    /// Sets the tenure range.
    pub fn with_tenure(mut self, min: usize, max: usize) -> Self {
        self.min_tenure = min;
        self.max_tenure = max;
        self
    }

    /// Sets the maximum number of idle iterations.
    pub fn with_max_idle_iteration(mut self, n: u64) -> Self {
        self.max_idle_iteration = n;
        self
    }

    /// Switches to sampled move selection.
    pub fn with_sampled_neighbors(mut self, n: usize) -> Self {
        self.sampled_neighbors = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_idle_iteration == 0 {
            return Err("max_idle_iteration must be positive".into());
        }
        if self.min_tenure > self.max_tenure {
            return Err(format!(
                "min_tenure ({}) must not exceed max_tenure ({})",
                self.min_tenure, self.max_tenure
            ));
        }
        if self.sampled_neighbors == Some(0) {
            return Err("sampled_neighbors must be positive".into());
        }
        Ok(())
    }

    /// Overwrites the fields named in `params`. The idle limit and both
    /// tenures are required; the sample size is optional. On error the
    /// configuration is left untouched.
    pub fn apply(&mut self, params: &ParameterBox) -> Result<()> {
        let sampled = params.optional_short_natural(NEIGHBORS_SAMPLED)?;
        let next = Self {
            max_idle_iteration: params.natural(MAX_IDLE_ITERATION)?,
            min_tenure: params.short_natural(MIN_TENURE)? as usize,
            max_tenure: params.short_natural(MAX_TENURE)? as usize,
            sampled_neighbors: sampled.map(|n| n as usize).or(self.sampled_neighbors),
        };
        next.validate().map_err(LocalSearchError::InvalidConfig)?;
        *self = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LocalSearchError;
    use crate::params::ParamValue;

    #[test]
    fn test_default_is_valid() {
        assert!(TabuSearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_inverted_tenure() {
        let config = TabuSearchConfig::default().with_tenure(8, 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_idle() {
        let config = TabuSearchConfig::default().with_max_idle_iteration(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_parameters() {
        let params = ParameterBox::new()
            .with(MAX_IDLE_ITERATION, ParamValue::Natural(300))
            .with(MIN_TENURE, ParamValue::ShortNatural(2))
            .with(MAX_TENURE, ParamValue::ShortNatural(4));
        let mut config = TabuSearchConfig::default();
        config.apply(&params).unwrap();
        assert_eq!(config.max_idle_iteration, 300);
        assert_eq!((config.min_tenure, config.max_tenure), (2, 4));
        assert_eq!(config.sampled_neighbors, None);
    }

    #[test]
    fn test_apply_missing_tenure() {
        let params = ParameterBox::new().with(MAX_IDLE_ITERATION, ParamValue::Natural(300));
        let err = TabuSearchConfig::default().apply(&params).unwrap_err();
        assert!(matches!(err, LocalSearchError::ParameterNotFound(_)));
    }

    #[test]
    fn test_failed_apply_leaves_config_untouched() {
        let mut config = TabuSearchConfig::default();
        let missing = ParameterBox::new()
            .with(MAX_IDLE_ITERATION, ParamValue::Natural(7))
            .with(MAX_TENURE, ParamValue::ShortNatural(9));
        assert!(config.apply(&missing).is_err());
        assert_eq!(config, TabuSearchConfig::default());

        let inverted = missing.with(MIN_TENURE, ParamValue::ShortNatural(12));
        assert!(matches!(
            config.apply(&inverted),
            Err(LocalSearchError::InvalidConfig(_))
        ));
        assert_eq!(config, TabuSearchConfig::default());
    }
}
