//! SA configuration.

use crate::error::{LocalSearchError, Result};
use crate::params::{
    ParameterBox, COOLING_RATE, MIN_TEMPERATURE, NEIGHBORS_SAMPLED, START_TEMPERATURE,
};

/// Configuration for the Simulated Annealing algorithm.
///
/// Cooling is geometric: every `neighbors_sampled` iterations the
/// temperature is multiplied by `cooling_rate`.
///
/// # Examples
///
/// ```
/// use u_localsearch::sa::SimulatedAnnealingConfig;
///
/// let config = SimulatedAnnealingConfig::default()
///     .with_start_temperature(100.0)
///     .with_cooling_rate(0.98)
///     .with_neighbors_sampled(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulatedAnnealingConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub start_temperature: f64,

    /// The run stops once the temperature drops to this value.
    pub min_temperature: f64,

    /// Cooling factor in (0, 1). Higher = slower cooling.
    pub cooling_rate: f64,

    /// Number of iterations at each temperature level.
    pub neighbors_sampled: u32,
}

impl Default for SimulatedAnnealingConfig {
    fn default() -> Self {
        Self {
            start_temperature: 100.0,
            min_temperature: 0.0001,
            cooling_rate: 0.95,
            neighbors_sampled: 100,
        }
    }
}

impl SimulatedAnnealingConfig {
    pub fn with_start_temperature(mut self, t: f64) -> Self {
        self.start_temperature = t;
        self
    }

    pub fn with_min_temperature(mut self, t: f64) -> Self {
        self.min_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_neighbors_sampled(mut self, n: u32) -> Self {
        self.neighbors_sampled = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.start_temperature <= 0.0 {
            return Err("start_temperature must be positive".into());
        }
        if self.min_temperature <= 0.0 {
            return Err("min_temperature must be positive".into());
        }
        if self.min_temperature >= self.start_temperature {
            return Err("min_temperature must be less than start_temperature".into());
        }
        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            ));
        }
        if self.neighbors_sampled == 0 {
            return Err("neighbors_sampled must be positive".into());
        }
        Ok(())
    }

    /// Reads start temperature, cooling rate and sample size (required) and
    /// the minimum temperature (optional) from `params`. On error the
    /// configuration is left untouched.
    pub fn apply(&mut self, params: &ParameterBox) -> Result<()> {
        let next = Self {
            start_temperature: params.real(START_TEMPERATURE)?,
            min_temperature: params
                .optional_real(MIN_TEMPERATURE)?
                .unwrap_or(self.min_temperature),
            cooling_rate: params.real(COOLING_RATE)?,
            neighbors_sampled: params.short_natural(NEIGHBORS_SAMPLED)?,
        };
        next.validate().map_err(LocalSearchError::InvalidConfig)?;
        *self = next;
        Ok(())
    }
}
