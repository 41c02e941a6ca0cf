//! Named runtime parameters.
//!
//! Runners read their tunables from a [`ParameterBox`]: an ordered map
//! from parameter name to a typed value. Getters fail with
//! [`LocalSearchError::ParameterNotFound`] for a missing key and
//! [`LocalSearchError::ParameterTypeMismatch`] for a value of the wrong
//! kind, so callers can tell "skip" from "abort".
//!
//! # Examples
//!
//! ```
//! use u_localsearch::params::{ParameterBox, ParamValue};
//!
//! let mut params = ParameterBox::new();
//! params.set("max idle iteration", ParamValue::Natural(500));
//! params.set("cooling rate", ParamValue::Real(0.99));
//! assert_eq!(params.natural("max idle iteration").unwrap(), 500);
//! assert!(params.short_natural("cooling rate").is_err());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LocalSearchError, Result};

/// Maximum number of iterations of a single run.
pub const MAX_ITERATION: &str = "max iteration";
/// Iterations without improvement before a run stops.
pub const MAX_IDLE_ITERATION: &str = "max idle iteration";
/// Lower bound of the tabu tenure.
pub const MIN_TENURE: &str = "min tenure";
/// Upper bound of the tabu tenure.
pub const MAX_TENURE: &str = "max tenure";
/// Initial simulated annealing temperature.
pub const START_TEMPERATURE: &str = "start temperature";
/// Geometric cooling factor.
pub const COOLING_RATE: &str = "cooling rate";
/// Temperature below which annealing stops.
pub const MIN_TEMPERATURE: &str = "min temperature";
/// Iterations spent at each temperature.
pub const NEIGHBORS_SAMPLED: &str = "neighbors sampled";

/// A typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    /// Large non-negative integer (iteration counts).
    Natural(u64),
    /// Small non-negative integer (tenures, sample sizes).
    ShortNatural(u32),
    /// Real number (temperatures, rates).
    Real(f64),
}

impl ParamValue {
    /// Name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Natural(_) => "natural",
            ParamValue::ShortNatural(_) => "short natural",
            ParamValue::Real(_) => "real",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Natural(v) => write!(f, "{v}"),
            ParamValue::ShortNatural(v) => write!(f, "{v}"),
            ParamValue::Real(v) => write!(f, "{v}"),
        }
    }
}

/// Ordered collection of named parameters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterBox {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Result<ParamValue> {
        self.values
            .get(name)
            .copied()
            .ok_or_else(|| LocalSearchError::ParameterNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn natural(&self, name: &str) -> Result<u64> {
        match self.get(name)? {
            ParamValue::Natural(v) => Ok(v),
            other => Err(mismatch(name, "natural", &other)),
        }
    }

    pub fn short_natural(&self, name: &str) -> Result<u32> {
        match self.get(name)? {
            ParamValue::ShortNatural(v) => Ok(v),
            other => Err(mismatch(name, "short natural", &other)),
        }
    }

    pub fn real(&self, name: &str) -> Result<f64> {
        match self.get(name)? {
            ParamValue::Real(v) => Ok(v),
            other => Err(mismatch(name, "real", &other)),
        }
    }

    /// Like [`natural`](Self::natural) but `None` when the key is absent.
    /// A value of the wrong kind is still an error.
    pub fn optional_natural(&self, name: &str) -> Result<Option<u64>> {
        optional(self.natural(name))
    }

    pub fn optional_short_natural(&self, name: &str) -> Result<Option<u32>> {
        optional(self.short_natural(name))
    }

    pub fn optional_real(&self, name: &str) -> Result<Option<f64>> {
        optional(self.real(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn mismatch(name: &str, expected: &'static str, found: &ParamValue) -> LocalSearchError {
    LocalSearchError::ParameterTypeMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

fn optional<T>(r: Result<T>) -> Result<Option<T>> {
    match r {
        Ok(v) => Ok(Some(v)),
        Err(LocalSearchError::ParameterNotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
