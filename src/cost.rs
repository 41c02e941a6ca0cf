//! Cost model shared by every component.
//!
//! A cost is a single real number combining hard and soft constraints:
//!
//! ```text
//! cost = HARD_WEIGHT * violations + objective
//! ```
//!
//! Lower is better. A cost within [`EPS`] of zero is a lower bound: no
//! runner can improve on it.

/// Weight multiplying the number of hard-constraint violations.
pub const HARD_WEIGHT: f64 = 1000.0;

/// Tolerance used for every cost comparison.
pub const EPS: f64 = 1e-6;

/// Absolute difference between two costs.
#[inline]
pub fn distance(x: f64, y: f64) -> f64 {
    (x - y).abs()
}

/// Combines violations and objective into a single cost.
#[inline]
pub fn weighted_cost(violations: i64, objective: i64) -> f64 {
    HARD_WEIGHT * violations as f64 + objective as f64
}

/// Returns `true` if `cost` is indistinguishable from zero.
#[inline]
pub fn is_lower_bound(cost: f64) -> bool {
    distance(cost, 0.0) < EPS
}
