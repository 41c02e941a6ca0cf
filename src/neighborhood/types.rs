//! Diagnostic values produced by neighborhood explorers.

use std::fmt;

use crate::cost::{distance, EPS};

/// Counts of a full neighborhood sweep, classified by move cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborhoodStats {
    /// Feasible moves visited.
    pub neighbors: usize,
    /// Moves with negative delta cost.
    pub improving: usize,
    /// Moves with positive delta cost.
    pub worsening: usize,
    /// Moves with zero delta cost.
    pub sideways: usize,
}

impl NeighborhoodStats {
    fn percent(&self, n: usize) -> f64 {
        if self.neighbors == 0 {
            0.0
        } else {
            100.0 * n as f64 / self.neighbors as f64
        }
    }

    pub fn improving_percent(&self) -> f64 {
        self.percent(self.improving)
    }

    pub fn worsening_percent(&self) -> f64 {
        self.percent(self.worsening)
    }

    pub fn sideways_percent(&self) -> f64 {
        self.percent(self.sideways)
    }
}

impl fmt::Display for NeighborhoodStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Neighborhood size: {}", self.neighbors)?;
        writeln!(
            f,
            "   improving moves: {} ({:.2}%)",
            self.improving,
            self.improving_percent()
        )?;
        writeln!(
            f,
            "   worsening moves: {} ({:.2}%)",
            self.worsening,
            self.worsening_percent()
        )?;
        write!(
            f,
            "   sideways moves: {} ({:.2}%)",
            self.sideways,
            self.sideways_percent()
        )
    }
}

/// Cost breakdown of a single move: start state, incremental delta, and
/// the state obtained by actually applying the move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReport<M> {
    pub mv: M,
    pub start_violations: i64,
    pub start_objective: i64,
    pub start_cost: f64,
    pub delta_violations: i64,
    pub delta_objective: i64,
    pub delta_cost: f64,
    pub final_violations: i64,
    pub final_objective: i64,
    pub final_cost: f64,
}

impl<M> MoveReport<M> {
    /// `final - delta - start`; zero when the delta functions are exact.
    pub fn error(&self) -> f64 {
        self.final_cost - self.delta_cost - self.start_cost
    }

    pub fn is_consistent(&self) -> bool {
        distance(self.error(), 0.0) < EPS
    }
}

impl<M: fmt::Debug> fmt::Display for MoveReport<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Move: {:?}", self.mv)?;
        writeln!(f, "Start state cost: {}", self.start_cost)?;
        writeln!(f, "\tViolations: {}", self.start_violations)?;
        writeln!(f, "\tObjective: {}", self.start_objective)?;
        writeln!(f, "Move cost: {}", self.delta_cost)?;
        writeln!(f, "\tViolations: {}", self.delta_violations)?;
        writeln!(f, "\tObjective: {}", self.delta_objective)?;
        writeln!(f, "Final state cost: {}", self.final_cost)?;
        writeln!(f, "\tViolations: {}", self.final_violations)?;
        writeln!(f, "\tObjective: {}", self.final_objective)?;
        write!(f, "Error: {}", self.error())
    }
}
