//! Runner bookkeeping shared by every strategy.

use std::fmt;

/// The local search strategy implemented by a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunnerKind {
    HillClimbing,
    SteepestDescent,
    TabuSearch,
    SimulatedAnnealing,
}

impl RunnerKind {
    pub fn name(&self) -> &'static str {
        match self {
            RunnerKind::HillClimbing => "Hill Climbing",
            RunnerKind::SteepestDescent => "Steepest Descent",
            RunnerKind::TabuSearch => "Tabu Search",
            RunnerKind::SimulatedAnnealing => "Simulated Annealing",
        }
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mutable state of a run: current and best solutions, the last selected
/// move and the iteration counters.
///
/// Policies read and update it through the [`MovePolicy`](super::MovePolicy)
/// hooks.
#[derive(Debug, Clone)]
pub struct RunState<S, M> {
    pub current_state: S,
    pub current_state_cost: f64,
    pub current_move: Option<M>,
    pub current_move_cost: f64,
    pub best_state: S,
    pub best_state_cost: f64,
    pub iteration: u64,
    pub iteration_of_best: u64,
}

impl<S: Clone, M> RunState<S, M> {
    pub fn new(state: S, cost: f64) -> Self {
        Self {
            best_state: state.clone(),
            current_state: state,
            current_state_cost: cost,
            current_move: None,
            current_move_cost: 0.0,
            best_state_cost: cost,
            iteration: 0,
            iteration_of_best: 0,
        }
    }

    /// Copies the current state over the best one.
    pub fn promote_current(&mut self) {
        self.best_state = self.current_state.clone();
        self.best_state_cost = self.current_state_cost;
    }

    /// Iterations since the last recorded improvement.
    pub fn idle_iterations(&self) -> u64 {
        self.iteration.saturating_sub(self.iteration_of_best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(RunnerKind::TabuSearch.to_string(), "Tabu Search");
        assert_eq!(RunnerKind::HillClimbing.name(), "Hill Climbing");
    }

    #[test]
    fn test_promote_and_idle() {
        let mut run: RunState<Vec<u8>, ()> = RunState::new(vec![1], 4.0);
        run.current_state = vec![2];
        run.current_state_cost = 3.0;
        run.iteration = 7;
        run.iteration_of_best = 2;
        assert_eq!(run.idle_iterations(), 5);
        run.promote_current();
        assert_eq!(run.best_state, vec![2]);
        assert!((run.best_state_cost - 3.0).abs() < 1e-12);
    }
}
