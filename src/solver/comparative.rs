//! Comparative solver.

use tracing::{debug, info};

use super::{BoxedRunner, LocalSearchSolver, Solver};
use crate::error::{LocalSearchError, Result};
use crate::random::SearchRng;
use crate::state::StateManager;

/// Runs every runner from the same start state and keeps the best result.
///
/// Ties keep the earlier runner.
pub struct ComparativeSolver<'a, SM: StateManager> {
    core: LocalSearchSolver<'a, SM>,
    runners: Vec<BoxedRunner<'a, SM>>,
    total_iterations: u64,
    winner: Option<usize>,
}

impl<'a, SM: StateManager> ComparativeSolver<'a, SM> {
    pub fn new(sm: &'a SM) -> Self {
        Self {
            core: LocalSearchSolver::new(sm),
            runners: Vec::new(),
            total_iterations: 0,
            winner: None,
        }
    }

    pub fn add_runner(&mut self, runner: BoxedRunner<'a, SM>) {
        self.runners.push(runner);
    }

    pub fn with_runner(mut self, runner: BoxedRunner<'a, SM>) -> Self {
        self.add_runner(runner);
        self
    }

    pub fn clear_runners(&mut self) -> Vec<BoxedRunner<'a, SM>> {
        std::mem::take(&mut self.runners)
    }

    pub fn runners(&self) -> &[BoxedRunner<'a, SM>] {
        &self.runners
    }

    /// Index of the runner whose result was kept in the last run.
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }
}

impl<'a, SM: StateManager + 'a> Solver<'a, SM> for ComparativeSolver<'a, SM> {
    fn core(&self) -> &LocalSearchSolver<'a, SM> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut LocalSearchSolver<'a, SM> {
        &mut self.core
    }

    fn internal_state(&self) -> &SM::State {
        self.core.internal_state()
    }

    fn run(&mut self, rng: &mut SearchRng) -> Result<()> {
        if self.runners.is_empty() {
            return Err(LocalSearchError::NoRunners);
        }
        let start = self.core.internal_state().clone();
        self.total_iterations = 0;
        self.winner = None;

        for (i, runner) in self.runners.iter_mut().enumerate() {
            runner.set_current_state(start.clone());
            runner.go(rng)?;
            self.total_iterations += runner.number_of_iterations();
            debug!(
                event = "runner_result",
                runner = runner.name(),
                cost = runner.best_state_cost(),
            );
            if i == 0 {
                self.core.adopt(&**runner);
                self.winner = Some(0);
            } else if self.core.adopt_if_better(&**runner) {
                self.winner = Some(i);
            }
        }

        info!(
            event = "solver_end",
            solver = "comparative",
            iterations = self.total_iterations,
            cost = self.core.internal_state_cost(),
        );
        Ok(())
    }

    fn number_of_iterations(&self) -> u64 {
        self.total_iterations
    }
}
