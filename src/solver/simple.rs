//! Single-runner solver.

use tracing::info;

use super::{BoxedRunner, LocalSearchSolver, Solver};
use crate::error::{LocalSearchError, Result};
use crate::random::SearchRng;
use crate::state::StateManager;

/// Runs one runner from the internal state and keeps its best state.
pub struct SimpleLocalSearch<'a, SM: StateManager> {
    core: LocalSearchSolver<'a, SM>,
    runner: Option<BoxedRunner<'a, SM>>,
}

impl<'a, SM: StateManager> SimpleLocalSearch<'a, SM> {
    pub fn new(sm: &'a SM) -> Self {
        Self {
            core: LocalSearchSolver::new(sm),
            runner: None,
        }
    }

    pub fn with_runner(mut self, runner: BoxedRunner<'a, SM>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Replaces the runner, returning the previous one.
    pub fn set_runner(&mut self, runner: BoxedRunner<'a, SM>) -> Option<BoxedRunner<'a, SM>> {
        self.runner.replace(runner)
    }

    pub fn runner_mut(&mut self) -> Option<&mut BoxedRunner<'a, SM>> {
        self.runner.as_mut()
    }
}

impl<'a, SM: StateManager + 'a> Solver<'a, SM> for SimpleLocalSearch<'a, SM> {
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
        let runner = self.runner.as_mut().ok_or(LocalSearchError::NoRunners)?;
        runner.set_current_state(self.core.internal_state().clone());
        runner.go(rng)?;
        self.core.adopt(&**runner);
        info!(
            event = "solver_end",
            solver = "simple",
            iterations = runner.number_of_iterations(),
            cost = self.core.internal_state_cost(),
        );
        Ok(())
    }

    fn number_of_iterations(&self) -> u64 {
        self.runner.as_ref().map_or(0, |r| r.number_of_iterations())
    }
}
