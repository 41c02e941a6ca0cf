//! Solvers: drive one or more runners from an initial state.
//!
//! Every solver wraps a [`LocalSearchSolver`] holding the internal state
//! and its cost. [`Solver::solve`] draws an initial state from the state
//! manager and runs; [`Solver::resolve`] runs again from the current
//! internal state; [`Solver::multi_start_solve`] keeps the best of several
//! solves.
//!
//! - [`SimpleLocalSearch`]: a single runner.
//! - [`ComparativeSolver`]: every runner from the same start, best kept.
//! - [`TokenRingSolver`]: runners in round robin, each handing its best
//!   state to the next, until a number of rounds pass without improvement.
//!
//! Runners are held as `Box<dyn Runner<State>>`, so a solver can chain
//! strategies over different neighborhoods of the same state type.

mod comparative;
mod simple;
mod token_ring;

pub use comparative::ComparativeSolver;
pub use simple::SimpleLocalSearch;
pub use token_ring::{TokenRingConfig, TokenRingSolver};

use tracing::info;

use crate::error::Result;
use crate::random::SearchRng;
use crate::runner::Runner;
use crate::state::StateManager;

/// A boxed runner over the states of `SM`.
pub type BoxedRunner<'a, SM> = Box<dyn Runner<<SM as StateManager>::State> + 'a>;

/// Internal state shared by every solver.
pub struct LocalSearchSolver<'a, SM: StateManager> {
    sm: &'a SM,
    internal_state: SM::State,
    internal_state_cost: f64,
    init_trials: usize,
}

impl<'a, SM: StateManager> LocalSearchSolver<'a, SM> {
    pub fn new(sm: &'a SM) -> Self {
        let internal_state = sm.empty_state();
        Self {
            sm,
            internal_state,
            internal_state_cost: f64::INFINITY,
            init_trials: 1,
        }
    }

    pub fn state_manager(&self) -> &'a SM {
        self.sm
    }

    /// Number of random states sampled by
    /// [`find_initial_state`](Self::find_initial_state).
    pub fn init_trials(&self) -> usize {
        self.init_trials
    }

    pub fn set_init_trials(&mut self, trials: usize) {
        self.init_trials = trials.max(1);
    }

    pub fn internal_state(&self) -> &SM::State {
        &self.internal_state
    }

    pub fn internal_state_cost(&self) -> f64 {
        self.internal_state_cost
    }

    /// Replaces the internal state and recomputes its cost.
    pub fn set_internal_state(&mut self, st: SM::State) {
        self.internal_state_cost = self.sm.cost_function(&st);
        self.internal_state = st;
    }

    /// Samples `init_trials` random states and keeps the best.
    pub fn find_initial_state(&mut self, rng: &mut SearchRng) {
        self.internal_state_cost =
            self.sm
                .sample_state(&mut self.internal_state, self.init_trials, rng);
    }

    pub fn compute_cost(&mut self) {
        self.internal_state_cost = self.sm.cost_function(&self.internal_state);
    }

    /// Adopts the best state of `runner` if it beats the internal one.
    /// Returns `true` on strict improvement.
    pub(crate) fn adopt_if_better(&mut self, runner: &dyn Runner<SM::State>) -> bool {
        if runner.best_state_cost() < self.internal_state_cost {
            if let Some(best) = runner.best_state() {
                self.internal_state = best.clone();
                self.internal_state_cost = runner.best_state_cost();
                return true;
            }
        }
        false
    }

    /// Unconditionally adopts the best state of `runner`.
    pub(crate) fn adopt(&mut self, runner: &dyn Runner<SM::State>) {
        if let Some(best) = runner.best_state() {
            self.internal_state = best.clone();
            self.internal_state_cost = runner.best_state_cost();
        }
    }
}

/// Common interface of the solvers.
pub trait Solver<'a, SM: StateManager + 'a> {
    fn core(&self) -> &LocalSearchSolver<'a, SM>;

    fn core_mut(&mut self) -> &mut LocalSearchSolver<'a, SM>;

    /// Runs the attached runners from the internal state and leaves the
    /// result in it.
    fn run(&mut self, rng: &mut SearchRng) -> Result<()>;

    /// Iterations performed by the runners in the last run.
    fn number_of_iterations(&self) -> u64;

    fn internal_state(&self) -> &SM::State;

    fn internal_state_cost(&self) -> f64 {
        self.core().internal_state_cost()
    }

    /// Finds an initial state and runs.
    fn solve(&mut self, rng: &mut SearchRng) -> Result<()> {
        self.core_mut().find_initial_state(rng);
        self.run(rng)
    }

    /// Runs again from the current internal state.
    fn resolve(&mut self, rng: &mut SearchRng) -> Result<()> {
        self.run(rng)
    }

    /// Performs `n` solves from fresh initial states and keeps the best.
    fn multi_start_solve(&mut self, n: usize, rng: &mut SearchRng) -> Result<()> {
        let mut best: Option<(SM::State, f64)> = None;
        for trial in 0..n.max(1) {
            self.solve(rng)?;
            let cost = self.internal_state_cost();
            info!(event = "multi_start_trial", trial, cost);
            if best.as_ref().is_none_or(|(_, c)| cost < *c) {
                best = Some((self.internal_state().clone(), cost));
            }
        }
        if let Some((state, _)) = best {
            self.core_mut().set_internal_state(state);
        }
        Ok(())
    }
}
