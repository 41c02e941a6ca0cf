//! Runners: single local search strategies.
//!
//! Every strategy shares one loop, implemented by [`MoveRunner`]:
//!
//! 1. Reset the counters, compute the current cost, copy it as best
//! 2. While the iteration cap, the strategy's stop criterion and the
//!    lower bound all allow it:
//!    a. Advance the iteration counter
//!    b. Select a move and its delta cost
//!    c. If the move is acceptable, apply it, add the delta to the
//!       current cost and let the strategy record it
//! 3. Let the strategy finalize the best state
//!
//! A [`MovePolicy`] supplies the strategy-specific hooks. Hill climbing,
//! steepest descent, tabu search and simulated annealing live in
//! [`hc`](crate::hc), [`sd`](crate::sd), [`tabu`](crate::tabu) and
//! [`sa`](crate::sa).
//!
//! Solvers handle runners through the object-safe [`Runner`] trait, so
//! runners of different strategies can be chained on the same state type.

mod move_runner;
mod types;

pub use move_runner::MoveRunner;
pub use types::{RunState, RunnerKind};

use crate::error::Result;
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::ParameterBox;
use crate::random::SearchRng;

/// A local search strategy over states of type `S`, usable behind
/// `dyn Runner<S>`.
pub trait Runner<S> {
    fn name(&self) -> &str;

    fn kind(&self) -> RunnerKind;

    /// Installs the state the next run starts from and computes its cost.
    fn set_current_state(&mut self, st: S);

    fn current_state(&self) -> Option<&S>;

    fn current_state_cost(&self) -> f64;

    fn best_state(&self) -> Option<&S>;

    fn best_state_cost(&self) -> f64;

    /// Recomputes the current cost from scratch.
    fn compute_cost(&mut self);

    /// Returns `true` when the current cost is zero.
    fn lower_bound_reached(&self) -> bool;

    fn number_of_iterations(&self) -> u64;

    fn max_iteration(&self) -> u64;

    fn set_max_iteration(&mut self, max: u64);

    /// Performs a full run from the current state.
    ///
    /// # Errors
    ///
    /// [`StateNotSet`](crate::error::LocalSearchError::StateNotSet) if no
    /// state was installed, `InvalidConfig` for out-of-range parameters,
    /// and `CostDrift` / `RedundantDataMismatch` when cost checking
    /// detects an inconsistency.
    fn go(&mut self, rng: &mut SearchRng) -> Result<()>;

    /// Performs `n` iterations without the strategy's stop criterion,
    /// continuing from the current counters. Stops early at the lower
    /// bound or on an empty neighborhood.
    fn step(&mut self, n: u64, rng: &mut SearchRng) -> Result<()>;

    /// Reads the strategy parameters from `params`.
    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()>;
}

/// Strategy hooks plugged into [`MoveRunner`].
pub trait MovePolicy<NE: NeighborhoodExplorer> {
    fn kind(&self) -> RunnerKind;

    /// Checks the strategy parameters before a run.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Called after the shared initialization.
    fn initialize_run(&mut self, _run: &mut RunState<NE::State, NE::Move>) {}

    fn update_iteration_counter(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        run.iteration += 1;
    }

    /// Picks the next move and its delta cost, or `None` if the
    /// neighborhood of the current state is empty.
    fn select_move(
        &mut self,
        ne: &NE,
        run: &RunState<NE::State, NE::Move>,
        rng: &mut SearchRng,
    ) -> Option<(NE::Move, f64)>;

    /// Decides whether the selected move (`run.current_move`) is performed.
    fn acceptable_move(
        &mut self,
        _run: &RunState<NE::State, NE::Move>,
        _rng: &mut SearchRng,
    ) -> bool {
        true
    }

    /// Called after a move has been performed and the cost updated.
    fn store_move(&mut self, _run: &mut RunState<NE::State, NE::Move>, _rng: &mut SearchRng) {}

    fn stop_criterion(&self, run: &RunState<NE::State, NE::Move>) -> bool;

    fn terminate_run(&mut self, _run: &mut RunState<NE::State, NE::Move>) {}

    /// Reads the strategy's own parameters. The iteration cap is handled
    /// by the runner.
    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()>;
}
