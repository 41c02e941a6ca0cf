//! The shared run loop.

use std::fmt;

use tracing::{debug, error, info, trace};

use super::types::{RunState, RunnerKind};
use super::{MovePolicy, Runner};
use crate::cost::{distance, is_lower_bound, EPS};
use crate::error::{LocalSearchError, Result};
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::{ParameterBox, MAX_ITERATION};
use crate::random::SearchRng;
use crate::state::StateManager;

/// A runner driving a neighborhood explorer with a [`MovePolicy`].
///
/// The runner borrows its state manager and explorer; several runners can
/// share them.
///
/// With cost checking enabled (the default in debug builds) every performed
/// move is followed by a full recomputation of the cost and of the redundant
/// state data. Any disagreement aborts the run with an error.
pub struct MoveRunner<'a, SM, NE, P>
where
    SM: StateManager,
    NE: NeighborhoodExplorer<State = SM::State>,
{
    name: String,
    sm: &'a SM,
    ne: &'a NE,
    policy: P,
    run: Option<RunState<SM::State, NE::Move>>,
    max_iteration: u64,
    check_costs: bool,
}

impl<'a, SM, NE, P> MoveRunner<'a, SM, NE, P>
where
    SM: StateManager,
    NE: NeighborhoodExplorer<State = SM::State>,
    P: MovePolicy<NE>,
{
    pub fn new(name: impl Into<String>, sm: &'a SM, ne: &'a NE, policy: P) -> Self {
        Self {
            name: name.into(),
            sm,
            ne,
            policy,
            run: None,
            max_iteration: u64::MAX,
            check_costs: cfg!(debug_assertions),
        }
    }

    /// Caps the number of iterations of a run.
    pub fn with_max_iteration(mut self, max: u64) -> Self {
        self.max_iteration = max;
        self
    }

    /// Enables or disables cost checking after every move.
    pub fn with_cost_check(mut self, enabled: bool) -> Self {
        self.check_costs = enabled;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Counters and states of the last run, if a state was installed.
    pub fn run_state(&self) -> Option<&RunState<SM::State, NE::Move>> {
        self.run.as_ref()
    }
}

impl<'a, SM, NE, P> Runner<SM::State> for MoveRunner<'a, SM, NE, P>
where
    SM: StateManager,
    NE: NeighborhoodExplorer<State = SM::State>,
    P: MovePolicy<NE>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RunnerKind {
        self.policy.kind()
    }

    fn set_current_state(&mut self, st: SM::State) {
        let cost = self.sm.cost_function(&st);
        self.run = Some(RunState::new(st, cost));
    }

    fn current_state(&self) -> Option<&SM::State> {
        self.run.as_ref().map(|r| &r.current_state)
    }

    fn current_state_cost(&self) -> f64 {
        self.run.as_ref().map_or(f64::INFINITY, |r| r.current_state_cost)
    }

    fn best_state(&self) -> Option<&SM::State> {
        self.run.as_ref().map(|r| &r.best_state)
    }

    fn best_state_cost(&self) -> f64 {
        self.run.as_ref().map_or(f64::INFINITY, |r| r.best_state_cost)
    }

    fn compute_cost(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.current_state_cost = self.sm.cost_function(&run.current_state);
        }
    }

    fn lower_bound_reached(&self) -> bool {
        self.run
            .as_ref()
            .is_some_and(|r| is_lower_bound(r.current_state_cost))
    }

    fn number_of_iterations(&self) -> u64 {
        self.run.as_ref().map_or(0, |r| r.iteration)
    }

    fn max_iteration(&self) -> u64 {
        self.max_iteration
    }

    fn set_max_iteration(&mut self, max: u64) {
        self.max_iteration = max;
    }

    fn go(&mut self, rng: &mut SearchRng) -> Result<()> {
        let Self {
            name,
            sm,
            ne,
            policy,
            run,
            max_iteration,
            check_costs,
        } = self;
        let run = run
            .as_mut()
            .ok_or_else(|| LocalSearchError::StateNotSet(name.clone()))?;
        policy.validate()?;

        run.iteration = 0;
        run.iteration_of_best = 0;
        run.current_state_cost = sm.cost_function(&run.current_state);
        run.current_move = None;
        run.current_move_cost = 0.0;
        run.promote_current();
        policy.initialize_run(run);

        info!(
            event = "run_start",
            runner = %name,
            kind = %policy.kind(),
            cost = run.current_state_cost,
        );

        while run.iteration < *max_iteration
            && !policy.stop_criterion(run)
            && !is_lower_bound(run.current_state_cost)
        {
            if !iterate(*sm, *ne, policy, run, *check_costs, rng)? {
                debug!(event = "empty_neighborhood", runner = %name, iteration = run.iteration);
                break;
            }
        }

        policy.terminate_run(run);

        info!(
            event = "run_end",
            runner = %name,
            kind = %policy.kind(),
            iterations = run.iteration,
            cost = run.best_state_cost,
        );
        Ok(())
    }

    fn step(&mut self, n: u64, rng: &mut SearchRng) -> Result<()> {
        let Self {
            name,
            sm,
            ne,
            policy,
            run,
            check_costs,
            ..
        } = self;
        let run = run
            .as_mut()
            .ok_or_else(|| LocalSearchError::StateNotSet(name.clone()))?;
        for _ in 0..n {
            if !iterate(*sm, *ne, policy, run, *check_costs, rng)? {
                break;
            }
            if is_lower_bound(run.current_state_cost) {
                break;
            }
        }
        Ok(())
    }

    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()> {
        let max_iteration = params.optional_natural(MAX_ITERATION)?;
        self.policy.set_parameters(params)?;
        self.policy.validate()?;
        if let Some(max) = max_iteration {
            self.max_iteration = max;
        }
        Ok(())
    }
}

/// One iteration of the loop. Returns `false` if no move could be selected.
fn iterate<SM, NE, P>(
    sm: &SM,
    ne: &NE,
    policy: &mut P,
    run: &mut RunState<SM::State, NE::Move>,
    check_costs: bool,
    rng: &mut SearchRng,
) -> Result<bool>
where
    SM: StateManager,
    NE: NeighborhoodExplorer<State = SM::State>,
    P: MovePolicy<NE>,
{
    policy.update_iteration_counter(run);
    let Some((mv, delta)) = policy.select_move(ne, run, rng) else {
        return Ok(false);
    };
    run.current_move = Some(mv.clone());
    run.current_move_cost = delta;

    if policy.acceptable_move(run, rng) {
        ne.make_move(&mut run.current_state, &mv);
        run.current_state_cost += delta;
        trace!(
            event = "move",
            iteration = run.iteration,
            mv = ?mv,
            delta = delta,
            cost = run.current_state_cost,
        );
        if check_costs {
            check_cost(sm, run, &mv)?;
        }
        policy.store_move(run, rng);
    }
    Ok(true)
}

fn check_cost<SM, M>(sm: &SM, run: &RunState<SM::State, M>, mv: &M) -> Result<()>
where
    SM: StateManager,
    M: fmt::Debug,
{
    if !sm.redundant_data_consistent(&run.current_state) {
        error!(event = "redundant_data_mismatch", iteration = run.iteration, mv = ?mv);
        return Err(LocalSearchError::RedundantDataMismatch {
            mv: format!("{mv:?}"),
            iteration: run.iteration,
        });
    }
    let computed = sm.cost_function(&run.current_state);
    if distance(computed, run.current_state_cost) > EPS {
        error!(
            event = "cost_drift",
            iteration = run.iteration,
            mv = ?mv,
            tracked = run.current_state_cost,
            computed = computed,
        );
        return Err(LocalSearchError::CostDrift {
            mv: format!("{mv:?}"),
            iteration: run.iteration,
            tracked: run.current_state_cost,
            computed,
        });
    }
    Ok(())
}
