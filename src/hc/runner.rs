//! Hill Climbing policy.

use super::config::HillClimbingConfig;
use crate::cost::EPS;
use crate::error::{LocalSearchError, Result};
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::ParameterBox;
use crate::random::SearchRng;
use crate::runner::{MovePolicy, MoveRunner, RunState, RunnerKind};

/// A [`MoveRunner`] performing hill climbing.
///
/// # Examples
///
/// ```no_run
/// # fn demo<SM, NE>(sm: &SM, ne: &NE, start: SM::State) -> u_localsearch::error::Result<()>
/// # where
/// #     SM: u_localsearch::state::StateManager,
/// #     NE: u_localsearch::neighborhood::NeighborhoodExplorer<State = SM::State>,
/// # {
/// use u_localsearch::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
/// use u_localsearch::random::create_rng;
/// use u_localsearch::runner::Runner;
///
/// let policy = HillClimbingPolicy::new(HillClimbingConfig::default());
/// let mut hc = HillClimbing::new("HC", sm, ne, policy);
/// hc.set_current_state(start);
/// hc.go(&mut create_rng(42))?;
/// # Ok(())
/// # }
/// ```
pub type HillClimbing<'a, SM, NE> = MoveRunner<'a, SM, NE, HillClimbingPolicy>;

/// Random move, accepted when not worsening.
#[derive(Debug, Clone)]
pub struct HillClimbingPolicy {
    config: HillClimbingConfig,
}

impl HillClimbingPolicy {
    pub fn new(config: HillClimbingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HillClimbingConfig {
        &self.config
    }
}

impl<NE: NeighborhoodExplorer> MovePolicy<NE> for HillClimbingPolicy {
    fn kind(&self) -> RunnerKind {
        RunnerKind::HillClimbing
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(LocalSearchError::InvalidConfig)
    }

    fn select_move(
        &mut self,
        ne: &NE,
        run: &RunState<NE::State, NE::Move>,
        rng: &mut SearchRng,
    ) -> Option<(NE::Move, f64)> {
        let mv = ne.random_move(&run.current_state, rng)?;
        let delta = ne.delta_cost_function(&run.current_state, &mv);
        Some((mv, delta))
    }

    fn acceptable_move(
        &mut self,
        run: &RunState<NE::State, NE::Move>,
        _rng: &mut SearchRng,
    ) -> bool {
        run.current_move_cost <= 0.0
    }

    fn store_move(&mut self, run: &mut RunState<NE::State, NE::Move>, _rng: &mut SearchRng) {
        if run.current_move_cost < -EPS {
            run.iteration_of_best = run.iteration;
        }
    }

    fn stop_criterion(&self, run: &RunState<NE::State, NE::Move>) -> bool {
        run.idle_iterations() >= self.config.max_idle_iteration
    }

    fn terminate_run(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        run.promote_current();
    }

    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()> {
        self.config.apply(params)
    }
}
