//! Steepest Descent policy.

use crate::error::Result;
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::ParameterBox;
use crate::random::SearchRng;
use crate::runner::{MovePolicy, MoveRunner, RunState, RunnerKind};

/// A [`MoveRunner`] performing steepest descent.
pub type SteepestDescent<'a, SM, NE> = MoveRunner<'a, SM, NE, SteepestDescentPolicy>;

/// Best move of the full neighborhood, accepted when strictly improving.
///
/// Has no tunables; only the runner's iteration cap applies.
#[derive(Debug, Clone, Default)]
pub struct SteepestDescentPolicy;

impl SteepestDescentPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl<NE: NeighborhoodExplorer> MovePolicy<NE> for SteepestDescentPolicy {
    fn kind(&self) -> RunnerKind {
        RunnerKind::SteepestDescent
    }

    fn initialize_run(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        // Lets the first stop check pass.
        run.current_move_cost = -1.0;
    }

    fn select_move(
        &mut self,
        ne: &NE,
        run: &RunState<NE::State, NE::Move>,
        rng: &mut SearchRng,
    ) -> Option<(NE::Move, f64)> {
        ne.best_move(&run.current_state, rng)
    }

    fn acceptable_move(
        &mut self,
        run: &RunState<NE::State, NE::Move>,
        _rng: &mut SearchRng,
    ) -> bool {
        run.current_move_cost < 0.0
    }

    fn stop_criterion(&self, run: &RunState<NE::State, NE::Move>) -> bool {
        run.current_move_cost >= 0.0
    }

    fn terminate_run(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        run.promote_current();
    }

    fn set_parameters(&mut self, _params: &ParameterBox) -> Result<()> {
        Ok(())
    }
}
