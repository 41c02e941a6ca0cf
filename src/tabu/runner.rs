//! Tabu Search policy.
//!
//! # Algorithm
//!
//! 1. Empty the tabu list at the start of every run
//! 2. At each iteration:
//!    a. Select the best move not prohibited by the tabu list (a prohibited
//!       move passes when it satisfies aspiration; if every move is
//!       prohibited the best one is taken)
//!    b. Perform it unconditionally
//!    c. List the move with a random tenure
//!    d. Update the best state on strict improvement
//! 3. Stop after `max_idle_iteration` iterations without improving the best
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use tracing::debug;

use super::config::TabuSearchConfig;
use super::list::{InverseMove, TabuListManager};
use crate::cost::EPS;
use crate::error::{LocalSearchError, Result};
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::ParameterBox;
use crate::random::SearchRng;
use crate::runner::{MovePolicy, MoveRunner, RunState, RunnerKind};

/// A [`MoveRunner`] performing tabu search over moves of type `M`.
pub type TabuSearch<'a, SM, NE, M> = MoveRunner<'a, SM, NE, TabuSearchPolicy<M>>;

/// Tabu search hooks with their own tabu list.
#[derive(Debug, Clone)]
pub struct TabuSearchPolicy<M> {
    config: TabuSearchConfig,
    tabu: TabuListManager<M>,
}

impl<M> TabuSearchPolicy<M> {
    pub fn new(config: TabuSearchConfig) -> Self {
        let tabu = TabuListManager::new(config.min_tenure, config.max_tenure);
        Self { config, tabu }
    }

    pub fn config(&self) -> &TabuSearchConfig {
        &self.config
    }

    pub fn tabu_list(&self) -> &TabuListManager<M> {
        &self.tabu
    }
}

impl<NE, M> MovePolicy<NE> for TabuSearchPolicy<M>
where
    NE: NeighborhoodExplorer<Move = M>,
    M: InverseMove + Clone,
{
    fn kind(&self) -> RunnerKind {
        RunnerKind::TabuSearch
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(LocalSearchError::InvalidConfig)
    }

    fn initialize_run(&mut self, _run: &mut RunState<NE::State, NE::Move>) {
        self.tabu.clean();
    }

    fn select_move(
        &mut self,
        ne: &NE,
        run: &RunState<NE::State, NE::Move>,
        rng: &mut SearchRng,
    ) -> Option<(NE::Move, f64)> {
        match self.config.sampled_neighbors {
            Some(samples) => ne.sample_non_prohibited_move(
                &run.current_state,
                samples,
                &self.tabu,
                run.current_state_cost,
                run.best_state_cost,
                rng,
            ),
            None => ne.best_non_prohibited_move(
                &run.current_state,
                &self.tabu,
                run.current_state_cost,
                run.best_state_cost,
                rng,
            ),
        }
    }

    fn store_move(&mut self, run: &mut RunState<NE::State, NE::Move>, rng: &mut SearchRng) {
        if let Some(mv) = run.current_move.clone() {
            self.tabu.insert_move(
                mv,
                run.current_move_cost,
                run.current_state_cost,
                run.best_state_cost,
                rng,
            );
        }
        if run.current_state_cost + EPS < run.best_state_cost {
            run.iteration_of_best = run.iteration;
            run.promote_current();
            debug!(
                event = "new_best",
                iteration = run.iteration,
                cost = run.best_state_cost,
            );
        }
    }

    fn stop_criterion(&self, run: &RunState<NE::State, NE::Move>) -> bool {
        run.idle_iterations() >= self.config.max_idle_iteration
    }

    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()> {
        self.config.apply(params)?;
        self.tabu.set_length(self.config.min_tenure, self.config.max_tenure);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::tests::{Step, StepExplorer};
    use crate::params::{ParamValue, MAX_IDLE_ITERATION, MAX_TENURE, MIN_TENURE};
    use crate::random::create_rng;
    use crate::runner::Runner;
    use crate::state::tests::Counter;
    use crate::state::StateManager;
    use crate::tabu::ProhibitionManager;

    impl InverseMove for Step {
        fn is_inverse_of(&self, listed: &Step) -> bool {
            self.index == listed.index && self.up != listed.up
        }
    }

    #[test]
    fn test_ts_reaches_zero() {
        let sm = Counter { len: 4, max: 6 };
        let ne = StepExplorer { len: 4, max: 6 };
        let config = TabuSearchConfig::default()
            .with_tenure(1, 2)
            .with_max_idle_iteration(50);
        let mut ts = TabuSearch::new("TS", &sm, &ne, TabuSearchPolicy::<Step>::new(config))
            .with_cost_check(true);
        ts.set_current_state(vec![6, 2, 5, 3]);
        ts.go(&mut create_rng(42)).unwrap();
        assert!(
            ts.best_state_cost() < 1e-9,
            "expected cost 0, got {}",
            ts.best_state_cost()
        );
    }

    #[test]
    fn test_ts_best_never_worse_than_start() {
        let sm = Counter { len: 5, max: 3 };
        let ne = StepExplorer { len: 5, max: 3 };
        let config = TabuSearchConfig::default()
            .with_tenure(2, 4)
            .with_max_idle_iteration(10);
        let mut ts = TabuSearch::new("TS", &sm, &ne, TabuSearchPolicy::<Step>::new(config))
            .with_max_iteration(30)
            .with_cost_check(true);
        let start = vec![3, 3, 0, 1, 2];
        let start_cost = sm.cost_function(&start);
        ts.set_current_state(start);
        ts.go(&mut create_rng(9)).unwrap();
        assert!(ts.best_state_cost() <= start_cost);
        let best = ts.best_state().unwrap();
        assert!((sm.cost_function(best) - ts.best_state_cost()).abs() < 1e-9);
    }

    #[test]
    fn test_ts_sampled_selection() {
        let sm = Counter { len: 4, max: 6 };
        let ne = StepExplorer { len: 4, max: 6 };
        let config = TabuSearchConfig::default()
            .with_tenure(1, 1)
            .with_max_idle_iteration(100)
            .with_sampled_neighbors(6);
        let mut ts = TabuSearch::new("TS", &sm, &ne, TabuSearchPolicy::<Step>::new(config))
            .with_cost_check(true);
        ts.set_current_state(vec![2, 2, 2, 2]);
        ts.go(&mut create_rng(3)).unwrap();
        assert!(ts.best_state_cost() < 8.0);
    }

    #[test]
    fn test_ts_parameters_update_tenure() {
        let sm = Counter { len: 2, max: 2 };
        let ne = StepExplorer { len: 2, max: 2 };
        let mut ts = TabuSearch::new(
            "TS",
            &sm,
            &ne,
            TabuSearchPolicy::<Step>::new(TabuSearchConfig::default()),
        );
        let params = ParameterBox::new()
            .with(MAX_IDLE_ITERATION, ParamValue::Natural(77))
            .with(MIN_TENURE, ParamValue::ShortNatural(3))
            .with(MAX_TENURE, ParamValue::ShortNatural(9));
        ts.set_parameters(&params).unwrap();
        let tabu = ts.policy().tabu_list();
        assert_eq!((tabu.min_tenure(), tabu.max_tenure()), (3, 9));
        assert_eq!(ts.policy().config().max_idle_iteration, 77);
    }

    #[test]
    fn test_ts_rejects_inverted_tenure() {
        let sm = Counter { len: 2, max: 2 };
        let ne = StepExplorer { len: 2, max: 2 };
        let params = ParameterBox::new()
            .with(MAX_IDLE_ITERATION, ParamValue::Natural(10))
            .with(MIN_TENURE, ParamValue::ShortNatural(5))
            .with(MAX_TENURE, ParamValue::ShortNatural(2));
        let mut ts = TabuSearch::new(
            "TS",
            &sm,
            &ne,
            TabuSearchPolicy::<Step>::new(TabuSearchConfig::default()),
        );
        let err = ts.set_parameters(&params).unwrap_err();
        assert!(matches!(err, LocalSearchError::InvalidConfig(_)));
    }

    #[test]
    fn test_tenure_two_blocks_for_two_iterations() {
        let mut rng = create_rng(0);
        let mut tabu = TabuListManager::new(2, 2);
        let performed = Step { index: 1, up: true };
        let undo = Step { index: 1, up: false };
        // Fill a few iterations so the move goes in at k = 3.
        for i in 0..3 {
            tabu.insert_move(Step { index: 10 + i, up: true }, 0.0, 9.0, 9.0, &mut rng);
        }
        tabu.insert_move(performed, 0.0, 9.0, 9.0, &mut rng);
        // Attempted at k + 1.
        assert!(tabu.prohibited_move(&undo, 0.0, 9.0, 9.0));
        tabu.insert_move(Step { index: 20, up: true }, 0.0, 9.0, 9.0, &mut rng);
        // Attempted at k + 2.
        assert!(tabu.prohibited_move(&undo, 0.0, 9.0, 9.0));
        tabu.insert_move(Step { index: 21, up: true }, 0.0, 9.0, 9.0, &mut rng);
        // At k + 3 the entry is gone.
        assert!(!tabu.prohibited_move(&undo, 0.0, 9.0, 9.0));
        assert!(tabu.entries().all(|e| e.mv != performed));
    }
}
