//! SA policy.

use rand::Rng;

use super::config::SimulatedAnnealingConfig;
use crate::error::{LocalSearchError, Result};
use crate::neighborhood::NeighborhoodExplorer;
use crate::params::ParameterBox;
use crate::random::SearchRng;
use crate::runner::{MovePolicy, MoveRunner, RunState, RunnerKind};

/// A [`MoveRunner`] performing simulated annealing.
pub type SimulatedAnnealing<'a, SM, NE> = MoveRunner<'a, SM, NE, SimulatedAnnealingPolicy>;

/// Random move with Metropolis acceptance and geometric cooling.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealingPolicy {
    config: SimulatedAnnealingConfig,
    temperature: f64,
    accepted_moves: u64,
    improving_moves: u64,
}

impl SimulatedAnnealingPolicy {
    pub fn new(config: SimulatedAnnealingConfig) -> Self {
        Self {
            temperature: config.start_temperature,
            config,
            accepted_moves: 0,
            improving_moves: 0,
        }
    }

    pub fn config(&self) -> &SimulatedAnnealingConfig {
        &self.config
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Moves performed in the last run (including improvements).
    pub fn accepted_moves(&self) -> u64 {
        self.accepted_moves
    }

    /// Strictly improving moves performed in the last run.
    pub fn improving_moves(&self) -> u64 {
        self.improving_moves
    }
}

impl<NE: NeighborhoodExplorer> MovePolicy<NE> for SimulatedAnnealingPolicy {
    fn kind(&self) -> RunnerKind {
        RunnerKind::SimulatedAnnealing
    }

    fn validate(&self) -> Result<()> {
        self.config.validate().map_err(LocalSearchError::InvalidConfig)
    }

    fn initialize_run(&mut self, _run: &mut RunState<NE::State, NE::Move>) {
        self.temperature = self.config.start_temperature;
        self.accepted_moves = 0;
        self.improving_moves = 0;
    }

    fn update_iteration_counter(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        run.iteration += 1;
        if run.iteration % u64::from(self.config.neighbors_sampled) == 0 {
            self.temperature *= self.config.cooling_rate;
        }
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
        rng: &mut SearchRng,
    ) -> bool {
        let delta = run.current_move_cost;
        // Metropolis acceptance criterion
        let accept = delta <= 0.0 || rng.random::<f64>() < (-delta / self.temperature).exp();
        if accept {
            self.accepted_moves += 1;
            if delta < 0.0 {
                self.improving_moves += 1;
            }
        }
        accept
    }

    fn stop_criterion(&self, _run: &RunState<NE::State, NE::Move>) -> bool {
        self.temperature <= self.config.min_temperature
    }

    fn terminate_run(&mut self, run: &mut RunState<NE::State, NE::Move>) {
        run.promote_current();
    }

    fn set_parameters(&mut self, params: &ParameterBox) -> Result<()> {
        self.config.apply(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::tests::StepExplorer;
    use crate::params::{ParamValue, COOLING_RATE, NEIGHBORS_SAMPLED, START_TEMPERATURE};
    use crate::random::create_rng;
    use crate::runner::Runner;
    use crate::state::tests::Counter;

    fn policy(start: f64, rate: f64, sample: u32) -> SimulatedAnnealingPolicy {
        SimulatedAnnealingPolicy::new(
            SimulatedAnnealingConfig::default()
                .with_start_temperature(start)
                .with_cooling_rate(rate)
                .with_neighbors_sampled(sample),
        )
    }

    #[test]
    fn test_sa_cooling_schedule_iterations() {
        // 0.5^k <= 0.0001 first at k = 14, i.e. after 14 * 10 iterations.
        // The start is too far from zero for the lower bound to interfere.
        let sm = Counter { len: 10, max: 20 };
        let ne = StepExplorer { len: 10, max: 20 };
        let mut sa = SimulatedAnnealing::new("SA", &sm, &ne, policy(1.0, 0.5, 10))
            .with_cost_check(true);
        sa.set_current_state(vec![20; 10]);
        sa.go(&mut create_rng(42)).unwrap();
        assert_eq!(sa.number_of_iterations(), 140);
        assert!(sa.policy().temperature() <= 1e-4);
    }

    #[test]
    fn test_sa_improves() {
        let sm = Counter { len: 4, max: 9 };
        let ne = StepExplorer { len: 4, max: 9 };
        let mut sa = SimulatedAnnealing::new("SA", &sm, &ne, policy(2.0, 0.9, 50))
            .with_cost_check(true);
        sa.set_current_state(vec![9, 9, 9, 9]);
        sa.go(&mut create_rng(42)).unwrap();
        assert!(
            sa.best_state_cost() < 10.0,
            "expected a large improvement, got {}",
            sa.best_state_cost()
        );
        assert!(sa.policy().improving_moves() > 0);
        assert!(sa.policy().accepted_moves() >= sa.policy().improving_moves());
    }

    #[test]
    fn test_sa_accepts_uphill_when_hot() {
        let sm = Counter { len: 8, max: 9 };
        let ne = StepExplorer { len: 8, max: 9 };
        let mut sa = SimulatedAnnealing::new("SA", &sm, &ne, policy(1e8, 0.99, 1000))
            .with_max_iteration(1000);
        sa.set_current_state(vec![5; 8]);
        sa.go(&mut create_rng(42)).unwrap();
        let p = sa.policy();
        assert!(
            p.accepted_moves() as f64 / 1000.0 > 0.95,
            "expected near-total acceptance, got {}",
            p.accepted_moves()
        );
        assert!(p.accepted_moves() > p.improving_moves());
    }

    #[test]
    fn test_sa_set_parameters() {
        let sm = Counter { len: 2, max: 2 };
        let ne = StepExplorer { len: 2, max: 2 };
        let mut sa = SimulatedAnnealing::new("SA", &sm, &ne, policy(1.0, 0.5, 1));
        let params = ParameterBox::new()
            .with(START_TEMPERATURE, ParamValue::Real(30.0))
            .with(COOLING_RATE, ParamValue::Real(0.99))
            .with(NEIGHBORS_SAMPLED, ParamValue::ShortNatural(7));
        sa.set_parameters(&params).unwrap();
        assert_eq!(sa.policy().config().neighbors_sampled, 7);

        let bad = params.with(COOLING_RATE, ParamValue::Real(1.2));
        assert!(matches!(
            sa.set_parameters(&bad),
            Err(LocalSearchError::InvalidConfig(_))
        ));
    }
}
