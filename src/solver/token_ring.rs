//! Token-ring solver.
//!
//! # Algorithm
//!
//! 1. Compute the cost of the internal state and hand it to the start runner
//! 2. Each round, starting from `start_runner`:
//!    a. The active runner runs to completion
//!    b. Its best state replaces the internal state on strict improvement
//!    c. Its best state becomes the next runner's current state
//! 3. A round without improvement is idle; stop after `max_idle_rounds`
//!    consecutive idle rounds
//! 4. Stop at once when a runner reaches the lower bound or when the ring
//!    holds a single runner

use tracing::{debug, info};

use super::{BoxedRunner, LocalSearchSolver, Solver};
use crate::error::{LocalSearchError, Result};
use crate::random::SearchRng;
use crate::state::StateManager;

/// Configuration of the token ring.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRingConfig {
    /// Consecutive rounds without improvement before stopping.
    pub max_idle_rounds: u32,

    /// Index of the runner that opens every round.
    pub start_runner: usize,
}

impl Default for TokenRingConfig {
    fn default() -> Self {
        Self {
            max_idle_rounds: 1,
            start_runner: 0,
        }
    }
}

impl TokenRingConfig {
    pub fn with_max_idle_rounds(mut self, rounds: u32) -> Self {
        self.max_idle_rounds = rounds;
        self
    }

    pub fn with_start_runner(mut self, index: usize) -> Self {
        self.start_runner = index;
        self
    }

    /// Validates the configuration against a ring of `runners` runners.
    pub fn validate(&self, runners: usize) -> std::result::Result<(), String> {
        if self.max_idle_rounds == 0 {
            return Err("max_idle_rounds must be at least 1".into());
        }
        if self.start_runner >= runners {
            return Err(format!(
                "start_runner {} out of range for {} runners",
                self.start_runner, runners
            ));
        }
        Ok(())
    }
}

/// Runs its runners in round robin over one shared state.
pub struct TokenRingSolver<'a, SM: StateManager> {
    core: LocalSearchSolver<'a, SM>,
    runners: Vec<BoxedRunner<'a, SM>>,
    config: TokenRingConfig,
    total_iterations: u64,
    rounds: u32,
}

impl<'a, SM: StateManager> TokenRingSolver<'a, SM> {
    pub fn new(sm: &'a SM, config: TokenRingConfig) -> Self {
        Self {
            core: LocalSearchSolver::new(sm),
            runners: Vec::new(),
            config,
            total_iterations: 0,
            rounds: 0,
        }
    }

    pub fn config(&self) -> &TokenRingConfig {
        &self.config
    }

    pub fn set_rounds(&mut self, rounds: u32) {
        self.config.max_idle_rounds = rounds;
    }

    pub fn set_start_runner(&mut self, index: usize) {
        self.config.start_runner = index;
    }

    /// Appends a runner to the ring.
    pub fn add_runner(&mut self, runner: BoxedRunner<'a, SM>) {
        self.runners.push(runner);
    }

    pub fn with_runner(mut self, runner: BoxedRunner<'a, SM>) -> Self {
        self.add_runner(runner);
        self
    }

    /// Removes every runner from the ring and returns them in order.
    pub fn clear_runners(&mut self) -> Vec<BoxedRunner<'a, SM>> {
        std::mem::take(&mut self.runners)
    }

    pub fn runners(&self) -> &[BoxedRunner<'a, SM>] {
        &self.runners
    }

    pub fn runners_mut(&mut self) -> &mut [BoxedRunner<'a, SM>] {
        &mut self.runners
    }

    /// Rounds started in the last run.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl<'a, SM: StateManager + 'a> Solver<'a, SM> for TokenRingSolver<'a, SM> {
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
        let Self {
            core,
            runners,
            config,
            total_iterations,
            rounds,
        } = self;
        if runners.is_empty() {
            return Err(LocalSearchError::NoRunners);
        }
        config
            .validate(runners.len())
            .map_err(LocalSearchError::InvalidConfig)?;

        let n = runners.len();
        let start = config.start_runner;
        let mut i = start;
        let mut idle_rounds = 0;
        let mut interrupt = false;
        *total_iterations = 0;
        *rounds = 0;

        core.compute_cost();
        runners[i].set_current_state(core.internal_state().clone());
        info!(
            event = "solver_start",
            solver = "token ring",
            runners = n,
            cost = core.internal_state_cost(),
        );

        while idle_rounds < config.max_idle_rounds && !interrupt {
            *rounds += 1;
            let mut improved = false;
            loop {
                let runner = &mut runners[i];
                runner.go(rng)?;
                improved |= core.adopt_if_better(&**runner);
                *total_iterations += runner.number_of_iterations();
                if runner.lower_bound_reached() || n == 1 {
                    interrupt = true;
                    break;
                }
                let handoff = runner.best_state().cloned();
                i = (i + 1) % n;
                if let Some(st) = handoff {
                    runners[i].set_current_state(st);
                }
                if i == start {
                    break;
                }
            }
            if !interrupt {
                if improved {
                    idle_rounds = 0;
                } else {
                    idle_rounds += 1;
                }
            }
            debug!(
                event = "round_end",
                round = *rounds,
                improved,
                idle_rounds,
                cost = core.internal_state_cost(),
            );
        }

        info!(
            event = "solver_end",
            solver = "token ring",
            rounds = *rounds,
            iterations = *total_iterations,
            cost = core.internal_state_cost(),
        );
        Ok(())
    }

    fn number_of_iterations(&self) -> u64 {
        self.total_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hc::{HillClimbing, HillClimbingConfig, HillClimbingPolicy};
    use crate::neighborhood::tests::{Step, StepExplorer};
    use crate::random::create_rng;
    use crate::runner::RunnerKind;
    use crate::sd::{SteepestDescent, SteepestDescentPolicy};
    use crate::state::tests::Counter;
    use crate::tabu::{TabuSearch, TabuSearchConfig, TabuSearchPolicy};

    #[test]
    fn test_config_validate() {
        assert!(TokenRingConfig::default().validate(1).is_ok());
        assert!(TokenRingConfig::default().validate(0).is_err());
        assert!(TokenRingConfig::default()
            .with_start_runner(2)
            .validate(2)
            .is_err());
        assert!(TokenRingConfig::default()
            .with_max_idle_rounds(0)
            .validate(3)
            .is_err());
    }

    #[test]
    fn test_no_runners() {
        let sm = Counter { len: 2, max: 2 };
        let mut solver = TokenRingSolver::new(&sm, TokenRingConfig::default());
        assert!(matches!(
            solver.solve(&mut create_rng(0)),
            Err(LocalSearchError::NoRunners)
        ));
    }

    #[test]
    fn test_start_runner_out_of_range() {
        let sm = Counter { len: 2, max: 2 };
        let ne = StepExplorer { len: 2, max: 2 };
        let sd = SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy);
        let mut solver =
            TokenRingSolver::new(&sm, TokenRingConfig::default().with_start_runner(1))
                .with_runner(Box::new(sd));
        assert!(matches!(
            solver.solve(&mut create_rng(0)),
            Err(LocalSearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_runner_stops_after_one_run() {
        let sm = Counter { len: 3, max: 5 };
        let ne = StepExplorer { len: 3, max: 5 };
        let hc = HillClimbing::new(
            "HC",
            &sm,
            &ne,
            HillClimbingPolicy::new(HillClimbingConfig::default().with_max_idle_iteration(5)),
        )
        .with_max_iteration(4);
        let mut solver = TokenRingSolver::new(
            &sm,
            TokenRingConfig::default().with_max_idle_rounds(10),
        )
        .with_runner(Box::new(hc));
        solver.core_mut().set_internal_state(vec![5, 5, 5]);
        solver.resolve(&mut create_rng(3)).unwrap();
        assert_eq!(solver.rounds(), 1);
        assert_eq!(solver.number_of_iterations(), 4);
    }

    #[test]
    fn test_lower_bound_interrupts_ring() {
        let sm = Counter { len: 3, max: 5 };
        let ne = StepExplorer { len: 3, max: 5 };
        let sd = SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy);
        let sd2 = SteepestDescent::new("SD2", &sm, &ne, SteepestDescentPolicy);
        let mut solver = TokenRingSolver::new(&sm, TokenRingConfig::default())
            .with_runner(Box::new(sd))
            .with_runner(Box::new(sd2));
        solver.core_mut().set_internal_state(vec![1, 2, 3]);
        solver.resolve(&mut create_rng(3)).unwrap();
        assert!(solver.internal_state_cost() < 1e-9);
        // The first runner already reaches zero; the second never runs.
        assert_eq!(solver.number_of_iterations(), 6);
        assert_eq!(solver.runners()[1].number_of_iterations(), 0);
    }

    #[test]
    fn test_handoff_and_idle_rounds() {
        // HC is capped so it cannot finish alone; SD completes the descent.
        let sm = Counter { len: 4, max: 6 };
        let ne = StepExplorer { len: 4, max: 6 };
        let hc = HillClimbing::new(
            "HC",
            &sm,
            &ne,
            HillClimbingPolicy::new(HillClimbingConfig::default()),
        )
        .with_max_iteration(3);
        let ts = TabuSearch::new(
            "TS",
            &sm,
            &ne,
            TabuSearchPolicy::<Step>::new(
                TabuSearchConfig::default()
                    .with_tenure(1, 2)
                    .with_max_idle_iteration(5),
            ),
        )
        .with_max_iteration(2);
        let sd = SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy);
        let mut solver = TokenRingSolver::new(
            &sm,
            TokenRingConfig::default().with_max_idle_rounds(2),
        )
        .with_runner(Box::new(hc))
        .with_runner(Box::new(ts))
        .with_runner(Box::new(sd));
        assert_eq!(solver.runners()[1].kind(), RunnerKind::TabuSearch);
        solver.core_mut().set_internal_state(vec![6, 6, 6, 6]);
        solver.resolve(&mut create_rng(21)).unwrap();
        assert!(solver.internal_state_cost() < 1e-9);
        let sum: u64 = solver
            .runners()
            .iter()
            .map(|r| r.number_of_iterations())
            .sum();
        assert!(solver.number_of_iterations() >= sum);
    }

    #[test]
    fn test_idle_rounds_stop_at_local_minimum() {
        // From [-1, 0] only upward moves exist and none improves.
        let sm = Counter { len: 2, max: 3 };
        let ne = StepExplorer { len: 2, max: 3 };
        let sd = SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy);
        let sd2 = SteepestDescent::new("SD2", &sm, &ne, SteepestDescentPolicy);
        let mut solver = TokenRingSolver::new(
            &sm,
            TokenRingConfig::default()
                .with_max_idle_rounds(3)
                .with_start_runner(1),
        )
        .with_runner(Box::new(sd))
        .with_runner(Box::new(sd2));
        solver.core_mut().set_internal_state(vec![-1, 0]);
        solver.resolve(&mut create_rng(0)).unwrap();
        assert_eq!(solver.rounds(), 3);
        assert_eq!(solver.number_of_iterations(), 6);
        assert!((solver.internal_state_cost() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_runners_returns_them() {
        let sm = Counter { len: 2, max: 2 };
        let ne = StepExplorer { len: 2, max: 2 };
        let sd = SteepestDescent::new("SD", &sm, &ne, SteepestDescentPolicy);
        let mut solver =
            TokenRingSolver::new(&sm, TokenRingConfig::default()).with_runner(Box::new(sd));
        let taken = solver.clear_runners();
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].name(), "SD");
        assert!(solver.runners().is_empty());
    }
}
