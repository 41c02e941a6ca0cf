//! State managers.
//!
//! A [`StateManager`] knows everything about a problem's solution space
//! that does not depend on a neighborhood: how to build a random solution,
//! how to keep cached redundant data in sync, and how to count constraint
//! violations and the objective.

use rand::Rng;

use crate::cost::weighted_cost;
use crate::error::Result;
use crate::random::SearchRng;
use crate::runner::Runner;

/// Problem-specific state handling.
///
/// Implementors provide [`random_state`](Self::random_state),
/// [`violations`](Self::violations) and [`objective`](Self::objective);
/// the remaining operations have defaults in terms of those.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_localsearch::state::StateManager;
///
/// /// Minimize the number of set bits; a set bit at index 0 is a hard violation.
/// struct Bits(usize);
///
/// impl StateManager for Bits {
///     type State = Vec<bool>;
///     fn empty_state(&self) -> Vec<bool> { vec![false; self.0] }
///     fn random_state<R: Rng>(&self, st: &mut Vec<bool>, rng: &mut R) {
///         st.iter_mut().for_each(|b| *b = rng.random());
///     }
///     fn violations(&self, st: &Vec<bool>) -> i64 { st[0] as i64 }
///     fn objective(&self, st: &Vec<bool>) -> i64 {
///         st[1..].iter().filter(|&&b| b).count() as i64
///     }
/// }
///
/// let sm = Bits(4);
/// assert_eq!(sm.cost_function(&vec![true, true, false, false]), 1001.0);
/// ```
pub trait StateManager {
    /// The solution representation.
    type State: Clone;

    /// Allocates a state of the right shape. Its content is unspecified
    /// until [`random_state`](Self::random_state) or an explicit assignment.
    fn empty_state(&self) -> Self::State;

    /// Overwrites `st` with a random solution, caches included.
    fn random_state<R: Rng>(&self, st: &mut Self::State, rng: &mut R);

    /// Recomputes every cached field of `st` from its primary data.
    /// Must be idempotent.
    fn update_redundant_state_data(&self, _st: &mut Self::State) {}

    /// Returns `true` if the cached fields of `st` agree with a fresh
    /// recomputation.
    fn redundant_data_consistent(&self, _st: &Self::State) -> bool {
        true
    }

    /// Number of hard-constraint violations.
    fn violations(&self, st: &Self::State) -> i64;

    /// Soft-constraint penalty.
    fn objective(&self, st: &Self::State) -> i64;

    fn cost_function(&self, st: &Self::State) -> f64 {
        weighted_cost(self.violations(st), self.objective(st))
    }

    /// Draws `samples` random states and leaves the cheapest in `st`.
    /// Returns its cost. Ties keep the earliest sample.
    fn sample_state<R: Rng>(&self, st: &mut Self::State, samples: usize, rng: &mut R) -> f64 {
        self.random_state(st, rng);
        let mut best_cost = self.cost_function(st);
        let mut best_state = st.clone();
        for _ in 1..samples {
            self.random_state(st, rng);
            let cost = self.cost_function(st);
            if cost < best_cost {
                best_cost = cost;
                best_state = st.clone();
            }
        }
        *st = best_state;
        best_cost
    }

    /// Like [`sample_state`](Self::sample_state), but each random state is
    /// first improved by `runner` and the runner's best state is compared.
    fn improved_sample_state(
        &self,
        st: &mut Self::State,
        samples: usize,
        runner: &mut dyn Runner<Self::State>,
        rng: &mut SearchRng,
    ) -> Result<f64> {
        let mut best: Option<(Self::State, f64)> = None;
        for _ in 0..samples.max(1) {
            self.random_state(st, rng);
            runner.set_current_state(st.clone());
            runner.go(rng)?;
            let cost = runner.best_state_cost();
            if best.as_ref().is_none_or(|(_, c)| cost < *c) {
                if let Some(improved) = runner.best_state() {
                    best = Some((improved.clone(), cost));
                }
            }
        }
        match best {
            Some((state, cost)) => {
                *st = state;
                Ok(cost)
            }
            None => Ok(self.cost_function(st)),
        }
    }
}

/// Parallel [`StateManager::sample_state`].
///
/// One seed per sample is drawn from `rng` before the parallel section, so
/// the result only depends on the caller's generator. Returns the cheapest
/// state and its cost; ties keep the lowest sample index.
#[cfg(feature = "parallel")]
pub fn par_sample_state<SM, R>(sm: &SM, samples: usize, rng: &mut R) -> (SM::State, f64)
where
    SM: StateManager + Sync,
    SM::State: Send,
    R: Rng,
{
    use rayon::prelude::*;

    let seeds: Vec<u64> = (0..samples.max(1)).map(|_| rng.random()).collect();
    let best = seeds
        .into_par_iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut local = crate::random::create_rng(seed);
            let mut st = sm.empty_state();
            sm.random_state(&mut st, &mut local);
            let cost = sm.cost_function(&st);
            (i, st, cost)
        })
        .min_by(|a, b| a.2.total_cmp(&b.2).then(a.0.cmp(&b.0)));

    match best {
        Some((_, st, cost)) => (st, cost),
        None => {
            let mut st = sm.empty_state();
            sm.random_state(&mut st, rng);
            let cost = sm.cost_function(&st);
            (st, cost)
        }
    }
}
