//! Neighborhood exploration.
//!
//! A [`NeighborhoodExplorer`] defines a move type and everything needed to
//! walk the neighborhood of a state: random draws, a cyclic enumeration
//! order, feasibility, application, and incremental cost deltas.
//!
//! # Enumeration
//!
//! Raw moves form a fixed cyclic total order: repeatedly applying
//! [`any_next_move`](NeighborhoodExplorer::any_next_move) from any raw move
//! visits every raw move once and returns to the start. Feasible moves are
//! visited by skipping infeasible ones, and a sweep ends when it comes back
//! to its first move. Since the first move is feasible, every sweep
//! terminates.
//!
//! # Deltas
//!
//! [`delta_violations`](NeighborhoodExplorer::delta_violations) and
//! [`delta_objective`](NeighborhoodExplorer::delta_objective) must equal the
//! change the move would cause in the full cost components. Runners rely on
//! them to track the current cost without recomputation.

mod types;

pub use types::{MoveReport, NeighborhoodStats};

use std::fmt;

use rand::Rng;

use crate::cost::weighted_cost;
use crate::state::StateManager;
use crate::tabu::ProhibitionManager;

/// Random draws tried before a random move falls back to scanning.
pub const MAX_RANDOM_ATTEMPTS: usize = 1000;

/// Problem-specific neighborhood.
pub trait NeighborhoodExplorer {
    /// The state the moves apply to.
    type State: Clone;

    /// A move. Equality is used to detect the end of a sweep.
    type Move: Clone + PartialEq + fmt::Debug;

    /// Draws a raw move uniformly from the enumeration order, feasible or
    /// not.
    fn any_random_move<R: Rng>(&self, st: &Self::State, rng: &mut R) -> Self::Move;

    /// Successor of `mv` in the cyclic enumeration order.
    fn any_next_move(&self, st: &Self::State, mv: &Self::Move) -> Self::Move;

    fn feasible_move(&self, _st: &Self::State, _mv: &Self::Move) -> bool {
        true
    }

    /// Applies a feasible move, updating any redundant data.
    fn make_move(&self, st: &mut Self::State, mv: &Self::Move);

    fn delta_violations(&self, st: &Self::State, mv: &Self::Move) -> i64;

    fn delta_objective(&self, st: &Self::State, mv: &Self::Move) -> i64;

    fn delta_cost_function(&self, st: &Self::State, mv: &Self::Move) -> f64 {
        weighted_cost(self.delta_violations(st, mv), self.delta_objective(st, mv))
    }

    /// A uniformly drawn feasible move, or `None` if the neighborhood is
    /// empty.
    ///
    /// Draws are rejected until one is feasible. After
    /// [`MAX_RANDOM_ATTEMPTS`] rejections the enumeration order is scanned
    /// from the last draw instead.
    fn random_move<R: Rng>(&self, st: &Self::State, rng: &mut R) -> Option<Self::Move> {
        let mut mv = self.any_random_move(st, rng);
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            if self.feasible_move(st, &mv) {
                return Some(mv);
            }
            mv = self.any_random_move(st, rng);
        }
        let start = mv.clone();
        loop {
            if self.feasible_move(st, &mv) {
                return Some(mv);
            }
            mv = self.any_next_move(st, &mv);
            if mv == start {
                return None;
            }
        }
    }

    /// Start of a sweep.
    fn first_move<R: Rng>(&self, st: &Self::State, rng: &mut R) -> Option<Self::Move> {
        self.random_move(st, rng)
    }

    /// Next feasible move after `mv`. `mv` itself must be feasible.
    fn next_move(&self, st: &Self::State, mv: &Self::Move) -> Self::Move {
        let mut next = self.any_next_move(st, mv);
        while !self.feasible_move(st, &next) {
            next = self.any_next_move(st, &next);
        }
        next
    }

    /// Returns `true` once a sweep started at `start` has come back to it.
    fn last_move_done(&self, start: &Self::Move, mv: &Self::Move) -> bool {
        start == mv
    }

    /// Move with the lowest delta cost; the first one found wins ties.
    fn best_move<R: Rng>(&self, st: &Self::State, rng: &mut R) -> Option<(Self::Move, f64)> {
        let start = self.first_move(st, rng)?;
        let mut best_delta = self.delta_cost_function(st, &start);
        let mut best = start.clone();
        let mut mv = self.next_move(st, &start);
        while !self.last_move_done(&start, &mv) {
            let delta = self.delta_cost_function(st, &mv);
            if delta < best_delta {
                best_delta = delta;
                best = mv.clone();
            }
            mv = self.next_move(st, &mv);
        }
        Some((best, best_delta))
    }

    /// Best of `samples` random moves (at least one).
    fn sample_move<R: Rng>(
        &self,
        st: &Self::State,
        samples: usize,
        rng: &mut R,
    ) -> Option<(Self::Move, f64)> {
        let mut best = self.random_move(st, rng)?;
        let mut best_delta = self.delta_cost_function(st, &best);
        for _ in 1..samples {
            let mv = self.random_move(st, rng)?;
            let delta = self.delta_cost_function(st, &mv);
            if delta < best_delta {
                best_delta = delta;
                best = mv;
            }
        }
        Some((best, best_delta))
    }

    /// Best move not prohibited by `pm`, scanning the whole neighborhood.
    ///
    /// If every move is prohibited the best prohibited move is returned.
    /// While all moves seen so far are prohibited, the first non-prohibited
    /// move replaces the incumbent regardless of cost.
    fn best_non_prohibited_move<R, P>(
        &self,
        st: &Self::State,
        pm: &P,
        current_cost: f64,
        best_cost: f64,
        rng: &mut R,
    ) -> Option<(Self::Move, f64)>
    where
        R: Rng,
        P: ProhibitionManager<Self::Move> + ?Sized,
    {
        let start = self.first_move(st, rng)?;
        let first_delta = self.delta_cost_function(st, &start);
        let mut selector = NonProhibitedSelector::new(start.clone(), first_delta);
        let mut mv = start.clone();
        loop {
            let delta = self.delta_cost_function(st, &mv);
            let prohibited = pm.prohibited_move(&mv, delta, current_cost, best_cost);
            selector.offer(&mv, delta, prohibited);
            mv = self.next_move(st, &mv);
            if self.last_move_done(&start, &mv) {
                break;
            }
        }
        Some(selector.finish())
    }

    /// Sampled variant of
    /// [`best_non_prohibited_move`](Self::best_non_prohibited_move).
    fn sample_non_prohibited_move<R, P>(
        &self,
        st: &Self::State,
        samples: usize,
        pm: &P,
        current_cost: f64,
        best_cost: f64,
        rng: &mut R,
    ) -> Option<(Self::Move, f64)>
    where
        R: Rng,
        P: ProhibitionManager<Self::Move> + ?Sized,
    {
        let first = self.random_move(st, rng)?;
        let first_delta = self.delta_cost_function(st, &first);
        let mut selector = NonProhibitedSelector::new(first.clone(), first_delta);
        let mut mv = first;
        for s in 0..samples.max(1) {
            if s > 0 {
                mv = self.random_move(st, rng)?;
            }
            let delta = self.delta_cost_function(st, &mv);
            let prohibited = pm.prohibited_move(&mv, delta, current_cost, best_cost);
            selector.offer(&mv, delta, prohibited);
        }
        Some(selector.finish())
    }

    /// Deltas obtained by applying `mv` to a copy of `st` and recomputing
    /// the full cost components. Slow; meant for cross-checking.
    fn delta_cost_by_diff<SM>(&self, sm: &SM, st: &Self::State, mv: &Self::Move) -> (i64, i64)
    where
        SM: StateManager<State = Self::State>,
    {
        let mut after = st.clone();
        self.make_move(&mut after, mv);
        (
            sm.violations(&after) - sm.violations(st),
            sm.objective(&after) - sm.objective(st),
        )
    }

    /// Classifies every feasible move of a sweep by the sign of its delta.
    fn neighborhood_statistics<R: Rng>(&self, st: &Self::State, rng: &mut R) -> NeighborhoodStats {
        let mut stats = NeighborhoodStats::default();
        let Some(start) = self.first_move(st, rng) else {
            return stats;
        };
        let mut mv = start.clone();
        loop {
            let delta = self.delta_cost_function(st, &mv);
            stats.neighbors += 1;
            if delta < 0.0 {
                stats.improving += 1;
            } else if delta > 0.0 {
                stats.worsening += 1;
            } else {
                stats.sideways += 1;
            }
            mv = self.next_move(st, &mv);
            if self.last_move_done(&start, &mv) {
                break;
            }
        }
        stats
    }

    /// Full cost breakdown of `mv` applied to `st`.
    fn move_report<SM>(&self, sm: &SM, st: &Self::State, mv: &Self::Move) -> MoveReport<Self::Move>
    where
        SM: StateManager<State = Self::State>,
    {
        let mut after = st.clone();
        self.make_move(&mut after, mv);
        MoveReport {
            mv: mv.clone(),
            start_violations: sm.violations(st),
            start_objective: sm.objective(st),
            start_cost: sm.cost_function(st),
            delta_violations: self.delta_violations(st, mv),
            delta_objective: self.delta_objective(st, mv),
            delta_cost: self.delta_cost_function(st, mv),
            final_violations: sm.violations(&after),
            final_objective: sm.objective(&after),
            final_cost: sm.cost_function(&after),
        }
    }
}

/// Incumbent tracking shared by the non-prohibited selections.
struct NonProhibitedSelector<M> {
    best: M,
    best_delta: f64,
    all_prohibited: bool,
}

impl<M: Clone> NonProhibitedSelector<M> {
    fn new(first: M, delta: f64) -> Self {
        Self {
            best: first,
            best_delta: delta,
            all_prohibited: true,
        }
    }

    fn offer(&mut self, mv: &M, delta: f64, prohibited: bool) {
        let better = delta < self.best_delta;
        if (better && !prohibited)
            || (better && self.all_prohibited)
            || (self.all_prohibited && !prohibited)
        {
            self.best = mv.clone();
            self.best_delta = delta;
        }
        if !prohibited {
            self.all_prohibited = false;
        }
    }

    fn finish(self) -> (M, f64) {
        (self.best, self.best_delta)
    }
}
