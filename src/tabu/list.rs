//! Tabu list with randomized tenure.

use std::collections::VecDeque;
use std::fmt;

use rand::Rng;

use crate::random::random_between;

/// Relation between a candidate move and a move already in the tabu list.
///
/// `candidate.is_inverse_of(&listed)` returns `true` when performing
/// `candidate` would (partially) undo `listed`, which makes it prohibited.
pub trait InverseMove {
    fn is_inverse_of(&self, listed: &Self) -> bool;
}

/// Decides whether a move may be performed.
pub trait ProhibitionManager<M> {
    /// `mv_cost` is the move's delta cost, `current_cost` the cost of the
    /// state it applies to and `best_cost` the best cost seen in the run.
    fn prohibited_move(&self, mv: &M, mv_cost: f64, current_cost: f64, best_cost: f64) -> bool;
}

/// A move with the iteration at which it leaves the list.
#[derive(Debug, Clone, PartialEq)]
pub struct TabuEntry<M> {
    pub mv: M,
    pub out_iteration: u64,
}

/// Short-term memory of recently performed moves.
///
/// Every inserted move stays for a tenure drawn uniformly from
/// `[min_tenure, max_tenure]`. A candidate is prohibited when it is the
/// inverse of a listed move, unless it satisfies the aspiration criterion:
/// it would lead to a state strictly better than the best found so far.
///
/// # Examples
///
/// ```
/// use u_localsearch::random::create_rng;
/// use u_localsearch::tabu::{InverseMove, ProhibitionManager, TabuListManager};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Flip(usize);
///
/// impl InverseMove for Flip {
///     fn is_inverse_of(&self, listed: &Flip) -> bool { self.0 == listed.0 }
/// }
///
/// let mut rng = create_rng(42);
/// let mut tabu = TabuListManager::new(3, 3);
/// tabu.insert_move(Flip(4), 1.0, 10.0, 8.0, &mut rng);
/// assert!(tabu.prohibited_move(&Flip(4), 1.0, 11.0, 8.0));
/// // Aspiration: 11 - 4 = 7 beats the best cost 8.
/// assert!(!tabu.prohibited_move(&Flip(4), -4.0, 11.0, 8.0));
/// assert!(!tabu.prohibited_move(&Flip(5), 1.0, 11.0, 8.0));
/// ```
#[derive(Debug, Clone)]
pub struct TabuListManager<M> {
    min_tenure: usize,
    max_tenure: usize,
    iteration: u64,
    entries: VecDeque<TabuEntry<M>>,
}

impl<M> TabuListManager<M> {
    pub fn new(min_tenure: usize, max_tenure: usize) -> Self {
        Self {
            min_tenure,
            max_tenure,
            iteration: 0,
            entries: VecDeque::new(),
        }
    }

    pub fn set_length(&mut self, min_tenure: usize, max_tenure: usize) {
        self.min_tenure = min_tenure;
        self.max_tenure = max_tenure;
    }

    pub fn min_tenure(&self) -> usize {
        self.min_tenure
    }

    pub fn max_tenure(&self) -> usize {
        self.max_tenure
    }

    /// Number of insertions performed so far. Not reset by [`clean`](Self::clean).
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Listed moves, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &TabuEntry<M>> {
        self.entries.iter()
    }

    /// Empties the list.
    pub fn clean(&mut self) {
        self.entries.clear();
    }

    /// Lists `mv` with a random tenure and expires entries whose tenure
    /// has elapsed.
    ///
    /// The cost arguments feed the aspiration criterion; the default
    /// criterion is stateless and ignores them.
    pub fn insert_move<R: Rng>(
        &mut self,
        mv: M,
        _mv_cost: f64,
        _current_cost: f64,
        _best_cost: f64,
        rng: &mut R,
    ) {
        let tenure = random_between(rng, self.min_tenure, self.max_tenure) as u64;
        self.entries.push_front(TabuEntry {
            mv,
            out_iteration: self.iteration + tenure,
        });
        let now = self.iteration;
        self.entries.retain(|e| e.out_iteration != now);
        self.iteration += 1;
    }

    /// `current_cost + mv_cost < best_cost`.
    pub fn aspiration(&self, _mv: &M, mv_cost: f64, current_cost: f64, best_cost: f64) -> bool {
        current_cost + mv_cost < best_cost
    }
}

impl<M: InverseMove> TabuListManager<M> {
    /// Returns `true` if `mv` is the inverse of some listed move.
    pub fn list_member(&self, mv: &M) -> bool {
        self.entries.iter().any(|e| mv.is_inverse_of(&e.mv))
    }
}

impl<M: InverseMove> ProhibitionManager<M> for TabuListManager<M> {
    fn prohibited_move(&self, mv: &M, mv_cost: f64, current_cost: f64, best_cost: f64) -> bool {
        self.list_member(mv) && !self.aspiration(mv, mv_cost, current_cost, best_cost)
    }
}

impl<M: fmt::Display> fmt::Display for TabuListManager<M> {
    /// One line per entry with its remaining tenure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            writeln!(
                f,
                "{} ({})",
                e.mv,
                e.out_iteration.saturating_sub(self.iteration)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Swap(usize, usize);

    impl InverseMove for Swap {
        fn is_inverse_of(&self, listed: &Swap) -> bool {
            (self.0 == listed.0 && self.1 == listed.1) || (self.0 == listed.1 && self.1 == listed.0)
        }
    }

    impl fmt::Display for Swap {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}<->{}", self.0, self.1)
        }
    }

    #[test]
    fn test_fixed_tenure_expires() {
        let mut rng = create_rng(0);
        let mut tabu = TabuListManager::new(2, 2);
        tabu.insert_move(Swap(1, 2), 0.0, 5.0, 5.0, &mut rng); // iteration 0, out at 2
        assert!(tabu.list_member(&Swap(2, 1)));
        tabu.insert_move(Swap(3, 4), 0.0, 5.0, 5.0, &mut rng); // iteration 1, out at 3
        assert!(tabu.list_member(&Swap(1, 2)));
        tabu.insert_move(Swap(5, 6), 0.0, 5.0, 5.0, &mut rng); // iteration 2 expires Swap(1, 2)
        assert!(!tabu.list_member(&Swap(1, 2)));
        assert!(tabu.list_member(&Swap(3, 4)));
        assert_eq!(tabu.len(), 2);
        assert_eq!(tabu.iteration(), 3);
    }

    #[test]
    fn test_tenure_within_bounds() {
        let mut rng = create_rng(17);
        let mut tabu = TabuListManager::new(3, 6);
        for i in 0..200 {
            tabu.insert_move(Swap(i, i + 1), 0.0, 0.0, 0.0, &mut rng);
            let newest = tabu.entries().next().unwrap();
            let tenure = newest.out_iteration - (tabu.iteration() - 1);
            assert!((3..=6).contains(&tenure), "tenure {tenure} out of bounds");
            // Nothing outlives the maximum tenure.
            assert!(tabu.len() <= 6);
        }
    }

    #[test]
    fn test_aspiration_overrides() {
        let mut rng = create_rng(1);
        let mut tabu = TabuListManager::new(5, 5);
        tabu.insert_move(Swap(0, 1), 2.0, 12.0, 10.0, &mut rng);
        assert!(tabu.prohibited_move(&Swap(1, 0), 0.0, 12.0, 10.0));
        assert!(!tabu.prohibited_move(&Swap(1, 0), -3.0, 12.0, 10.0));
        // Equal to best is not an aspiration.
        assert!(tabu.prohibited_move(&Swap(1, 0), -2.0, 12.0, 10.0));
    }

    #[test]
    fn test_clean_keeps_iteration() {
        let mut rng = create_rng(1);
        let mut tabu = TabuListManager::new(4, 4);
        tabu.insert_move(Swap(0, 1), 0.0, 0.0, 0.0, &mut rng);
        tabu.insert_move(Swap(1, 2), 0.0, 0.0, 0.0, &mut rng);
        tabu.clean();
        assert!(tabu.is_empty());
        assert_eq!(tabu.iteration(), 2);
        assert!(!tabu.list_member(&Swap(0, 1)));
    }

    #[test]
    fn test_display_remaining_tenure() {
        let mut rng = create_rng(1);
        let mut tabu = TabuListManager::new(3, 3);
        tabu.insert_move(Swap(0, 1), 0.0, 0.0, 0.0, &mut rng);
        assert_eq!(tabu.to_string(), "0<->1 (2)\n");
    }
}
