//! Seedable random number generation.
//!
//! Every operation that needs randomness takes an explicit generator. A
//! fixed seed makes a whole search reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator type threaded through runners and solvers.
pub type SearchRng = StdRng;

/// Creates a generator from a seed.
pub fn create_rng(seed: u64) -> SearchRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform integer in `[low, high]`, both ends included.
///
/// # Panics
///
/// Panics if `low > high`.
pub fn random_between<R: Rng>(rng: &mut R, low: usize, high: usize) -> usize {
    rng.random_range(low..=high)
}
