//! Hill Climbing (HC).
//!
//! Draws one random move per iteration and performs it if it does not
//! worsen the cost. Sideways moves are accepted, which lets the search
//! drift across plateaus. The run stops after a number of iterations
//! without a strict improvement; the final state is a local minimum with
//! respect to the sampled moves and becomes the run's best state.

mod config;
mod runner;

pub use config::HillClimbingConfig;
pub use runner::{HillClimbing, HillClimbingPolicy};
