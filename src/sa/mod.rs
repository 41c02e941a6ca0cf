//! Simulated Annealing (SA).
//!
//! Draws one random move per iteration. Non-worsening moves are always
//! performed; a move of delta `d > 0` is performed with probability
//! `exp(-d / T)`. The temperature `T` starts at
//! `start_temperature` and is multiplied by `cooling_rate` every
//! `neighbors_sampled` iterations. The run ends when `T` falls below
//! `min_temperature`, and its final state becomes the best state.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod config;
mod runner;

pub use config::SimulatedAnnealingConfig;
pub use runner::{SimulatedAnnealing, SimulatedAnnealingPolicy};
