//! Domain-agnostic local search framework.
//!
//! A problem plugs in through two traits:
//!
//! - [`StateManager`](state::StateManager): builds random states and
//!   evaluates hard violations and the soft objective.
//! - [`NeighborhoodExplorer`](neighborhood::NeighborhoodExplorer):
//!   enumerates, samples and applies moves, and evaluates their cost
//!   change incrementally.
//!
//! On top of these the crate provides:
//!
//! - **Runners**: Hill Climbing ([`hc`]), Steepest Descent ([`sd`]), Tabu
//!   Search ([`tabu`]) and Simulated Annealing ([`sa`]), all built on one
//!   generic loop in [`runner`].
//! - **Solvers** ([`solver`]): a single runner, a comparison of runners
//!   from a common start, and the token ring, which alternates runners
//!   over different neighborhoods of the same state.
//! - **Batch driver** ([`driver`]): named runners, runtime parameters and
//!   repeated trials with a result log.
//! - **Course timetabling** ([`timetabling`]): a complete instantiation
//!   with time and room neighborhoods.
//!
//! Cost is `HARD_WEIGHT * violations + objective`; see [`cost`].
//! Randomness is explicit: every operation that draws numbers takes a
//! [`SearchRng`](random::SearchRng).

pub mod cost;
pub mod driver;
pub mod error;
pub mod hc;
pub mod neighborhood;
pub mod output;
pub mod params;
pub mod random;
pub mod runner;
pub mod sa;
pub mod sd;
pub mod solver;
pub mod state;
pub mod tabu;
pub mod timetabling;
