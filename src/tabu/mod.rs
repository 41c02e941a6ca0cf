//! Tabu Search (TS).
//!
//! A single-solution trajectory metaheuristic that uses memory structures
//! (the tabu list) to forbid undoing recently performed moves, preventing
//! cycling and encouraging exploration of new regions of the search space.
//!
//! Moves are matched against the list through [`InverseMove`]: each move
//! type defines which candidates would undo a listed move.
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod list;
mod runner;

pub use config::TabuSearchConfig;
pub use list::{InverseMove, ProhibitionManager, TabuEntry, TabuListManager};
pub use runner::{TabuSearch, TabuSearchPolicy};
