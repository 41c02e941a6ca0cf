//! Steepest Descent (SD).
//!
//! Scans the whole neighborhood at every iteration and performs the best
//! move if it strictly improves the cost. Stops at the first state with no
//! improving move, which is a true local minimum of the neighborhood.

mod runner;

pub use runner::{SteepestDescent, SteepestDescentPolicy};
