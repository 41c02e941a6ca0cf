//! Output managers.
//!
//! An [`OutputManager`] converts between the search state and the
//! persisted form of a solution. Reading a persisted solution must reject
//! infeasible ones; installing a solution into a state rebuilds its
//! redundant data.

use std::io::{BufRead, Write};

/// Conversion between search states and persisted solutions.
pub trait OutputManager {
    /// The search state.
    type State;

    /// The persisted solution.
    type Output;

    /// Error raised when a solution cannot be read or installed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Extracts the solution held by `st`.
    fn output_state(&self, st: &Self::State) -> Self::Output;

    /// Installs `out` into `st`, rebuilding every cached field.
    ///
    /// # Errors
    ///
    /// Fails if `out` does not fit the instance.
    fn input_state(&self, st: &mut Self::State, out: &Self::Output) -> Result<(), Self::Error>;

    /// Writes `out` in the persisted format.
    fn write_output<W: Write>(&self, out: &Self::Output, w: &mut W) -> Result<(), Self::Error>;

    /// Parses a solution written by [`write_output`](Self::write_output).
    ///
    /// # Errors
    ///
    /// Fails on malformed input and on infeasible solutions.
    fn read_output<R: BufRead>(&self, r: R) -> Result<Self::Output, Self::Error>;
}
