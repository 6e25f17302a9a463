//! Amplitude Amplification Sudoku Solver
//!
//! This library solves small Sudoku grids by compiling their group
//! constraints into a reversible phase oracle and amplifying the satisfying
//! assignment with Grover-style rounds on a dense state-vector simulator.

pub mod circuit;
pub mod config;
pub mod error;
pub mod grover;
pub mod puzzle;
pub mod simulator;
pub mod solve;
pub mod utils;

pub use config::Settings;
pub use error::SolverError;
pub use solve::{Solution, SudokuProblem};

use anyhow::Result;

/// Main entry point for solving a configured puzzle
pub fn solve_puzzle(settings: Settings) -> Result<Solution> {
    let problem = SudokuProblem::new(settings)?;
    problem.solve()
}
