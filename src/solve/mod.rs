//! Problem definition, solution artifacts and validation for the
//! amplified Sudoku search

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{ProblemAnalysis, SudokuProblem};
pub use solution::Solution;
pub use validator::SolutionValidator;
