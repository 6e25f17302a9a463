//! Puzzle domain: grid geometry, Sudoku rules, classical pre-processing,
//! and grid file I/O

pub mod candidates;
pub mod grid;
pub mod io;
pub mod rules;

pub use candidates::{CandidateEnumerator, GroupCandidates};
pub use grid::{Grid, GroupKind};
pub use io::{create_example_puzzles, load_grid_from_file, parse_grid_from_string, save_grid_to_file};
pub use rules::SudokuRules;
