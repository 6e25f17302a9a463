//! Demonstration of the full solve pipeline on a hand-checkable puzzle
//!
//! Walks a 4x4 grid through trivial deduction, oracle compilation and
//! amplitude amplification, then prints the completed grid with its
//! readout distribution.

use std::path::PathBuf;
use sudoku_grover::config::{
    InputConfig, OutputConfig, OutputFormat, PreprocessingConfig, Settings, SolverConfig,
};
use sudoku_grover::puzzle::Grid;
use sudoku_grover::solve::SudokuProblem;
use sudoku_grover::utils::SolutionFormatter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Amplitude Amplification Solve Demonstration ===\n");

    let puzzle = Grid::from_rows(vec![
        vec![3, 1, 4, 2],
        vec![2, 0, 0, 1],
        vec![1, 0, 0, 0],
        vec![4, 0, 0, 3],
    ])?;

    println!("Puzzle:");
    println!("{}", SolutionFormatter::format_grid_with_coords(&puzzle));

    let settings = Settings {
        solver: SolverConfig {
            max_state_bits: 24,
            rounds: None,
            distribution_size: 6,
        },
        preprocessing: PreprocessingConfig { trivial_fill: true },
        input: InputConfig {
            puzzle_file: PathBuf::from("unused.txt"),
        },
        output: OutputConfig {
            format: OutputFormat::Text,
            save_distribution: false,
            output_directory: PathBuf::from("output"),
        },
    };

    let problem = SudokuProblem::with_puzzle(settings, puzzle)?;
    let analysis = problem.analyze()?;
    println!("{}", analysis);

    let solution = problem.solve()?;
    println!("\n{}", SolutionFormatter::format_solution(&solution, true));

    Ok(())
}
