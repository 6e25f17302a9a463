//! Round-by-round view of amplitude amplification
//!
//! Compiles the oracle for a 4-unknown puzzle and runs the search with
//! every round count from zero up to past the optimum, printing how much
//! probability each schedule leaves on the solution state. The curve rises
//! to near certainty at the optimal count and falls again beyond it.

use sudoku_grover::circuit::{ConstraintSet, EncodingMap, OracleCompiler};
use sudoku_grover::grover::{optimal_rounds, success_probability, AmplificationEngine};
use sudoku_grover::puzzle::Grid;
use sudoku_grover::simulator::Simulator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Amplification Schedule Demonstration ===\n");

    let grid = Grid::from_rows(vec![
        vec![3, 1, 4, 2],
        vec![2, 4, 3, 1],
        vec![1, 0, 0, 4],
        vec![4, 0, 0, 3],
    ])?;

    let map = EncodingMap::from_grid(&grid)?;
    let constraints = ConstraintSet::derive(&grid, &map);
    let oracle = OracleCompiler::compile(&map, &constraints)?;
    let solution_index = map.state_index(&[3, 2, 2, 1])?;

    println!("Search space: {} states over {} bits", 1usize << map.bit_count(), map.bit_count());
    println!("Optimal rounds: {}\n", optimal_rounds(map.bit_count()));

    println!("Rounds | Measured | Predicted");
    println!("-------|----------|----------");

    let simulator = Simulator::new(24);
    let optimum = optimal_rounds(map.bit_count());
    for rounds in 0..=optimum + 4 {
        let engine = AmplificationEngine::with_rounds(map.bit_count(), rounds);
        let run = simulator.run_search(&oracle, &engine)?;

        let measured = run.state.probability(solution_index);
        let predicted = success_probability(map.bit_count(), rounds);
        let bar = "#".repeat((measured * 50.0).round() as usize);
        println!("{:>6} | {:>8.4} | {:>8.4}  {}", rounds, measured, predicted, bar);
    }

    Ok(())
}
