//! Sudoku problem definition and the amplified-search pipeline

use super::solution::{CellAssignment, DistributionEntry, SearchSummary};
use super::{Solution, SolutionValidator};
use crate::circuit::{ConstraintSet, EncodingMap, OracleCompiler};
use crate::config::Settings;
use crate::grover::{optimal_rounds, success_probability, AmplificationEngine};
use crate::puzzle::{
    load_grid_from_file, CandidateEnumerator, Grid, GroupCandidates, SudokuRules,
};
use crate::simulator::Simulator;
use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::time::Instant;

/// Represents one puzzle to solve by amplitude amplification
pub struct SudokuProblem {
    settings: Settings,
    puzzle: Grid,
    validator: SolutionValidator,
}

impl SudokuProblem {
    /// Create a new problem from settings
    pub fn new(settings: Settings) -> Result<Self> {
        let puzzle = load_grid_from_file(&settings.input.puzzle_file)
            .context("Failed to load puzzle file")?;
        Self::with_puzzle(settings, puzzle)
    }

    /// Create a problem with an explicit puzzle grid (useful for testing)
    pub fn with_puzzle(settings: Settings, puzzle: Grid) -> Result<Self> {
        SudokuRules::check_consistency(&puzzle)
            .context("Puzzle violates its own constraints")?;

        Ok(Self {
            settings,
            puzzle,
            validator: SolutionValidator::new(),
        })
    }

    /// Solve the puzzle and return the completed grid with its readout data
    pub fn solve(&self) -> Result<Solution> {
        let start_time = Instant::now();

        println!(
            "Solving {}x{} Sudoku by amplitude amplification...",
            self.puzzle.size, self.puzzle.size
        );
        println!(
            "Puzzle has {} given cells, {} empty",
            self.puzzle.filled_count(),
            self.puzzle.empty_count()
        );

        let mut working = self.puzzle.clone();
        if self.settings.preprocessing.trivial_fill {
            let filled = CandidateEnumerator::fill_trivial(&mut working)
                .context("Trivial deduction failed")?;
            if filled > 0 {
                println!("Deduced {} forced cells before the search", filled);
            }
        }

        let map = EncodingMap::from_grid(&working)
            .context("Failed to map unknown cells to state bits")?;

        if map.variable_count() == 0 {
            println!("No unknown cells remain; nothing to search");
            let search = SearchSummary {
                state_bits: 0,
                rounds: 0,
                constraint_count: 0,
                oracle_instructions: 0,
            };
            return self.finish(working, Vec::new(), 1.0, Vec::new(), search, start_time);
        }

        let constraints = ConstraintSet::derive(&working, &map);
        println!("{}", map.statistics());
        println!("{}", constraints.statistics());

        let oracle = OracleCompiler::compile(&map, &constraints)
            .context("Oracle compilation failed")?;
        println!("{}", oracle.statistics());

        let engine = match self.settings.solver.rounds {
            Some(rounds) => {
                let optimal = optimal_rounds(map.bit_count());
                if rounds != optimal {
                    warn!(
                        "fixed round count {} differs from the optimal {} for {} bits",
                        rounds,
                        optimal,
                        map.bit_count()
                    );
                }
                AmplificationEngine::with_rounds(map.bit_count(), rounds)
            }
            None => AmplificationEngine::new(map.bit_count()),
        };
        println!(
            "Running {} amplification rounds over {} state bits",
            engine.rounds(),
            map.bit_count()
        );

        let simulator = Simulator::new(self.settings.solver.max_state_bits);
        let run = simulator
            .run_search(&oracle, &engine)
            .context("State-vector simulation failed")?;
        info!("search finished: {}", run.statistics);

        let (winner, probability) = run.state.max_probability_state();
        let values = map
            .decode_state(winner)
            .context("Failed to decode the winning state")?;

        println!(
            "Most probable state |{}> read out with probability {:.4}",
            winner, probability
        );

        let mut solved = working.clone();
        let mut assignments = Vec::with_capacity(values.len());
        for (variable, &value) in values.iter().enumerate() {
            let (row, col) = map.cells()[variable];
            solved.set(row, col, value)?;
            assignments.push(CellAssignment { row, col, value });
        }

        // states whose bit pattern maps outside 1..=symbol_count carry no
        // assignment and are left out of the recorded distribution
        let distribution: Vec<DistributionEntry> = run
            .state
            .top_states(self.settings.solver.distribution_size)
            .into_iter()
            .filter_map(|(state_index, state_probability)| {
                map.decode_state(state_index).ok().map(|values| DistributionEntry {
                    state_index,
                    values,
                    probability: state_probability,
                })
            })
            .collect();

        let search = SearchSummary {
            state_bits: map.bit_count(),
            rounds: engine.rounds(),
            constraint_count: constraints.len(),
            oracle_instructions: oracle.tape.len(),
        };

        self.finish(solved, assignments, probability, distribution, search, start_time)
    }

    fn finish(
        &self,
        solved: Grid,
        assignments: Vec<CellAssignment>,
        probability: f64,
        distribution: Vec<DistributionEntry>,
        search: SearchSummary,
        start_time: Instant,
    ) -> Result<Solution> {
        let validation = self.validator.validate(&self.puzzle, &solved)?;
        if !validation.is_valid {
            bail!(
                "Search produced an invalid completion: {}",
                validation
                    .error_message
                    .unwrap_or_else(|| "unknown violation".to_string())
            );
        }

        let solve_time = start_time.elapsed();
        println!("Solved in {:.3}s", solve_time.as_secs_f64());

        Ok(Solution::new(
            self.puzzle.clone(),
            solved,
            assignments,
            probability,
            distribution,
            search,
            solve_time,
        ))
    }

    /// Get the puzzle grid
    pub fn puzzle(&self) -> &Grid {
        &self.puzzle
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Size up the search without running it
    pub fn analyze(&self) -> Result<ProblemAnalysis> {
        let mut working = self.puzzle.clone();
        let trivial_fills = if self.settings.preprocessing.trivial_fill {
            CandidateEnumerator::fill_trivial(&mut working)?
        } else {
            0
        };

        let candidates = CandidateEnumerator::enumerate_all(&working);
        let map = EncodingMap::from_grid(&working)?;
        let constraints = ConstraintSet::derive(&working, &map);
        let oracle = OracleCompiler::compile(&map, &constraints)?;

        let rounds = self
            .settings
            .solver
            .rounds
            .unwrap_or_else(|| optimal_rounds(map.bit_count()));

        let state_vector_bytes =
            (1usize << map.bit_count()) * std::mem::size_of::<num_complex::Complex64>();

        Ok(ProblemAnalysis {
            grid_size: self.puzzle.size,
            given_cells: self.puzzle.filled_count(),
            trivial_fills,
            variable_count: map.variable_count(),
            state_bits: map.bit_count(),
            candidates,
            constraint_count: constraints.len(),
            oracle_instructions: oracle.tape.len(),
            oracle_register_bits: oracle.layout.total_bits(),
            rounds,
            predicted_success: success_probability(map.bit_count(), rounds),
            state_vector_bytes,
            fits_capacity: map.bit_count() <= self.settings.solver.max_state_bits,
        })
    }
}

/// Dimensions of a search, computed without simulating it
#[derive(Debug, Clone)]
pub struct ProblemAnalysis {
    pub grid_size: usize,
    pub given_cells: usize,
    pub trivial_fills: usize,
    pub variable_count: usize,
    pub state_bits: usize,
    /// Candidate fillings for every group of the post-deduction grid
    pub candidates: Vec<GroupCandidates>,
    pub constraint_count: usize,
    pub oracle_instructions: usize,
    pub oracle_register_bits: usize,
    pub rounds: usize,
    /// Readout probability predicted for a unique satisfying assignment
    pub predicted_success: f64,
    pub state_vector_bytes: usize,
    pub fits_capacity: bool,
}

impl std::fmt::Display for ProblemAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Analysis:")?;
        writeln!(
            f,
            "  Grid: {}x{} with {} givens",
            self.grid_size, self.grid_size, self.given_cells
        )?;
        writeln!(f, "  Trivial deductions: {}", self.trivial_fills)?;
        writeln!(
            f,
            "  Unknown cells: {} ({} state bits)",
            self.variable_count, self.state_bits
        )?;
        let open_groups: Vec<&GroupCandidates> = self
            .candidates
            .iter()
            .filter(|candidates| !candidates.positions.is_empty())
            .collect();
        if !open_groups.is_empty() {
            writeln!(f, "  Open groups (candidate fillings):")?;
            for candidates in open_groups {
                writeln!(
                    f,
                    "    {} {}: {}",
                    candidates.kind,
                    candidates.group,
                    candidates.count()
                )?;
            }
        }
        writeln!(f, "  Constraints: {}", self.constraint_count)?;
        writeln!(
            f,
            "  Oracle: {} instructions over {} register bits",
            self.oracle_instructions, self.oracle_register_bits
        )?;
        writeln!(f, "  Amplification rounds: {}", self.rounds)?;
        writeln!(
            f,
            "  Predicted success (unique solution): {:.2}%",
            self.predicted_success * 100.0
        )?;
        writeln!(
            f,
            "  State vector: {}",
            format_state_size(self.state_vector_bytes)
        )?;
        writeln!(
            f,
            "  Fits capacity: {}",
            if self.fits_capacity { "yes" } else { "no" }
        )?;
        Ok(())
    }
}

fn format_state_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}
