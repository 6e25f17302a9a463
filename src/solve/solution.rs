//! Solution representation for amplified Sudoku searches

use crate::puzzle::Grid;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Represents a solved puzzle together with the search that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// The puzzle as given, before any deduction or search
    pub puzzle: Grid,
    /// The completed grid
    pub solved: Grid,
    /// Values the search assigned, in variable order
    pub assignments: Vec<CellAssignment>,
    /// Readout probability of the winning state
    pub probability: f64,
    /// The most probable states after amplification
    pub distribution: Vec<DistributionEntry>,
    /// Search dimensions and circuit sizes
    pub search: SearchSummary,
    /// Time taken to solve
    #[serde(skip)]
    pub solve_time: Duration,
    /// Metadata about the solution
    pub metadata: SolutionMetadata,
}

/// One value placed by the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellAssignment {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

/// One basis state from the final readout distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub state_index: usize,
    pub values: Vec<u8>,
    pub probability: f64,
}

/// Dimensions of the search that produced the solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSummary {
    pub state_bits: usize,
    pub rounds: usize,
    pub constraint_count: usize,
    pub oracle_instructions: usize,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Unique identifier derived from the completed grid
    pub id: String,
    /// Cells given by the puzzle
    pub given_cells: usize,
    /// Cells placed by trivial deduction before the search
    pub deduced_cells: usize,
    /// Cells placed by the amplified search
    pub searched_cells: usize,
    /// Probability a uniform readout would have assigned the winner
    pub uniform_probability: f64,
    /// Winning probability relative to the uniform prior
    pub amplification_gain: f64,
}

impl Solution {
    /// Create a new solution
    pub fn new(
        puzzle: Grid,
        solved: Grid,
        assignments: Vec<CellAssignment>,
        probability: f64,
        distribution: Vec<DistributionEntry>,
        search: SearchSummary,
        solve_time: Duration,
    ) -> Self {
        let metadata = SolutionMetadata::analyze(&puzzle, &solved, &assignments, probability, &search);

        Self {
            puzzle,
            solved,
            assignments,
            probability,
            distribution,
            search,
            solve_time,
            metadata,
        }
    }

    /// Get the puzzle as given
    pub fn puzzle(&self) -> &Grid {
        &self.puzzle
    }

    /// Get the completed grid
    pub fn solved_grid(&self) -> &Grid {
        &self.solved
    }

    /// Get the value the search placed at a cell, if it placed one
    pub fn assignment_at(&self, row: usize, col: usize) -> Option<u8> {
        self.assignments
            .iter()
            .find(|assignment| assignment.row == row && assignment.col == col)
            .map(|assignment| assignment.value)
    }

    /// Check if this solution is equivalent to another (same completed grid)
    pub fn is_equivalent_to(&self, other: &Solution) -> bool {
        self.solved == other.solved
    }

    /// Get a summary of the solution
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            given_cells: self.metadata.given_cells,
            searched_cells: self.metadata.searched_cells,
            rounds: self.search.rounds,
            probability: self.probability,
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Get a textual report of the puzzle, the completed grid and the
    /// readout distribution
    pub fn format_report(&self) -> String {
        let mut result = String::new();

        result.push_str(&format!(
            "Solution {} - {} rounds over {} bits\n",
            self.metadata.id, self.search.rounds, self.search.state_bits
        ));
        result.push_str(&format!(
            "Readout probability: {:.4} ({:.0}x over uniform), Solve time: {:.3}s\n\n",
            self.probability,
            self.metadata.amplification_gain,
            self.solve_time.as_secs_f64()
        ));

        result.push_str("Puzzle:\n");
        result.push_str(&self.puzzle.to_string());
        result.push_str("\nSolved:\n");
        result.push_str(&self.solved.to_string());

        if !self.assignments.is_empty() {
            result.push_str("\nSearched cells:\n");
            for assignment in &self.assignments {
                result.push_str(&format!(
                    "  ({}, {}) = {}\n",
                    assignment.row, assignment.col, assignment.value
                ));
            }
        }

        if !self.distribution.is_empty() {
            result.push_str("\nTop states:\n");
            for entry in &self.distribution {
                result.push_str(&format!(
                    "  |{:>3}>  {:?}  p={:.6}\n",
                    entry.state_index, entry.values, entry.probability
                ));
            }
        }

        result
    }
}

impl SolutionMetadata {
    /// Analyze a solution and create metadata
    pub fn analyze(
        puzzle: &Grid,
        solved: &Grid,
        assignments: &[CellAssignment],
        probability: f64,
        search: &SearchSummary,
    ) -> Self {
        let id = Self::generate_id(solved);
        let given_cells = puzzle.filled_count();
        let searched_cells = assignments.len();
        let deduced_cells = puzzle.empty_count().saturating_sub(searched_cells);

        let uniform_probability = if search.state_bits == 0 {
            1.0
        } else {
            1.0 / (1usize << search.state_bits) as f64
        };
        let amplification_gain = probability / uniform_probability;

        Self {
            id,
            given_cells,
            deduced_cells,
            searched_cells,
            uniform_probability,
            amplification_gain,
        }
    }

    /// Generate a unique ID for the solution based on the completed grid
    fn generate_id(solved: &Grid) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        solved.cells.hash(&mut hasher);
        solved.size.hash(&mut hasher);

        format!("sol_{:x}", hasher.finish())
    }
}

/// Summary of a solution for display purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub given_cells: usize,
    pub searched_cells: usize,
    pub rounds: usize,
    pub probability: f64,
    pub solve_time_ms: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: {} givens, {} searched, {} rounds, p={:.4}, {}ms",
            self.id,
            self.given_cells,
            self.searched_cells,
            self.rounds,
            self.probability,
            self.solve_time_ms
        )
    }
}
