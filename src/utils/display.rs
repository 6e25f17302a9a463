//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::puzzle::Grid;
use crate::solve::solution::DistributionEntry;
use crate::solve::Solution;
use anyhow::Result;
use std::path::Path;

/// Width of the probability bars in distribution charts.
const BAR_WIDTH: usize = 40;

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution, show_distribution: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Readout Probability: {:.4}\n", solution.probability));
        output.push_str(&format!(
            "Amplification Gain: {:.0}x over uniform\n",
            solution.metadata.amplification_gain
        ));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Search: {} rounds over {} state bits, {} oracle instructions\n",
            solution.search.rounds, solution.search.state_bits, solution.search.oracle_instructions
        ));
        output.push_str(&format!(
            "Cells: {} given, {} deduced, {} searched\n",
            solution.metadata.given_cells,
            solution.metadata.deduced_cells,
            solution.metadata.searched_cells
        ));

        output.push('\n');
        output.push_str("Puzzle:\n");
        output.push_str(&Self::format_grid_compact(&solution.puzzle));
        output.push('\n');
        output.push_str("Solved:\n");
        output.push_str(&Self::format_grid_compact(&solution.solved));

        if show_distribution && !solution.distribution.is_empty() {
            output.push('\n');
            output.push_str("Readout Distribution:\n");
            output.push_str(&Self::format_distribution(&solution.distribution));
        }

        output
    }

    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        let mut output = String::new();
        for row in 0..grid.size {
            for col in 0..grid.size {
                if col > 0 {
                    output.push(' ');
                }
                let value = grid.get(row, col);
                if value == 0 {
                    output.push('.');
                } else {
                    output.push_str(&value.to_string());
                }
            }
            output.push('\n');
        }
        output
    }

    /// Format a grid with row and column coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("   ");
        for col in 0..grid.size {
            output.push_str(&format!("{:2}", col));
        }
        output.push('\n');

        for row in 0..grid.size {
            output.push_str(&format!("{:2} ", row));
            for col in 0..grid.size {
                let value = grid.get(row, col);
                if value == 0 {
                    output.push_str(" .");
                } else {
                    output.push_str(&format!("{:2}", value));
                }
            }
            output.push('\n');
        }

        output
    }

    /// Format a readout distribution as a bar chart
    pub fn format_distribution(entries: &[DistributionEntry]) -> String {
        let mut output = String::new();
        output.push_str("State | Values       | Probability\n");
        output.push_str("------|--------------|------------\n");

        for entry in entries {
            let bar_length = ((entry.probability * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
            let values = entry
                .values
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(",");
            output.push_str(&format!(
                "{:>5} | {:<12} | {:.6} {}\n",
                entry.state_index,
                values,
                entry.probability,
                "#".repeat(bar_length)
            ));
        }

        output
    }

    /// Save a solution to the output directory in the configured format
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        format: &OutputFormat,
    ) -> Result<()> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        match format {
            OutputFormat::Text => {
                let filepath = output_dir.join(format!("{}.txt", solution.metadata.id));
                let content = Self::format_solution(solution, true);
                std::fs::write(filepath, content)?;
            }
            OutputFormat::Json => {
                let filepath = output_dir.join(format!("{}.json", solution.metadata.id));
                solution.save_to_file(filepath)?;

                let summary_path = output_dir.join(format!("{}_summary.json", solution.metadata.id));
                let summary_json = serde_json::to_string_pretty(&solution.summary())?;
                std::fs::write(summary_path, summary_json)?;
            }
            OutputFormat::Visual => {
                let filepath = output_dir.join(format!("{}_visual.txt", solution.metadata.id));
                let content = Self::create_visual_report(solution);
                std::fs::write(filepath, content)?;
            }
        }

        Ok(())
    }

    /// Create a visual report with coordinate grids and the distribution
    fn create_visual_report(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("Visual Report - Solution {}\n", solution.metadata.id));
        output.push_str(&"=".repeat(50));
        output.push('\n');

        output.push_str("\nPuzzle:\n");
        output.push_str(&Self::format_grid_with_coords(&solution.puzzle));
        output.push_str("\nSolved:\n");
        output.push_str(&Self::format_grid_with_coords(&solution.solved));

        if !solution.distribution.is_empty() {
            output.push_str("\nReadout Distribution:\n");
            output.push_str(&Self::format_distribution(&solution.distribution));
        }

        output.push_str("\nSearch Statistics:\n");
        output.push_str(&format!("Readout Probability: {:.4}\n", solution.probability));
        output.push_str(&format!(
            "Rounds: {} over {} state bits\n",
            solution.search.rounds, solution.search.state_bits
        ));
        output.push_str(&format!(
            "Oracle: {} instructions for {} constraints\n",
            solution.search.oracle_instructions, solution.search.constraint_count
        ));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));

        output
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() &&
        (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
