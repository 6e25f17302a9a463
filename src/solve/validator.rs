//! Classical validation of completed grids against their puzzles

use super::Solution;
use crate::puzzle::{Grid, GroupKind, SudokuRules};
use anyhow::Result;

/// Validates completed grids independently of the search that produced them
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
    pub details: ValidationDetails,
}

/// Detailed validation information
#[derive(Debug, Clone, Default)]
pub struct ValidationDetails {
    pub givens_preserved: bool,
    pub all_cells_filled: bool,
    pub given_mismatches: Vec<(usize, usize)>,
    pub violations: Vec<RuleViolation>,
    pub metrics: ValidationMetrics,
}

/// A duplicated value found in one row, column or block
#[derive(Debug, Clone)]
pub struct RuleViolation {
    pub kind: GroupKind,
    pub group: usize,
    pub value: u8,
    pub positions: Vec<(usize, usize)>,
    pub description: String,
}

/// Performance metrics for validation
#[derive(Debug, Clone, Default)]
pub struct ValidationMetrics {
    pub validation_time_ms: u64,
    pub groups_validated: usize,
    pub cells_checked: usize,
}

impl SolutionValidator {
    /// Create a new solution validator
    pub fn new() -> Self {
        Self
    }

    /// Validate that a candidate grid completes the puzzle
    pub fn validate(&self, puzzle: &Grid, candidate: &Grid) -> Result<ValidationResult> {
        let start_time = std::time::Instant::now();

        if puzzle.size != candidate.size {
            return Ok(ValidationResult {
                is_valid: false,
                error_message: Some(format!(
                    "Grid dimension mismatch: puzzle {}x{}, candidate {}x{}",
                    puzzle.size, puzzle.size, candidate.size, candidate.size
                )),
                details: ValidationDetails::default(),
            });
        }

        // every given must survive into the candidate
        let mut given_mismatches = Vec::new();
        for row in 0..puzzle.size {
            for col in 0..puzzle.size {
                let given = puzzle.get(row, col);
                if given != 0 && candidate.get(row, col) != given {
                    given_mismatches.push((row, col));
                }
            }
        }
        let givens_preserved = given_mismatches.is_empty();

        let all_cells_filled = candidate.is_complete();

        let mut violations = Vec::new();
        for kind in GroupKind::ALL {
            for group in 0..candidate.size {
                let values = candidate.group_values(kind, group);
                if let Some(value) = SudokuRules::find_duplicate(&values) {
                    let positions: Vec<(usize, usize)> = candidate
                        .group_positions(kind, group)
                        .into_iter()
                        .filter(|&(row, col)| candidate.get(row, col) == value)
                        .collect();
                    violations.push(RuleViolation {
                        kind,
                        group,
                        value,
                        positions,
                        description: format!("{} {} contains {} more than once", kind, group, value),
                    });
                }
            }
        }

        let is_valid = givens_preserved && all_cells_filled && violations.is_empty();
        let validation_time = start_time.elapsed();

        let details = ValidationDetails {
            givens_preserved,
            all_cells_filled,
            given_mismatches,
            violations,
            metrics: ValidationMetrics {
                validation_time_ms: validation_time.as_millis() as u64,
                groups_validated: 3 * candidate.size,
                cells_checked: candidate.size * candidate.size,
            },
        };

        let error_message = if !is_valid {
            Some(self.generate_error_message(&details))
        } else {
            None
        };

        Ok(ValidationResult {
            is_valid,
            error_message,
            details,
        })
    }

    /// Validate a saved solution artifact against its own puzzle
    pub fn validate_artifact(&self, solution: &Solution) -> Result<ValidationResult> {
        let mut result = self.validate(&solution.puzzle, &solution.solved)?;

        // the recorded assignments must agree with the completed grid
        for assignment in &solution.assignments {
            if solution.solved.get(assignment.row, assignment.col) != assignment.value {
                result.is_valid = false;
                let message = format!(
                    "Recorded assignment ({}, {}) = {} disagrees with the completed grid. ",
                    assignment.row, assignment.col, assignment.value
                );
                match result.error_message {
                    Some(ref mut existing) => existing.push_str(&message),
                    None => result.error_message = Some(message),
                }
            }
        }

        Ok(result)
    }

    /// Generate a descriptive error message from validation details
    fn generate_error_message(&self, details: &ValidationDetails) -> String {
        let mut message = String::new();

        if !details.givens_preserved {
            message.push_str(&format!(
                "{} given cells were overwritten. ",
                details.given_mismatches.len()
            ));
        }

        if !details.all_cells_filled {
            message.push_str("Candidate grid still has empty cells. ");
        }

        if !details.violations.is_empty() {
            message.push_str(&format!(
                "Found {} rule violations. ",
                details.violations.len()
            ));

            for (i, violation) in details.violations.iter().take(3).enumerate() {
                if i == 0 {
                    message.push_str("Examples: ");
                }
                message.push_str(&format!("{}; ", violation.description));
            }

            if details.violations.len() > 3 {
                message.push_str(&format!("... and {} more", details.violations.len() - 3));
            }
        }

        message
    }
}

impl Default for SolutionValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Givens preserved: {}", self.details.givens_preserved)?;
        writeln!(f, "All cells filled: {}", self.details.all_cells_filled)?;
        writeln!(f, "Rule violations: {}", self.details.violations.len())?;
        writeln!(f, "Validation time: {}ms", self.details.metrics.validation_time_ms)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle() -> Grid {
        Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 0, 0, 4],
            vec![4, 0, 0, 3],
        ])
        .unwrap()
    }

    fn solved() -> Grid {
        Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 3, 2, 4],
            vec![4, 2, 1, 3],
        ])
        .unwrap()
    }

    #[test]
    fn test_valid_completion() {
        let validator = SolutionValidator::new();
        let result = validator.validate(&puzzle(), &solved()).unwrap();

        assert!(result.is_valid);
        assert!(result.error_message.is_none());
        assert!(result.details.violations.is_empty());
        assert_eq!(result.details.metrics.groups_validated, 12);
    }

    #[test]
    fn test_overwritten_given_is_rejected() {
        let mut candidate = solved();
        candidate.set(0, 0, 1).unwrap();
        candidate.set(0, 1, 3).unwrap();

        let validator = SolutionValidator::new();
        let result = validator.validate(&puzzle(), &candidate).unwrap();

        assert!(!result.is_valid);
        assert!(result.details.given_mismatches.contains(&(0, 0)));
        assert!(result.error_message.unwrap().contains("given cells were overwritten"));
    }

    #[test]
    fn test_duplicate_in_group_is_reported() {
        let mut candidate = solved();
        // (2, 1) and (3, 1) both 3: column 1 and block 2 now repeat
        candidate.set(3, 1, 3).unwrap();

        let validator = SolutionValidator::new();
        let result = validator.validate(&puzzle(), &candidate).unwrap();

        assert!(!result.is_valid);
        let column_violation = result
            .details
            .violations
            .iter()
            .find(|violation| violation.kind == GroupKind::Column && violation.group == 1)
            .unwrap();
        assert_eq!(column_violation.value, 3);
        assert_eq!(column_violation.positions.len(), 2);
    }

    #[test]
    fn test_incomplete_grid_is_rejected() {
        let validator = SolutionValidator::new();
        let result = validator.validate(&puzzle(), &puzzle()).unwrap();

        assert!(!result.is_valid);
        assert!(!result.details.all_cells_filled);
    }

    #[test]
    fn test_dimension_mismatch() {
        let small = Grid::empty(1).unwrap();
        let validator = SolutionValidator::new();
        let result = validator.validate(&puzzle(), &small).unwrap();

        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().contains("dimension mismatch"));
    }
}
