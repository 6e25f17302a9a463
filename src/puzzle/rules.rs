//! Sudoku group law: every row, column, and block holds each value once

use super::{Grid, GroupKind};
use crate::error::SolverError;

/// Rule predicates shared by deduction, constraint derivation, and validation.
pub struct SudokuRules;

impl SudokuRules {
    /// Values of `1..=symbol_count` absent from the group, ascending.
    pub fn missing_values(values: &[u8], symbol_count: usize) -> Vec<u8> {
        let mut present = vec![false; symbol_count + 1];
        for &value in values {
            if value != 0 && (value as usize) <= symbol_count {
                present[value as usize] = true;
            }
        }
        (1..=symbol_count as u8)
            .filter(|&v| !present[v as usize])
            .collect()
    }

    /// First value appearing more than once among the filled cells, if any.
    pub fn find_duplicate(values: &[u8]) -> Option<u8> {
        let mut seen = [false; 256];
        for &value in values {
            if value == 0 {
                continue;
            }
            if seen[value as usize] {
                return Some(value);
            }
            seen[value as usize] = true;
        }
        None
    }

    /// True when the filled cells of a group are pairwise distinct.
    pub fn is_valid_group(values: &[u8]) -> bool {
        Self::find_duplicate(values).is_none()
    }

    /// True when the group is a complete permutation of `1..=symbol_count`.
    pub fn is_complete_group(values: &[u8], symbol_count: usize) -> bool {
        values.len() == symbol_count
            && values.iter().all(|&v| v != 0)
            && Self::is_valid_group(values)
    }

    /// Reject grids whose pre-filled cells already break the group law.
    /// Such a puzzle has no completion; compiling it would produce an
    /// unsatisfiable oracle whose readout looks like an ordinary answer.
    pub fn check_consistency(grid: &Grid) -> Result<(), SolverError> {
        for kind in GroupKind::ALL {
            for group in 0..grid.size {
                let values = grid.group_values(kind, group);
                if let Some(value) = Self::find_duplicate(&values) {
                    return Err(SolverError::Inconsistent {
                        group: format!("{} {}", kind, group),
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// True when the grid is completely filled and every group satisfies
    /// the law.
    pub fn is_solved(grid: &Grid) -> bool {
        if !grid.is_complete() {
            return false;
        }
        GroupKind::ALL.iter().all(|&kind| {
            (0..grid.size).all(|group| {
                Self::is_complete_group(&grid.group_values(kind, group), grid.size)
            })
        })
    }
}
