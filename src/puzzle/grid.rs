//! Grid representation and group geometry for square Sudoku puzzles

use crate::error::SolverError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of all-different groups in a Sudoku grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    Row,
    Column,
    Block,
}

impl GroupKind {
    /// All group kinds in the scan order used throughout the solver.
    pub const ALL: [GroupKind; 3] = [GroupKind::Row, GroupKind::Column, GroupKind::Block];
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Row => write!(f, "row"),
            GroupKind::Column => write!(f, "column"),
            GroupKind::Block => write!(f, "block"),
        }
    }
}

/// An N×N Sudoku grid. Cells hold `0` for empty or a value in `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub size: usize,
    pub block_size: usize,
    pub cells: Vec<u8>,
}

impl Grid {
    /// Create an all-empty grid. The side length must be a positive perfect
    /// square so that blocks tile it evenly.
    pub fn empty(size: usize) -> Result<Self, SolverError> {
        let block_size = Self::block_size_for(size)?;
        Ok(Self {
            size,
            block_size,
            cells: vec![0; size * size],
        })
    }

    /// Create a grid from row vectors, validating shape and value range.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, SolverError> {
        if rows.is_empty() {
            return Err(SolverError::Shape {
                detail: "grid has no rows".to_string(),
            });
        }

        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(SolverError::Shape {
                    detail: format!(
                        "row {} has {} cells, expected {} for a square grid",
                        i,
                        row.len(),
                        size
                    ),
                });
            }
        }

        let block_size = Self::block_size_for(size)?;

        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value as usize > size {
                    return Err(SolverError::Shape {
                        detail: format!(
                            "cell ({}, {}) holds {}, valid values are 0..={}",
                            i, j, value, size
                        ),
                    });
                }
            }
        }

        Ok(Self {
            size,
            block_size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    fn block_size_for(size: usize) -> Result<usize, SolverError> {
        if size == 0 {
            return Err(SolverError::Shape {
                detail: "grid side length cannot be zero".to_string(),
            });
        }
        let block_size = (size as f64).sqrt().round() as usize;
        if block_size * block_size != size {
            return Err(SolverError::Shape {
                detail: format!("side length {} is not a perfect square", size),
            });
        }
        Ok(block_size)
    }

    /// Convert 2D coordinates to the flat cell index.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Cell value at coordinates. Out-of-range coordinates read as empty.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.size && col < self.size {
            self.cells[self.index(row, col)]
        } else {
            0
        }
    }

    /// True if the cell holds no value yet.
    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == 0
    }

    /// Set a cell, rejecting out-of-range coordinates or values.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> Result<()> {
        if row >= self.size || col >= self.size {
            anyhow::bail!(
                "coordinates ({}, {}) out of bounds for {}x{} grid",
                row,
                col,
                self.size,
                self.size
            );
        }
        if value as usize > self.size {
            anyhow::bail!("value {} out of range for a {}-symbol grid", value, self.size);
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// Block index containing the given cell.
    #[inline]
    pub fn block_of(&self, row: usize, col: usize) -> usize {
        (row / self.block_size) * self.block_size + col / self.block_size
    }

    /// Cell positions of one group, in scan order.
    pub fn group_positions(&self, kind: GroupKind, group: usize) -> Vec<(usize, usize)> {
        match kind {
            GroupKind::Row => (0..self.size).map(|col| (group, col)).collect(),
            GroupKind::Column => (0..self.size).map(|row| (row, group)).collect(),
            GroupKind::Block => {
                let base_row = (group / self.block_size) * self.block_size;
                let base_col = (group % self.block_size) * self.block_size;
                let mut positions = Vec::with_capacity(self.size);
                for dr in 0..self.block_size {
                    for dc in 0..self.block_size {
                        positions.push((base_row + dr, base_col + dc));
                    }
                }
                positions
            }
        }
    }

    /// Cell values of one group, in scan order, empties included as `0`.
    pub fn group_values(&self, kind: GroupKind, group: usize) -> Vec<u8> {
        self.group_positions(kind, group)
            .into_iter()
            .map(|(row, col)| self.get(row, col))
            .collect()
    }

    /// All empty cell positions in row-major order. This ordering fixes the
    /// search-variable numbering for the whole pipeline.
    pub fn empty_positions(&self) -> Vec<(usize, usize)> {
        let mut empties = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.is_empty_cell(row, col) {
                    empties.push((row, col));
                }
            }
        }
        empties
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == 0).count()
    }

    /// Number of pre-filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.len() - self.empty_count()
    }

    /// True when no cell is empty.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|&cell| cell != 0)
    }

    /// Copy the grid back out as row vectors.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.size)
            .map(|row| (0..self.size).map(|col| self.get(row, col)).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                if col > 0 {
                    write!(f, " ")?;
                }
                let value = self.get(row, col);
                if value == 0 {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_grid_creation() {
        let grid = Grid::empty(4).unwrap();
        assert_eq!(grid.size, 4);
        assert_eq!(grid.block_size, 2);
        assert_eq!(grid.cells.len(), 16);
        assert_eq!(grid.empty_count(), 16);
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 0, 0, 1],
            vec![1, 0, 0, 0],
            vec![4, 0, 0, 3],
        ])
        .unwrap();
        assert_eq!(grid.size, 4);
        assert_eq!(grid.get(0, 2), 4);
        assert_eq!(grid.get(1, 1), 0);
        assert_eq!(grid.empty_count(), 7);
        assert_eq!(grid.filled_count(), 9);
    }

    #[test]
    fn test_shape_validation() {
        assert!(matches!(
            Grid::from_rows(vec![]),
            Err(SolverError::Shape { .. })
        ));
        assert!(matches!(
            Grid::from_rows(vec![vec![0, 0], vec![0]]),
            Err(SolverError::Shape { .. })
        ));
        // 3 is not a perfect square, so 3x3 has no block tiling
        assert!(matches!(
            Grid::from_rows(vec![vec![0; 3]; 3]),
            Err(SolverError::Shape { .. })
        ));
        // value above the symbol count
        assert!(matches!(
            Grid::from_rows(vec![
                vec![5, 0, 0, 0],
                vec![0; 4],
                vec![0; 4],
                vec![0; 4],
            ]),
            Err(SolverError::Shape { .. })
        ));
    }

    #[test]
    fn test_one_by_one_grid() {
        let grid = Grid::from_rows(vec![vec![1]]).unwrap();
        assert_eq!(grid.block_size, 1);
        assert!(grid.is_complete());
        assert_eq!(grid.group_positions(GroupKind::Block, 0), vec![(0, 0)]);
    }

    #[test]
    fn test_group_positions() {
        let grid = Grid::empty(4).unwrap();
        assert_eq!(
            grid.group_positions(GroupKind::Row, 1),
            vec![(1, 0), (1, 1), (1, 2), (1, 3)]
        );
        assert_eq!(
            grid.group_positions(GroupKind::Column, 2),
            vec![(0, 2), (1, 2), (2, 2), (3, 2)]
        );
        assert_eq!(
            grid.group_positions(GroupKind::Block, 3),
            vec![(2, 2), (2, 3), (3, 2), (3, 3)]
        );
        assert_eq!(grid.block_of(1, 1), 0);
        assert_eq!(grid.block_of(2, 1), 2);
    }

    #[test]
    fn test_empty_positions_row_major() {
        let grid = Grid::from_rows(vec![
            vec![1, 0, 3, 4],
            vec![0, 4, 0, 2],
            vec![2, 3, 4, 1],
            vec![4, 1, 2, 0],
        ])
        .unwrap();
        assert_eq!(
            grid.empty_positions(),
            vec![(0, 1), (1, 0), (1, 2), (3, 3)]
        );
    }

    #[test]
    fn test_set_bounds() {
        let mut grid = Grid::empty(4).unwrap();
        grid.set(2, 3, 4).unwrap();
        assert_eq!(grid.get(2, 3), 4);
        assert!(grid.set(4, 0, 1).is_err());
        assert!(grid.set(0, 0, 5).is_err());
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 0, 0, 1],
            vec![1, 0, 0, 0],
            vec![4, 0, 0, 3],
        ])
        .unwrap();
        let text = grid.to_string();
        assert!(text.contains("3 1 4 2"));
        assert!(text.contains("2 . . 1"));
    }
}
