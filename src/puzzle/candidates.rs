//! Classical pre-processing: forced-cell deduction and per-group
//! candidate enumeration

use super::{Grid, GroupKind, SudokuRules};
use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Empty positions of one group together with every permutation of its
/// missing values. A complete group carries no positions and exactly one
/// empty permutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCandidates {
    pub kind: GroupKind,
    pub group: usize,
    pub positions: Vec<(usize, usize)>,
    pub permutations: Vec<Vec<u8>>,
}

impl GroupCandidates {
    /// Number of candidate fillings for this group.
    pub fn count(&self) -> usize {
        self.permutations.len()
    }
}

/// Candidate analysis over a puzzle grid.
pub struct CandidateEnumerator;

impl CandidateEnumerator {
    /// Fill every cell that is forced by simple elimination: any group with
    /// exactly one empty cell receives its single missing value. Scans rows,
    /// then columns, then blocks, and repeats until a full pass changes
    /// nothing. Returns the number of cells filled.
    pub fn fill_trivial(grid: &mut Grid) -> Result<usize> {
        let mut filled = 0;
        loop {
            let mut changes = 0;
            for kind in GroupKind::ALL {
                for group in 0..grid.size {
                    let positions = grid.group_positions(kind, group);
                    let empties: Vec<(usize, usize)> = positions
                        .iter()
                        .copied()
                        .filter(|&(row, col)| grid.is_empty_cell(row, col))
                        .collect();
                    if empties.len() != 1 {
                        continue;
                    }
                    let values = grid.group_values(kind, group);
                    let missing = SudokuRules::missing_values(&values, grid.size);
                    if let [value] = missing[..] {
                        let (row, col) = empties[0];
                        grid.set(row, col, value)?;
                        changes += 1;
                    }
                }
            }
            filled += changes;
            if changes == 0 {
                break;
            }
        }
        Ok(filled)
    }

    /// Enumerate candidates for every group of one kind, in group order.
    pub fn enumerate(grid: &Grid, kind: GroupKind) -> Vec<GroupCandidates> {
        (0..grid.size)
            .map(|group| {
                let positions: Vec<(usize, usize)> = grid
                    .group_positions(kind, group)
                    .into_iter()
                    .filter(|&(row, col)| grid.is_empty_cell(row, col))
                    .collect();
                let values = grid.group_values(kind, group);
                let missing = SudokuRules::missing_values(&values, grid.size);
                let permutations: Vec<Vec<u8>> =
                    missing.iter().copied().permutations(missing.len()).collect();
                GroupCandidates {
                    kind,
                    group,
                    positions,
                    permutations,
                }
            })
            .collect()
    }

    /// Enumerate candidates for all three group kinds.
    pub fn enumerate_all(grid: &Grid) -> Vec<GroupCandidates> {
        GroupKind::ALL
            .iter()
            .flat_map(|&kind| Self::enumerate(grid, kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_grid() -> Grid {
        Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 0, 0, 1],
            vec![1, 0, 0, 0],
            vec![4, 0, 0, 3],
        ])
        .unwrap()
    }

    #[test]
    fn test_fill_trivial_on_demo_grid() {
        let mut grid = demo_grid();
        let filled = CandidateEnumerator::fill_trivial(&mut grid).unwrap();

        // column 3 forces (2,3)=4, the top blocks force (1,1)=4 and (1,2)=3
        assert_eq!(filled, 3);
        assert_eq!(grid.get(2, 3), 4);
        assert_eq!(grid.get(1, 1), 4);
        assert_eq!(grid.get(1, 2), 3);
        assert_eq!(
            grid.empty_positions(),
            vec![(2, 1), (2, 2), (3, 1), (3, 2)]
        );
    }

    #[test]
    fn test_fill_trivial_reaches_fixed_point() {
        let mut grid = demo_grid();
        CandidateEnumerator::fill_trivial(&mut grid).unwrap();
        assert_eq!(CandidateEnumerator::fill_trivial(&mut grid).unwrap(), 0);
    }

    #[test]
    fn test_fill_trivial_complete_grid() {
        let mut grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 3, 2, 4],
            vec![4, 2, 1, 3],
        ])
        .unwrap();
        assert_eq!(CandidateEnumerator::fill_trivial(&mut grid).unwrap(), 0);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_fill_trivial_multi_pass_cascade() {
        // Pass 1 only unblocks columns 0 and 2; the rows complete in pass 2.
        let mut grid = Grid::from_rows(vec![
            vec![1, 2, 0, 0],
            vec![0, 4, 1, 0],
            vec![2, 1, 4, 3],
            vec![4, 3, 2, 1],
        ])
        .unwrap();
        let filled = CandidateEnumerator::fill_trivial(&mut grid).unwrap();
        assert_eq!(filled, 4);
        assert!(grid.is_complete());
        assert_eq!(
            grid.to_rows(),
            vec![
                vec![1, 2, 3, 4],
                vec![3, 4, 1, 2],
                vec![2, 1, 4, 3],
                vec![4, 3, 2, 1],
            ]
        );
    }

    #[test]
    fn test_enumerate_rows() {
        let grid = demo_grid();
        let rows = CandidateEnumerator::enumerate(&grid, GroupKind::Row);
        assert_eq!(rows.len(), 4);

        // row 0 is complete: no positions, one empty permutation
        assert!(rows[0].positions.is_empty());
        assert_eq!(rows[0].permutations, vec![Vec::<u8>::new()]);

        // row 1 misses {3, 4} across two cells
        assert_eq!(rows[1].positions, vec![(1, 1), (1, 2)]);
        assert_eq!(rows[1].permutations, vec![vec![3, 4], vec![4, 3]]);

        // row 2 misses three values
        assert_eq!(rows[2].positions.len(), 3);
        assert_eq!(rows[2].count(), 6);
    }

    #[test]
    fn test_enumerate_all_kinds() {
        let grid = demo_grid();
        let all = CandidateEnumerator::enumerate_all(&grid);
        assert_eq!(all.len(), 12);
        assert!(all.iter().any(|c| c.kind == GroupKind::Block));

        // column 3 has a single missing value
        let col3 = all
            .iter()
            .find(|c| c.kind == GroupKind::Column && c.group == 3)
            .unwrap();
        assert_eq!(col3.positions, vec![(2, 3)]);
        assert_eq!(col3.permutations, vec![vec![4]]);
    }
}
