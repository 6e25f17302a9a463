//! Binary encoding of unknown cells into search variables

use crate::error::SolverError;
use crate::puzzle::Grid;
use std::collections::HashMap;
use std::fmt;

/// Registry mapping unknown cells to compact binary variables.
///
/// Variable `i` owns the contiguous global bits `[i*b, (i+1)*b)` where `b`
/// is the per-symbol bit width, and a cell value `v` is stored as the
/// little-endian bits of `v - 1`. Variables are numbered in row-major
/// discovery order, which fixes the meaning of every basis index downstream.
#[derive(Debug, Clone)]
pub struct EncodingMap {
    symbol_count: usize,
    bits_per_symbol: usize,
    cell_to_variable: HashMap<(usize, usize), usize>,
    variables: Vec<(usize, usize)>,
}

impl EncodingMap {
    /// An empty registry for a puzzle with the given symbol count.
    pub fn new(symbol_count: usize) -> Self {
        Self {
            symbol_count,
            bits_per_symbol: bits_needed(symbol_count),
            cell_to_variable: HashMap::new(),
            variables: Vec::new(),
        }
    }

    /// Register every empty cell of the grid, in row-major order.
    pub fn from_grid(grid: &Grid) -> Result<Self, SolverError> {
        let mut map = Self::new(grid.size);
        for (row, col) in grid.empty_positions() {
            map.define_variable(row, col)?;
        }
        Ok(map)
    }

    /// Register one cell as a search variable and return its index.
    /// Registering a cell twice indicates a compiler bug and is fatal.
    pub fn define_variable(&mut self, row: usize, col: usize) -> Result<usize, SolverError> {
        if self.cell_to_variable.contains_key(&(row, col)) {
            return Err(SolverError::DuplicateDefinition { row, col });
        }
        let variable = self.variables.len();
        self.cell_to_variable.insert((row, col), variable);
        self.variables.push((row, col));
        Ok(variable)
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_count
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.bits_per_symbol
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Total search-space width in bits.
    pub fn bit_count(&self) -> usize {
        self.variable_count() * self.bits_per_symbol
    }

    /// Variable index for a cell, if the cell is unknown.
    pub fn variable_for(&self, row: usize, col: usize) -> Option<usize> {
        self.cell_to_variable.get(&(row, col)).copied()
    }

    /// Cell owning a variable index.
    pub fn cell_for(&self, variable: usize) -> Option<(usize, usize)> {
        self.variables.get(variable).copied()
    }

    /// Cells in variable order.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.variables
    }

    /// Global bit indices owned by one variable, least significant first.
    pub fn variable_bits(&self, variable: usize) -> Vec<usize> {
        let start = variable * self.bits_per_symbol;
        (start..start + self.bits_per_symbol).collect()
    }

    /// Little-endian bit pattern of a cell value.
    pub fn encode_value(&self, value: u8) -> Result<Vec<bool>, SolverError> {
        if value == 0 || value as usize > self.symbol_count {
            return Err(SolverError::Shape {
                detail: format!(
                    "value {} cannot be encoded, valid values are 1..={}",
                    value, self.symbol_count
                ),
            });
        }
        let pattern = value as usize - 1;
        Ok((0..self.bits_per_symbol)
            .map(|bit| (pattern >> bit) & 1 == 1)
            .collect())
    }

    /// Invert [`encode_value`] for one variable's measured pattern.
    pub fn decode_pattern(&self, variable: usize, pattern: usize) -> Result<u8, SolverError> {
        if pattern >= self.symbol_count {
            return Err(SolverError::Encoding {
                variable,
                pattern,
                symbol_count: self.symbol_count,
            });
        }
        Ok(pattern as u8 + 1)
    }

    /// Decode a full basis index into per-variable values, variable order.
    pub fn decode_state(&self, basis_index: usize) -> Result<Vec<u8>, SolverError> {
        let mask = (1usize << self.bits_per_symbol) - 1;
        (0..self.variable_count())
            .map(|variable| {
                let pattern = (basis_index >> (variable * self.bits_per_symbol)) & mask;
                self.decode_pattern(variable, pattern)
            })
            .collect()
    }

    /// Basis index of a full assignment, values in variable order. Exact
    /// inverse of [`decode_state`].
    pub fn state_index(&self, values: &[u8]) -> Result<usize, SolverError> {
        let mut index = 0usize;
        for (variable, &value) in values.iter().enumerate() {
            if value == 0 || value as usize > self.symbol_count {
                return Err(SolverError::Shape {
                    detail: format!(
                        "value {} cannot be encoded, valid values are 1..={}",
                        value, self.symbol_count
                    ),
                });
            }
            index |= (value as usize - 1) << (variable * self.bits_per_symbol);
        }
        Ok(index)
    }

    pub fn statistics(&self) -> EncodingStatistics {
        EncodingStatistics {
            symbol_count: self.symbol_count,
            bits_per_symbol: self.bits_per_symbol,
            variable_count: self.variable_count(),
            bit_count: self.bit_count(),
        }
    }
}

/// Smallest width that distinguishes all symbols; at least one bit so a
/// degenerate single-symbol puzzle still has an addressable variable.
fn bits_needed(symbol_count: usize) -> usize {
    let mut bits = 1;
    while (1usize << bits) < symbol_count {
        bits += 1;
    }
    bits
}

/// Summary of the encoding for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub symbol_count: usize,
    pub bits_per_symbol: usize,
    pub variable_count: usize,
    pub bit_count: usize,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} unknowns x {} bits = {} search bits ({} symbols)",
            self.variable_count, self.bits_per_symbol, self.bit_count, self.symbol_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(1), 1);
        assert_eq!(bits_needed(2), 1);
        assert_eq!(bits_needed(4), 2);
        assert_eq!(bits_needed(9), 4);
        assert_eq!(bits_needed(16), 4);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let map = EncodingMap::new(4);
        for value in 1..=4u8 {
            let bits = map.encode_value(value).unwrap();
            assert_eq!(bits.len(), 2);
            let pattern = bits
                .iter()
                .enumerate()
                .fold(0usize, |acc, (i, &b)| acc | ((b as usize) << i));
            assert_eq!(map.decode_pattern(0, pattern).unwrap(), value);
        }
        assert!(map.encode_value(0).is_err());
        assert!(map.encode_value(5).is_err());
    }

    #[test]
    fn test_row_major_discovery_order() {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 0, 0, 4],
            vec![4, 0, 0, 3],
        ])
        .unwrap();
        let map = EncodingMap::from_grid(&grid).unwrap();

        assert_eq!(map.variable_count(), 4);
        assert_eq!(map.bit_count(), 8);
        assert_eq!(map.cells(), &[(2, 1), (2, 2), (3, 1), (3, 2)]);
        assert_eq!(map.variable_for(3, 1), Some(2));
        assert_eq!(map.variable_for(0, 0), None);
        assert_eq!(map.variable_bits(2), vec![4, 5]);
    }

    #[test]
    fn test_duplicate_definition_is_fatal() {
        let mut map = EncodingMap::new(4);
        map.define_variable(1, 2).unwrap();
        assert!(matches!(
            map.define_variable(1, 2),
            Err(SolverError::DuplicateDefinition { row: 1, col: 2 })
        ));
    }

    #[test]
    fn test_state_index_round_trip() {
        let mut map = EncodingMap::new(4);
        for cell in [(2, 1), (2, 2), (3, 1), (3, 2)] {
            map.define_variable(cell.0, cell.1).unwrap();
        }

        let values = vec![3u8, 2, 2, 1];
        let index = map.state_index(&values).unwrap();
        assert_eq!(index, 22);
        assert_eq!(map.decode_state(index).unwrap(), values);

        // every index decodes and round-trips while the symbol count fills
        // the pattern space
        for index in 0..(1usize << map.bit_count()) {
            let decoded = map.decode_state(index).unwrap();
            assert_eq!(map.state_index(&decoded).unwrap(), index);
        }
    }

    #[test]
    fn test_decode_rejects_out_of_range_pattern() {
        // 9 symbols leave patterns 9..15 unmapped
        let map = EncodingMap::new(9);
        assert_eq!(map.decode_pattern(0, 8).unwrap(), 9);
        assert!(matches!(
            map.decode_pattern(0, 12),
            Err(SolverError::Encoding {
                variable: 0,
                pattern: 12,
                symbol_count: 9
            })
        ));
    }

    #[test]
    fn test_empty_map_for_complete_grid() {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 3, 2, 4],
            vec![4, 2, 1, 3],
        ])
        .unwrap();
        let map = EncodingMap::from_grid(&grid).unwrap();
        assert_eq!(map.variable_count(), 0);
        assert_eq!(map.bit_count(), 0);
        assert_eq!(map.decode_state(0).unwrap(), Vec::<u8>::new());
    }
}
