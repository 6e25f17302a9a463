//! Register bank layout and scratch allocation for compiled oracles

use crate::error::SolverError;
use std::fmt;

/// Positions of every register the oracle uses, laid out over one flat bit
/// index space:
///
/// - `[0, variable_bits)`: search variables, bits_per_symbol per variable
/// - two constant bits (`const_zero` stays 0, `const_one` is flipped to 1
///   by the tape prologue)
/// - a reusable comparison register, bits_per_symbol wide
/// - a reusable multi-control register for AND cascades over more than
///   three comparison bits
/// - one persistent flag bit per constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterLayout {
    pub variable_bits: usize,
    pub bits_per_symbol: usize,
    pub const_zero: usize,
    pub const_one: usize,
    comparison_start: usize,
    multi_control_start: usize,
    multi_control_width: usize,
    flag_start: usize,
    pub flag_count: usize,
}

impl RegisterLayout {
    pub fn new(variable_bits: usize, bits_per_symbol: usize, flag_count: usize) -> Self {
        let const_zero = variable_bits;
        let const_one = variable_bits + 1;
        let comparison_start = variable_bits + 2;
        let multi_control_start = comparison_start + bits_per_symbol;
        // a cascade over b comparison bits holds b-2 partial results
        let multi_control_width = bits_per_symbol.saturating_sub(2);
        let flag_start = multi_control_start + multi_control_width;
        Self {
            variable_bits,
            bits_per_symbol,
            const_zero,
            const_one,
            comparison_start,
            multi_control_start,
            multi_control_width,
            flag_start,
            flag_count,
        }
    }

    /// Total width of the register bank.
    pub fn total_bits(&self) -> usize {
        self.flag_start + self.flag_count
    }

    /// True when the index belongs to a search variable.
    pub fn is_variable_bit(&self, bit: usize) -> bool {
        bit < self.variable_bits
    }

    pub fn comparison_bits(&self) -> Vec<usize> {
        (self.comparison_start..self.comparison_start + self.bits_per_symbol).collect()
    }

    pub fn multi_control_bits(&self) -> Vec<usize> {
        (self.multi_control_start..self.multi_control_start + self.multi_control_width).collect()
    }

    pub fn flag_bit(&self, constraint: usize) -> usize {
        self.flag_start + constraint
    }

    pub fn flag_bits(&self) -> Vec<usize> {
        (self.flag_start..self.flag_start + self.flag_count).collect()
    }

    /// Initial classical value of each bank bit before the tape prologue
    /// runs. Everything starts at 0; `const_one` earns its name only once
    /// the prologue flips it.
    pub fn initial_bits(&self) -> Vec<bool> {
        vec![false; self.total_bits()]
    }
}

impl fmt::Display for RegisterLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Register bank ({} bits):", self.total_bits())?;
        writeln!(
            f,
            "  variables:     [0, {}) ({} per symbol)",
            self.variable_bits, self.bits_per_symbol
        )?;
        writeln!(f, "  constants:     {}, {}", self.const_zero, self.const_one)?;
        writeln!(
            f,
            "  comparison:    [{}, {})",
            self.comparison_start,
            self.comparison_start + self.bits_per_symbol
        )?;
        writeln!(
            f,
            "  multi-control: [{}, {})",
            self.multi_control_start,
            self.multi_control_start + self.multi_control_width
        )?;
        write!(
            f,
            "  flags:         [{}, {})",
            self.flag_start,
            self.flag_start + self.flag_count
        )
    }
}

/// Claim/release tracking for the two reusable scratch registers. A claim
/// while the register is still live is an internal compiler fault; catching
/// it here keeps scratch aliasing from silently corrupting flag values.
#[derive(Debug)]
pub struct ScratchPool {
    comparison: Vec<usize>,
    multi_control: Vec<usize>,
    comparison_live: bool,
    multi_control_live: bool,
}

impl ScratchPool {
    pub fn new(layout: &RegisterLayout) -> Self {
        Self {
            comparison: layout.comparison_bits(),
            multi_control: layout.multi_control_bits(),
            comparison_live: false,
            multi_control_live: false,
        }
    }

    /// Claim the comparison register for one constraint.
    pub fn claim_comparison(&mut self) -> Result<Vec<usize>, SolverError> {
        if self.comparison_live {
            return Err(SolverError::ScratchInUse {
                register: "comparison".to_string(),
            });
        }
        self.comparison_live = true;
        Ok(self.comparison.clone())
    }

    /// Return the comparison register to the pool. The caller must have
    /// uncomputed it back to zero first.
    pub fn release_comparison(&mut self) {
        self.comparison_live = false;
    }

    /// Claim the multi-control register for one AND cascade.
    pub fn claim_multi_control(&mut self) -> Result<Vec<usize>, SolverError> {
        if self.multi_control_live {
            return Err(SolverError::ScratchInUse {
                register: "multi-control".to_string(),
            });
        }
        self.multi_control_live = true;
        Ok(self.multi_control.clone())
    }

    pub fn release_multi_control(&mut self) {
        self.multi_control_live = false;
    }
}
