//! Typed error taxonomy for the solver core.
//!
//! Pipeline stages that have a contractual failure mode return `SolverError`
//! so callers can inspect the fault kind; orchestration and I/O layers wrap
//! these in `anyhow` with context.

use thiserror::Error;

/// Errors raised by the puzzle, circuit, and simulator stages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Grid shape is unusable: not square, side not a perfect square, or a
    /// cell value outside `0..=N`. Checked eagerly at grid construction.
    #[error("invalid grid shape: {detail}")]
    Shape { detail: String },

    /// Two pre-filled cells in the same group carry the same value. The
    /// puzzle has no completion, so no oracle is compiled for it.
    #[error("inconsistent puzzle: value {value} appears twice in {group}")]
    Inconsistent { group: String, value: u8 },

    /// The same cell was registered as a search variable twice. Internal
    /// compiler fault, not user-recoverable.
    #[error("variable for cell ({row}, {col}) defined twice")]
    DuplicateDefinition { row: usize, col: usize },

    /// A reusable scratch register was claimed while still live. Internal
    /// compiler fault, not user-recoverable.
    #[error("scratch register {register} claimed while live")]
    ScratchInUse { register: String },

    /// The search space would exceed the configured state-vector ceiling.
    /// Checked once, before any amplitude memory is allocated.
    #[error("search needs {bits} state bits but the configured ceiling is {max_bits}")]
    Resource { bits: usize, max_bits: usize },

    /// A measured bit pattern does not decode to a puzzle value. Only
    /// reachable when the symbol count is not a power of two.
    #[error("bit pattern {pattern} of variable {variable} does not encode a value in 1..={symbol_count}")]
    Encoding {
        variable: usize,
        pattern: usize,
        symbol_count: usize,
    },
}

impl SolverError {
    /// True for faults that indicate a bug in the compiler itself rather
    /// than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SolverError::DuplicateDefinition { .. } | SolverError::ScratchInUse { .. }
        )
    }
}
