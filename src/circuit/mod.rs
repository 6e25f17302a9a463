//! Reversible-circuit construction: variable encoding, constraint
//! derivation, register layout, and oracle compilation

pub mod compiler;
pub mod constraints;
pub mod encoding;
pub mod instruction;
pub mod registers;

pub use compiler::{OracleCircuit, OracleCompiler, OracleStatistics};
pub use constraints::{Constraint, ConstraintSet, ConstraintStatistics};
pub use encoding::{EncodingMap, EncodingStatistics};
pub use instruction::{Instruction, InstructionTape};
pub use registers::{RegisterLayout, ScratchPool};
