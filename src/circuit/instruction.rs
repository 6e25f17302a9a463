//! Reversible instruction set and the append-only tape the compiler emits

use std::fmt;

/// One reversible operation over register bits. Flip variants permute
/// computational basis states; phase variants multiply an amplitude by -1
/// when their condition holds; Hadamard is the only non-classical variant
/// and only ever targets search-variable bits.
///
/// Every variant is its own inverse, which is what makes tape inversion a
/// pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// X: flip the target bit.
    Flip { target: usize },
    /// CX: flip the target bit when the control bit is 1.
    ControlledFlip { control: usize, target: usize },
    /// CCX and wider: flip the target bit when every control bit is 1.
    MultiControlledFlip { controls: Vec<usize>, target: usize },
    /// Z: negate the amplitude when the target bit is 1.
    PhaseFlip { target: usize },
    /// CZ: negate the amplitude when both bits are 1.
    ControlledPhaseFlip { control: usize, target: usize },
    /// Many-bit Z: negate the amplitude when the target and every control
    /// bit are 1. Symmetric in all of its operands.
    MultiControlledPhaseFlip { controls: Vec<usize>, target: usize },
    /// H on the target bit.
    Hadamard { target: usize },
}

impl Instruction {
    /// The inverse operation. X, CX, CCX, Z, CZ, their widened forms, and H
    /// are all involutions, so this is the instruction itself.
    pub fn inverse(&self) -> Instruction {
        self.clone()
    }

    /// All register bits the instruction touches or reads.
    pub fn operands(&self) -> Vec<usize> {
        match self {
            Instruction::Flip { target }
            | Instruction::PhaseFlip { target }
            | Instruction::Hadamard { target } => vec![*target],
            Instruction::ControlledFlip { control, target }
            | Instruction::ControlledPhaseFlip { control, target } => vec![*control, *target],
            Instruction::MultiControlledFlip { controls, target }
            | Instruction::MultiControlledPhaseFlip { controls, target } => {
                let mut bits = controls.clone();
                bits.push(*target);
                bits
            }
        }
    }

    /// True for the one variant with no classical basis-state action.
    pub fn is_hadamard(&self) -> bool {
        matches!(self, Instruction::Hadamard { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Flip { target } => write!(f, "X({})", target),
            Instruction::ControlledFlip { control, target } => {
                write!(f, "CX({} -> {})", control, target)
            }
            Instruction::MultiControlledFlip { controls, target } => {
                write!(f, "MCX({:?} -> {})", controls, target)
            }
            Instruction::PhaseFlip { target } => write!(f, "Z({})", target),
            Instruction::ControlledPhaseFlip { control, target } => {
                write!(f, "CZ({}, {})", control, target)
            }
            Instruction::MultiControlledPhaseFlip { controls, target } => {
                write!(f, "MCZ({:?}, {})", controls, target)
            }
            Instruction::Hadamard { target } => write!(f, "H({})", target),
        }
    }
}

/// Flat list of instructions. Built once during compilation, never mutated
/// afterwards, and replayed verbatim by the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionTape {
    instructions: Vec<Instruction>,
}

impl InstructionTape {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
        }
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn append(&mut self, other: &InstructionTape) {
        self.instructions.extend_from_slice(&other.instructions);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The exact inverse tape: instructions in reverse order, each mapped to
    /// its own inverse. Running `self` then `self.inverted()` is the
    /// identity on every register.
    pub fn inverted(&self) -> InstructionTape {
        InstructionTape {
            instructions: self.instructions.iter().rev().map(Instruction::inverse).collect(),
        }
    }

    /// Highest bit index any instruction touches.
    pub fn max_bit(&self) -> Option<usize> {
        self.instructions
            .iter()
            .flat_map(|instruction| instruction.operands())
            .max()
    }

    /// True when the tape contains a Hadamard and therefore cannot be
    /// replayed as a classical reversible circuit.
    pub fn contains_hadamard(&self) -> bool {
        self.instructions.iter().any(Instruction::is_hadamard)
    }
}

impl<'a> IntoIterator for &'a InstructionTape {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
