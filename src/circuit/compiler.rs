//! Compilation of inequality constraints into a reversible phase oracle

use super::{Constraint, ConstraintSet, EncodingMap, Instruction, InstructionTape};
use super::{RegisterLayout, ScratchPool};
use crate::error::SolverError;
use log::debug;
use std::fmt;

/// A compiled phase oracle: the instruction tape plus the register bank it
/// runs over. Replaying the tape over a basis state negates the amplitude
/// exactly when every constraint holds, and leaves every register bit as it
/// found it.
#[derive(Debug, Clone)]
pub struct OracleCircuit {
    pub tape: InstructionTape,
    pub layout: RegisterLayout,
}

impl OracleCircuit {
    pub fn constraint_count(&self) -> usize {
        self.layout.flag_count
    }

    pub fn statistics(&self) -> OracleStatistics {
        OracleStatistics {
            constraints: self.layout.flag_count,
            instructions: self.tape.len(),
            total_bits: self.layout.total_bits(),
            variable_bits: self.layout.variable_bits,
        }
    }
}

/// Summary of a compiled oracle for reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleStatistics {
    pub constraints: usize,
    pub instructions: usize,
    pub total_bits: usize,
    pub variable_bits: usize,
}

impl fmt::Display for OracleStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} instructions over {} bits ({} search bits, {} constraint flags)",
            self.instructions, self.total_bits, self.variable_bits, self.constraints
        )
    }
}

/// Translates a constraint set into a reversible oracle tape.
pub struct OracleCompiler;

impl OracleCompiler {
    /// Compile the oracle. The tape layout is:
    ///
    /// 1. prologue: flip `const_one`
    /// 2. per constraint: XOR the operands into the freshly claimed
    ///    comparison register, reduce it onto the constraint's flag bit,
    ///    XOR the operands back out, release the claim
    /// 3. a phase flip conditioned on every flag
    /// 4. the inverse of steps 1-2 in reverse order
    pub fn compile(
        map: &EncodingMap,
        constraints: &ConstraintSet,
    ) -> Result<OracleCircuit, SolverError> {
        let layout = RegisterLayout::new(map.bit_count(), map.bits_per_symbol(), constraints.len());
        let mut pool = ScratchPool::new(&layout);

        let mut forward = InstructionTape::new();
        forward.push(Instruction::Flip {
            target: layout.const_one,
        });

        for (index, constraint) in constraints.constraints().iter().enumerate() {
            let comparison = pool.claim_comparison()?;
            let flag = layout.flag_bit(index);

            let xor_in = Self::xor_operands(map, &layout, &comparison, constraint)?;
            for instruction in &xor_in {
                forward.push(instruction.clone());
            }

            Self::reduce_to_flag(&mut forward, &comparison, flag, &mut pool)?;

            // uncompute the comparison register so the next claim starts
            // from zero
            for instruction in xor_in.iter().rev() {
                forward.push(instruction.inverse());
            }
            pool.release_comparison();
        }

        let mut tape = forward.clone();
        if let Some(phase) = Self::flag_phase(&layout) {
            tape.push(phase);
        }
        tape.append(&forward.inverted());

        let circuit = OracleCircuit { tape, layout };
        debug!("compiled oracle: {}", circuit.statistics());
        Ok(circuit)
    }

    /// CX the constraint's two operands bitwise into the comparison
    /// register, leaving it holding their XOR. Constants are sourced from
    /// the two constant bits according to the value's encoded pattern.
    fn xor_operands(
        map: &EncodingMap,
        layout: &RegisterLayout,
        comparison: &[usize],
        constraint: &Constraint,
    ) -> Result<Vec<Instruction>, SolverError> {
        let mut instructions = Vec::new();
        match *constraint {
            Constraint::VariableNotEqual { a, b } => {
                let a_bits = map.variable_bits(a);
                let b_bits = map.variable_bits(b);
                for (bit, &target) in comparison.iter().enumerate() {
                    instructions.push(Instruction::ControlledFlip {
                        control: a_bits[bit],
                        target,
                    });
                    instructions.push(Instruction::ControlledFlip {
                        control: b_bits[bit],
                        target,
                    });
                }
            }
            Constraint::NotEqualConstant { variable, value } => {
                let var_bits = map.variable_bits(variable);
                let pattern = map.encode_value(value)?;
                for (bit, &target) in comparison.iter().enumerate() {
                    instructions.push(Instruction::ControlledFlip {
                        control: var_bits[bit],
                        target,
                    });
                    let constant = if pattern[bit] {
                        layout.const_one
                    } else {
                        layout.const_zero
                    };
                    instructions.push(Instruction::ControlledFlip {
                        control: constant,
                        target,
                    });
                }
            }
        }
        Ok(instructions)
    }

    /// Reduce the comparison register onto the flag so the flag reads 1 iff
    /// at least one compared bit differs. The comparison bits are flipped,
    /// ANDed into the flag, and flipped back; the flag flip at the end
    /// inverts the sense from "all bits equal" to "operands differ".
    fn reduce_to_flag(
        tape: &mut InstructionTape,
        comparison: &[usize],
        flag: usize,
        pool: &mut ScratchPool,
    ) -> Result<(), SolverError> {
        for &bit in comparison {
            tape.push(Instruction::Flip { target: bit });
        }

        match comparison {
            [] => {}
            [only] => tape.push(Instruction::ControlledFlip {
                control: *only,
                target: flag,
            }),
            [first, second] => tape.push(Instruction::MultiControlledFlip {
                controls: vec![*first, *second],
                target: flag,
            }),
            _ => {
                // chain partial ANDs through the multi-control scratch,
                // then uncompute the partials inside the same claim
                let scratch = pool.claim_multi_control()?;
                let mut partials = Vec::new();
                partials.push(Instruction::MultiControlledFlip {
                    controls: vec![comparison[0], comparison[1]],
                    target: scratch[0],
                });
                for k in 2..comparison.len() - 1 {
                    partials.push(Instruction::MultiControlledFlip {
                        controls: vec![scratch[k - 2], comparison[k]],
                        target: scratch[k - 1],
                    });
                }
                for instruction in &partials {
                    tape.push(instruction.clone());
                }
                tape.push(Instruction::MultiControlledFlip {
                    controls: vec![
                        scratch[comparison.len() - 3],
                        comparison[comparison.len() - 1],
                    ],
                    target: flag,
                });
                for instruction in partials.iter().rev() {
                    tape.push(instruction.inverse());
                }
                pool.release_multi_control();
            }
        }

        for &bit in comparison {
            tape.push(Instruction::Flip { target: bit });
        }
        tape.push(Instruction::Flip { target: flag });
        Ok(())
    }

    /// The global marking phase, conditioned on every constraint flag.
    fn flag_phase(layout: &RegisterLayout) -> Option<Instruction> {
        let flags = layout.flag_bits();
        match flags.as_slice() {
            [] => None,
            [only] => Some(Instruction::PhaseFlip { target: *only }),
            [first, second] => Some(Instruction::ControlledPhaseFlip {
                control: *first,
                target: *second,
            }),
            _ => {
                let target = flags[flags.len() - 1];
                let controls = flags[..flags.len() - 1].to_vec();
                Some(Instruction::MultiControlledPhaseFlip { controls, target })
            }
        }
    }
}
