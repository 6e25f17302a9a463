//! Instruction execution against the amplitude vector
//!
//! Two execution modes share the instruction set. Superposition and
//! diffusion tapes address variable bits only and are applied as unitaries
//! through bit-mask index arithmetic. Oracle tapes address the full register
//! bank but contain no Hadamard, so each basis state replays them as a
//! classical reversible circuit whose conditional phases decide the marking.

use super::StateVector;
use crate::circuit::{Instruction, InstructionTape, OracleCircuit};
use crate::error::SolverError;
use crate::grover::AmplificationEngine;
use log::debug;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;
use std::time::{Duration, Instant};

/// Below this dimension the per-element work is too small to pay for
/// thread handoff.
const PARALLEL_THRESHOLD: usize = 1 << 12;

/// Apply a variable-bit tape (Hadamards, flips, phases) as unitaries.
pub fn apply_tape(state: &mut StateVector, tape: &InstructionTape) -> Result<(), SolverError> {
    for instruction in tape {
        apply_instruction(state, instruction)?;
    }
    Ok(())
}

fn apply_instruction(
    state: &mut StateVector,
    instruction: &Instruction,
) -> Result<(), SolverError> {
    let bits = state.bits();
    if instruction.operands().iter().any(|&bit| bit >= bits) {
        return Err(SolverError::Shape {
            detail: format!(
                "instruction {} addresses a bit outside the {}-bit state",
                instruction, bits
            ),
        });
    }

    match instruction {
        Instruction::Flip { target } => {
            let mask = 1usize << target;
            rebuild(state, |i, old| old[i ^ mask]);
        }
        Instruction::ControlledFlip { control, target } => {
            let control_mask = 1usize << control;
            let target_mask = 1usize << target;
            rebuild(state, |i, old| {
                if i & control_mask != 0 {
                    old[i ^ target_mask]
                } else {
                    old[i]
                }
            });
        }
        Instruction::MultiControlledFlip { controls, target } => {
            let control_mask = bit_mask(controls);
            let target_mask = 1usize << target;
            rebuild(state, |i, old| {
                if i & control_mask == control_mask {
                    old[i ^ target_mask]
                } else {
                    old[i]
                }
            });
        }
        Instruction::Hadamard { target } => {
            let mask = 1usize << target;
            rebuild(state, |i, old| {
                if i & mask == 0 {
                    (old[i] + old[i | mask]) * FRAC_1_SQRT_2
                } else {
                    (old[i ^ mask] - old[i]) * FRAC_1_SQRT_2
                }
            });
        }
        Instruction::PhaseFlip { target } => {
            let mask = 1usize << target;
            negate_where(state, move |i| i & mask != 0);
        }
        Instruction::ControlledPhaseFlip { control, target } => {
            let mask = (1usize << control) | (1usize << target);
            negate_where(state, move |i| i & mask == mask);
        }
        Instruction::MultiControlledPhaseFlip { controls, target } => {
            let mask = bit_mask(controls) | (1usize << target);
            negate_where(state, move |i| i & mask == mask);
        }
    }
    Ok(())
}

fn bit_mask(bits: &[usize]) -> usize {
    bits.iter().fold(0usize, |mask, &bit| mask | (1usize << bit))
}

fn rebuild<F>(state: &mut StateVector, f: F)
where
    F: Fn(usize, &[Complex64]) -> Complex64 + Sync,
{
    let new: Vec<Complex64> = {
        let old = state.amplitudes();
        if old.len() >= PARALLEL_THRESHOLD {
            (0..old.len()).into_par_iter().map(|i| f(i, old)).collect()
        } else {
            (0..old.len()).map(|i| f(i, old)).collect()
        }
    };
    state.amplitudes_mut().copy_from_slice(&new);
}

fn negate_where<F>(state: &mut StateVector, predicate: F)
where
    F: Fn(usize) -> bool + Sync + Send,
{
    let amplitudes = state.amplitudes_mut();
    if amplitudes.len() >= PARALLEL_THRESHOLD {
        amplitudes.par_iter_mut().enumerate().for_each(|(i, amplitude)| {
            if predicate(i) {
                *amplitude = -*amplitude;
            }
        });
    } else {
        for (i, amplitude) in amplitudes.iter_mut().enumerate() {
            if predicate(i) {
                *amplitude = -*amplitude;
            }
        }
    }
}

/// Replay a Hadamard-free tape over a classical register file. Flip
/// variants permute the registers; phase variants toggle the returned sign
/// when their condition holds at that point in the tape.
pub fn replay_tape(tape: &InstructionTape, registers: &mut [bool]) -> Result<bool, SolverError> {
    if tape.contains_hadamard() {
        return Err(SolverError::Shape {
            detail: "tape contains Hadamard instructions and has no classical replay".to_string(),
        });
    }
    if let Some(max_bit) = tape.max_bit() {
        if max_bit >= registers.len() {
            return Err(SolverError::Shape {
                detail: format!(
                    "tape addresses bit {} but the register file holds {} bits",
                    max_bit,
                    registers.len()
                ),
            });
        }
    }
    Ok(replay_unchecked(tape, registers))
}

fn replay_unchecked(tape: &InstructionTape, registers: &mut [bool]) -> bool {
    let mut negated = false;
    for instruction in tape {
        match instruction {
            Instruction::Flip { target } => registers[*target] = !registers[*target],
            Instruction::ControlledFlip { control, target } => {
                if registers[*control] {
                    registers[*target] = !registers[*target];
                }
            }
            Instruction::MultiControlledFlip { controls, target } => {
                if controls.iter().all(|&control| registers[control]) {
                    registers[*target] = !registers[*target];
                }
            }
            Instruction::PhaseFlip { target } => {
                if registers[*target] {
                    negated = !negated;
                }
            }
            Instruction::ControlledPhaseFlip { control, target } => {
                if registers[*control] && registers[*target] {
                    negated = !negated;
                }
            }
            Instruction::MultiControlledPhaseFlip { controls, target } => {
                if registers[*target] && controls.iter().all(|&control| registers[control]) {
                    negated = !negated;
                }
            }
            // callers reject Hadamard tapes before replay
            Instruction::Hadamard { .. } => {}
        }
    }
    negated
}

/// Apply the compiled oracle as a phase-marking operation: each basis
/// state's amplitude is negated exactly when the tape's conditional phases
/// fire for it.
pub fn apply_oracle(state: &mut StateVector, oracle: &OracleCircuit) -> Result<(), SolverError> {
    let layout = &oracle.layout;
    if layout.variable_bits != state.bits() {
        return Err(SolverError::Shape {
            detail: format!(
                "oracle compiled for {} variable bits applied to a {}-bit state",
                layout.variable_bits,
                state.bits()
            ),
        });
    }
    if oracle.tape.contains_hadamard() {
        return Err(SolverError::Shape {
            detail: "oracle tape contains Hadamard instructions".to_string(),
        });
    }
    let total_bits = layout.total_bits();
    if let Some(max_bit) = oracle.tape.max_bit() {
        if max_bit >= total_bits {
            return Err(SolverError::Shape {
                detail: format!(
                    "oracle tape addresses bit {} outside its {}-bit register bank",
                    max_bit, total_bits
                ),
            });
        }
    }

    let variable_bits = layout.variable_bits;
    let tape = &oracle.tape;
    let marks = |index: usize, registers: &mut Vec<bool>| -> bool {
        for (bit, register) in registers.iter_mut().enumerate() {
            *register = bit < variable_bits && (index >> bit) & 1 == 1;
        }
        let negated = replay_unchecked(tape, registers);
        // the mirrored tape returns every register to its starting value
        debug_assert!(registers
            .iter()
            .enumerate()
            .all(|(bit, &register)| {
                register == (bit < variable_bits && (index >> bit) & 1 == 1)
            }));
        negated
    };

    let amplitudes = state.amplitudes_mut();
    if amplitudes.len() >= PARALLEL_THRESHOLD {
        amplitudes.par_iter_mut().enumerate().for_each_init(
            || vec![false; total_bits],
            |registers, (index, amplitude)| {
                if marks(index, registers) {
                    *amplitude = -*amplitude;
                }
            },
        );
    } else {
        let mut registers = vec![false; total_bits];
        for (index, amplitude) in amplitudes.iter_mut().enumerate() {
            if marks(index, &mut registers) {
                *amplitude = -*amplitude;
            }
        }
    }
    Ok(())
}

/// Runs amplification schedules against freshly allocated state vectors,
/// enforcing the configured size ceiling.
#[derive(Debug, Clone)]
pub struct Simulator {
    max_state_bits: usize,
}

impl Simulator {
    pub fn new(max_state_bits: usize) -> Self {
        Self { max_state_bits }
    }

    /// Refuse searches whose state vector would not fit the ceiling.
    /// Called once, before any amplitude memory is allocated.
    pub fn check_capacity(&self, bits: usize) -> Result<(), SolverError> {
        if bits > self.max_state_bits {
            return Err(SolverError::Resource {
                bits,
                max_bits: self.max_state_bits,
            });
        }
        Ok(())
    }

    /// Run the full schedule: superposition prologue, then each round's
    /// oracle marking and diffusion.
    pub fn run_search(
        &self,
        oracle: &OracleCircuit,
        engine: &AmplificationEngine,
    ) -> Result<SearchRun, SolverError> {
        let bits = engine.variable_bits();
        self.check_capacity(bits)?;
        if oracle.layout.variable_bits != bits {
            return Err(SolverError::Shape {
                detail: format!(
                    "oracle covers {} variable bits, schedule expects {}",
                    oracle.layout.variable_bits, bits
                ),
            });
        }

        let started = Instant::now();
        let mut state = StateVector::zero_state(bits);
        apply_tape(&mut state, engine.superposition())?;
        let mut instructions_applied = engine.superposition().len();

        for round in 0..engine.rounds() {
            apply_oracle(&mut state, oracle)?;
            apply_tape(&mut state, engine.diffusion())?;
            instructions_applied += oracle.tape.len() + engine.diffusion().len();
            debug!("amplification round {}/{} applied", round + 1, engine.rounds());
        }

        Ok(SearchRun {
            state,
            statistics: SimulatorStatistics {
                state_bits: bits,
                rounds: engine.rounds(),
                instructions_applied,
                duration: started.elapsed(),
            },
        })
    }
}

/// The evolved state plus run accounting.
#[derive(Debug, Clone)]
pub struct SearchRun {
    pub state: StateVector,
    pub statistics: SimulatorStatistics,
}

/// Accounting for one simulated search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorStatistics {
    pub state_bits: usize,
    pub rounds: usize,
    pub instructions_applied: usize,
    pub duration: Duration,
}

impl fmt::Display for SimulatorStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-bit state, {} rounds, {} instructions in {:?}",
            self.state_bits, self.rounds, self.instructions_applied, self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Constraint, ConstraintSet, EncodingMap, OracleCompiler};
    use crate::puzzle::Grid;

    const TOLERANCE: f64 = 1e-9;

    fn tape_of(instructions: Vec<Instruction>) -> InstructionTape {
        let mut tape = InstructionTape::new();
        for instruction in instructions {
            tape.push(instruction);
        }
        tape
    }

    #[test]
    fn test_hadamard_creates_superposition() {
        let mut state = StateVector::zero_state(1);
        apply_tape(&mut state, &tape_of(vec![Instruction::Hadamard { target: 0 }])).unwrap();

        assert!((state.probability(0) - 0.5).abs() < TOLERANCE);
        assert!((state.probability(1) - 0.5).abs() < TOLERANCE);
        assert!(state.is_normalized(TOLERANCE));
    }

    #[test]
    fn test_flip_permutes_basis_states() {
        let mut state = StateVector::zero_state(2);
        apply_tape(&mut state, &tape_of(vec![Instruction::Flip { target: 1 }])).unwrap();
        assert!((state.probability(2) - 1.0).abs() < TOLERANCE);

        apply_tape(&mut state, &tape_of(vec![Instruction::Flip { target: 0 }])).unwrap();
        assert!((state.probability(3) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_controlled_flip_respects_control() {
        // control clear: nothing moves
        let mut state = StateVector::zero_state(2);
        apply_tape(
            &mut state,
            &tape_of(vec![Instruction::ControlledFlip { control: 0, target: 1 }]),
        )
        .unwrap();
        assert!((state.probability(0) - 1.0).abs() < TOLERANCE);

        // control set: target flips
        apply_tape(&mut state, &tape_of(vec![Instruction::Flip { target: 0 }])).unwrap();
        apply_tape(
            &mut state,
            &tape_of(vec![Instruction::ControlledFlip { control: 0, target: 1 }]),
        )
        .unwrap();
        assert!((state.probability(3) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_hzh_equals_x() {
        let mut state = StateVector::zero_state(1);
        apply_tape(
            &mut state,
            &tape_of(vec![
                Instruction::Hadamard { target: 0 },
                Instruction::PhaseFlip { target: 0 },
                Instruction::Hadamard { target: 0 },
            ]),
        )
        .unwrap();
        assert!((state.probability(1) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_unitaries_preserve_the_norm() {
        let mut state = StateVector::uniform(3);
        apply_tape(
            &mut state,
            &tape_of(vec![
                Instruction::Hadamard { target: 1 },
                Instruction::ControlledFlip { control: 0, target: 2 },
                Instruction::MultiControlledFlip {
                    controls: vec![0, 1],
                    target: 2,
                },
                Instruction::MultiControlledPhaseFlip {
                    controls: vec![0, 1],
                    target: 2,
                },
                Instruction::Flip { target: 0 },
            ]),
        )
        .unwrap();
        assert!(state.is_normalized(TOLERANCE));
    }

    #[test]
    fn test_apply_tape_rejects_out_of_range_bits() {
        let mut state = StateVector::zero_state(2);
        let result = apply_tape(&mut state, &tape_of(vec![Instruction::Flip { target: 5 }]));
        assert!(matches!(result, Err(SolverError::Shape { .. })));
    }

    #[test]
    fn test_classical_replay_tracks_bits_and_phase() {
        let tape = tape_of(vec![
            Instruction::Flip { target: 0 },
            Instruction::ControlledFlip { control: 0, target: 1 },
            Instruction::PhaseFlip { target: 1 },
        ]);
        let mut registers = vec![false; 2];
        let negated = replay_tape(&tape, &mut registers).unwrap();
        assert_eq!(registers, vec![true, true]);
        assert!(negated);
    }

    #[test]
    fn test_replay_rejects_hadamard_tapes() {
        let tape = tape_of(vec![Instruction::Hadamard { target: 0 }]);
        let mut registers = vec![false; 1];
        assert!(replay_tape(&tape, &mut registers).is_err());
    }

    #[test]
    fn test_replay_forward_then_inverse_is_identity() {
        let tape = tape_of(vec![
            Instruction::Flip { target: 2 },
            Instruction::ControlledFlip { control: 2, target: 0 },
            Instruction::MultiControlledFlip {
                controls: vec![0, 2],
                target: 1,
            },
            Instruction::ControlledPhaseFlip { control: 0, target: 1 },
        ]);
        let mut registers = vec![false, true, false, true];
        let initial = registers.clone();

        replay_tape(&tape, &mut registers).unwrap();
        replay_tape(&tape.inverted(), &mut registers).unwrap();
        assert_eq!(registers, initial);
    }

    fn demo_oracle() -> (EncodingMap, ConstraintSet, OracleCircuit) {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 0, 0, 4],
            vec![4, 0, 0, 3],
        ])
        .unwrap();
        let map = EncodingMap::from_grid(&grid).unwrap();
        let set = ConstraintSet::derive(&grid, &map);
        let oracle = OracleCompiler::compile(&map, &set).unwrap();
        (map, set, oracle)
    }

    #[test]
    fn test_oracle_marks_exactly_the_satisfying_assignment() {
        let (map, set, oracle) = demo_oracle();
        let mut state = StateVector::uniform(map.bit_count());
        apply_oracle(&mut state, &oracle).unwrap();

        let mut negatives = Vec::new();
        for index in 0..state.dimension() {
            if state.amplitude(index).re < 0.0 {
                negatives.push(index);
            }
        }
        assert_eq!(negatives, vec![22]);
        assert!(set.is_satisfied_by(&map.decode_state(22).unwrap()));
    }

    #[test]
    fn test_oracle_replay_restores_registers() {
        let (map, set, oracle) = demo_oracle();
        for index in [0usize, 22, 85, 255] {
            let mut registers = vec![false; oracle.layout.total_bits()];
            for bit in 0..map.bit_count() {
                registers[bit] = (index >> bit) & 1 == 1;
            }
            let initial = registers.clone();
            let negated = replay_tape(&oracle.tape, &mut registers).unwrap();

            assert_eq!(registers, initial, "index {} left registers dirty", index);
            let satisfied = set.is_satisfied_by(&map.decode_state(index).unwrap());
            assert_eq!(negated, satisfied, "index {} mismarked", index);
        }
    }

    #[test]
    fn test_two_bit_search_reaches_certainty() {
        // two binary cells that must both avoid value 1: the only
        // satisfying assignment is |11>, and one round is exact for N=4
        let mut map = EncodingMap::new(2);
        map.define_variable(0, 0).unwrap();
        map.define_variable(0, 1).unwrap();
        let set = ConstraintSet::from_constraints([
            Constraint::NotEqualConstant { variable: 0, value: 1 },
            Constraint::NotEqualConstant { variable: 1, value: 1 },
        ]);
        let oracle = OracleCompiler::compile(&map, &set).unwrap();
        let engine = AmplificationEngine::new(2);
        assert_eq!(engine.rounds(), 1);

        let run = Simulator::new(24).run_search(&oracle, &engine).unwrap();
        let (winner, probability) = run.state.max_probability_state();
        assert_eq!(winner, 3);
        assert!(probability > 0.999);
        assert!(run.state.is_normalized(TOLERANCE));
    }

    #[test]
    fn test_capacity_ceiling() {
        let simulator = Simulator::new(4);
        assert!(simulator.check_capacity(4).is_ok());
        assert!(matches!(
            simulator.check_capacity(8),
            Err(SolverError::Resource {
                bits: 8,
                max_bits: 4
            })
        ));

        let (_map, _set, oracle) = demo_oracle();
        let engine = AmplificationEngine::new(8);
        assert!(simulator.run_search(&oracle, &engine).is_err());
    }

    #[test]
    fn test_zero_bit_search_is_a_no_op() {
        let grid = Grid::from_rows(vec![
            vec![3, 1, 4, 2],
            vec![2, 4, 3, 1],
            vec![1, 3, 2, 4],
            vec![4, 2, 1, 3],
        ])
        .unwrap();
        let map = EncodingMap::from_grid(&grid).unwrap();
        let set = ConstraintSet::derive(&grid, &map);
        let oracle = OracleCompiler::compile(&map, &set).unwrap();

        let engine = AmplificationEngine::new(0);
        let run = Simulator::new(24).run_search(&oracle, &engine).unwrap();
        assert_eq!(run.state.dimension(), 1);
        assert_eq!(run.statistics.rounds, 0);
        assert!((run.state.probability(0) - 1.0).abs() < TOLERANCE);
    }
}
