//! Amplitude-amplification schedule: round count and diffusion circuit

use crate::circuit::{Instruction, InstructionTape};
use std::f64::consts::PI;

/// Optimal number of amplification rounds for a search over
/// `2^variable_bits` states with one marked state.
///
/// With `theta = asin(1/sqrt(N))`, the success probability after `k`
/// rounds is `sin^2((2k+1) * theta)`, maximized near
/// `k = pi / (4 * theta) - 1/2`. Rounded to the nearest integer and
/// clamped at zero; tiny search spaces simply skip amplification.
pub fn optimal_rounds(variable_bits: usize) -> usize {
    let states = 2f64.powi(variable_bits as i32);
    let theta = (1.0 / states.sqrt()).asin();
    let rounds = PI / (4.0 * theta) - 0.5;
    rounds.round().max(0.0) as usize
}

/// Probability of reading out the marked state after `rounds` rounds,
/// assuming exactly one of the `2^variable_bits` states is marked.
pub fn success_probability(variable_bits: usize, rounds: usize) -> f64 {
    if variable_bits == 0 {
        return 1.0;
    }
    let states = 2f64.powi(variable_bits as i32);
    let theta = (1.0 / states.sqrt()).asin();
    ((2 * rounds + 1) as f64 * theta).sin().powi(2)
}

/// The per-search amplification program: a superposition prologue and one
/// diffusion tape, replayed once per round after the oracle's phase
/// marking.
#[derive(Debug, Clone)]
pub struct AmplificationEngine {
    variable_bits: usize,
    rounds: usize,
    superposition: InstructionTape,
    diffusion: InstructionTape,
}

impl AmplificationEngine {
    /// Schedule with the analytically optimal round count.
    pub fn new(variable_bits: usize) -> Self {
        Self::with_rounds(variable_bits, optimal_rounds(variable_bits))
    }

    /// Schedule with an explicit round count.
    pub fn with_rounds(variable_bits: usize, rounds: usize) -> Self {
        Self {
            variable_bits,
            rounds,
            superposition: superposition_tape(variable_bits),
            diffusion: diffusion_tape(variable_bits),
        }
    }

    pub fn variable_bits(&self) -> usize {
        self.variable_bits
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Hadamard layer preparing the uniform superposition.
    pub fn superposition(&self) -> &InstructionTape {
        &self.superposition
    }

    /// Inversion about the mean, as instructions over the variable bits.
    pub fn diffusion(&self) -> &InstructionTape {
        &self.diffusion
    }
}

fn superposition_tape(variable_bits: usize) -> InstructionTape {
    let mut tape = InstructionTape::new();
    for target in 0..variable_bits {
        tape.push(Instruction::Hadamard { target });
    }
    tape
}

/// H on every bit, X on every bit, a phase flip conditioned on all bits,
/// then the X and H layers mirrored back.
fn diffusion_tape(variable_bits: usize) -> InstructionTape {
    let mut tape = InstructionTape::new();
    if variable_bits == 0 {
        return tape;
    }

    for target in 0..variable_bits {
        tape.push(Instruction::Hadamard { target });
    }
    for target in 0..variable_bits {
        tape.push(Instruction::Flip { target });
    }

    match variable_bits {
        1 => tape.push(Instruction::PhaseFlip { target: 0 }),
        2 => tape.push(Instruction::ControlledPhaseFlip { control: 0, target: 1 }),
        _ => tape.push(Instruction::MultiControlledPhaseFlip {
            controls: (0..variable_bits - 1).collect(),
            target: variable_bits - 1,
        }),
    }

    for target in 0..variable_bits {
        tape.push(Instruction::Flip { target });
    }
    for target in 0..variable_bits {
        tape.push(Instruction::Hadamard { target });
    }
    tape
}
