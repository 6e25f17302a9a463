//! Grover-style amplitude amplification over the compiled oracle

pub mod engine;

pub use engine::{optimal_rounds, success_probability, AmplificationEngine};
