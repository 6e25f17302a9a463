//! Configuration management for the amplitude amplification Sudoku solver

pub mod settings;

pub use settings::{
    Settings, SolverConfig, PreprocessingConfig, InputConfig, OutputConfig,
    OutputFormat, CliOverrides,
};
