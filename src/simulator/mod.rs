//! Dense state-vector simulation of the amplification circuit

pub mod executor;
pub mod state;

pub use executor::{
    apply_oracle, apply_tape, replay_tape, SearchRun, Simulator, SimulatorStatistics,
};
pub use state::StateVector;
