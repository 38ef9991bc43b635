// src/backend/mod.rs

//! Execution backends: run a circuit for a number of repetitions and return
//! per-wire outcome bits.
//!
//! This module contains the [`Sampler`] seam between the experiment and
//! whatever executes it: the bundled state-vector simulator or the remote
//! trapped-ion gateway.

mod results;
pub mod gateway;
pub mod simulator;

// Re-export the main public interface types
pub use gateway::RemoteSampler;
pub use results::MeasurementRecord;
pub use simulator::LocalSimulator;

use crate::circuits::Circuit;
use crate::core::DistilError;

/// Anything that can execute a circuit and sample its measurements.
///
/// One call submits the circuit and blocks until all `repetitions` shots are
/// available. There is no partial-result surface and no cancellation.
pub trait Sampler {
    /// Runs `circuit` for `repetitions` shots, returning one outcome bit per
    /// shot for every measured wire.
    fn run(&self, circuit: &Circuit, repetitions: usize) -> Result<MeasurementRecord, DistilError>;
}
