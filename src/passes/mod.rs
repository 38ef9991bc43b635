// src/passes/mod.rs

//! Circuit-rewriting passes applied before submission.
//!
//! Both passes are rebuild-style: they take a circuit by reference and
//! return a new one, leaving the input untouched.

pub mod cancel_rotations;
pub mod hoist_measurements;

pub use cancel_rotations::{CancellationStats, cancel_opposite_rotations};
pub use hoist_measurements::hoist_measurements;
