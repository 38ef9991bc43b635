// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;

// Re-export public types for convenient access via `qdistil::core::TypeName`
pub use error::{DistilError, WireId};
