// src/operations/mod.rs

//! Defines the gate alphabet of the distillation experiment.
//!
//! The set is deliberately closed: the three rotation families the
//! cancellation pass reasons about, the two Clifford gates the encoding
//! circuit is written in, and measurement. Arbitrary gate-set support is a
//! non-goal; everything downstream matches exhaustively on these variants.

use crate::core::WireId;
use std::fmt;

/// The rotation family of a single-wire rotation operation.
///
/// Two rotations can only cancel within the same family; the cancellation
/// pass never compares across families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    /// Rotation about the X axis.
    X,
    /// Rotation about the Y axis.
    Y,
    /// Rotation about the Z axis.
    Z,
}

impl fmt::Display for RotationAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationAxis::X => write!(f, "X"),
            RotationAxis::Y => write!(f, "Y"),
            RotationAxis::Z => write!(f, "Z"),
        }
    }
}

/// A single scheduled operation: a gate plus the wire(s) it acts on.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A single-wire rotation `A^t` with an overall phase factor, where `A`
    /// is the Pauli operator named by `axis` and `t` is the exponent.
    ///
    /// The unitary is `exp(iπ·t·global_shift) · A^t`; an exponent of 1 is a
    /// full Pauli, an exponent of 1/2 a square root. `global_shift` moves
    /// phase between the eigenvalues and matters to the cancellation pass:
    /// two rotations are exact inverses only when their shifts agree and
    /// their exponents are exact negatives.
    Rotation {
        /// The target wire.
        target: WireId,
        /// The rotation family.
        axis: RotationAxis,
        /// The exponent `t` of the Pauli power.
        exponent: f64,
        /// The overall phase offset `s` in `exp(iπ·t·s)`.
        global_shift: f64,
    },

    /// The Hadamard gate. Used for plus-state preparation and for rotating
    /// wires into the X basis before readout.
    ///
    /// Deliberately not a `Rotation` variant: it belongs to none of the
    /// three rotation families, so the cancellation pass ignores it.
    Hadamard {
        /// The target wire.
        target: WireId,
    },

    /// Controlled-NOT between two distinct wires.
    CNot {
        /// The control wire.
        control: WireId,
        /// The target wire.
        target: WireId,
    },

    /// Single-wire computational-basis measurement, yielding one outcome
    /// bit per shot.
    Measure {
        /// The measured wire.
        target: WireId,
    },
}

impl Operation {
    /// Returns the wires this operation acts on, control first for `CNot`.
    pub fn involved_wires(&self) -> Vec<WireId> {
        match self {
            Operation::Rotation { target, .. } => vec![*target],
            Operation::Hadamard { target } => vec![*target],
            Operation::CNot { control, target } => vec![*control, *target],
            Operation::Measure { target } => vec![*target],
        }
    }

    /// `true` for measurement operations.
    pub fn is_measurement(&self) -> bool {
        matches!(self, Operation::Measure { .. })
    }

    /// `true` for single-wire rotation operations of any family.
    pub fn is_rotation(&self) -> bool {
        matches!(self, Operation::Rotation { .. })
    }

    /// `true` if this operation acts on `wire`.
    pub fn acts_on(&self, wire: WireId) -> bool {
        self.involved_wires().contains(&wire)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Rotation { target, axis, exponent, global_shift } => {
                if *global_shift == 0.0 {
                    write!(f, "{}^{}({})", axis, exponent, target)
                } else {
                    write!(f, "{}^{}[s={}]({})", axis, exponent, global_shift, target)
                }
            }
            Operation::Hadamard { target } => write!(f, "H({})", target),
            Operation::CNot { control, target } => write!(f, "CNOT({}, {})", control, target),
            Operation::Measure { target } => write!(f, "M({})", target),
        }
    }
}
