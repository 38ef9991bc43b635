//! Error handling logic

use std::fmt;

/// Unique identifier for a circuit wire (an addressable qubit position).
///
/// On the trapped-ion gateway a wire id doubles as the hardware qubit index,
/// which is why the ordering of ids is meaningful: outcome tables, bitstring
/// labels and circuit diagrams all list wires in ascending id order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WireId(pub u64);

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Error types for circuit construction, execution and analysis.
#[derive(Debug)]
pub enum DistilError {
    /// Two operations in the same moment act on the same wire.
    WireCollision {
        /// The wire claimed twice.
        wire: WireId,
    },

    /// A parity check or bitstring lookup referenced a wire that is not
    /// present in the outcome table.
    MissingWire {
        /// The absent wire.
        wire: WireId,
    },

    /// A per-wire outcome sequence does not match the repetition count
    /// established by the rest of the table.
    ShotCountMismatch {
        /// The offending wire.
        wire: WireId,
        /// Repetition count established by the table.
        expected: usize,
        /// Length of the sequence being inserted.
        found: usize,
    },

    /// The gateway access token environment variable is unset.
    MissingToken {
        /// Name of the environment variable that was consulted.
        variable: String,
    },

    /// The remote gateway rejected a request, returned a malformed response,
    /// or the transport failed.
    Gateway {
        /// Gateway failure message.
        message: String,
    },

    /// General error encountered during local simulation.
    Simulation {
        /// Simulation failure message.
        message: String,
    },
}

impl fmt::Display for DistilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistilError::WireCollision { wire } => {
                write!(f, "Wire Collision: {} appears twice in one moment", wire)
            }
            DistilError::MissingWire { wire } => {
                write!(f, "Missing Wire: {} has no recorded outcomes", wire)
            }
            DistilError::ShotCountMismatch { wire, expected, found } => write!(
                f,
                "Shot Count Mismatch: {} has {} outcomes, table repetition count is {}",
                wire, found, expected
            ),
            DistilError::MissingToken { variable } => {
                write!(f, "Missing Token: environment variable {} is not set", variable)
            }
            DistilError::Gateway { message } => write!(f, "Gateway Error: {}", message),
            DistilError::Simulation { message } => write!(f, "Simulation Process Error: {}", message),
        }
    }
}

// Implement the standard Error trait to allow for easy integration with Rust error handling.
impl std::error::Error for DistilError {}

impl From<reqwest::Error> for DistilError {
    fn from(err: reqwest::Error) -> Self {
        DistilError::Gateway { message: err.to_string() }
    }
}

impl From<serde_json::Error> for DistilError {
    fn from(err: serde_json::Error) -> Self {
        DistilError::Gateway { message: format!("malformed gateway payload: {}", err) }
    }
}
