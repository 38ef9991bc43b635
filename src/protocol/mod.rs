// src/protocol/mod.rs

//! The fixed Steane-code Y-state distillation protocol.
//!
//! Everything here is a constant of the experiment: the 8-wire encoding
//! topology, the three plaquette stabilizers whose joint parity accepts a
//! shot, and the byproduct check that tracks whether the distilled output
//! needs a Z correction. Wire 0 carries the logical output and is the one
//! wire that is never measured. The Steane qubits are numbered 1 to 7, so
//! wire 0 doubles as the output without renumbering them.

use crate::analysis::ParityCheck;
use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::WireId;
use crate::operations::{Operation, RotationAxis};

/// Number of wires used by the distillation circuit.
pub const NUM_WIRES: u64 = 8;

/// The protocol's logical output wire, deliberately left unmeasured.
pub const OUTPUT_WIRE: WireId = WireId(0);

/// Default number of repetitions sampled per run.
pub const DEFAULT_SHOTS: usize = 100;

/// The wires of the distillation circuit, in hardware order.
pub fn distillation_wires() -> Vec<WireId> {
    (0..NUM_WIRES).map(WireId).collect()
}

/// Builds the fixed distillation circuit.
pub fn y_distillation_circuit() -> Circuit {
    build_circuit(false)
}

/// Builds the distillation circuit with a transversal phase round: a
/// Z^(1/2) on each Steane qubit between encoding and readout. Off the
/// default path; this is the variant that hands the cancellation pass
/// something to chew on when an experiment appends the inverse round.
pub fn y_distillation_circuit_with_phase_round() -> Circuit {
    build_circuit(true)
}

fn build_circuit(phase_round: bool) -> Circuit {
    let q = distillation_wires();
    let mut builder = CircuitBuilder::new()
        // Output wire and Steane plus states
        .add_op(Operation::Hadamard { target: q[0] })
        .add_op(Operation::Hadamard { target: q[1] })
        .add_op(Operation::Hadamard { target: q[2] })
        .add_op(Operation::Hadamard { target: q[3] })
        // Bell pair binding the output to the code block
        .add_op(Operation::CNot { control: q[0], target: q[7] })
        // Encoding fan-out, four control groups
        .add_op(Operation::CNot { control: q[7], target: q[4] })
        .add_op(Operation::CNot { control: q[7], target: q[5] })
        .add_op(Operation::CNot { control: q[3], target: q[4] })
        .add_op(Operation::CNot { control: q[3], target: q[5] })
        .add_op(Operation::CNot { control: q[3], target: q[6] })
        .add_op(Operation::CNot { control: q[2], target: q[5] })
        .add_op(Operation::CNot { control: q[2], target: q[6] })
        .add_op(Operation::CNot { control: q[2], target: q[7] })
        .add_op(Operation::CNot { control: q[1], target: q[4] })
        .add_op(Operation::CNot { control: q[1], target: q[6] })
        .add_op(Operation::CNot { control: q[1], target: q[7] });

    if phase_round {
        builder = builder.add_ops((1..NUM_WIRES).map(|i| Operation::Rotation {
            target: WireId(i),
            axis: RotationAxis::Z,
            exponent: 0.5,
            global_shift: 0.0,
        }));
    }

    // X-basis readout of the Steane qubits; wire 0 stays live.
    for i in 1..NUM_WIRES {
        builder = builder
            .add_op(Operation::Hadamard { target: WireId(i) })
            .add_op(Operation::Measure { target: WireId(i) });
    }

    builder.build()
}

/// The three plaquette stabilizers of the distillation readout.
///
/// A shot is accepted when the product of all three parities is +1.
pub fn stabilizer_checks() -> Vec<ParityCheck> {
    vec![
        ParityCheck::new("plaq1", vec![WireId(3), WireId(4), WireId(5), WireId(6)]),
        ParityCheck::new("plaq2", vec![WireId(2), WireId(5), WireId(6), WireId(7)]),
        ParityCheck::new("plaq3", vec![WireId(1), WireId(4), WireId(6), WireId(7)]),
    ]
}

/// The byproduct check over all measured wires; a -1 parity means the
/// distilled output state carries a flipped sign and needs a Z correction.
pub fn byproduct_check() -> ParityCheck {
    ParityCheck::new("byprod", (1..NUM_WIRES).map(WireId).collect())
}
