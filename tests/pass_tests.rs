// tests/pass_tests.rs

// Rewrite-pass behavior over realistically built circuits.

use qdistil::{
    CircuitBuilder, Operation, RotationAxis, WireId, cancel_opposite_rotations,
    hoist_measurements, protocol,
};

fn wid(id: u64) -> WireId {
    WireId(id)
}

fn z_rot(wire: u64, exponent: f64) -> Operation {
    Operation::Rotation {
        target: wid(wire),
        axis: RotationAxis::Z,
        exponent,
        global_shift: 0.0,
    }
}

#[test]
fn cancellation_is_a_no_op_on_the_fixed_topology() {
    // The distillation circuit contains no rotations at all, so the pass
    // must hand back an identical circuit.
    let circuit = protocol::y_distillation_circuit();
    let (out, stats) = cancel_opposite_rotations(&circuit);

    assert_eq!(stats.pairs_removed, 0);
    assert_eq!(out, circuit);
}

#[test]
fn phase_round_followed_by_inverse_round_cancels_completely() {
    // A transversal Z^(1/2) round immediately followed by its inverse is
    // exactly the material the pass exists for: seven adjacent pairs.
    let mut builder = CircuitBuilder::new();
    for wire in 1..protocol::NUM_WIRES {
        builder = builder.add_op(z_rot(wire, 0.5));
    }
    for wire in 1..protocol::NUM_WIRES {
        builder = builder.add_op(z_rot(wire, -0.5));
    }
    let circuit = builder.build();

    let (out, stats) = cancel_opposite_rotations(&circuit);
    assert_eq!(stats.pairs_removed, 7);
    assert!(out.is_empty());
}

#[test]
fn cancellation_leaves_the_readout_structure_alone() {
    // Inverse pair on one wire embedded in a measured circuit: only the
    // pair disappears, readout gates and measurements survive.
    let circuit = CircuitBuilder::new()
        .add_op(Operation::Hadamard { target: wid(1) })
        .add_op(z_rot(2, 0.5))
        .add_op(z_rot(2, -0.5))
        .add_op(Operation::Measure { target: wid(1) })
        .add_op(Operation::Hadamard { target: wid(2) })
        .add_op(Operation::Measure { target: wid(2) })
        .build();

    let (out, stats) = cancel_opposite_rotations(&circuit);
    assert_eq!(stats.pairs_removed, 1);
    assert_eq!(out.num_operations(), 4);
    assert_eq!(out.operations().filter(|op| op.is_measurement()).count(), 2);
}

#[test]
fn hoisting_gathers_all_readout_measurements() {
    let circuit = protocol::y_distillation_circuit();
    let hoisted = hoist_measurements(&circuit);

    let last = hoisted.moments().last().expect("circuit is non-empty");
    assert_eq!(last.len(), 7);
    assert!(last.operations().iter().all(Operation::is_measurement));

    // Same measured wires as before the pass.
    let wires_before: Vec<WireId> = circuit
        .operations()
        .filter_map(|op| match op {
            Operation::Measure { target } => Some(*target),
            _ => None,
        })
        .collect();
    let wires_after: Vec<WireId> = last
        .operations()
        .iter()
        .filter_map(|op| match op {
            Operation::Measure { target } => Some(*target),
            _ => None,
        })
        .collect();
    assert_eq!(wires_before, wires_after);
}

#[test]
fn hoisting_leaves_no_measurement_before_the_final_moment() {
    // Interleaved H/M readout spreads measurements over several moments;
    // afterwards exactly one moment contains any.
    let circuit = protocol::y_distillation_circuit();
    let hoisted = hoist_measurements(&circuit);

    let measuring_moments = hoisted
        .moments()
        .iter()
        .filter(|moment| moment.operations().iter().any(Operation::is_measurement))
        .count();
    assert_eq!(measuring_moments, 1);
    assert_eq!(hoisted.num_operations(), circuit.num_operations());
}

#[test]
fn passes_compose_in_pipeline_order() {
    // Cancellation first, hoisting second: the pipeline the experiment runs.
    let circuit = protocol::y_distillation_circuit_with_phase_round();
    let (cancelled, stats) = cancel_opposite_rotations(&circuit);
    // The single phase round has no inverse partner: nothing to delete.
    assert_eq!(stats.pairs_removed, 0);

    let hoisted = hoist_measurements(&cancelled);
    let last = hoisted.moments().last().expect("circuit is non-empty");
    assert_eq!(last.len(), 7);
    assert_eq!(hoisted.num_operations(), circuit.num_operations());
}
