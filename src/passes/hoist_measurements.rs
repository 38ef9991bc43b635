/// Pass moving every measurement into one final synchronized moment.
///
/// Measurements are collected in moment-major discovery order, removed from
/// their original positions, and re-appended unchanged as the last moment of
/// the rebuilt circuit. Non-measurement operations keep their relative
/// order; moments emptied by the removal are dropped.
///
/// The final moment is internally consistent as long as no wire is measured
/// more than once. A doubly-measured wire is a bug in the caller's circuit
/// and is not defended against here.
use crate::circuits::{Circuit, Moment};
use crate::operations::Operation;

/// Runs the hoisting pass, returning the rewritten circuit.
pub fn hoist_measurements(circuit: &Circuit) -> Circuit {
    let mut measurements: Vec<Operation> = Vec::new();
    let mut new_moments: Vec<Moment> = Vec::with_capacity(circuit.num_moments() + 1);

    for moment in circuit.moments() {
        let mut kept: Vec<Operation> = Vec::with_capacity(moment.len());
        for op in moment.operations() {
            if op.is_measurement() {
                measurements.push(op.clone());
            } else {
                kept.push(op.clone());
            }
        }
        if !kept.is_empty() {
            new_moments.push(Moment::from_operations(kept));
        }
    }

    if !measurements.is_empty() {
        tracing::debug!(count = measurements.len(), "hoisted measurements into final moment");
        new_moments.push(Moment::from_operations(measurements));
    }

    Circuit::from_moments(new_moments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::WireId;

    fn wid(id: u64) -> WireId {
        WireId(id)
    }

    #[test]
    fn measurements_end_up_in_final_moment() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Hadamard { target: wid(0) })
            .add_op(Operation::Measure { target: wid(0) })
            .add_op(Operation::Hadamard { target: wid(1) })
            .add_op(Operation::Measure { target: wid(1) })
            .build();

        let out = hoist_measurements(&circuit);
        let last = out.moments().last().expect("non-empty circuit");

        assert_eq!(last.len(), 2);
        assert!(last.operations().iter().all(Operation::is_measurement));
        // No measurement anywhere before the final moment.
        for moment in &out.moments()[..out.num_moments() - 1] {
            assert!(moment.operations().iter().all(|op| !op.is_measurement()));
        }
    }

    #[test]
    fn measurement_count_is_preserved() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Measure { target: wid(0) })
            .add_op(Operation::Hadamard { target: wid(1) })
            .add_op(Operation::Measure { target: wid(1) })
            .add_op(Operation::CNot { control: wid(2), target: wid(3) })
            .add_op(Operation::Measure { target: wid(3) })
            .build();

        let before = circuit.operations().filter(|op| op.is_measurement()).count();
        let out = hoist_measurements(&circuit);
        let after = out.operations().filter(|op| op.is_measurement()).count();

        assert_eq!(before, after);
        assert_eq!(out.num_operations(), circuit.num_operations());
    }

    #[test]
    fn non_measurement_order_is_preserved() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Hadamard { target: wid(0) })
            .add_op(Operation::Measure { target: wid(0) })
            .add_op(Operation::CNot { control: wid(1), target: wid(2) })
            .add_op(Operation::Hadamard { target: wid(2) })
            .build();

        let out = hoist_measurements(&circuit);
        let gates: Vec<&Operation> =
            out.operations().filter(|op| !op.is_measurement()).collect();
        let expected: Vec<&Operation> =
            circuit.operations().filter(|op| !op.is_measurement()).collect();

        assert_eq!(gates, expected);
    }

    #[test]
    fn circuit_without_measurements_gains_no_moment() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Hadamard { target: wid(0) })
            .add_op(Operation::CNot { control: wid(0), target: wid(1) })
            .build();

        let out = hoist_measurements(&circuit);
        assert_eq!(out.num_moments(), circuit.num_moments());
        assert_eq!(out, circuit);
    }

    #[test]
    fn emptied_moments_are_dropped() {
        // A moment holding only a measurement disappears after hoisting.
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Measure { target: wid(0) })
            .add_op(Operation::Hadamard { target: wid(1) })
            .build();

        let out = hoist_measurements(&circuit);
        assert!(out.moments().iter().all(|m| !m.is_empty()));
        assert_eq!(out.num_operations(), 2);
    }
}
