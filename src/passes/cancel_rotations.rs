/// Peephole pass deleting adjacent inverse rotation pairs.
///
/// Algorithm
/// ---------
/// Sweep operations in moment-major order. For each single-wire rotation,
/// look up the next operation scheduled on the same wire (any number of
/// moments later: intervening moments that do not touch the wire are
/// transparent). If that neighbour is a rotation of the same family with an
/// equal global shift and an exponent that is the exact negative, mark both
/// for deletion. Anything else is a no-op for this position.
///
/// One greedy sweep, forward only: a marked partner is skipped when the
/// sweep reaches it, deletions are never re-examined, and there is no
/// fixed-point iteration. Exponents compare by exact `f64` equality: the
/// pass removes gates the caller wrote as literal inverses, it does not do
/// angle arithmetic.
use crate::circuits::{Circuit, Moment};
use crate::core::WireId;
use crate::operations::Operation;
use std::collections::HashSet;

/// Reduction summary reported by the cancellation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationStats {
    /// Number of inverse rotation pairs deleted (two operations each).
    pub pairs_removed: usize,
}

/// Runs the cancellation sweep, returning the rewritten circuit and stats.
///
/// Moments emptied by deletion are dropped from the rebuilt circuit.
pub fn cancel_opposite_rotations(circuit: &Circuit) -> (Circuit, CancellationStats) {
    // A rotation is single-wire, so (moment index, wire) identifies it.
    let mut deleted: HashSet<(usize, WireId)> = HashSet::new();
    let mut pairs_removed = 0usize;

    for (moment_index, moment) in circuit.moments().iter().enumerate() {
        for op in moment.operations() {
            let Operation::Rotation { target, .. } = op else {
                continue;
            };
            if deleted.contains(&(moment_index, *target)) {
                // Partner of an earlier cancellation; not re-examined.
                continue;
            }
            let Some((next_index, next_op)) = circuit.next_operation_on(*target, moment_index)
            else {
                continue;
            };
            if is_inverse_pair(op, next_op) {
                deleted.insert((moment_index, *target));
                deleted.insert((next_index, *target));
                pairs_removed += 1;
            }
        }
    }

    let mut new_moments = Vec::with_capacity(circuit.num_moments());
    for (moment_index, moment) in circuit.moments().iter().enumerate() {
        let kept: Vec<Operation> = moment
            .operations()
            .iter()
            .filter(|op| match op {
                Operation::Rotation { target, .. } => !deleted.contains(&(moment_index, *target)),
                _ => true,
            })
            .cloned()
            .collect();
        if !kept.is_empty() {
            new_moments.push(Moment::from_operations(kept));
        }
    }

    if pairs_removed > 0 {
        tracing::debug!(pairs_removed, "cancelled inverse rotation pairs");
    }
    (Circuit::from_moments(new_moments), CancellationStats { pairs_removed })
}

/// True when `a` and `b` are rotations on the same wire, of the same family,
/// with equal global shifts and exactly negated exponents.
fn is_inverse_pair(a: &Operation, b: &Operation) -> bool {
    match (a, b) {
        (
            Operation::Rotation { target: t1, axis: a1, exponent: e1, global_shift: s1 },
            Operation::Rotation { target: t2, axis: a2, exponent: e2, global_shift: s2 },
        ) => t1 == t2 && a1 == a2 && s1 == s2 && *e1 == -*e2,
        _ => false,
    }
}
