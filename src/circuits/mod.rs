// src/circuits/mod.rs

//! Defines structures for representing and building moment-ordered sequences
//! of operations (`qdistil::operations::Operation`).
//!
//! A circuit is an ordered list of [`Moment`]s; a moment is a synchronization
//! step whose operations act on pairwise-disjoint wire sets. Rewrite passes
//! never mutate a circuit in place: they read one circuit and rebuild a new
//! one from fresh moments, so a pass can never alias its caller's data.

use crate::core::{DistilError, WireId};
use crate::operations::Operation;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A single synchronization step: a set of operations with disjoint wires.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Moment {
    operations: Vec<Operation>,
}

impl Moment {
    /// Creates an empty moment.
    pub fn new() -> Self {
        Self { operations: Vec::new() }
    }

    /// Creates a moment directly from a list of operations.
    ///
    /// The wire-disjointness invariant is NOT checked here: callers such as
    /// the measurement-hoisting pass guarantee it structurally (one
    /// measurement per wire). Use [`Moment::push`] when the operations come
    /// from an untrusted source.
    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    /// Appends an operation, rejecting it if any of its wires is already
    /// occupied within this moment.
    pub fn push(&mut self, op: Operation) -> Result<(), DistilError> {
        for wire in op.involved_wires() {
            if self.touches(wire) {
                return Err(DistilError::WireCollision { wire });
            }
        }
        self.operations.push(op);
        Ok(())
    }

    /// Appends an operation known not to collide (insertion-strategy internal).
    pub(crate) fn push_unchecked(&mut self, op: Operation) {
        self.operations.push(op);
    }

    /// The operations scheduled in this moment, in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns the operation acting on `wire` in this moment, if any.
    pub fn operation_on(&self, wire: WireId) -> Option<&Operation> {
        self.operations.iter().find(|op| op.acts_on(wire))
    }

    /// `true` if any operation in this moment acts on `wire`.
    pub fn touches(&self, wire: WireId) -> bool {
        self.operations.iter().any(|op| op.acts_on(wire))
    }

    /// `true` if any operation in this moment acts on any of `wires`.
    pub fn touches_any(&self, wires: &[WireId]) -> bool {
        wires.iter().any(|w| self.touches(*w))
    }

    /// Number of operations in this moment.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// `true` if the moment contains no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// An ordered sequence of moments applied to a set of wires.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Circuit {
    /// The unique set of wires involved across all operations. Kept sorted
    /// so index assignment and display rows are deterministic.
    wires: BTreeSet<WireId>,

    /// The ordered sequence of moments defining the circuit's schedule.
    moments: Vec<Moment>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self { wires: BTreeSet::new(), moments: Vec::new() }
    }

    /// Rebuilds a circuit from an explicit moment list.
    ///
    /// The involved-wire set is recomputed from the given operations. Moments
    /// are taken exactly as given; callers that delete operations are
    /// expected to filter out moments they emptied.
    pub fn from_moments(moments: Vec<Moment>) -> Self {
        let mut wires = BTreeSet::new();
        for moment in &moments {
            for op in moment.operations() {
                wires.extend(op.involved_wires());
            }
        }
        Self { wires, moments }
    }

    /// Appends an operation using earliest-available-slot scheduling.
    ///
    /// The operation is placed in the earliest moment after the last moment
    /// that touches any of its wires; if that would land past the end of the
    /// circuit, a new moment is appended. This reproduces how a sequential
    /// `append` of gates packs into moments.
    pub fn add_operation(&mut self, op: Operation) {
        let op_wires = op.involved_wires();
        for wire in &op_wires {
            self.wires.insert(*wire);
        }

        // Walk back over trailing moments that are free on all of our wires.
        let mut index = self.moments.len();
        while index > 0 && !self.moments[index - 1].touches_any(&op_wires) {
            index -= 1;
        }

        if index == self.moments.len() {
            let mut moment = Moment::new();
            moment.push_unchecked(op);
            self.moments.push(moment);
        } else {
            // This moment is free on every wire of `op` by construction.
            self.moments[index].push_unchecked(op);
        }
    }

    /// Appends multiple operations from an iterator.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// The sorted set of wires involved in this circuit.
    pub fn wires(&self) -> &BTreeSet<WireId> {
        &self.wires
    }

    /// The ordered moment sequence.
    pub fn moments(&self) -> &[Moment] {
        &self.moments
    }

    /// Number of moments in the circuit.
    pub fn num_moments(&self) -> usize {
        self.moments.len()
    }

    /// Total number of operations across all moments.
    pub fn num_operations(&self) -> usize {
        self.moments.iter().map(Moment::len).sum()
    }

    /// `true` if the circuit contains no operations.
    pub fn is_empty(&self) -> bool {
        self.moments.iter().all(Moment::is_empty)
    }

    /// Iterates all operations in moment-major order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.moments.iter().flat_map(|m| m.operations().iter())
    }

    /// Finds the next operation acting on `wire` strictly after moment
    /// `after`, returning its moment index and the operation.
    ///
    /// Returns `None` if no later moment schedules anything on that wire.
    pub fn next_operation_on(&self, wire: WireId, after: usize) -> Option<(usize, &Operation)> {
        self.moments
            .iter()
            .enumerate()
            .skip(after + 1)
            .find_map(|(index, moment)| moment.operation_on(wire).map(|op| (index, op)))
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Creates a new, empty CircuitBuilder.
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    ///
    /// Returns `self` to allow for continued method chaining.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Finalizes the construction process and returns the built `Circuit`.
    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "qdistil::Circuit[0 moments on 0 wires]");
        }

        let num_moments = self.moments.len();

        // Sorted wire rows
        let sorted_wires: Vec<WireId> = self.wires.iter().copied().collect();
        let num_wires = sorted_wires.len();
        let wire_to_row: HashMap<WireId, usize> =
            sorted_wires.iter().enumerate().map(|(i, w)| (*w, i)).collect();

        let max_label_width = sorted_wires.iter().map(|w| format!("{}", w).len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][column] is the rendered cell; one column per moment
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_moments]; num_wires];
        // v_connect[row][column] is the vertical connector below the row
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_moments]; num_wires];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre = total_dashes / 2;
                let post = total_dashes - pre;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre),
                    symbol,
                    H_WIRE.to_string().repeat(post)
                )
            }
        }

        for (t, moment) in self.moments.iter().enumerate() {
            for op in moment.operations() {
                match op {
                    Operation::Rotation { target, axis, exponent, .. } => {
                        if let Some(r) = wire_to_row.get(target) {
                            op_grid[*r][t] = format_gate(&format!("{}^{}", axis, exponent));
                        }
                    }
                    Operation::Hadamard { target } => {
                        if let Some(r) = wire_to_row.get(target) {
                            op_grid[*r][t] = format_gate("H");
                        }
                    }
                    Operation::Measure { target } => {
                        if let Some(r) = wire_to_row.get(target) {
                            op_grid[*r][t] = format_gate("M");
                        }
                    }
                    Operation::CNot { control, target } => {
                        if let (Some(r_ctrl), Some(r_tgt)) =
                            (wire_to_row.get(control), wire_to_row.get(target))
                        {
                            op_grid[*r_ctrl][t] = format_gate("@");
                            op_grid[*r_tgt][t] = format_gate("X");

                            let r_min = (*r_ctrl).min(*r_tgt);
                            let r_max = (*r_ctrl).max(*r_tgt);
                            for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                                row_vec[t] = V_WIRE;
                            }
                        }
                    }
                }
            }
        }

        writeln!(
            f,
            "qdistil::Circuit[{} moments, {} operations on {} wires]",
            num_moments,
            self.num_operations(),
            num_wires
        )?;
        for r in 0..num_wires {
            let label = format!("{}: ", sorted_wires[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_wires - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_moments {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre = padding_needed / 2;
                    let post = padding_needed - pre;
                    write!(f, "{}{}{}", " ".repeat(pre), connector, " ".repeat(post))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
