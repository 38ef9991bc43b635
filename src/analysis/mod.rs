// src/analysis/mod.rs

//! Parity extraction and acceptance statistics for distillation runs.
//!
//! The analyzer consumes a [`MeasurementRecord`] and a set of parity checks:
//! the protocol's stabilizers, whose joint parity decides whether a shot is
//! kept, and one byproduct check, whose sign says whether the distilled
//! output state needs a Pauli correction. Stabilizers and the byproduct
//! tracker are separate inputs on purpose: they play different roles and
//! nothing downstream should have to tell them apart by name.

use crate::backend::MeasurementRecord;
use crate::core::{DistilError, WireId};
use std::collections::BTreeMap;
use std::fmt;

/// A named, read-only subset of wires whose joint parity is of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityCheck {
    /// Display name of the check (e.g. a plaquette label).
    pub name: String,
    /// The wires entering the modulo-2 sum.
    pub wires: Vec<WireId>,
}

impl ParityCheck {
    /// Creates a named parity check over the given wires.
    pub fn new(name: impl Into<String>, wires: Vec<WireId>) -> Self {
        Self { name: name.into(), wires }
    }
}

/// The per-shot ±1 parities of one check across a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParitySeries {
    /// Name of the originating check.
    pub name: String,
    /// One ±1 value per shot.
    pub values: Vec<i8>,
}

/// Computes the parity sequence of one check over all shots.
///
/// For each shot the bits at the listed wires are summed modulo 2 and
/// mapped 0 to +1 (even) and 1 to -1 (odd). A wire absent from the outcome
/// table propagates as [`DistilError::MissingWire`].
pub fn compute_parity(
    check: &ParityCheck,
    record: &MeasurementRecord,
) -> Result<ParitySeries, DistilError> {
    let mut values = Vec::with_capacity(record.repetitions());
    for shot in 0..record.repetitions() {
        let mut sum = 0u32;
        for wire in &check.wires {
            sum += u32::from(record.bit(*wire, shot)?);
        }
        // 0 -> 1 (even) and 1 -> -1 (odd)
        values.push(1 - 2 * (sum % 2) as i8);
    }
    Ok(ParitySeries { name: check.name.clone(), values })
}

/// Frequency and correction data of one accepted measurement pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsEntry {
    /// How many accepted shots produced this bitstring.
    pub count: u64,
    /// Byproduct sign of the first accepted shot with this bitstring:
    /// -1 means the distilled output needs a Z correction.
    pub correction: i8,
}

/// One row of the per-shot console dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotReport {
    /// Shot index within the run.
    pub index: usize,
    /// Concatenated outcome bits of the shot, ascending wire order.
    pub bitstring: String,
    /// The ±1 parity of each stabilizer at this shot, in input order.
    pub stabilizer_parities: Vec<i8>,
    /// Whether the product of stabilizer parities was even (+1).
    pub accepted: bool,
}

/// Aggregated outcome of a distillation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistillationStats {
    /// Accepted measurement patterns keyed by bitstring label.
    pub entries: BTreeMap<String, StatsEntry>,
    /// Per-shot rows in shot order, accepted and rejected alike.
    pub shots: Vec<ShotReport>,
    /// Number of accepted shots (equals the sum of all entry counts).
    pub accepted: u64,
    /// Number of shots discarded for odd joint parity.
    pub rejected: u64,
}

impl DistillationStats {
    fn empty(repetitions: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            shots: Vec::with_capacity(repetitions),
            accepted: 0,
            rejected: 0,
        }
    }
}

impl fmt::Display for DistillationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distillation Statistics:")?;
        if self.entries.is_empty() {
            writeln!(f, "  No shots were accepted.")?;
        } else {
            writeln!(f, "  {:<12} {:>6} {:>11}", "bitstring", "count", "correction")?;
            for (bitstring, entry) in &self.entries {
                writeln!(f, "  {:<12} {:>6} {:>11}", bitstring, entry.count, entry.correction)?;
            }
        }
        writeln!(
            f,
            "  Accepted {} of {} shots ({} rejected for odd parity)",
            self.accepted,
            self.shots.len(),
            self.rejected
        )
    }
}

/// Folds all shots of a run into acceptance statistics.
///
/// Per shot: the stabilizer parities are multiplied together; a product of
/// +1 (even joint parity) accepts the shot, -1 discards it. Accepted shots
/// are folded into the entry map under their bitstring label. The first
/// accepted occurrence of a label records that shot's byproduct sign; later
/// occurrences only increment the count. When the byproduct signs of
/// repeated bitstrings disagree, the later signs are silently dropped: a
/// known ambiguity of the protocol's bookkeeping, preserved as is.
///
/// Every parity series must stem from `record`; series lengths are checked
/// against the record's repetition count.
pub fn generate_stats(
    record: &MeasurementRecord,
    stabilizers: &[ParitySeries],
    byproduct: &ParitySeries,
) -> Result<DistillationStats, DistilError> {
    let repetitions = record.repetitions();
    for series in stabilizers.iter().chain(std::iter::once(byproduct)) {
        if series.values.len() != repetitions {
            return Err(DistilError::Simulation {
                message: format!(
                    "parity series '{}' has {} values for {} shots",
                    series.name,
                    series.values.len(),
                    repetitions
                ),
            });
        }
    }

    let stats = (0..repetitions).fold(DistillationStats::empty(repetitions), |mut acc, shot| {
        let stabilizer_parities: Vec<i8> =
            stabilizers.iter().map(|series| series.values[shot]).collect();
        let joint: i8 = stabilizer_parities.iter().product();
        let bitstring = record.bitstring(shot);
        let accepted = joint == 1;

        if accepted {
            acc.accepted += 1;
            acc.entries
                .entry(bitstring.clone())
                .or_insert(StatsEntry { count: 0, correction: byproduct.values[shot] })
                .count += 1;
        } else {
            acc.rejected += 1;
        }

        acc.shots.push(ShotReport { index: shot, bitstring, stabilizer_parities, accepted });
        acc
    });

    Ok(stats)
}
