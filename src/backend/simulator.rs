// src/backend/simulator.rs

//! Local state-vector sampler.
//!
//! Holds the joint state of all circuit wires as a dense `Complex<f64>`
//! vector of dimension 2^N and replays the circuit once per shot, sampling
//! each measurement from the Born distribution and collapsing the state.
//! Small by design: the experiment never exceeds 8 wires, so a dense vector
//! of 256 amplitudes is the whole cost.

use crate::backend::{MeasurementRecord, Sampler};
use crate::circuits::Circuit;
use crate::core::{DistilError, WireId};
use crate::operations::{Operation, RotationAxis};
use num_complex::Complex;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Ideal (noiseless) sampler executing circuits on a local state vector.
///
/// With a seed the shot sequence is fully deterministic, which the test
/// suites rely on; without one the generator is seeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSimulator {
    seed: Option<u64>,
}

impl LocalSimulator {
    /// Creates a simulator seeded from the operating system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator with a fixed PRNG seed for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl Sampler for LocalSimulator {
    fn run(&self, circuit: &Circuit, repetitions: usize) -> Result<MeasurementRecord, DistilError> {
        if circuit.is_empty() {
            return Ok(MeasurementRecord::new(repetitions));
        }

        let mut engine = StateEngine::init(circuit.wires())?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        // One bit sequence per measured wire, discovery order irrelevant:
        // the record sorts by wire id.
        let mut outcomes: BTreeMap<WireId, Vec<u8>> = BTreeMap::new();
        for op in circuit.operations() {
            if let Operation::Measure { target } = op {
                outcomes.insert(*target, Vec::with_capacity(repetitions));
            }
        }

        for _ in 0..repetitions {
            engine.reset();
            for moment in circuit.moments() {
                for op in moment.operations() {
                    match op {
                        Operation::Measure { target } => {
                            let bit = engine.measure(*target, &mut rng)?;
                            if let Some(bits) = outcomes.get_mut(target) {
                                bits.push(bit);
                            }
                        }
                        _ => engine.apply_operation(op)?,
                    }
                }
            }
        }

        let mut record = MeasurementRecord::new(repetitions);
        for (wire, bits) in outcomes {
            record.insert(wire, bits)?;
        }
        Ok(record)
    }
}

/// The state engine managing and evolving the joint wire state.
/// (Internal visibility)
struct StateEngine {
    /// Maps wire ids to their index (0..N-1) in the ordered list used for
    /// the state vector. Ids are assigned in sorted order so the layout is
    /// deterministic for any wire set.
    wire_indices: HashMap<WireId, usize>,
    /// The joint state vector of all simulated wires, dimension 2^N.
    state: Vec<Complex<f64>>,
    /// Number of wires being simulated (N).
    num_wires: usize,
}

impl StateEngine {
    /// Initializes the engine for a given set of wires, in state |0...0>.
    fn init(wires: &BTreeSet<WireId>) -> Result<Self, DistilError> {
        if wires.is_empty() {
            return Err(DistilError::Simulation {
                message: "cannot initialize state engine with zero wires".to_string(),
            });
        }

        let num_wires = wires.len();
        let dim = 1usize.checked_shl(num_wires as u32).ok_or_else(|| DistilError::Simulation {
            message: format!("{} wires overflow the state vector dimension", num_wires),
        })?;

        // BTreeSet iterates in ascending order, so index assignment is
        // deterministic without an explicit sort.
        let wire_indices: HashMap<WireId, usize> =
            wires.iter().enumerate().map(|(index, wire)| (*wire, index)).collect();

        let mut state = vec![Complex::zero(); dim];
        state[0] = Complex::new(1.0, 0.0);

        Ok(Self { wire_indices, state, num_wires })
    }

    /// Returns the state to |0...0> for the next shot.
    fn reset(&mut self) {
        self.state.fill(Complex::zero());
        self.state[0] = Complex::new(1.0, 0.0);
    }

    /// Applies a single non-measurement operation to the state.
    fn apply_operation(&mut self, op: &Operation) -> Result<(), DistilError> {
        match op {
            Operation::Rotation { target, axis, exponent, global_shift } => {
                let target_index = self.wire_index(*target)?;
                self.apply_single_wire_gate(
                    target_index,
                    &rotation_matrix(*axis, *exponent, *global_shift),
                );
            }
            Operation::Hadamard { target } => {
                let target_index = self.wire_index(*target)?;
                self.apply_single_wire_gate(target_index, &hadamard_matrix());
            }
            Operation::CNot { control, target } => {
                let control_index = self.wire_index(*control)?;
                let target_index = self.wire_index(*target)?;
                if control_index == target_index {
                    return Err(DistilError::Simulation {
                        message: "control and target wires of a CNOT cannot coincide".to_string(),
                    });
                }
                self.apply_two_wire_gate(control_index, target_index, &cnot_matrix())?;
            }
            Operation::Measure { .. } => {
                return Err(DistilError::Simulation {
                    message: "measurement must go through StateEngine::measure".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Samples the computational-basis outcome of one wire and collapses
    /// the state accordingly.
    fn measure(&mut self, wire: WireId, rng: &mut StdRng) -> Result<u8, DistilError> {
        let index = self.wire_index(wire)?;
        let bit_pos = self.num_wires - 1 - index;
        let mask = 1usize << bit_pos;

        let p_one: f64 = self
            .state
            .iter()
            .enumerate()
            .filter(|(k, _)| k & mask != 0)
            .map(|(_, amp)| amp.norm_sqr())
            .sum();

        let outcome: u8 = if rng.random::<f64>() < p_one { 1 } else { 0 };
        let p_outcome = if outcome == 1 { p_one } else { 1.0 - p_one };
        if p_outcome <= 0.0 {
            return Err(DistilError::Simulation {
                message: format!("sampled zero-probability outcome on {}", wire),
            });
        }

        let norm = p_outcome.sqrt();
        for (k, amp) in self.state.iter_mut().enumerate() {
            let bit = u8::from(k & mask != 0);
            if bit == outcome {
                *amp /= norm;
            } else {
                *amp = Complex::zero();
            }
        }
        Ok(outcome)
    }

    /// Helper to get a wire's index, with a specific error if not found.
    fn wire_index(&self, wire: WireId) -> Result<usize, DistilError> {
        self.wire_indices.get(&wire).copied().ok_or_else(|| DistilError::Simulation {
            message: format!("{} not found in simulation context", wire),
        })
    }

    /// Applies a 2x2 matrix to a single wire within the joint state vector.
    ///
    /// Iterates over pairs of basis states differing only at the target
    /// wire's bit position: the running index is split at position `k` and
    /// a 0 or 1 is inserted there.
    fn apply_single_wire_gate(&mut self, target_index: usize, matrix: &[[Complex<f64>; 2]; 2]) {
        let k = self.num_wires - 1 - target_index;
        let k_mask = 1usize << k;
        let lower_mask = k_mask - 1;

        let dim = self.state.len();
        let mut new_state = vec![Complex::zero(); dim];

        for i in 0..dim / 2 {
            let i0 = ((i >> k) << (k + 1)) | (i & lower_mask);
            let i1 = i0 | k_mask;

            let psi0 = self.state[i0];
            let psi1 = self.state[i1];

            new_state[i0] = matrix[0][0] * psi0 + matrix[0][1] * psi1;
            new_state[i1] = matrix[1][0] * psi0 + matrix[1][1] * psi1;
        }

        self.state = new_state;
    }

    /// Applies a 4x4 matrix to two distinct wires within the joint state.
    ///
    /// Matrix rows and columns follow the |first, second> basis order
    /// |00>, |01>, |10>, |11>, where `first` is `index1`'s bit.
    fn apply_two_wire_gate(
        &mut self,
        index1: usize,
        index2: usize,
        matrix: &[[Complex<f64>; 4]; 4],
    ) -> Result<(), DistilError> {
        if index1 == index2 {
            return Err(DistilError::Simulation {
                message: "target indices for a two-wire gate cannot be the same".to_string(),
            });
        }

        let n = self.num_wires;
        let dim = self.state.len();
        let mut new_state = vec![Complex::zero(); dim];

        // Bit positions of the two wires; split the remaining n-2 bits of
        // the running index into lower / middle / upper segments around them.
        let k1_raw = n - 1 - index1;
        let k2_raw = n - 1 - index2;
        let (k_hi, k_lo) = (k1_raw.max(k2_raw), k1_raw.min(k2_raw));

        for i_other in 0..dim / 4 {
            let lower = i_other & ((1usize << k_lo) - 1);
            let middle_width = k_hi - k_lo - 1;
            let middle = ((i_other >> k_lo) & ((1usize << middle_width) - 1)) << (k_lo + 1);
            let upper = (i_other >> (k_hi - 1)) << (k_hi + 1);
            let i_base = upper | middle | lower;

            // Subspace indices for (b1, b2) of the wires at index1/index2;
            // the 4x4 matrix row is b1*2 + b2.
            let indices = [
                i_base,
                i_base | (1usize << k2_raw),
                i_base | (1usize << k1_raw),
                i_base | (1usize << k1_raw) | (1usize << k2_raw),
            ];

            let psi = [
                self.state[indices[0]],
                self.state[indices[1]],
                self.state[indices[2]],
                self.state[indices[3]],
            ];

            for row in 0..4 {
                let mut acc = Complex::zero();
                for (col, amp) in psi.iter().enumerate() {
                    acc += matrix[row][col] * amp;
                }
                new_state[indices[row]] = acc;
            }
        }

        self.state = new_state;
        Ok(())
    }
}

/// The 2x2 unitary of `A^t` with a global phase offset, for Pauli `A`.
///
/// `exp(iπ·t·shift) · A^t`, where `A^t` carries the principal-branch phase
/// `exp(iπ·t/2)` on its rotation part for the X and Y families.
fn rotation_matrix(
    axis: RotationAxis,
    exponent: f64,
    global_shift: f64,
) -> [[Complex<f64>; 2]; 2] {
    let half = PI * exponent / 2.0;
    let cos = half.cos();
    let sin = half.sin();
    let i = Complex::i();

    match axis {
        RotationAxis::X => {
            let phase = Complex::from_polar(1.0, PI * exponent * (global_shift + 0.5));
            [
                [phase * cos, phase * (-i * sin)],
                [phase * (-i * sin), phase * cos],
            ]
        }
        RotationAxis::Y => {
            let phase = Complex::from_polar(1.0, PI * exponent * (global_shift + 0.5));
            [
                [phase * cos, phase * (-sin)],
                [phase * sin, phase * cos],
            ]
        }
        RotationAxis::Z => {
            let phase = Complex::from_polar(1.0, PI * exponent * global_shift);
            [
                [phase, Complex::zero()],
                [Complex::zero(), phase * Complex::from_polar(1.0, PI * exponent)],
            ]
        }
    }
}

fn hadamard_matrix() -> [[Complex<f64>; 2]; 2] {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// Controlled-NOT in the |control, target> basis.
fn cnot_matrix() -> [[Complex<f64>; 4]; 4] {
    let one = Complex::new(1.0, 0.0);
    let zero = Complex::zero();
    [
        [one, zero, zero, zero],
        [zero, one, zero, zero],
        [zero, zero, zero, one],
        [zero, zero, one, zero],
    ]
}
