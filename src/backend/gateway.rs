// src/backend/gateway.rs

//! Remote trapped-ion gateway sampler.
//!
//! Speaks the gateway's JSON protocol: one submission request carrying the
//! serialized operation list, then polling on the returned job id until the
//! service reports the run finished. There is deliberately no timeout and
//! no retry: a run blocks until the gateway answers, and any transport or
//! service failure propagates as [`DistilError::Gateway`].
//!
//! Decomposition of Hadamard and CNOT into the ion-native gate set is the
//! gateway's concern; operations are submitted as written.

use crate::backend::{MeasurementRecord, Sampler};
use crate::circuits::Circuit;
use crate::core::{DistilError, WireId};
use crate::operations::{Operation, RotationAxis};
use serde::{Deserialize, Serialize};
use std::env;
use std::thread;
use std::time::Duration;

/// Environment variable holding the gateway access token.
pub const TOKEN_ENV_VAR: &str = "AQT_TOKEN";

/// Default gateway endpoint (the hosted noise-model simulator).
pub const DEFAULT_REMOTE_HOST: &str = "https://gateway.aqt.eu/marmot/sim/noise-model-1";

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Sampler submitting circuits to a remote gateway endpoint.
pub struct RemoteSampler {
    host: String,
    access_token: String,
    client: reqwest::blocking::Client,
}

impl RemoteSampler {
    /// Creates a sampler for `host` with an explicit access token.
    pub fn new(host: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            access_token: access_token.into(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Creates a sampler reading the access token from [`TOKEN_ENV_VAR`].
    pub fn from_env(host: impl Into<String>) -> Result<Self, DistilError> {
        let access_token = env::var(TOKEN_ENV_VAR).map_err(|_| DistilError::MissingToken {
            variable: TOKEN_ENV_VAR.to_string(),
        })?;
        Ok(Self::new(host, access_token))
    }
}

impl Sampler for RemoteSampler {
    fn run(&self, circuit: &Circuit, repetitions: usize) -> Result<MeasurementRecord, DistilError> {
        let specs: Vec<GateSpec> = circuit.operations().map(GateSpec::from_operation).collect();
        // The gateway allocates physical qubits 0..no_qubits, so the count
        // is one past the highest wire id, measured or not.
        let no_qubits = circuit.wires().iter().next_back().map_or(0, |wire| wire.0 + 1);

        let request = SubmitRequest {
            data: serde_json::to_string(&specs)?,
            access_token: self.access_token.clone(),
            repetitions,
            no_qubits,
        };

        tracing::info!(host = %self.host, repetitions, no_qubits, "submitting circuit to gateway");
        let submit: SubmitResponse = self
            .client
            .put(&self.host)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        tracing::info!(id = %submit.id, "job accepted, polling until finished");

        let samples = loop {
            thread::sleep(POLL_INTERVAL);
            let poll: PollResponse = self
                .client
                .put(&self.host)
                .json(&PollRequest {
                    id: submit.id.clone(),
                    access_token: self.access_token.clone(),
                })
                .send()?
                .error_for_status()?
                .json()?;

            match poll.status.as_str() {
                "finished" => break poll.samples,
                "error" => {
                    return Err(DistilError::Gateway {
                        message: format!("gateway reported job {} as failed", submit.id),
                    });
                }
                status => tracing::debug!(status, "job still pending"),
            }
        };

        if samples.len() != repetitions {
            return Err(DistilError::Gateway {
                message: format!(
                    "gateway returned {} samples for {} repetitions",
                    samples.len(),
                    repetitions
                ),
            });
        }

        unpack_samples(&samples, &measured_wires(circuit), repetitions)
    }
}

/// One serialized operation of the submission payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct GateSpec {
    gate: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    exponent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    global_shift: Option<f64>,
    targets: Vec<u64>,
}

impl GateSpec {
    fn from_operation(op: &Operation) -> Self {
        match op {
            Operation::Rotation { target, axis, exponent, global_shift } => Self {
                gate: match axis {
                    RotationAxis::X => "X",
                    RotationAxis::Y => "Y",
                    RotationAxis::Z => "Z",
                },
                exponent: Some(*exponent),
                global_shift: Some(*global_shift),
                targets: vec![target.0],
            },
            Operation::Hadamard { target } => Self {
                gate: "H",
                exponent: None,
                global_shift: None,
                targets: vec![target.0],
            },
            Operation::CNot { control, target } => Self {
                gate: "CNOT",
                exponent: None,
                global_shift: None,
                targets: vec![control.0, target.0],
            },
            Operation::Measure { target } => Self {
                gate: "MEASURE",
                exponent: None,
                global_shift: None,
                targets: vec![target.0],
            },
        }
    }
}

#[derive(Serialize)]
struct SubmitRequest {
    data: String,
    access_token: String,
    repetitions: usize,
    no_qubits: u64,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Serialize)]
struct PollRequest {
    id: String,
    access_token: String,
}

#[derive(Deserialize)]
struct PollResponse {
    status: String,
    #[serde(default)]
    samples: Vec<u64>,
}

/// The wires carrying a measurement, in moment-major discovery order.
fn measured_wires(circuit: &Circuit) -> Vec<WireId> {
    circuit
        .operations()
        .filter_map(|op| match op {
            Operation::Measure { target } => Some(*target),
            _ => None,
        })
        .collect()
}

/// Unpacks per-shot sample words into per-wire bit sequences.
///
/// The gateway reports each shot as one integer in hardware qubit order:
/// bit `i` of the word is the outcome of qubit `i`. Only the wires the
/// circuit actually measures are carried into the record.
fn unpack_samples(
    samples: &[u64],
    wires: &[WireId],
    repetitions: usize,
) -> Result<MeasurementRecord, DistilError> {
    let mut record = MeasurementRecord::new(repetitions);
    for wire in wires {
        let bits: Vec<u8> = samples.iter().map(|word| ((word >> wire.0) & 1) as u8).collect();
        record.insert(*wire, bits)?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;

    fn wid(id: u64) -> WireId {
        WireId(id)
    }

    #[test]
    fn gate_specs_serialize_compactly() {
        let spec = GateSpec::from_operation(&Operation::Hadamard { target: wid(3) });
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!({ "gate": "H", "targets": [3] }));

        let spec = GateSpec::from_operation(&Operation::Rotation {
            target: wid(0),
            axis: RotationAxis::Z,
            exponent: -0.5,
            global_shift: 0.0,
        });
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "gate": "Z",
                "exponent": -0.5,
                "global_shift": 0.0,
                "targets": [0]
            })
        );
    }

    #[test]
    fn cnot_spec_lists_control_before_target() {
        let spec = GateSpec::from_operation(&Operation::CNot { control: wid(1), target: wid(7) });
        assert_eq!(spec.targets, vec![1, 7]);
    }

    #[test]
    fn sample_words_unpack_in_hardware_order() {
        // Shot words 0b101 and 0b010 over wires 0..3.
        let wires = [wid(0), wid(1), wid(2)];
        let record = unpack_samples(&[0b101, 0b010], &wires, 2).unwrap();

        assert_eq!(record.bits(wid(0)).unwrap(), &[1, 0]);
        assert_eq!(record.bits(wid(1)).unwrap(), &[0, 1]);
        assert_eq!(record.bits(wid(2)).unwrap(), &[1, 0]);
    }

    #[test]
    fn only_measured_wires_enter_the_record() {
        let circuit = CircuitBuilder::new()
            .add_op(Operation::Hadamard { target: wid(0) })
            .add_op(Operation::CNot { control: wid(0), target: wid(1) })
            .add_op(Operation::Measure { target: wid(1) })
            .build();

        let wires = measured_wires(&circuit);
        assert_eq!(wires, vec![wid(1)]);

        let record = unpack_samples(&[0b11, 0b00], &wires, 2).unwrap();
        assert_eq!(record.num_wires(), 1);
        assert!(record.bits(wid(0)).is_err());
    }
}
