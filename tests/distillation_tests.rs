// tests/distillation_tests.rs

// End-to-end properties of the distillation experiment on the bundled
// noiseless simulator.

use qdistil::{
    LocalSimulator, Sampler, analysis, cancel_opposite_rotations, hoist_measurements, protocol,
};

/// Runs the full pipeline: build, rewrite, sample, analyze.
fn run_experiment(seed: u64, shots: usize) -> analysis::DistillationStats {
    let circuit = protocol::y_distillation_circuit();
    let (circuit, _) = cancel_opposite_rotations(&circuit);
    let circuit = hoist_measurements(&circuit);

    let record = LocalSimulator::with_seed(seed).run(&circuit, shots).expect("simulation runs");
    assert_eq!(record.repetitions(), shots);
    assert_eq!(record.num_wires(), 7, "wires 1-7 are measured, wire 0 is not");

    let checks = protocol::stabilizer_checks();
    let stabilizers: Vec<analysis::ParitySeries> = checks
        .iter()
        .map(|check| analysis::compute_parity(check, &record).expect("wires present"))
        .collect();
    let byproduct =
        analysis::compute_parity(&protocol::byproduct_check(), &record).expect("wires present");

    analysis::generate_stats(&record, &stabilizers, &byproduct).expect("series match record")
}

#[test]
fn hundred_noiseless_shots_produce_seven_bit_patterns() {
    let stats = run_experiment(1, 100);

    let summed: u64 = stats.entries.values().map(|entry| entry.count).sum();
    assert!(summed <= 100);
    assert!(stats.entries.keys().all(|bitstring| bitstring.len() == 7));
    assert_eq!(stats.shots.len(), 100);
    assert_eq!(stats.accepted + stats.rejected, 100);
    assert_eq!(stats.accepted, summed);
}

#[test]
fn noiseless_shots_always_satisfy_the_stabilizers() {
    // The encoder leaves the state a +1 eigenstate of all three plaquette
    // X-stabilizers, so ideal execution never rejects a shot.
    let stats = run_experiment(7, 100);

    assert_eq!(stats.rejected, 0);
    assert_eq!(stats.accepted, 100);
    assert!(stats.shots.iter().all(|shot| shot.accepted));
    assert!(
        stats
            .shots
            .iter()
            .all(|shot| shot.stabilizer_parities.iter().all(|parity| *parity == 1))
    );
}

#[test]
fn byproduct_sign_of_repeated_patterns_comes_from_the_first_shot() {
    let stats = run_experiment(3, 200);

    // Every entry's correction must equal the byproduct-free recomputation
    // from the first accepted shot with that bitstring.
    for (bitstring, entry) in &stats.entries {
        let first = stats
            .shots
            .iter()
            .find(|shot| shot.accepted && &shot.bitstring == bitstring)
            .expect("entry implies at least one accepted shot");
        // Byproduct parity over wires 1-7 equals the bit-sum parity of the
        // whole bitstring.
        let ones = first.bitstring.chars().filter(|c| *c == '1').count();
        let expected: i8 = if ones % 2 == 0 { 1 } else { -1 };
        assert_eq!(entry.correction, expected, "pattern {}", bitstring);
    }
}

#[test]
fn repeated_seeds_reproduce_identical_statistics() {
    let first = run_experiment(11, 50);
    let second = run_experiment(11, 50);
    assert_eq!(first, second);
}

#[test]
fn hoisting_does_not_change_the_sampled_distribution_shape() {
    // With and without hoisting, noiseless runs accept everything and
    // produce 7-bit patterns; the pass only reshapes the schedule.
    let circuit = protocol::y_distillation_circuit();
    let hoisted = hoist_measurements(&circuit);

    let record = LocalSimulator::with_seed(5).run(&hoisted, 40).expect("simulation runs");
    let checks = protocol::stabilizer_checks();
    for check in &checks {
        let series = analysis::compute_parity(check, &record).expect("wires present");
        assert!(series.values.iter().all(|parity| *parity == 1));
    }
}
