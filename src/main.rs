// src/main.rs

//! Experiment driver: build, rewrite, sample, analyze, dump.

use anyhow::Result;
use clap::Parser;
use qdistil::backend::gateway::DEFAULT_REMOTE_HOST;
use qdistil::{
    LocalSimulator, MeasurementRecord, RemoteSampler, Sampler, analysis, protocol,
    cancel_opposite_rotations, hoist_measurements,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qdistil")]
#[command(about = "Steane-code Y-state distillation experiment")]
struct Args {
    /// Number of repetitions to sample.
    #[arg(long, default_value_t = protocol::DEFAULT_SHOTS)]
    shots: usize,

    /// Run on the bundled noiseless simulator instead of the gateway.
    #[arg(long)]
    local: bool,

    /// Gateway endpoint for remote execution.
    #[arg(long, default_value = DEFAULT_REMOTE_HOST)]
    remote_host: String,

    /// PRNG seed for reproducible --local runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let circuit = protocol::y_distillation_circuit();
    println!("{circuit}");

    let (circuit, cancel_stats) = cancel_opposite_rotations(&circuit);
    println!("cancellation pass removed {} inverse rotation pairs", cancel_stats.pairs_removed);
    let circuit = hoist_measurements(&circuit);
    println!("measurements hoisted into the final moment\n{circuit}");

    let record: MeasurementRecord = if args.local {
        let simulator = match args.seed {
            Some(seed) => LocalSimulator::with_seed(seed),
            None => LocalSimulator::new(),
        };
        simulator.run(&circuit, args.shots)?
    } else {
        RemoteSampler::from_env(args.remote_host)?.run(&circuit, args.shots)?
    };
    print!("{record}");

    println!(" == Parities to check on chip qubits");
    let checks = protocol::stabilizer_checks();
    for check in &checks {
        let wires: Vec<String> = check.wires.iter().map(|w| w.to_string()).collect();
        println!("  {}: [{}]", check.name, wires.join(", "));
    }

    let stabilizers: Vec<analysis::ParitySeries> = checks
        .iter()
        .map(|check| analysis::compute_parity(check, &record))
        .collect::<std::result::Result<_, _>>()?;
    let byproduct = analysis::compute_parity(&protocol::byproduct_check(), &record)?;

    let stats = analysis::generate_stats(&record, &stabilizers, &byproduct)?;
    for shot in &stats.shots {
        let parities: String = shot
            .stabilizer_parities
            .iter()
            .map(|parity| if *parity > 0 { '+' } else { '-' })
            .collect();
        let verdict = if shot.accepted { "accepted" } else { "rejected: not even parity" };
        println!("{:>3}. {} plaq:{} {}", shot.index, shot.bitstring, parities, verdict);
    }
    print!("{stats}");

    Ok(())
}
