use std::time::Instant;

use anyhow::Result;

use fraudlens::calibration::{calibrate_parallel, CalibrationReport, RATE_TOLERANCE};
use fraudlens::config::Config;
use fraudlens::logging::{self, params_hash};
use fraudlens::transaction::{presets, TransactionInput};

fn scenarios() -> Result<Vec<(String, TransactionInput)>> {
    let mut out = Vec::new();
    for preset in presets() {
        out.push((preset.name.to_string(), preset.input()?));
    }
    out.push(("Amount at 1000".to_string(), TransactionInput::new(1000.0, 0.0, [0.0; 4])));
    out.push(("V2 outlier".to_string(), TransactionInput::new(200.0, 0.0, [0.0, -3.5, 0.0, 0.0])));
    out.push(("Quiet".to_string(), TransactionInput::new(20.0, 100.0, [1.0; 4])));
    Ok(out)
}

fn print_row(name: &str, r: &CalibrationReport) {
    println!(
        "{:<16} {:<12} {:>8} {:>9.4} {:>9.2} {:>7.3}-{:<7.3} {}",
        name,
        r.branch.as_str(),
        r.trials,
        r.fraud_rate,
        r.expected_rate,
        r.min_probability,
        r.max_probability,
        if r.within_tolerance { "ok" } else { "DRIFT" }
    );
}

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let trials = std::env::args()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .unwrap_or(cfg.calibration_trials);
    let seed = cfg.seed.unwrap_or(42);
    let threads = cfg.calibration_threads;

    logging::log_startup("calibrate", &params_hash(&cfg.fingerprint()));

    println!("=== SCORER CALIBRATION ===\n");
    println!("Trials per scenario: {}", trials);
    println!("Threads: {}", threads);
    println!("Seed: {}", seed);
    println!("Tolerance: ±{:.2}\n", RATE_TOLERANCE);

    println!(
        "{:<16} {:<12} {:>8} {:>9} {:>9} {:>15} {}",
        "Scenario", "Branch", "Trials", "Observed", "Expected", "Confidence", "Status"
    );
    println!("{}", "-".repeat(84));

    let start = Instant::now();
    let mut drifted = 0;
    for (name, input) in scenarios()? {
        let report = calibrate_parallel(&input, trials, seed, threads)?;
        logging::log_calibration(&report);
        print_row(&name, &report);
        if !report.within_tolerance {
            drifted += 1;
        }
    }

    println!("\nTotal time: {:.2?}", start.elapsed());
    if drifted == 0 {
        println!("✓ All scenarios within tolerance");
        Ok(())
    } else {
        println!("⚠️  {} scenario(s) outside tolerance", drifted);
        std::process::exit(2);
    }
}
