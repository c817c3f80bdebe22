//! Statistical check that the mock scorer flags fraud at its branch's rate.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::thread;

use crate::predictor::Prediction;
use crate::scorer::{validate, MockRiskScorer, RiskBranch};
use crate::transaction::TransactionInput;

/// Allowed gap between observed and expected fraud rate.
pub const RATE_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub input: TransactionInput,
    pub branch: RiskBranch,
    pub trials: u64,
    pub fraud_count: u64,
    pub fraud_rate: f64,
    pub expected_rate: f64,
    pub min_probability: f64,
    pub max_probability: f64,
    pub within_tolerance: bool,
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    trials: u64,
    fraud: u64,
    min_p: f64,
    max_p: f64,
}

impl Tally {
    fn empty() -> Self {
        Self {
            trials: 0,
            fraud: 0,
            min_p: f64::INFINITY,
            max_p: f64::NEG_INFINITY,
        }
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            trials: self.trials + other.trials,
            fraud: self.fraud + other.fraud,
            min_p: self.min_p.min(other.min_p),
            max_p: self.max_p.max(other.max_p),
        }
    }
}

fn run_trials(input: &TransactionInput, trials: u64, seed: u64) -> Result<Tally> {
    let mut scorer = MockRiskScorer::seeded(seed);
    let mut tally = Tally::empty();
    for _ in 0..trials {
        let r = scorer.score(input)?;
        tally.trials += 1;
        if r.prediction == Prediction::Fraud {
            tally.fraud += 1;
        }
        tally.min_p = tally.min_p.min(r.probability);
        tally.max_p = tally.max_p.max(r.probability);
    }
    Ok(tally)
}

fn report(input: TransactionInput, tally: Tally) -> CalibrationReport {
    let branch = RiskBranch::for_input(&input);
    let expected_rate = branch.fraud_rate();
    let fraud_rate = if tally.trials == 0 {
        0.0
    } else {
        tally.fraud as f64 / tally.trials as f64
    };
    let (min_probability, max_probability) = if tally.trials == 0 {
        (0.0, 0.0)
    } else {
        (tally.min_p, tally.max_p)
    };
    CalibrationReport {
        input,
        branch,
        trials: tally.trials,
        fraud_count: tally.fraud,
        fraud_rate,
        expected_rate,
        min_probability,
        max_probability,
        within_tolerance: tally.trials > 0 && (fraud_rate - expected_rate).abs() <= RATE_TOLERANCE,
    }
}

pub fn calibrate(input: &TransactionInput, trials: u64, seed: u64) -> Result<CalibrationReport> {
    validate(input)?;
    let tally = run_trials(input, trials, seed)?;
    Ok(report(*input, tally))
}

/// Same as `calibrate`, with trials split over `threads` workers.
///
/// Worker `i` is seeded with `seed + i`, so results are reproducible for a
/// fixed thread count.
pub fn calibrate_parallel(
    input: &TransactionInput,
    trials: u64,
    seed: u64,
    threads: usize,
) -> Result<CalibrationReport> {
    validate(input)?;
    let threads = threads.max(1) as u64;
    let per_thread = trials / threads;
    let remainder = trials % threads;

    let mut handles = Vec::with_capacity(threads as usize);
    for t in 0..threads {
        let input = *input;
        let n = per_thread + u64::from(t < remainder);
        let worker_seed = seed.wrapping_add(t);
        handles.push(thread::spawn(move || run_trials(&input, n, worker_seed)));
    }

    let mut total = Tally::empty();
    for handle in handles {
        let tally = handle
            .join()
            .map_err(|_| anyhow!("calibration worker panicked"))??;
        total = total.merge(tally);
    }
    Ok(report(*input, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_amount_rate_near_half() {
        let input = TransactionInput::new(1500.0, 0.0, [0.0; 4]);
        let r = calibrate(&input, 4000, 11).unwrap();
        assert_eq!(r.branch, RiskBranch::HighAmount);
        assert!(r.within_tolerance, "fraud rate {}", r.fraud_rate);
    }

    #[test]
    fn test_parallel_covers_all_trials() {
        let input = TransactionInput::new(10.0, 0.0, [-5.0, 0.0, 0.0, 0.0]);
        let r = calibrate_parallel(&input, 3001, 5, 4).unwrap();
        assert_eq!(r.trials, 3001);
        assert_eq!(r.branch, RiskBranch::PcaOutlier);
        assert!(r.within_tolerance, "fraud rate {}", r.fraud_rate);
        assert!(r.min_probability >= 0.70 && r.max_probability <= 1.0);
    }

    #[test]
    fn test_parallel_reproducible() {
        let input = TransactionInput::new(10.0, 0.0, [0.0; 4]);
        let a = calibrate_parallel(&input, 1000, 9, 3).unwrap();
        let b = calibrate_parallel(&input, 1000, 9, 3).unwrap();
        assert_eq!(a.fraud_count, b.fraud_count);
    }

    #[test]
    fn test_invalid_input_fails_before_spawning() {
        let input = TransactionInput::new(-1.0, 0.0, [0.0; 4]);
        assert!(calibrate_parallel(&input, 100, 1, 2).is_err());
        // no trials still means no report for a bad input
        assert!(calibrate_parallel(&input, 0, 1, 2).is_err());
        assert!(calibrate(&input, 0, 1).is_err());
    }

    #[test]
    fn test_zero_trials() {
        let input = TransactionInput::new(10.0, 0.0, [0.0; 4]);
        let r = calibrate(&input, 0, 1).unwrap();
        assert_eq!(r.trials, 0);
        assert!(!r.within_tolerance);
    }
}
