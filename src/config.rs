use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fixed scorer seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Cosmetic wait before returning an analysis.
    pub analysis_delay_ms: u64,
    pub max_upload_bytes: u64,
    pub sample_rows: usize,
    pub calibration_trials: u64,
    pub calibration_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            analysis_delay_ms: 0,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            calibration_trials: 10_000,
            calibration_threads: num_cpus::get().clamp(1, 8),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            seed: std::env::var("SCORER_SEED").ok().and_then(|v| v.parse().ok()),
            analysis_delay_ms: std::env::var("ANALYSIS_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.analysis_delay_ms),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(d.max_upload_bytes),
            sample_rows: std::env::var("SAMPLE_ROWS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.sample_rows),
            calibration_trials: std::env::var("CALIBRATION_TRIALS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.calibration_trials),
            calibration_threads: std::env::var("CALIBRATION_THREADS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(d.calibration_threads),
        }
    }

    /// Stable text form of the tunables, fed to `logging::params_hash`.
    pub fn fingerprint(&self) -> String {
        format!(
            "seed={:?};delay={};upload={};sample={};trials={};threads={}",
            self.seed,
            self.analysis_delay_ms,
            self.max_upload_bytes,
            self.sample_rows,
            self.calibration_trials,
            self.calibration_threads
        )
    }
}
