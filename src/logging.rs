//! Structured logging for the scoring pipeline.
//!
//! Every record is one JSON object on stderr (stdout is reserved for command
//! output). Setting `LOG_DIR` also appends records to
//! `<LOG_DIR>/<run_id>/events.jsonl`, with trace/debug going to `trace.jsonl`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::calibration::CalibrationReport;
use crate::data::DatasetSummary;
use crate::predictor::ScoringResult;
use crate::risk::RiskAssessment;
use crate::scorer::RiskBranch;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Scoring,     // Predictor calls and verdicts
    Risk,        // Risk meter readings
    Data,        // Dataset uploads and summaries
    Dashboard,   // Demo metrics served
    Calibration, // Statistical checks of the scorer
    System,      // Startup, config
    Profile,     // Timing
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Scoring => "scoring",
            Domain::Risk => "risk",
            Domain::Data => "data",
            Domain::Dashboard => "dashboard",
            Domain::Calibration => "calibration",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunSinks {
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    sinks: Option<RunSinks>,
}

fn open_append(path: PathBuf) -> Option<Mutex<BufWriter<File>>> {
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to open {}: {}", path.display(), err);
            None
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let sinks = std::env::var("LOG_DIR").ok().and_then(|base| {
            let mut run_dir = PathBuf::from(base);
            run_dir.push(&run_id);
            if let Err(err) = create_dir_all(&run_dir) {
                eprintln!("[log] failed to create run dir: {}", err);
                return None;
            }
            let _ = std::fs::write(
                run_dir.join("manifest.json"),
                json!({
                    "run_id": run_id,
                    "ts": ts_now(),
                    "pid": process::id(),
                    "log_dir": run_dir.to_string_lossy(),
                })
                .to_string(),
            );
            Some(RunSinks {
                events: open_append(run_dir.join("events.jsonl"))?,
                trace: open_append(run_dir.join("trace.jsonl"))?,
            })
        });
        RunContext { run_id, sinks }
    })
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

fn emit_record(level: Level, component: &str, event: &str, mut fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));

    let line = Value::Object(entry).to_string();
    if let Some(sinks) = &ctx.sinks {
        match level {
            Level::Trace | Level::Debug => write_line(&sinks.trace, &line),
            _ => write_line(&sinks.events, &line),
        }
    }
    eprintln!("{}", line);
}

// =============================================================================
// Domain helpers
// =============================================================================

pub fn log_startup(binary: &str, config_hash: &str) {
    log(
        Level::Info,
        Domain::System,
        "startup",
        obj(&[
            ("binary", v_str(binary)),
            ("config_hash", v_str(config_hash)),
            ("version", v_str(env!("CARGO_PKG_VERSION"))),
        ]),
    );
}

pub fn log_prediction(model: &str, branch: RiskBranch, result: &ScoringResult) {
    let contributions: Map<String, Value> = result
        .feature_contributions
        .iter()
        .map(|c| (c.feature.as_str().to_string(), v_num(c.contribution)))
        .collect();
    log(
        Level::Info,
        Domain::Scoring,
        "prediction",
        obj(&[
            ("model", v_str(model)),
            ("branch", v_str(branch.as_str())),
            ("prediction", v_str(result.prediction.as_str())),
            ("probability", v_num(result.probability)),
            ("contributions", Value::Object(contributions)),
        ]),
    );
}

pub fn log_rejected_input(model: &str, reason: &str) {
    log(
        Level::Warn,
        Domain::Scoring,
        "input_rejected",
        obj(&[("model", v_str(model)), ("msg", v_str(reason))]),
    );
}

pub fn log_risk_assessment(risk: &RiskAssessment) {
    log(
        Level::Debug,
        Domain::Risk,
        "risk_assessment",
        obj(&[
            ("score", v_num(risk.score)),
            ("level", v_str(risk.level.label())),
        ]),
    );
}

pub fn log_dataset_summary(summary: &DatasetSummary) {
    log(
        Level::Info,
        Domain::Data,
        "dataset_summary",
        obj(&[
            ("path", v_str(&summary.path)),
            ("hash_sha256", v_str(&summary.hash_sha256)),
            ("rows", json!(summary.row_count)),
            ("columns", json!(summary.headers.len())),
            ("warnings", json!(summary.warnings)),
        ]),
    );
}

pub fn log_calibration(report: &CalibrationReport) {
    let level = if report.within_tolerance {
        Level::Info
    } else {
        Level::Warn
    };
    log(
        level,
        Domain::Calibration,
        "calibration",
        obj(&[
            ("branch", v_str(report.branch.as_str())),
            ("trials", json!(report.trials)),
            ("fraud_rate", v_num(report.fraud_rate)),
            ("expected_rate", v_num(report.expected_rate)),
            ("within_tolerance", json!(report.within_tolerance)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Short, stable digest for config/parameter fingerprints.
pub fn params_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..8])
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits elapsed time at trace level when dropped.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self::with_context(label, &[])
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(self.elapsed_ms()));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}
