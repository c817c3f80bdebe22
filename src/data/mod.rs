//! Uploaded transaction datasets: headers, size, samples and class balance.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_SAMPLE_ROWS};
use crate::error::DatasetError;
use crate::logging::ProfileScope;

/// Columns the scorer reads from; their absence is worth a warning.
pub const SCORED_COLUMNS: [&str; 2] = ["Time", "Amount"];
pub const LABEL_COLUMN: &str = "Class";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_bytes: u64,
    pub sample_rows: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

impl From<&Config> for UploadLimits {
    fn from(cfg: &Config) -> Self {
        Self {
            max_bytes: cfg.max_upload_bytes,
            sample_rows: cfg.sample_rows,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub legitimate: u64,
    pub fraud: u64,
    pub unlabeled: u64,
}

impl ClassCounts {
    pub fn fraud_rate(&self) -> f64 {
        let labeled = self.legitimate + self.fraud;
        if labeled == 0 {
            0.0
        } else {
            self.fraud as f64 / labeled as f64
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub path: String,
    pub size_bytes: u64,
    pub hash_sha256: String,
    pub headers: Vec<String>,
    pub row_count: u64,
    pub sample_rows: Vec<Vec<String>>,
    /// Present only when the file carries a `Class` column.
    pub class_counts: Option<ClassCounts>,
    pub warnings: Vec<String>,
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').to_string())
        .collect()
}

/// Summarize a CSV upload.
///
/// Blank lines are skipped, so a trailing newline does not count as a row.
pub fn summarize_csv(path: &Path, limits: UploadLimits) -> Result<DatasetSummary, DatasetError> {
    let _scope = ProfileScope::new("summarize_csv");
    let is_csv = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(".csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(DatasetError::UnsupportedFormat {
            path: path.display().to_string(),
        });
    }

    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > limits.max_bytes {
        return Err(DatasetError::TooLarge {
            size: size_bytes,
            limit: limits.max_bytes,
        });
    }

    let hash_sha256 = file_sha256(path)?;
    let reader = BufReader::new(File::open(path)?);

    let mut headers: Vec<String> = Vec::new();
    let mut label_idx: Option<usize> = None;
    let mut class_counts = ClassCounts::default();
    let mut row_count = 0u64;
    let mut sample_rows = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if headers.is_empty() {
            headers = split_row(trimmed);
            label_idx = headers.iter().position(|h| h == LABEL_COLUMN);
            continue;
        }

        let cells = split_row(trimmed);
        row_count += 1;
        if let Some(idx) = label_idx {
            match cells.get(idx).map(String::as_str) {
                Some("1") | Some("1.0") => class_counts.fraud += 1,
                Some("0") | Some("0.0") => class_counts.legitimate += 1,
                _ => class_counts.unlabeled += 1,
            }
        }
        if sample_rows.len() < limits.sample_rows {
            sample_rows.push(cells);
        }
    }

    if headers.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut warnings = Vec::new();
    for col in SCORED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            warnings.push(format!("missing column {}", col));
        }
    }
    if row_count == 0 {
        warnings.push("no data rows".to_string());
    }
    if class_counts.unlabeled > 0 {
        warnings.push(format!("{} rows with unrecognized class label", class_counts.unlabeled));
    }

    Ok(DatasetSummary {
        path: path.display().to_string(),
        size_bytes,
        hash_sha256,
        headers,
        row_count,
        sample_rows,
        class_counts: label_idx.map(|_| class_counts),
        warnings,
    })
}

pub fn file_sha256(path: &Path) -> Result<String, DatasetError> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
