use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use fraudlens::config::Config;
use fraudlens::dashboard::DashboardSnapshot;
use fraudlens::data::{summarize_csv, UploadLimits};
use fraudlens::logging::{self, log, obj, params_hash, v_str, Domain, Level};
use fraudlens::service::AnalysisService;
use fraudlens::transaction::{find_preset, presets, TransactionForm};

fn print_usage() {
    eprintln!("Usage: fraudlens <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  analyze --amount <n> --time <secs> [--v1 <n>] [--v2 <n>] [--v3 <n>] [--v4 <n>]");
    eprintln!("  analyze --preset <name>     one of: {}", preset_names());
    eprintln!("  dashboard                   demo dashboard metrics");
    eprintln!("  summarize <file.csv>        dataset summary for an upload");
    eprintln!();
    eprintln!("Env: SCORER_SEED, ANALYSIS_DELAY_MS, MAX_UPLOAD_BYTES, SAMPLE_ROWS, LOG_LEVEL, LOG_DIR");
}

fn preset_names() -> String {
    presets().iter().map(|p| p.slug).collect::<Vec<_>>().join(", ")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_form(args: &[String]) -> Result<TransactionForm> {
    let mut form = TransactionForm::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("missing value for {}", flag))?
            .clone();
        match flag.as_str() {
            "--preset" => {
                let preset = find_preset(&value)
                    .ok_or_else(|| anyhow!("unknown preset '{}' (expected {})", value, preset_names()))?;
                form = preset.form();
            }
            "--amount" => form.amount = value,
            "--time" => form.time = value,
            "--v1" => form.v1 = value,
            "--v2" => form.v2 = value,
            "--v3" => form.v3 = value,
            "--v4" => form.v4 = value,
            other => bail!("unknown flag {}", other),
        }
    }
    Ok(form)
}

async fn analyze(cfg: &Config, args: &[String]) -> Result<()> {
    let form = parse_form(args)?;
    let mut service = AnalysisService::from_config(cfg);
    log(
        Level::Debug,
        Domain::Scoring,
        "analyze_request",
        obj(&[("model", v_str(service.model_name()))]),
    );
    let analysis = service.analyze_form(&form).await?;
    print_json(&analysis)
}

fn dashboard() -> Result<()> {
    log(
        Level::Info,
        Domain::Dashboard,
        "snapshot",
        obj(&[("source", v_str("demo"))]),
    );
    print_json(&DashboardSnapshot::demo())
}

fn summarize(cfg: &Config, args: &[String]) -> Result<()> {
    let path = args
        .first()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("summarize needs a CSV path"))?;
    let summary = summarize_csv(&path, UploadLimits::from(cfg))
        .with_context(|| format!("failed to process {}", path.display()))?;
    logging::log_dataset_summary(&summary);
    print_json(&summary)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let cfg = Config::from_env();
    logging::log_startup("fraudlens", &params_hash(&cfg.fingerprint()));

    let rest = &args[2..];
    match args[1].as_str() {
        "analyze" => analyze(&cfg, rest).await,
        "dashboard" => dashboard(),
        "summarize" => summarize(&cfg, rest),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_form_flags() {
        let form = parse_form(&args(&["--amount", "12", "--time", "5", "--v2", "-1.5"])).unwrap();
        assert_eq!(form.amount, "12");
        assert_eq!(form.v2, "-1.5");
        assert!(form.v1.is_empty());
    }

    #[test]
    fn test_preset_then_override() {
        let form = parse_form(&args(&["--preset", "suspicious", "--amount", "10"])).unwrap();
        assert_eq!(form.amount, "10");
        assert_eq!(form.v1, "-4.7359");
    }

    #[test]
    fn test_bad_flags() {
        assert!(parse_form(&args(&["--amount"])).is_err());
        assert!(parse_form(&args(&["--colour", "red"])).is_err());
        assert!(parse_form(&args(&["--preset", "nope"])).is_err());
    }
}
