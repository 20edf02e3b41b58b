//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - fetches the survey snapshot
//! - aggregates it and prints the console report
//! - writes the spreadsheet and optional CSV

use clap::Parser;
use log::{error, info};

use crate::cli::{AnalyzeArgs, Command, FetchArgs, ReportArgs, RunArgs};
use crate::domain::{AnalysisConfig, FetchConfig, TargetBand};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `ipca` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // `ipca` and `ipca --target 3.5` behave like `ipca run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fetch(args) => handle_fetch(&fetch_config_from_args(&args)),
        Command::Analyze(args) => handle_analyze(&analysis_config_from_args(&args)?),
        Command::Run(args) => handle_run(args),
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

fn handle_fetch(config: &FetchConfig) -> Result<(), AppError> {
    println!(
        "Querying survey window {} to {}...",
        config.start.format("%Y-%m-%d"),
        config.end.format("%Y-%m-%d")
    );
    let count = pipeline::run_fetch(config).inspect_err(|e| error!("fetch failed: {e}"))?;
    println!(
        "Success! {count} records found and saved to {}.",
        config.snapshot.display()
    );
    Ok(())
}

fn handle_analyze(config: &AnalysisConfig) -> Result<(), AppError> {
    let output = pipeline::run_analysis(config)?;
    println!("{}", crate::report::format_report(&output));

    let files = pipeline::write_outputs(&output, config)?;
    if let Some(path) = &files.xlsx {
        println!("Spreadsheet written: {}", path.display());
    }
    if let Some(path) = &files.csv {
        println!("Monthly CSV written: {}", path.display());
    }
    Ok(())
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let fetch = fetch_config_from_args(&args.fetch);
    handle_fetch(&fetch)?;

    let analysis = analysis_config(fetch.snapshot.clone(), &args.report)?;
    info!("analysing {}", analysis.input.display());
    handle_analyze(&analysis)
}

pub fn fetch_config_from_args(args: &FetchArgs) -> FetchConfig {
    FetchConfig {
        base_url: args.base_url.clone(),
        indicator: args.indicator.clone(),
        calc_type: args.calc_type.clone(),
        start: args.start,
        end: args.end,
        snapshot: args.snapshot.clone(),
    }
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    analysis_config(args.input.clone(), &args.report)
}

fn analysis_config(input: std::path::PathBuf, args: &ReportArgs) -> Result<AnalysisConfig, AppError> {
    if !(args.target.is_finite() && args.tolerance.is_finite() && args.tolerance >= 0.0) {
        return Err(AppError::io(format!(
            "Invalid target band: target={} tolerance={}.",
            args.target, args.tolerance
        )));
    }
    Ok(AnalysisConfig {
        input,
        years: args.years.clone(),
        band: TargetBand {
            target: args.target,
            tolerance: args.tolerance,
        },
        xlsx: !args.no_xlsx,
        prefix: args.prefix.clone(),
        out_dir: args.out_dir.clone(),
        export_csv: args.export_csv.clone(),
    })
}

/// Rewrite argv so `ipca` defaults to `ipca run`.
///
/// Rules:
/// - `ipca`                       -> `ipca run`
/// - `ipca --years 2027 ...`      -> `ipca run --years 2027 ...`
/// - `ipca --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}
