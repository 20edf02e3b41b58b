//! Command-line parsing for the IPCA expectations tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/aggregation code. Every default below is the value the tool runs with
//! when no flag is given.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::{BASE_URL, DEFAULT_CALC_TYPE, DEFAULT_INDICATOR};

pub const DEFAULT_SNAPSHOT: &str = "expectativas_filtradas.json";
pub const DEFAULT_PREFIX: &str = "analise_ipca";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ipca", version, about = "IPCA market expectations (Top 5 survey): fetch, compound, report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query the expectations API and save the raw records as JSON.
    Fetch(FetchArgs),
    /// Aggregate a saved JSON snapshot and print/write the report.
    Analyze(AnalyzeArgs),
    /// Fetch, then analyze the freshly saved snapshot (default).
    Run(RunArgs),
}

/// Options for the fetch stage.
#[derive(Debug, Args, Clone)]
pub struct FetchArgs {
    /// First survey date of the window (YYYY-MM-DD).
    #[arg(long, default_value = "2026-01-01")]
    pub start: NaiveDate,

    /// Last survey date of the window (YYYY-MM-DD).
    #[arg(long, default_value = "2026-01-22")]
    pub end: NaiveDate,

    /// Indicator code to query.
    #[arg(long, default_value = DEFAULT_INDICATOR)]
    pub indicator: String,

    /// Top 5 calculation type code.
    #[arg(long = "calc-type", default_value = DEFAULT_CALC_TYPE)]
    pub calc_type: String,

    /// Expectations endpoint.
    #[arg(long = "base-url", env = "IPCA_BASE_URL", default_value = BASE_URL)]
    pub base_url: String,

    /// Where to save the raw JSON records.
    #[arg(long, value_name = "JSON", default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,
}

/// Options shared by `analyze` and `run` that control aggregation and output.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Forecast years to analyse, nearest first (comma-separated).
    #[arg(long, value_delimiter = ',', default_values_t = [2026, 2027])]
    pub years: Vec<i32>,

    /// Inflation target (percent).
    #[arg(long, default_value_t = 3.0)]
    pub target: f64,

    /// Tolerance above the target; ceiling = target + tolerance (percentage points).
    #[arg(long, default_value_t = 1.5)]
    pub tolerance: f64,

    /// Spreadsheet file name prefix.
    #[arg(long, default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// Directory for the spreadsheet.
    #[arg(long = "out-dir", default_value = ".")]
    pub out_dir: PathBuf,

    /// Skip the spreadsheet.
    #[arg(long = "no-xlsx")]
    pub no_xlsx: bool,

    /// Also export the monthly detail to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    /// JSON snapshot produced by `ipca fetch`.
    #[arg(long, value_name = "JSON", default_value = DEFAULT_SNAPSHOT)]
    pub input: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub fetch: FetchArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_window() {
        let cli = Cli::parse_from(["ipca", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.fetch.start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(args.fetch.end, NaiveDate::from_ymd_opt(2026, 1, 22).unwrap());
        assert_eq!(args.fetch.indicator, "IPCA");
        assert_eq!(args.fetch.calc_type, "L");
        assert_eq!(args.report.years, vec![2026, 2027]);
        assert!((args.report.target - 3.0).abs() < 1e-12);
        assert!((args.report.tolerance - 1.5).abs() < 1e-12);
        assert!(!args.report.no_xlsx);
    }

    #[test]
    fn analyze_accepts_year_list_and_band() {
        let cli = Cli::parse_from([
            "ipca", "analyze", "--input", "x.json", "--years", "2027,2028", "--target", "3.25", "--no-xlsx",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.input, PathBuf::from("x.json"));
        assert_eq!(args.report.years, vec![2027, 2028]);
        assert!((args.report.target - 3.25).abs() < 1e-12);
        assert!(args.report.no_xlsx);
    }

    #[test]
    fn invalid_date_is_rejected() {
        let res = Cli::try_parse_from(["ipca", "fetch", "--start", "22/01/2026"]);
        assert!(res.is_err());
    }
}
