//! Shared stage logic used by the `fetch`, `analyze` and `run` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch -> snapshot JSON -> latest survey -> yearly/quarterly aggregates -> report
//!
//! The command handlers in `app` then only deal with presentation.

use std::path::PathBuf;

use log::info;

use crate::analysis::{self, SurveySnapshot};
use crate::data::OlindaClient;
use crate::domain::{AnalysisConfig, FetchConfig, SurveyRecord, TargetAssessment, TargetBand, YearComparison, YearlyAggregate};
use crate::error::AppError;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub snapshot: SurveySnapshot,
    /// One aggregate per requested year, in the requested order.
    pub years: Vec<YearlyAggregate>,
    pub comparisons: Vec<YearComparison>,
    pub band: TargetBand,
    /// Assessments for every requested year that has data, in order.
    pub targets: Vec<TargetAssessment>,
}

impl AnalysisOutput {
    /// Assessment of the nearest (first requested) forecast year, if it has data.
    pub fn primary_target(&self) -> Option<&TargetAssessment> {
        let year = self.years.first()?.year;
        self.targets.first().filter(|a| a.year == year)
    }
}

/// Fetch the survey window and persist the raw records. Returns the record count.
pub fn run_fetch(config: &FetchConfig) -> Result<usize, AppError> {
    let client = OlindaClient::new();
    let records = client.fetch_expectations(config)?;
    crate::io::write_snapshot(&config.snapshot, &records)?;
    Ok(records.len())
}

/// Load the snapshot file and aggregate it.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutput, AppError> {
    let records = crate::io::read_records(&config.input)?;
    analyze_records(&records, config)
}

/// Aggregate already-loaded records.
pub fn analyze_records(records: &[SurveyRecord], config: &AnalysisConfig) -> Result<AnalysisOutput, AppError> {
    if config.years.is_empty() {
        return Err(AppError::io("At least one forecast year is required."));
    }

    let snapshot = analysis::build_snapshot(records)?;

    let years: Vec<YearlyAggregate> = config
        .years
        .iter()
        .map(|&year| analysis::analyze_year(&snapshot, year))
        .collect();

    if years.iter().all(|y| y.stats.is_none()) {
        return Err(AppError::data(format!(
            "Survey {} has no reference month in the requested years {:?}.",
            snapshot.date, config.years
        )));
    }

    let comparisons = analysis::compare_years(&years);
    let targets = years
        .iter()
        .filter_map(|y| analysis::assess_target(y, &config.band))
        .collect();

    Ok(AnalysisOutput {
        snapshot,
        years,
        comparisons,
        band: config.band,
        targets,
    })
}

/// Files written by the report stage.
#[derive(Debug, Clone, Default)]
pub struct ReportFiles {
    pub xlsx: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

/// Write the optional file outputs for an analysis.
pub fn write_outputs(output: &AnalysisOutput, config: &AnalysisConfig) -> Result<ReportFiles, AppError> {
    let mut files = ReportFiles::default();

    if config.xlsx {
        files.xlsx = Some(crate::report::write_workbook(output, &config.out_dir, &config.prefix)?);
    }
    if let Some(path) = &config.export_csv {
        crate::io::write_monthly_csv(path, &output.years)?;
        files.csv = Some(path.clone());
    }

    info!(
        "outputs: xlsx={:?} csv={:?}",
        files.xlsx.as_ref().map(|p| p.display().to_string()),
        files.csv.as_ref().map(|p| p.display().to_string())
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{end_to_end, flat_year};
    use crate::domain::TargetStatus;

    fn config(dir: &std::path::Path, years: Vec<i32>) -> AnalysisConfig {
        AnalysisConfig {
            input: dir.join("expectativas_filtradas.json"),
            years,
            band: TargetBand::default(),
            xlsx: true,
            prefix: "analise_ipca".to_string(),
            out_dir: dir.to_path_buf(),
            export_csv: Some(dir.join("monthly.csv")),
        }
    }

    #[test]
    fn end_to_end_from_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), vec![2026, 2027]);

        let raw: Vec<serde_json::Value> = end_to_end()
            .iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        crate::io::write_snapshot(&config.input, &raw).unwrap();

        let output = run_analysis(&config).unwrap();
        assert_eq!(output.snapshot.records_total, 36);
        assert_eq!(output.snapshot.records_selected, 24);

        let y2026 = output.years[0].stats.unwrap();
        assert!((y2026.compounded - 12.68).abs() < 0.005);
        for q in &output.years[0].quarters {
            let c = q.stats.unwrap().compounded;
            assert!((c - 3.03).abs() < 0.005, "{:?}: {c}", q.quarter);
        }

        assert_eq!(output.comparisons.len(), 1);
        assert_eq!(output.targets.len(), 2);
        let primary = output.primary_target().unwrap();
        assert_eq!(primary.year, 2026);
        assert_eq!(primary.status, TargetStatus::AboveCeiling);

        let files = write_outputs(&output, &config).unwrap();
        assert_eq!(files.xlsx.unwrap(), dir.path().join("analise_ipca_2026-01-22.xlsx"));
        assert!(files.csv.unwrap().exists());
    }

    #[test]
    fn primary_target_absent_when_first_year_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rows = flat_year("2026-01-22", 2027, 0.3);
        let output = analyze_records(&rows, &config(dir.path(), vec![2026, 2027])).unwrap();
        assert_eq!(output.targets.len(), 1);
        assert!(output.primary_target().is_none());
    }

    #[test]
    fn no_data_for_any_year_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let rows = flat_year("2026-01-22", 2030, 0.3);
        let err = analyze_records(&rows, &config(dir.path(), vec![2026, 2027])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn empty_year_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_records(&end_to_end(), &config(dir.path(), vec![])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_IO);
    }
}
