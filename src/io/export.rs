//! Export the monthly detail to CSV.
//!
//! One row per (year, month), absent months included with empty value cells,
//! so the file lines up with the spreadsheet's monthly sheet.

use std::path::Path;

use log::info;

use crate::domain::YearlyAggregate;
use crate::error::AppError;

const HEADER: [&str; 8] = ["year", "month", "median", "mean", "min", "max", "std_dev", "quarter"];

/// Write the monthly detail of every year to a CSV file.
pub fn write_monthly_csv(path: &Path, years: &[YearlyAggregate]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(HEADER)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    let mut rows = 0usize;
    for year in years {
        for slot in &year.slots {
            let stats = match slot.expectation {
                Some(e) => [e.median, e.mean, e.min, e.max, e.std_dev].map(|v| format!("{v:.4}")),
                None => Default::default(),
            };
            let mut record = vec![year.year.to_string(), slot.month.to_string()];
            record.extend(stats);
            record.push(format!("Q{}", slot.month.quarter().number()));
            writer
                .write_record(&record)
                .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
            rows += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    info!("wrote {rows} monthly rows to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_year, build_snapshot};
    use crate::data::sample::flat_year;

    #[test]
    fn csv_has_one_row_per_month_including_absent() {
        let mut rows = flat_year("2026-01-22", 2026, 0.4);
        rows.retain(|r| r.reference_month != "05/2026");
        let snap = build_snapshot(&rows).unwrap();
        let years = vec![analyze_year(&snap, 2026)];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monthly.csv");
        write_monthly_csv(&path, &years).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "year,month,median,mean,min,max,std_dev,quarter");
        assert_eq!(lines[1], "2026,01/2026,0.4000,0.4100,0.3000,0.5000,0.0500,Q1");
        assert_eq!(lines[5], "2026,05/2026,,,,,,Q2");
    }
}
