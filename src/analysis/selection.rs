//! Latest-survey selection and month-keyed reshape.
//!
//! The provider returns every survey collected within the requested window.
//! Only the most recent survey date is analysed; its rows are re-keyed by the
//! month they forecast.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{info, warn};

use crate::domain::{MonthlyExpectation, RefMonth, SurveyRecord};
use crate::error::AppError;

/// The rows of a single survey date, keyed by reference month.
#[derive(Debug, Clone)]
pub struct SurveySnapshot {
    pub date: NaiveDate,
    pub expectations: BTreeMap<RefMonth, MonthlyExpectation>,
    /// Rows in the input file.
    pub records_total: usize,
    /// Rows matching `date`.
    pub records_selected: usize,
    /// Human-readable notes about rows that were skipped or overwritten.
    pub notes: Vec<String>,
}

impl SurveySnapshot {
    pub fn get(&self, month: RefMonth) -> Option<&MonthlyExpectation> {
        self.expectations.get(&month)
    }
}

/// Parse a provider survey date (`YYYY-MM-DD`).
pub fn parse_survey_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| AppError::data(format!("Invalid survey date '{raw}': {e}")))
}

/// Most recent survey date across all records, compared as calendar dates.
pub fn latest_survey_date(records: &[SurveyRecord]) -> Result<NaiveDate, AppError> {
    let mut latest: Option<NaiveDate> = None;
    for r in records {
        let date = parse_survey_date(&r.date)?;
        latest = Some(latest.map_or(date, |d| d.max(date)));
    }
    latest.ok_or_else(|| AppError::data("No survey records to analyse."))
}

/// Select the most recent survey date and index its rows by reference month.
pub fn build_snapshot(records: &[SurveyRecord]) -> Result<SurveySnapshot, AppError> {
    let date = latest_survey_date(records)?;

    let mut expectations = BTreeMap::new();
    let mut notes = Vec::new();
    let mut records_selected = 0;

    for r in records {
        if parse_survey_date(&r.date)? != date {
            continue;
        }
        records_selected += 1;

        let month: RefMonth = match r.reference_month.parse() {
            Ok(m) => m,
            Err(e) => {
                let note = format!("skipped row: {e}");
                warn!("{note}");
                notes.push(note);
                continue;
            }
        };

        if expectations.insert(month, MonthlyExpectation::from(r)).is_some() {
            let note = format!("duplicate reference month {month}; keeping the last row");
            warn!("{note}");
            notes.push(note);
        }
    }

    info!(
        "survey date {date}: {records_selected} of {} records selected, {} reference months",
        records.len(),
        expectations.len()
    );

    Ok(SurveySnapshot {
        date,
        expectations,
        records_total: records.len(),
        records_selected,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::record;

    #[test]
    fn keeps_only_the_latest_survey_date() {
        let records = vec![
            record("2026-01-15", "01/2026", 0.30),
            record("2026-01-15", "02/2026", 0.31),
            record("2026-01-22", "01/2026", 0.40),
            record("2026-01-22", "02/2026", 0.41),
        ];
        let snap = build_snapshot(&records).unwrap();
        assert_eq!(snap.date, NaiveDate::from_ymd_opt(2026, 1, 22).unwrap());
        assert_eq!(snap.records_selected, 2);
        assert_eq!(snap.records_total, 4);
        let jan = snap.get(RefMonth::new(2026, 1).unwrap()).unwrap();
        assert!((jan.median - 0.40).abs() < 1e-12);
    }

    #[test]
    fn latest_date_is_calendar_not_lexicographic() {
        // As strings "2026-1-9" > "2026-01-10".
        let records = vec![
            record("2026-1-9", "01/2026", 0.3),
            record("2026-01-10", "01/2026", 0.4),
        ];
        let latest = latest_survey_date(&records).unwrap();
        assert_eq!(latest, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
    }

    #[test]
    fn unparsable_survey_date_is_a_data_error() {
        let records = vec![record("22/01/2026", "01/2026", 0.3)];
        let err = latest_survey_date(&records).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
    }

    #[test]
    fn empty_input_is_a_data_error() {
        let err = build_snapshot(&[]).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert!(err.message().contains("No survey records"));
    }

    #[test]
    fn bad_reference_month_is_skipped_with_note() {
        let records = vec![
            record("2026-01-22", "01/2026", 0.4),
            record("2026-01-22", "2026-02", 0.5),
        ];
        let snap = build_snapshot(&records).unwrap();
        assert_eq!(snap.expectations.len(), 1);
        assert_eq!(snap.notes.len(), 1);
    }

    #[test]
    fn duplicate_reference_month_keeps_last() {
        let records = vec![
            record("2026-01-22", "01/2026", 0.4),
            record("2026-01-22", "01/2026", 0.6),
        ];
        let snap = build_snapshot(&records).unwrap();
        let jan = snap.get(RefMonth::new(2026, 1).unwrap()).unwrap();
        assert!((jan.median - 0.6).abs() < 1e-12);
        assert_eq!(snap.notes.len(), 1);
    }
}
