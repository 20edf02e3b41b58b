//! Deterministic survey rows for tests.

use crate::domain::SurveyRecord;

/// A single row with `median` and spread statistics derived from it.
pub fn record(date: &str, reference_month: &str, median: f64) -> SurveyRecord {
    SurveyRecord {
        indicator: "IPCA".to_string(),
        date: date.to_string(),
        reference_month: reference_month.to_string(),
        median,
        mean: median + 0.01,
        min: median - 0.10,
        max: median + 0.10,
        std_dev: 0.05,
    }
}

/// Twelve rows for `year`, all with the same median.
pub fn flat_year(date: &str, year: i32, median: f64) -> Vec<SurveyRecord> {
    (1..=12)
        .map(|m| record(date, &format!("{m:02}/{year}"), median))
        .collect()
}

/// The fixed end-to-end dataset: an older survey that must be ignored, then the
/// latest survey with median `1.0` for every month of 2026 and a rising 2027.
pub fn end_to_end() -> Vec<SurveyRecord> {
    let mut rows = flat_year("2026-01-15", 2026, 0.5);
    rows.extend(flat_year("2026-01-22", 2026, 1.0));
    rows.extend(
        (1..=12).map(|m| record("2026-01-22", &format!("{m:02}/2027"), 0.20 + 0.01 * m as f64)),
    );
    rows
}
