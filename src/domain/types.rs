//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - deserialized straight from the provider's JSON
//! - aggregated in-memory by `analysis`
//! - rendered by both the console report and the spreadsheet writer

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the Top 5 monthly expectations dataset, as returned by the provider.
///
/// Field names follow the provider's schema. Only the fields the analysis needs
/// are modelled; anything else in the JSON object is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    #[serde(rename = "Indicador", default)]
    pub indicator: String,
    /// Survey (collection) date, ISO `YYYY-MM-DD`.
    #[serde(rename = "Data")]
    pub date: String,
    /// Month the forecast refers to, `MM/YYYY`.
    #[serde(rename = "DataReferencia")]
    pub reference_month: String,
    #[serde(rename = "Mediana")]
    pub median: f64,
    #[serde(rename = "Media")]
    pub mean: f64,
    #[serde(rename = "Minimo")]
    pub min: f64,
    #[serde(rename = "Maximo")]
    pub max: f64,
    #[serde(rename = "DesvioPadrao")]
    pub std_dev: f64,
}

/// A calendar month a forecast refers to.
///
/// Ordered chronologically (year first), displayed as `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefMonth {
    pub year: i32,
    pub month: u32,
}

impl RefMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The twelve canonical months of `year`, January first.
    pub fn months_of(year: i32) -> impl Iterator<Item = RefMonth> {
        (1..=12).map(move |month| RefMonth { year, month })
    }

    pub fn quarter(self) -> Quarter {
        Quarter::of_month(self.month)
    }
}

impl fmt::Display for RefMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

impl FromStr for RefMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mm, yyyy) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("expected MM/YYYY, got '{s}'"))?;
        let month: u32 = mm
            .parse()
            .map_err(|_| format!("invalid month in '{s}'"))?;
        let year: i32 = yyyy
            .parse()
            .map_err(|_| format!("invalid year in '{s}'"))?;
        RefMonth::new(year, month).ok_or_else(|| format!("month out of range in '{s}'"))
    }
}

/// The five statistics of one reference month, taken from the selected survey date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyExpectation {
    pub median: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl From<&SurveyRecord> for MonthlyExpectation {
    fn from(r: &SurveyRecord) -> Self {
        Self {
            median: r.median,
            mean: r.mean,
            min: r.min,
            max: r.max,
            std_dev: r.std_dev,
        }
    }
}

/// Calendar quarter, by position of the month within the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Months 1-3 -> Q1, 4-6 -> Q2, 7-9 -> Q3, 10-12 -> Q4.
    pub fn of_month(month: u32) -> Quarter {
        match month {
            1..=3 => Quarter::Q1,
            4..=6 => Quarter::Q2,
            7..=9 => Quarter::Q3,
            _ => Quarter::Q4,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Quarter::Q1 => 1,
            Quarter::Q2 => 2,
            Quarter::Q3 => 3,
            Quarter::Q4 => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "Q1 (Jan-Mar)",
            Quarter::Q2 => "Q2 (Apr-Jun)",
            Quarter::Q3 => "Q3 (Jul-Sep)",
            Quarter::Q4 => "Q4 (Oct-Dec)",
        }
    }
}

/// A month together with its median value (the value every aggregate is built on).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthValue {
    pub month: RefMonth,
    pub value: f64,
}

/// Summary figures over the months present in a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodStats {
    pub n_months: usize,
    /// Compounded accumulation, percent.
    pub compounded: f64,
    /// Arithmetic sum of the monthly rates, percent.
    pub simple_sum: f64,
    pub mean: f64,
    pub min: MonthValue,
    pub max: MonthValue,
}

/// One slot of a year's 12-month table. `expectation` is `None` when the month is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthSlot {
    pub month: RefMonth,
    pub expectation: Option<MonthlyExpectation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuarterlyAggregate {
    pub year: i32,
    pub quarter: Quarter,
    /// Medians of the months present, in calendar order.
    pub values: Vec<MonthValue>,
    /// `None` when no month of the quarter is present.
    pub stats: Option<PeriodStats>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyAggregate {
    pub year: i32,
    /// Always 12 slots, January first.
    pub slots: Vec<MonthSlot>,
    /// Medians of the months present, in calendar order.
    pub values: Vec<MonthValue>,
    /// `None` when no month of the year is present.
    pub stats: Option<PeriodStats>,
    /// Always 4 entries, Q1 first.
    pub quarters: Vec<QuarterlyAggregate>,
}

impl YearlyAggregate {
    pub fn compounded(&self) -> Option<f64> {
        self.stats.map(|s| s.compounded)
    }
}

/// Direction of the change between two years' compounded totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Increase,
    Decrease,
    Stable,
}

impl Trend {
    pub fn from_delta(delta: f64) -> Trend {
        if delta > 0.0 {
            Trend::Increase
        } else if delta < 0.0 {
            Trend::Decrease
        } else {
            Trend::Stable
        }
    }
}

/// Year-over-year comparison of compounded totals (`later - earlier`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearComparison {
    pub earlier_year: i32,
    pub later_year: i32,
    pub earlier: f64,
    pub later: f64,
    pub delta: f64,
    pub trend: Trend,
}

/// Policy target band: target value and ceiling (target + tolerance), percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBand {
    pub target: f64,
    pub tolerance: f64,
}

impl TargetBand {
    pub fn ceiling(&self) -> f64 {
        self.target + self.tolerance
    }

    pub fn status_of(&self, value: f64) -> TargetStatus {
        if value <= self.target {
            TargetStatus::WithinTarget
        } else if value <= self.ceiling() {
            TargetStatus::AboveTarget
        } else {
            TargetStatus::AboveCeiling
        }
    }
}

impl Default for TargetBand {
    fn default() -> Self {
        Self {
            target: 3.0,
            tolerance: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    WithinTarget,
    AboveTarget,
    AboveCeiling,
}

impl TargetStatus {
    pub fn description(self) -> &'static str {
        match self {
            TargetStatus::WithinTarget => "Expectation WITHIN the target",
            TargetStatus::AboveTarget => "Expectation ABOVE the target, but within the ceiling",
            TargetStatus::AboveCeiling => "Expectation ABOVE the target ceiling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetAssessment {
    pub year: i32,
    pub compounded: f64,
    /// `compounded - target`, percentage points.
    pub deviation: f64,
    pub status: TargetStatus,
}

/// Resolved settings for the fetch stage.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub indicator: String,
    pub calc_type: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub snapshot: PathBuf,
}

/// Resolved settings for the analysis + report stages.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub years: Vec<i32>,
    pub band: TargetBand,
    pub xlsx: bool,
    pub prefix: String,
    pub out_dir: PathBuf,
    pub export_csv: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_month_parses_and_displays() {
        let m: RefMonth = "03/2026".parse().unwrap();
        assert_eq!(m, RefMonth { year: 2026, month: 3 });
        assert_eq!(m.to_string(), "03/2026");
        assert!("13/2026".parse::<RefMonth>().is_err());
        assert!("2026-03".parse::<RefMonth>().is_err());
        assert!("xx/2026".parse::<RefMonth>().is_err());
    }

    #[test]
    fn ref_months_order_chronologically() {
        let dec = RefMonth::new(2026, 12).unwrap();
        let jan = RefMonth::new(2027, 1).unwrap();
        assert!(dec < jan);
    }

    #[test]
    fn quarter_partition_by_position() {
        let quarters: Vec<u8> = (1..=12).map(|m| Quarter::of_month(m).number()).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn target_band_three_way_status() {
        let band = TargetBand::default();
        assert!((band.ceiling() - 4.5).abs() < 1e-12);
        assert_eq!(band.status_of(3.0), TargetStatus::WithinTarget);
        assert_eq!(band.status_of(2.1), TargetStatus::WithinTarget);
        assert_eq!(band.status_of(3.01), TargetStatus::AboveTarget);
        assert_eq!(band.status_of(4.5), TargetStatus::AboveTarget);
        assert_eq!(band.status_of(4.51), TargetStatus::AboveCeiling);
    }

    #[test]
    fn trend_follows_sign_of_delta() {
        assert_eq!(Trend::from_delta(0.2), Trend::Increase);
        assert_eq!(Trend::from_delta(-0.2), Trend::Decrease);
        assert_eq!(Trend::from_delta(0.0), Trend::Stable);
    }

    #[test]
    fn survey_record_deserializes_provider_fields() {
        let json = r#"{
            "Indicador": "IPCA",
            "Data": "2026-01-22",
            "DataReferencia": "02/2026",
            "tipoCalculo": "L",
            "Media": 0.41,
            "Mediana": 0.4,
            "DesvioPadrao": 0.05,
            "Minimo": 0.3,
            "Maximo": 0.5
        }"#;
        let r: SurveyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.indicator, "IPCA");
        assert_eq!(r.reference_month, "02/2026");
        assert!((r.median - 0.4).abs() < 1e-12);
        assert!((r.std_dev - 0.05).abs() < 1e-12);
    }
}
