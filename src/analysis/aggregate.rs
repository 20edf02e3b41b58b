//! Yearly and quarterly aggregates over the selected survey.
//!
//! Every figure is derived from the median of each month present. Absent
//! months are skipped: they do not count towards means or quarter lists and
//! are never substituted with zero.

use log::debug;

use crate::analysis::compound::{compound, simple_sum};
use crate::analysis::selection::SurveySnapshot;
use crate::domain::{
    MonthSlot, MonthValue, PeriodStats, Quarter, QuarterlyAggregate, RefMonth, TargetAssessment, TargetBand, Trend,
    YearComparison, YearlyAggregate,
};

/// Summary statistics over the given months, or `None` if there are none.
///
/// Ties on min/max resolve to the earliest month.
pub fn period_stats(values: &[MonthValue]) -> Option<PeriodStats> {
    let first = *values.first()?;
    let rates: Vec<f64> = values.iter().map(|v| v.value).collect();

    let mut min = first;
    let mut max = first;
    for v in &values[1..] {
        if v.value < min.value {
            min = *v;
        }
        if v.value > max.value {
            max = *v;
        }
    }

    let simple = simple_sum(&rates);
    Some(PeriodStats {
        n_months: values.len(),
        compounded: compound(&rates),
        simple_sum: simple,
        mean: simple / values.len() as f64,
        min,
        max,
    })
}

/// Build the 12-month table, yearly figures and the four quarters of `year`.
pub fn analyze_year(snapshot: &SurveySnapshot, year: i32) -> YearlyAggregate {
    let slots: Vec<MonthSlot> = RefMonth::months_of(year)
        .map(|month| MonthSlot {
            month,
            expectation: snapshot.get(month).copied(),
        })
        .collect();

    let values: Vec<MonthValue> = slots
        .iter()
        .filter_map(|s| {
            s.expectation.map(|e| MonthValue {
                month: s.month,
                value: e.median,
            })
        })
        .collect();

    let quarters = Quarter::ALL
        .iter()
        .map(|&quarter| {
            let qvalues: Vec<MonthValue> = values
                .iter()
                .filter(|v| v.month.quarter() == quarter)
                .copied()
                .collect();
            QuarterlyAggregate {
                year,
                quarter,
                stats: period_stats(&qvalues),
                values: qvalues,
            }
        })
        .collect();

    let stats = period_stats(&values);
    if let Some(s) = &stats {
        debug!(
            "{year}: {} months, compounded={:.4}%, sum={:.4}%, mean={:.4}%",
            s.n_months, s.compounded, s.simple_sum, s.mean
        );
    } else {
        debug!("{year}: no months present");
    }

    YearlyAggregate {
        year,
        slots,
        values,
        stats,
        quarters,
    }
}

/// Compare each consecutive pair of years that both have data.
pub fn compare_years(years: &[YearlyAggregate]) -> Vec<YearComparison> {
    years
        .windows(2)
        .filter_map(|pair| {
            let earlier = pair[0].compounded()?;
            let later = pair[1].compounded()?;
            let delta = later - earlier;
            Some(YearComparison {
                earlier_year: pair[0].year,
                later_year: pair[1].year,
                earlier,
                later,
                delta,
                trend: Trend::from_delta(delta),
            })
        })
        .collect()
}

/// Place a year's compounded total within the target band.
pub fn assess_target(year: &YearlyAggregate, band: &TargetBand) -> Option<TargetAssessment> {
    let compounded = year.compounded()?;
    Some(TargetAssessment {
        year: year.year,
        compounded,
        deviation: compounded - band.target,
        status: band.status_of(compounded),
    })
}
