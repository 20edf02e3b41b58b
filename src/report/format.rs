//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{MonthlyExpectation, TargetAssessment, TargetBand, Trend, YearComparison, YearlyAggregate};

const RULE_WIDTH: usize = 60;
const MISSING: &str = "N/D";

/// Format the complete console report.
pub fn format_report(output: &AnalysisOutput) -> String {
    let mut out = String::new();

    out.push_str(&banner(&format!(
        "IPCA EXPECTATIONS ANALYSIS - TOP 5 SURVEY\nSurvey date: {}",
        output.snapshot.date.format("%Y-%m-%d")
    )));
    out.push_str(&format_notes(&output.snapshot.notes));

    for year in &output.years {
        out.push('\n');
        out.push_str(&format_year(year));
    }

    out.push('\n');
    out.push_str(&format_comparisons(&output.years, &output.comparisons));

    out.push('\n');
    let primary_year = output.years.first().map(|y| y.year);
    out.push_str(&format_target(&output.band, primary_year, output.primary_target()));

    out.push('\n');
    out.push_str(&banner("Analysis complete."));
    out
}

/// Monthly table, accumulated totals, insights and quarters for one year.
pub fn format_year(year: &YearlyAggregate) -> String {
    let mut out = String::new();
    out.push_str(&banner(&format!("MONTHLY IPCA EXPECTATIONS - {}", year.year)));
    out.push_str(
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            "Month", "Median", "Mean", "Min", "Max", "Std Dev"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&rule('-'));

    for slot in &year.slots {
        let line = match &slot.expectation {
            Some(e) => month_row(&slot.month.to_string(), e),
            None => format!(
                "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                slot.month.to_string(),
                MISSING,
                MISSING,
                MISSING,
                MISSING,
                MISSING
            ),
        };
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(stats) = &year.stats {
        out.push_str(&rule('-'));
        out.push_str(&format!(
            "\nACCUMULATED INFLATION {} ({} of 12 months)\n",
            year.year, stats.n_months
        ));
        out.push_str(&format!("   Compounded: {:.2}%\n", stats.compounded));
        out.push_str(&format!("   Simple sum: {:.2}%\n", stats.simple_sum));

        out.push_str(&format!("\nINSIGHTS {}:\n", year.year));
        out.push_str(&format!(
            "   Highest expectation: {:.4}% in {}\n",
            stats.max.value, stats.max.month
        ));
        out.push_str(&format!(
            "   Lowest expectation:  {:.4}% in {}\n",
            stats.min.value, stats.min.month
        ));
        out.push_str(&format!("   Monthly mean:        {:.4}%\n", stats.mean));
    }

    out.push_str(&format!("\nINFLATION BY QUARTER {}\n", year.year));
    out.push_str(format!("{:<15} {:<20} {:>12}\n", "Quarter", "Months", "Compounded").trim_end());
    out.push('\n');
    out.push_str(&format!("{}\n", "-".repeat(50)));
    for q in &year.quarters {
        let line = match &q.stats {
            Some(s) => format!(
                "{:<15} {:<20} {:>11.2}%",
                q.quarter.label(),
                format!("{} months", s.n_months),
                s.compounded
            ),
            None => format!("{:<15} {:<20} {:>12}", q.quarter.label(), MISSING, MISSING),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Year-over-year section. Years without data are reported as unavailable.
pub fn format_comparisons(years: &[YearlyAggregate], comparisons: &[YearComparison]) -> String {
    let title = match (years.first(), years.last()) {
        (Some(a), Some(b)) if years.len() > 1 => format!("COMPARISON {} vs {}", a.year, b.year),
        _ => "YEAR-OVER-YEAR COMPARISON".to_string(),
    };
    let mut out = banner(&title);

    if comparisons.is_empty() {
        out.push_str("   Not enough data to compare years.\n");
        return out;
    }

    for (i, c) in comparisons.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("   Accumulated inflation {}: {:.2}%\n", c.earlier_year, c.earlier));
        out.push_str(&format!("   Accumulated inflation {}: {:.2}%\n", c.later_year, c.later));
        out.push_str(&format!(
            "   Difference ({}-{}):   {:+.2}%\n",
            c.later_year, c.earlier_year, c.delta
        ));
        out.push_str(&format!("\n   {}\n", trend_label(c)));
    }
    out
}

/// Target band section for the nearest forecast year.
pub fn format_target(band: &TargetBand, year: Option<i32>, assessment: Option<&TargetAssessment>) -> String {
    let mut out = banner("COMPARISON WITH THE INFLATION TARGET");
    let Some(a) = assessment else {
        let label = year.map(|y| y.to_string()).unwrap_or_default();
        out.push_str(&format!("   No data for {label}; target comparison skipped.\n"));
        return out;
    };

    out.push_str(&format!("   Inflation target:     {:.1}%\n", band.target));
    out.push_str(&format!("   Target ceiling:       {:.1}%\n", band.ceiling()));
    out.push_str(&format!("   Expectation {}:     {:.2}%\n", a.year, a.compounded));
    out.push_str(&format!("   Deviation from target: {:+.2}pp\n", a.deviation));
    out.push_str(&format!("\n   {}\n", a.status.description()));
    out
}

/// Rows of the selected survey that were skipped or overwritten while keying by month.
pub fn format_notes(notes: &[String]) -> String {
    let mut out = String::new();
    if notes.is_empty() {
        return out;
    }
    out.push_str(&format!("Input notes ({}):\n", notes.len()));
    for note in notes {
        out.push_str(&format!("   - {note}\n"));
    }
    out
}

pub fn trend_label(c: &YearComparison) -> String {
    match c.trend {
        Trend::Increase => format!("Expected INCREASE in inflation in {}", c.later_year),
        Trend::Decrease => format!("Expected DECREASE in inflation in {}", c.later_year),
        Trend::Stable => "Expected STABLE inflation".to_string(),
    }
}

fn month_row(label: &str, e: &MonthlyExpectation) -> String {
    format!(
        "{:<10} {:>9.4}% {:>9.4}% {:>9.4}% {:>9.4}% {:>10.4}",
        label, e.median, e.mean, e.min, e.max, e.std_dev
    )
}

fn rule(ch: char) -> String {
    let mut s = ch.to_string().repeat(RULE_WIDTH);
    s.push('\n');
    s
}

fn banner(title: &str) -> String {
    let mut out = rule('=');
    for line in title.lines() {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&rule('='));
    out
}
