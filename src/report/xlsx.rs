//! Three-sheet spreadsheet report: monthly detail, annual summary, target band.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::app::pipeline::AnalysisOutput;
use crate::domain::{PeriodStats, TargetAssessment};
use crate::error::AppError;
use crate::report::format::trend_label;

const MISSING: &str = "N/D";
const HEADER_FILL: u32 = 0x1F4E78;
const LABEL_FILL: u32 = 0xDDEBF7;

struct Styles {
    header: Format,
    label: Format,
    text: Format,
    pct: Format,
    pct2: Format,
}

impl Styles {
    fn new() -> Self {
        let cell = Format::new().set_border(FormatBorder::Thin);
        Self {
            header: cell
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center),
            label: cell.clone().set_bold().set_background_color(Color::RGB(LABEL_FILL)),
            text: cell.clone().set_align(FormatAlign::Center),
            pct: cell.clone().set_num_format("0.0000"),
            pct2: cell.set_num_format("0.00"),
        }
    }
}

/// `<prefix>_<YYYY-MM-DD>.xlsx`, named after the survey date.
pub fn workbook_file_name(prefix: &str, survey_date: NaiveDate) -> String {
    format!("{prefix}_{}.xlsx", survey_date.format("%Y-%m-%d"))
}

/// Build the workbook and save it under `out_dir`. Returns the written path.
pub fn write_workbook(output: &AnalysisOutput, out_dir: &Path, prefix: &str) -> Result<PathBuf, AppError> {
    let path = out_dir.join(workbook_file_name(prefix, output.snapshot.date));
    let mut workbook =
        build_workbook(output).map_err(|e| AppError::xlsx(format!("Failed to build spreadsheet: {e}")))?;
    workbook
        .save(&path)
        .map_err(|e| AppError::xlsx(format!("Failed to save spreadsheet '{}': {e}", path.display())))?;
    info!("wrote spreadsheet {}", path.display());
    Ok(path)
}

fn build_workbook(output: &AnalysisOutput) -> Result<Workbook, XlsxError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    monthly_sheet(workbook.add_worksheet(), output, &styles)?;
    annual_sheet(workbook.add_worksheet(), output, &styles)?;
    target_sheet(workbook.add_worksheet(), output, &styles)?;

    Ok(workbook)
}

fn header_row(ws: &mut Worksheet, row: u32, headers: &[&str], styles: &Styles) -> Result<(), XlsxError> {
    for (col, h) in headers.iter().enumerate() {
        ws.write_string_with_format(row, col as u16, *h, &styles.header)?;
    }
    Ok(())
}

fn monthly_sheet(ws: &mut Worksheet, output: &AnalysisOutput, styles: &Styles) -> Result<(), XlsxError> {
    ws.set_name("Monthly")?;
    header_row(ws, 0, &["Year", "Month", "Median", "Mean", "Min", "Max", "Std Dev"], styles)?;

    let mut row = 1u32;
    for year in &output.years {
        for slot in &year.slots {
            ws.write_number_with_format(row, 0, year.year, &styles.text)?;
            ws.write_string_with_format(row, 1, slot.month.to_string(), &styles.text)?;
            match &slot.expectation {
                Some(e) => {
                    for (i, v) in [e.median, e.mean, e.min, e.max, e.std_dev].into_iter().enumerate() {
                        ws.write_number_with_format(row, 2 + i as u16, v, &styles.pct)?;
                    }
                }
                None => {
                    for col in 2..7 {
                        ws.write_string_with_format(row, col, MISSING, &styles.text)?;
                    }
                }
            }
            row += 1;
        }
    }

    ws.set_column_width(0, 8)?;
    ws.set_column_width(1, 10)?;
    for col in 2..7 {
        ws.set_column_width(col, 11)?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

fn annual_sheet(ws: &mut Worksheet, output: &AnalysisOutput, styles: &Styles) -> Result<(), XlsxError> {
    ws.set_name("Annual")?;
    header_row(
        ws,
        0,
        &[
            "Year",
            "Months",
            "Compounded %",
            "Simple sum %",
            "Mean %",
            "Max %",
            "Max month",
            "Min %",
            "Min month",
            "Q1 %",
            "Q2 %",
            "Q3 %",
            "Q4 %",
        ],
        styles,
    )?;

    for (i, year) in output.years.iter().enumerate() {
        let row = 1 + i as u32;
        ws.write_number_with_format(row, 0, year.year, &styles.text)?;
        match &year.stats {
            Some(s) => write_stats(ws, row, s, styles)?,
            None => {
                ws.write_number_with_format(row, 1, 0, &styles.text)?;
                for col in 2..9 {
                    ws.write_string_with_format(row, col, MISSING, &styles.text)?;
                }
            }
        }
        for q in &year.quarters {
            let col = 8 + q.quarter.number() as u16;
            match &q.stats {
                Some(s) => ws.write_number_with_format(row, col, s.compounded, &styles.pct2)?,
                None => ws.write_string_with_format(row, col, MISSING, &styles.text)?,
            };
        }
    }

    // Year-over-year lines under the table.
    let mut row = 2 + output.years.len() as u32;
    for c in &output.comparisons {
        ws.write_string_with_format(row, 0, format!("{}-{}", c.later_year, c.earlier_year), &styles.label)?;
        ws.write_number_with_format(row, 1, c.delta, &styles.pct2)?;
        ws.write_string(row, 2, trend_label(c))?;
        row += 1;
    }

    ws.set_column_width(0, 11)?;
    for col in 1..13 {
        ws.set_column_width(col, 13)?;
    }
    Ok(())
}

fn write_stats(ws: &mut Worksheet, row: u32, s: &PeriodStats, styles: &Styles) -> Result<(), XlsxError> {
    ws.write_number_with_format(row, 1, s.n_months as u32, &styles.text)?;
    ws.write_number_with_format(row, 2, s.compounded, &styles.pct2)?;
    ws.write_number_with_format(row, 3, s.simple_sum, &styles.pct2)?;
    ws.write_number_with_format(row, 4, s.mean, &styles.pct)?;
    ws.write_number_with_format(row, 5, s.max.value, &styles.pct)?;
    ws.write_string_with_format(row, 6, s.max.month.to_string(), &styles.text)?;
    ws.write_number_with_format(row, 7, s.min.value, &styles.pct)?;
    ws.write_string_with_format(row, 8, s.min.month.to_string(), &styles.text)?;
    Ok(())
}

fn target_sheet(ws: &mut Worksheet, output: &AnalysisOutput, styles: &Styles) -> Result<(), XlsxError> {
    ws.set_name("Target")?;
    ws.write_string_with_format(0, 0, "Target %", &styles.label)?;
    ws.write_number_with_format(0, 1, output.band.target, &styles.pct2)?;
    ws.write_string_with_format(1, 0, "Ceiling %", &styles.label)?;
    ws.write_number_with_format(1, 1, output.band.ceiling(), &styles.pct2)?;

    header_row(ws, 3, &["Year", "Compounded %", "Deviation (pp)", "Status"], styles)?;
    for (i, a) in output.targets.iter().enumerate() {
        write_assessment(ws, 4 + i as u32, a, styles)?;
    }

    ws.set_column_width(0, 12)?;
    ws.set_column_width(1, 15)?;
    ws.set_column_width(2, 15)?;
    ws.set_column_width(3, 52)?;
    Ok(())
}

fn write_assessment(ws: &mut Worksheet, row: u32, a: &TargetAssessment, styles: &Styles) -> Result<(), XlsxError> {
    ws.write_number_with_format(row, 0, a.year, &styles.text)?;
    ws.write_number_with_format(row, 1, a.compounded, &styles.pct2)?;
    ws.write_number_with_format(row, 2, a.deviation, &styles.pct2)?;
    ws.write_string_with_format(row, 3, a.status.description(), &styles.text)?;
    Ok(())
}
