//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the provider's survey row (`SurveyRecord`) and its month key (`RefMonth`)
//! - the per-month snapshot (`MonthlyExpectation`)
//! - aggregate outputs (`YearlyAggregate`, `QuarterlyAggregate`, `YearComparison`, etc.)
//! - resolved stage settings (`FetchConfig`, `AnalysisConfig`)

pub mod types;

pub use types::*;
