//! Aggregation of the survey snapshot into yearly and quarterly projections.
//!
//! - `compound`: the compounding fold over monthly rates
//! - `selection`: pick the latest survey date and key it by reference month
//! - `aggregate`: yearly/quarterly figures, year-over-year deltas, target band

pub mod aggregate;
pub mod compound;
pub mod selection;

pub use aggregate::*;
pub use compound::*;
pub use selection::*;
