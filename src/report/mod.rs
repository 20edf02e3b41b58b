//! Reporting: console text and the spreadsheet.

pub mod format;
pub mod xlsx;

pub use format::*;
pub use xlsx::*;
