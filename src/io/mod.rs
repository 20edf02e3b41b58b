//! Input/output helpers.
//!
//! - survey snapshot JSON read/write (`snapshot`)
//! - monthly CSV export (`export`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
