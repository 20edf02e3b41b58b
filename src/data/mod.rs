//! Remote data access.
//!
//! - `olinda`: the central bank's OData expectations endpoint

pub mod olinda;
#[cfg(test)]
pub mod sample;

pub use olinda::*;
