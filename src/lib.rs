//! `ipca-expect` library crate.
//!
//! The binary (`ipca`) is a thin wrapper around this library so that:
//!
//! - the aggregation logic is testable without spawning processes
//! - the fetch, analysis and report stages can be driven independently

pub mod analysis;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod report;
