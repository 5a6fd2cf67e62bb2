//! Trip record analytics engine.
//!
//! Derives calendar fields from raw timestamps, applies month/day filters,
//! computes mode/group-count/sum/mean statistics with first-occurrence
//! tie-breaking, and pages through raw records.

pub mod aggregate;
pub mod browser;
pub mod derive;
pub mod filter;
pub mod types;
