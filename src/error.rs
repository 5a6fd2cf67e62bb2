//! Error types surfaced by the analytics engine.

use thiserror::Error;

/// Errors produced by loading, filtering, or aggregating trip records.
///
/// All three are reported up to the caller; the engine never substitutes
/// defaults for them.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A record's start time could not be parsed. Fatal for the whole load:
    /// the dataset is rejected, not partially processed.
    #[error("malformed start time {value:?} in row {row}: {source}")]
    MalformedTimestamp {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A filter value outside the canonical month/day tables. The input
    /// layer validates before calling the filter, so this is a caller
    /// contract violation.
    #[error("unrecognized filter value {0:?}")]
    InvalidFilterValue(String),

    /// An aggregate was requested over a field with zero eligible records.
    /// Distinct from "zero as a result" so callers can say "not available".
    #[error("no records carry a value for {0}")]
    NoData(&'static str),
}
