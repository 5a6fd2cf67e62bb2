//! Month/day filtering over record collections.

use crate::engine::types::RecordCollection;
use crate::error::EngineError;

/// Recognized month names, index + 1 = the derived month value.
/// The datasets only span January through June.
pub static MONTHS: &[&str] = &["january", "february", "march", "april", "may", "june"];

/// Recognized day names, index = the derived weekday value (Monday=0).
pub static DAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// 1-based index of a canonical lowercase month name.
pub fn month_index(name: &str) -> Result<u32, EngineError> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| EngineError::InvalidFilterValue(name.to_string()))
}

/// Monday-based index of a canonical lowercase day name.
pub fn day_index(name: &str) -> Result<u32, EngineError> {
    DAYS.iter()
        .position(|d| *d == name)
        .map(|i| i as u32)
        .ok_or_else(|| EngineError::InvalidFilterValue(name.to_string()))
}

/// Narrows a collection to records matching the given month and/or day.
///
/// `None` means no filtering on that attribute. Both predicates AND together
/// and the output preserves input order. Records are never mutated; the
/// result is a new collection carrying the same capability flags.
///
/// # Errors
///
/// Returns [`EngineError::InvalidFilterValue`] for a name outside the
/// [`MONTHS`] / [`DAYS`] tables. Callers validate input before reaching
/// this point, so hitting it is a contract violation.
pub fn filter(
    collection: &RecordCollection,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<RecordCollection, EngineError> {
    let month_idx = month.map(month_index).transpose()?;
    let day_idx = day.map(day_index).transpose()?;

    let records = collection
        .records
        .iter()
        .filter(|r| month_idx.is_none_or(|m| r.month == m))
        .filter(|r| day_idx.is_none_or(|d| r.weekday == d))
        .cloned()
        .collect();

    Ok(RecordCollection {
        records,
        capabilities: collection.capabilities,
    })
}
