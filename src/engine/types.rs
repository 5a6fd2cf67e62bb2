//! Data types for trip records and record collections.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::engine::derive::{derive_fields, parse_start_time};
use crate::error::EngineError;

/// Category used when a record has no user type.
pub const UNKNOWN_USER: &str = "unknown user";
/// Category used when a record has no gender in a dataset that carries one.
pub const UNDISCLOSED_GENDER: &str = "undisclosed gender";

/// A single row deserialized from a city CSV file, before derivation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "Trip Duration", default)]
    pub trip_duration_seconds: Option<f64>,
    #[serde(rename = "Start Station", default)]
    pub start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    pub end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    // Float-formatted in the source data ("1992.0").
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

/// One trip event with its derived calendar fields.
///
/// The derived fields are computed once by [`load_and_derive`] and never
/// re-derived downstream.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub trip_duration_seconds: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,

    /// 1-based month index (datasets span January–June).
    pub month: u32,
    /// Monday=0 through Sunday=6.
    pub weekday: u32,
    /// Hour of day, 0–23.
    pub start_hour: u32,
}

/// Which optional columns the source dataset carries.
///
/// Field presence is a property of the whole dataset, determined once at
/// load from the CSV header, not checked per record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetCapabilities {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// An ordered sequence of trip records. Insertion order is preserved from
/// source load through filtering; filtering selects a stable subsequence.
#[derive(Debug, Clone)]
pub struct RecordCollection {
    pub records: Vec<TripRecord>,
    pub capabilities: DatasetCapabilities,
}

impl RecordCollection {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Applies the field deriver over all raw rows, producing a collection.
///
/// Normalizes missing user types to [`UNKNOWN_USER`] and, when the dataset
/// carries a gender column, missing genders to [`UNDISCLOSED_GENDER`].
///
/// # Errors
///
/// Fails with [`EngineError::MalformedTimestamp`] on the first unparseable
/// start time; the whole dataset is rejected, no rows are skipped.
pub fn load_and_derive(
    rows: Vec<RawTrip>,
    capabilities: DatasetCapabilities,
) -> Result<RecordCollection, EngineError> {
    let mut records = Vec::with_capacity(rows.len());

    for (row, raw) in rows.into_iter().enumerate() {
        let start_time = parse_start_time(&raw.start_time, row)?;
        let (month, weekday, start_hour) = derive_fields(&start_time);

        let gender = if capabilities.has_gender {
            Some(
                raw.gender
                    .unwrap_or_else(|| UNDISCLOSED_GENDER.to_string()),
            )
        } else {
            None
        };

        records.push(TripRecord {
            start_time,
            trip_duration_seconds: raw.trip_duration_seconds,
            start_station: raw.start_station,
            end_station: raw.end_station,
            user_type: raw.user_type.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            gender,
            birth_year: raw.birth_year.map(|y| y as i32),
            month,
            weekday,
            start_hour,
        });
    }

    Ok(RecordCollection {
        records,
        capabilities,
    })
}
