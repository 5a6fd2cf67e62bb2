//! CSV loading for the per-city trip datasets.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::engine::types::{DatasetCapabilities, RawTrip, RecordCollection, load_and_derive};

/// Recognized cities and their dataset file names.
pub static CITY_DATA: &[(&str, &str)] = &[
    ("chicago", "chicago.csv"),
    ("new york city", "new_york_city.csv"),
    ("washington", "washington.csv"),
];

/// Path of a city's dataset under `data_dir`, if the city is recognized.
pub fn city_path(data_dir: &Path, city: &str) -> Option<PathBuf> {
    CITY_DATA
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, file)| data_dir.join(file))
}

/// Loads a city's CSV and runs the field deriver over every row.
///
/// The Gender / Birth Year columns are present-or-absent per dataset; their
/// presence is read once from the header and recorded as capability flags
/// on the returned collection.
///
/// # Errors
///
/// Fails on an unrecognized city, unreadable file, malformed row, or any
/// unparseable start time. A bad row rejects the whole dataset.
pub fn load_city(data_dir: &Path, city: &str) -> Result<RecordCollection> {
    let Some(path) = city_path(data_dir, city) else {
        bail!("unrecognized city {city:?}");
    };

    debug!(city, path = %path.display(), "Loading city dataset");
    let file =
        File::open(&path).with_context(|| format!("opening dataset {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);

    let headers = rdr.headers().context("reading CSV header")?;
    let capabilities = DatasetCapabilities {
        has_gender: headers.iter().any(|h| h == "Gender"),
        has_birth_year: headers.iter().any(|h| h == "Birth Year"),
    };

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawTrip = result.context("deserializing trip row")?;
        rows.push(row);
    }

    let collection = load_and_derive(rows, capabilities)?;
    info!(
        city,
        records = collection.len(),
        has_gender = capabilities.has_gender,
        has_birth_year = capabilities.has_birth_year,
        "Dataset loaded"
    );

    Ok(collection)
}
