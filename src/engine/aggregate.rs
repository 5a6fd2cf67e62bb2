//! Descriptive statistics over record collections.
//!
//! Mode, grouped counts, sum and mean, with first-occurrence tie-breaking so
//! "most common" answers are stable and reproducible across runs.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

use crate::engine::filter::{DAYS, MONTHS};
use crate::engine::types::RecordCollection;
use crate::error::EngineError;

/// Counts records per distinct key, ordered by descending count.
///
/// Ties break by first-occurrence order of the key in the input, so the
/// result is deterministic for a given input order.
pub fn group_count<K>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();

    for (idx, key) in keys.into_iter().enumerate() {
        let entry = counts.entry(key).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut groups: Vec<(K, (usize, usize))> = counts.into_iter().collect();
    groups.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
    groups.into_iter().map(|(k, (count, _))| (k, count)).collect()
}

/// Most frequent value, or [`EngineError::NoData`] when the input is empty.
///
/// Same tie-break as [`group_count`]: the earliest-seen of the tied values.
pub fn mode<K>(keys: impl IntoIterator<Item = K>, field: &'static str) -> Result<K, EngineError>
where
    K: Eq + Hash + Clone,
{
    group_count(keys)
        .into_iter()
        .next()
        .map(|(k, _)| k)
        .ok_or(EngineError::NoData(field))
}

/// Counts per distinct value of a categorical field, in the order each
/// distinct value was first encountered. This order governs display.
pub fn breakdown<K>(keys: impl IntoIterator<Item = K>) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    let mut order: Vec<K> = Vec::new();

    for key in keys {
        let entry = counts.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            0
        });
        *entry += 1;
    }

    order
        .into_iter()
        .map(|k| {
            let count = counts[&k];
            (k, count)
        })
        .collect()
}

/// Rounds half-to-even, matching the rounding of the reference reports.
/// Only applied at display time; stored values stay unrounded.
pub fn round_half_to_even(value: f64) -> i64 {
    let floor = value.floor();
    let frac = value - floor;
    let base = floor as i64;

    if frac > 0.5 {
        base + 1
    } else if frac < 0.5 {
        base
    } else if base % 2 == 0 {
        base
    } else {
        base + 1
    }
}

/// Most frequent times of travel.
#[derive(Debug, Serialize)]
pub struct TimeStats {
    pub most_common_month: String,
    pub most_common_weekday: String,
    pub most_common_hour: u32,
}

/// Most popular stations and route.
#[derive(Debug, Serialize)]
pub struct StationStats {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    pub most_common_route: (String, String),
}

/// Total and average trip duration, in minutes. Unrounded; rendering
/// applies [`round_half_to_even`].
#[derive(Debug, Serialize)]
pub struct DurationStats {
    pub total_minutes: f64,
    pub mean_minutes: f64,
}

/// Earliest, latest, and most common birth year.
#[derive(Debug, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}

/// User demographics. The optional sections are present only when the
/// dataset carries the corresponding column.
#[derive(Debug, Serialize)]
pub struct UserStats {
    pub user_type_counts: Vec<(String, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_counts: Option<Vec<(String, usize)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<BirthYearStats>,
}

fn month_name(month: u32) -> String {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .map(|m| (*m).to_string())
        // Out-of-range months are a data anomaly; report them as-is.
        .unwrap_or_else(|| format!("month {month}"))
}

fn day_name(weekday: u32) -> String {
    DAYS.get(weekday as usize)
        .map(|d| (*d).to_string())
        .unwrap_or_else(|| format!("day {weekday}"))
}

/// Most common month, weekday, and start hour.
///
/// # Errors
///
/// [`EngineError::NoData`] on an empty collection.
pub fn time_stats(collection: &RecordCollection) -> Result<TimeStats, EngineError> {
    let records = &collection.records;

    let month = mode(records.iter().map(|r| r.month), "month")?;
    let weekday = mode(records.iter().map(|r| r.weekday), "day of week")?;
    let hour = mode(records.iter().map(|r| r.start_hour), "start hour")?;

    Ok(TimeStats {
        most_common_month: month_name(month),
        most_common_weekday: day_name(weekday),
        most_common_hour: hour,
    })
}

/// Most common start station, end station, and start→end route.
///
/// Records missing a station are excluded from the statistic that needs it.
///
/// # Errors
///
/// [`EngineError::NoData`] when no record carries the required station(s).
pub fn station_stats(collection: &RecordCollection) -> Result<StationStats, EngineError> {
    let records = &collection.records;

    let start = mode(
        records.iter().filter_map(|r| r.start_station.clone()),
        "start station",
    )?;
    let end = mode(
        records.iter().filter_map(|r| r.end_station.clone()),
        "end station",
    )?;
    let route = mode(
        records.iter().filter_map(|r| {
            Some((r.start_station.clone()?, r.end_station.clone()?))
        }),
        "route",
    )?;

    Ok(StationStats {
        most_common_start_station: start,
        most_common_end_station: end,
        most_common_route: route,
    })
}

/// Total and mean trip duration in minutes, over records that carry one.
///
/// # Errors
///
/// [`EngineError::NoData`] when every record lacks a duration — distinct
/// from a legitimate zero total.
pub fn duration_stats(collection: &RecordCollection) -> Result<DurationStats, EngineError> {
    let durations: Vec<f64> = collection
        .records
        .iter()
        .filter_map(|r| r.trip_duration_seconds)
        .collect();

    if durations.is_empty() {
        return Err(EngineError::NoData("trip duration"));
    }

    let total_seconds: f64 = durations.iter().sum();
    let mean_seconds = total_seconds / durations.len() as f64;

    Ok(DurationStats {
        total_minutes: total_seconds / 60.0,
        mean_minutes: mean_seconds / 60.0,
    })
}

/// User type counts, plus gender counts and birth-year range/mode when the
/// dataset carries those columns.
///
/// # Errors
///
/// [`EngineError::NoData`] on an empty collection, or when a carried column
/// has no values at all.
pub fn user_stats(collection: &RecordCollection) -> Result<UserStats, EngineError> {
    let records = &collection.records;

    if records.is_empty() {
        return Err(EngineError::NoData("user type"));
    }

    let user_type_counts = breakdown(records.iter().map(|r| r.user_type.clone()));

    let gender_counts = if collection.capabilities.has_gender {
        Some(breakdown(records.iter().filter_map(|r| r.gender.clone())))
    } else {
        None
    };

    let birth_year = if collection.capabilities.has_birth_year {
        let years: Vec<i32> = records.iter().filter_map(|r| r.birth_year).collect();
        if years.is_empty() {
            return Err(EngineError::NoData("birth year"));
        }
        Some(BirthYearStats {
            earliest: *years.iter().min().expect("non-empty"),
            latest: *years.iter().max().expect("non-empty"),
            most_common: mode(years.iter().copied(), "birth year")?,
        })
    } else {
        None
    };

    Ok(UserStats {
        user_type_counts,
        gender_counts,
        birth_year,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{DatasetCapabilities, RawTrip, load_and_derive};

    fn raw(start_time: &str) -> RawTrip {
        RawTrip {
            start_time: start_time.to_string(),
            trip_duration_seconds: None,
            start_station: None,
            end_station: None,
            user_type: None,
            gender: None,
            birth_year: None,
        }
    }

    fn collection(rows: Vec<RawTrip>, capabilities: DatasetCapabilities) -> RecordCollection {
        load_and_derive(rows, capabilities).unwrap()
    }

    #[test]
    fn test_group_count_orders_by_count_then_first_seen() {
        let groups = group_count(vec!["b", "a", "a", "c", "b"]);
        // a and b tie at 2; b was seen first.
        assert_eq!(groups, vec![("b", 2), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn test_mode_tie_breaks_by_first_occurrence() {
        assert_eq!(mode(vec![17, 8, 8, 17], "hour").unwrap(), 17);
        assert_eq!(mode(vec![8, 17, 17, 8], "hour").unwrap(), 8);
    }

    #[test]
    fn test_mode_empty_is_no_data() {
        let err = mode(Vec::<u32>::new(), "start hour").unwrap_err();
        assert!(matches!(err, EngineError::NoData("start hour")));
    }

    #[test]
    fn test_mode_idempotent_over_top_group() {
        let keys = vec!["x", "y", "x", "z", "x"];
        let top = group_count(keys.clone()).remove(0).0;
        let subset: Vec<_> = keys.into_iter().filter(|k| *k == top).collect();
        assert_eq!(mode(subset, "key").unwrap(), top);
    }

    #[test]
    fn test_breakdown_preserves_first_encounter_order() {
        let counts = breakdown(vec!["sub", "cust", "sub", "dep", "cust", "sub"]);
        assert_eq!(counts, vec![("sub", 3), ("cust", 2), ("dep", 1)]);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_half_to_even(2.5), 2);
        assert_eq!(round_half_to_even(3.5), 4);
        assert_eq!(round_half_to_even(2.4), 2);
        assert_eq!(round_half_to_even(2.6), 3);
        assert_eq!(round_half_to_even(7.0), 7);
    }

    #[test]
    fn test_time_stats_example() {
        // months {january, january, march} -> january
        let c = collection(
            vec![
                raw("2017-01-02 08:00:00"),
                raw("2017-01-09 08:00:00"),
                raw("2017-03-06 08:00:00"),
            ],
            DatasetCapabilities::default(),
        );
        let stats = time_stats(&c).unwrap();
        assert_eq!(stats.most_common_month, "january");
        assert_eq!(stats.most_common_weekday, "monday");
        assert_eq!(stats.most_common_hour, 8);

        let groups = group_count(c.records.iter().map(|r| r.month));
        assert_eq!(groups, vec![(1, 2), (3, 1)]);
    }

    #[test]
    fn test_station_stats_excludes_missing() {
        let mut rows = vec![
            raw("2017-01-02 08:00:00"),
            raw("2017-01-02 09:00:00"),
            raw("2017-01-02 10:00:00"),
        ];
        rows[0].start_station = Some("Canal St".into());
        rows[0].end_station = Some("State St".into());
        rows[1].start_station = Some("Canal St".into());
        rows[1].end_station = Some("State St".into());
        // Row 2 has no stations; excluded from all three statistics.
        let c = collection(rows, DatasetCapabilities::default());

        let stats = station_stats(&c).unwrap();
        assert_eq!(stats.most_common_start_station, "Canal St");
        assert_eq!(stats.most_common_end_station, "State St");
        assert_eq!(
            stats.most_common_route,
            ("Canal St".to_string(), "State St".to_string())
        );
    }

    #[test]
    fn test_duration_stats_all_missing_is_no_data() {
        let c = collection(
            vec![raw("2017-01-02 08:00:00"), raw("2017-01-03 08:00:00")],
            DatasetCapabilities::default(),
        );
        assert!(matches!(
            duration_stats(&c),
            Err(EngineError::NoData("trip duration"))
        ));
    }

    #[test]
    fn test_duration_stats_minutes() {
        let mut rows = vec![raw("2017-01-02 08:00:00"), raw("2017-01-03 08:00:00")];
        rows[0].trip_duration_seconds = Some(600.0);
        rows[1].trip_duration_seconds = Some(300.0);
        let c = collection(rows, DatasetCapabilities::default());

        let stats = duration_stats(&c).unwrap();
        assert_eq!(stats.total_minutes, 15.0);
        assert_eq!(stats.mean_minutes, 7.5);
    }

    #[test]
    fn test_user_stats_respects_capabilities() {
        let mut rows = vec![raw("2017-01-02 08:00:00"), raw("2017-01-03 08:00:00")];
        rows[0].user_type = Some("Subscriber".into());
        rows[1].user_type = Some("Customer".into());
        let c = collection(rows, DatasetCapabilities::default());

        let stats = user_stats(&c).unwrap();
        assert_eq!(
            stats.user_type_counts,
            vec![("Subscriber".to_string(), 1), ("Customer".to_string(), 1)]
        );
        assert!(stats.gender_counts.is_none());
        assert!(stats.birth_year.is_none());
    }

    #[test]
    fn test_user_stats_birth_year_range_and_mode() {
        let caps = DatasetCapabilities {
            has_gender: true,
            has_birth_year: true,
        };
        let mut rows = vec![
            raw("2017-01-02 08:00:00"),
            raw("2017-01-03 08:00:00"),
            raw("2017-01-04 08:00:00"),
        ];
        rows[0].birth_year = Some(1959.0);
        rows[0].gender = Some("Male".into());
        rows[1].birth_year = Some(1992.0);
        rows[2].birth_year = Some(1992.0);
        let c = collection(rows, caps);

        let stats = user_stats(&c).unwrap();
        let by = stats.birth_year.unwrap();
        assert_eq!(by.earliest, 1959);
        assert_eq!(by.latest, 1992);
        assert_eq!(by.most_common, 1992);

        // Missing genders were normalized at load, in encounter order.
        assert_eq!(
            stats.gender_counts.unwrap(),
            vec![
                ("Male".to_string(), 1),
                ("undisclosed gender".to_string(), 2)
            ]
        );
    }
}
