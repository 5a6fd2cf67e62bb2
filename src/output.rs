//! Rendering of statistics reports and raw records.
//!
//! Plain-text rendering for the interactive explorer, JSON for the one-shot
//! report path. Rounding of displayed minutes happens here, not in the
//! stored statistics.

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::engine::aggregate::{
    DurationStats, StationStats, TimeStats, UserStats, round_half_to_even,
};
use crate::engine::types::TripRecord;

/// One session's full set of statistics. Sections that could not be
/// computed (no eligible records) are omitted rather than reported as zero.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations: Option<StationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<UserStats>,
}

pub fn render_time_stats(stats: &TimeStats) -> String {
    format!(
        "Most common month of travel: {}\n\
         Most common day of travel: {}\n\
         Most common start hour: {}\n",
        stats.most_common_month, stats.most_common_weekday, stats.most_common_hour
    )
}

pub fn render_station_stats(stats: &StationStats) -> String {
    format!(
        "Most commonly used start station: {}\n\
         Most commonly used end station: {}\n\
         Most common route: from {} to {}\n",
        stats.most_common_start_station,
        stats.most_common_end_station,
        stats.most_common_route.0,
        stats.most_common_route.1
    )
}

pub fn render_duration_stats(stats: &DurationStats) -> String {
    format!(
        "Approximate total travel time of all passengers, in minutes: {}\n\
         Approximate average travel time for all passengers, in minutes: {}\n",
        round_half_to_even(stats.total_minutes),
        round_half_to_even(stats.mean_minutes)
    )
}

pub fn render_user_stats(stats: &UserStats) -> String {
    let mut out = String::new();

    for (user_type, count) in &stats.user_type_counts {
        let _ = writeln!(out, "Total {user_type} type users: {count}");
    }

    if let Some(genders) = &stats.gender_counts {
        for (gender, count) in genders {
            let _ = writeln!(out, "Total {gender} users: {count}");
        }
    }

    if let Some(by) = &stats.birth_year {
        let _ = writeln!(out, "Earliest user birth year: {}", by.earliest);
        let _ = writeln!(out, "Most recent user birth year: {}", by.latest);
        let _ = writeln!(out, "Most common user birth year: {}", by.most_common);
    }

    out
}

/// One line per raw record, for the pager.
pub fn render_records(records: &[TripRecord]) -> String {
    let mut out = String::new();

    for rec in records {
        let duration = rec
            .trip_duration_seconds
            .map(|d| format!("{d}s"))
            .unwrap_or_else(|| "-".to_string());
        let start = rec.start_station.as_deref().unwrap_or("-");
        let end = rec.end_station.as_deref().unwrap_or("-");

        let _ = write!(
            out,
            "{} | {} | {} -> {} | {}",
            rec.start_time.format("%Y-%m-%d %H:%M:%S"),
            duration,
            start,
            end,
            rec.user_type
        );
        if let Some(gender) = &rec.gender {
            let _ = write!(out, " | {gender}");
        }
        if let Some(year) = rec.birth_year {
            let _ = write!(out, " | {year}");
        }
        out.push('\n');
    }

    out
}

/// Prints a report as pretty-printed JSON to stdout.
pub fn print_json(report: &Report) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
