//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive prompt loop over the city datasets plus a
//! non-interactive report subcommand for scripted use.

use std::ffi::OsStr;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Result, bail};
use bikeshare_explorer::engine::aggregate::{
    duration_stats, station_stats, time_stats, user_stats,
};
use bikeshare_explorer::engine::browser::{PAGE_SIZE, RecordBrowser};
use bikeshare_explorer::engine::filter::{DAYS, MONTHS, filter};
use bikeshare_explorer::engine::types::RecordCollection;
use bikeshare_explorer::error::EngineError;
use bikeshare_explorer::loader::{CITY_DATA, load_city};
use bikeshare_explorer::output::{
    Report, print_json, render_duration_stats, render_records, render_station_stats,
    render_time_stats, render_user_stats,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "A tool to explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively explore a city dataset with month/day filters
    Explore {
        /// Directory containing the city CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,
    },
    /// Print statistics for one city/filter combination and exit
    Report {
        /// City to analyze (chicago, new york city, washington)
        city: String,

        /// Month filter: all, january, february, ..., june
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Day filter: all, monday, tuesday, ..., sunday
        #[arg(short = 'w', long, default_value = "all")]
        day: String,

        /// Directory containing the city CSV files
        #[arg(short, long, default_value = "data")]
        data_dir: PathBuf,

        /// Emit the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore { data_dir } => explore(&data_dir)?,
        Commands::Report {
            city,
            month,
            day,
            data_dir,
            json,
        } => {
            let city = city.to_lowercase();
            let month = month.to_lowercase();
            let day = day.to_lowercase();

            if month != "all" && !MONTHS.contains(&month.as_str()) {
                bail!("unrecognized month {month:?}");
            }
            if day != "all" && !DAYS.contains(&day.as_str()) {
                bail!("unrecognized day {day:?}");
            }

            let collection = load_city(&data_dir, &city)?;
            let filtered = apply_filters(&collection, &month, &day)?;
            let report = build_report(&filtered)?;

            if json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
    }

    Ok(())
}

/// Outer restart loop: one iteration is one analysis session.
fn explore(data_dir: &Path) -> Result<()> {
    println!("Hello! Let's explore some US bikeshare data!");

    loop {
        let (city, month, day) = get_filters()?;
        println!("{}", "-".repeat(40));

        let session_start = Instant::now();
        let collection = load_city(data_dir, &city)?;
        let filtered = apply_filters(&collection, &month, &day)?;
        debug!(
            city = %city,
            month = %month,
            day = %day,
            records = filtered.len(),
            elapsed_ms = session_start.elapsed().as_millis() as u64,
            "Session dataset ready"
        );

        let report = build_report(&filtered)?;
        print_report(&report);

        prompt_raw_data(&filtered)?;

        let restart = prompt("\nWould you like to restart? Enter yes or no.\n")?;
        if restart != "yes" {
            break;
        }
    }

    info!("Explorer session ended");
    Ok(())
}

/// Maps the `all` selector to "no filter" and applies the rest.
fn apply_filters(
    collection: &RecordCollection,
    month: &str,
    day: &str,
) -> Result<RecordCollection> {
    let month = (month != "all").then_some(month);
    let day = (day != "all").then_some(day);
    Ok(filter(collection, month, day)?)
}

/// Computes all four stat groups, treating `NoData` as an absent section.
fn build_report(collection: &RecordCollection) -> Result<Report> {
    Ok(Report {
        time: available(time_stats(collection))?,
        stations: available(station_stats(collection))?,
        duration: available(duration_stats(collection))?,
        users: available(user_stats(collection))?,
    })
}

/// `NoData` means the section is not available for this filter selection,
/// not an error; anything else propagates.
fn available<T>(result: Result<T, EngineError>) -> Result<Option<T>> {
    match result {
        Ok(stats) => Ok(Some(stats)),
        Err(EngineError::NoData(field)) => {
            warn!(field, "Statistics not available for this selection");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_section(title: &str, body: &str) {
    println!("\n{title}\n");
    print!("{body}");
    println!("{}", "-".repeat(40));
}

fn print_report(report: &Report) {
    if let Some(time) = &report.time {
        print_section(
            "Calculating The Most Frequent Times of Travel...",
            &render_time_stats(time),
        );
    }
    if let Some(stations) = &report.stations {
        print_section(
            "Calculating The Most Popular Stations and Trip...",
            &render_station_stats(stations),
        );
    }
    if let Some(duration) = &report.duration {
        print_section("Calculating Trip Duration...", &render_duration_stats(duration));
    }
    if let Some(users) = &report.users {
        print_section("Calculating User Stats...", &render_user_stats(users));
    }
}

/// Asks for city, month, and day, re-prompting until each is valid.
fn get_filters() -> Result<(String, String, String)> {
    let city = loop {
        let input = prompt("Enter a city (Chicago, New York City, or Washington): ")?;
        if CITY_DATA.iter().any(|(name, _)| *name == input) {
            break input;
        }
        println!("Invalid input. Please try again.");
    };

    let month = loop {
        let input = prompt("Enter a month (all, january, february, ..., june): ")?;
        if input == "all" || MONTHS.contains(&input.as_str()) {
            break input;
        }
        println!("Invalid month input. Please try again.");
    };

    let day = loop {
        let input = prompt("Enter a day of the week (all, monday, tuesday, ..., sunday): ")?;
        if input == "all" || DAYS.contains(&input.as_str()) {
            break input;
        }
        println!("Invalid day input. Please try again.");
    };

    Ok((city, month, day))
}

/// Reveals raw records five at a time for as long as the user says yes.
fn prompt_raw_data(collection: &RecordCollection) -> Result<()> {
    println!(
        "You have the option to inspect individual lines of raw data from the data set you requested..."
    );
    let mut browser = RecordBrowser::new(collection);

    loop {
        let input = prompt("Would you like to see 5 more lines of data (yes or no): ")?;
        match input.as_str() {
            "yes" | "y" => {
                let (page, exhausted) = browser.next_page(PAGE_SIZE);
                print!("{}", render_records(page));
                if exhausted {
                    println!("No more data to show!");
                    break;
                }
            }
            "no" | "n" => break,
            _ => println!("Invalid input. Please enter yes to see more data, or no to exit."),
        }
    }

    Ok(())
}

/// Writes a prompt and reads one lowercased, trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_lowercase())
}
