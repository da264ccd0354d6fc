//! # Beach Conditions Entry Point
//!
//! Loads the static data files, scores and groups the forecast, and prints
//! the dashboard sections for one day to the terminal.
//!
//! ```text
//! beach-conditions [--refresh] [--day YYYY-MM-DD] [--config PATH]
//! ```
//!
//! `--refresh` re-fetches weather and tides from the providers first (API keys
//! from `OWM_API_KEY` / `STORMGLASS_API_KEY`). Without `--day` the first
//! upcoming day is shown.


use anyhow::Context;
use beach_conditions_lib::chart::{self, DayChart, TideChart};
use beach_conditions_lib::config::{Config, CONFIG_FILE};
use beach_conditions_lib::fetch::{self, RefreshOutcome};
use beach_conditions_lib::renderer::{self, AsciiChart, RendererSession};
use beach_conditions_lib::{days, sources, tide_data, time_bucket};
use chrono::{Datelike, Utc};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Dashboard sections in print order, by chart id.
const SECTIONS: [&str; 4] = ["day-carousel", "dayChart", "tideChart", "busynessChart"];

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct Args {
    refresh: bool,
    day: Option<String>,
    config: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--refresh" => parsed.refresh = true,
            "--day" => parsed.day = Some(args.next().context("--day needs a YYYY-MM-DD value")?),
            "--config" => parsed.config = Some(args.next().context("--config needs a path")?),
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let config = Config::load_from_path(args.config.as_deref().unwrap_or(CONFIG_FILE));
    let offset = config.offset()?;

    let rt = tokio::runtime::Runtime::new()?;

    if args.refresh {
        let client = reqwest::Client::new();
        let (weather, tides) = rt.block_on(fetch::refresh_all(&client, &config));
        for (name, outcome) in [("weather", weather), ("tides", tides)] {
            match outcome {
                Ok(RefreshOutcome::Fresh) => info!(source = name, "cache still fresh"),
                Ok(RefreshOutcome::Updated(n)) => info!(source = name, entries = n, "refreshed"),
                // Keep going with whatever is already on disk
                Err(e) => warn!(source = name, error = %e, "refresh failed"),
            }
        }
    }

    let sources = rt.block_on(sources::load_all(&config));

    let now = Utc::now();
    let upcoming = days::select_upcoming(sources.hourly(), now, offset);
    let buckets = days::group_by_day(&upcoming, offset);

    let selected = match args.day {
        Some(day) => day,
        None => buckets
            .first()
            .map(|b| b.key.clone())
            .unwrap_or_else(|| time_bucket::day_key(time_bucket::local_date(now, offset))),
    };
    info!(location = %config.location.name, day = %selected, days = buckets.len(), "rendering");

    let day_chart = DayChart::from_hours(buckets.hours(&selected));
    let tide_points = tide_data::interpolate_day(sources.extrema(), &selected, offset);
    let tide_chart = TideChart::from_points(&tide_points, offset);
    let weekday = time_bucket::parse_day_key(&selected).map(|d| d.weekday());
    let busyness = sources
        .busyness()
        .zip(weekday)
        .and_then(|(report, day)| report.for_weekday(day));

    let mut session: RendererSession<AsciiChart> = RendererSession::new();
    let [carousel_id, day_id, tide_id, busyness_id] = SECTIONS;
    session.replace(
        carousel_id,
        renderer::draw_carousel(&chart::carousel(&buckets), &selected),
    );
    session.replace(day_id, renderer::draw_day(&day_chart));
    session.replace(tide_id, renderer::draw_tide(&tide_chart));
    session.replace(busyness_id, renderer::draw_busyness(busyness));

    println!("{}\n", config.location.title);
    for id in SECTIONS {
        if let Some(chart) = session.get(id) {
            chart.print();
        }
    }

    Ok(())
}
