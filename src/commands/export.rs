use crate::error::{Error, Result};
use crate::executor;
use crate::period::Period;
use crate::planner;
use crate::refresh::RefreshToken;
use crate::resample::{DisplayPoint, resample};
use crate::store::SqliteStore;
use chrono::{TimeZone, Utc};
use std::path::Path;

/// Plan, execute, and resample one window, printing the display points.
pub fn run(
    db: &Path,
    period: &str,
    resolution: u32,
    end: Option<i64>,
    json: bool,
    csv: bool,
) -> Result<()> {
    let period = Period::parse(period).ok_or_else(|| Error::InvalidPeriod(period.to_string()))?;
    let end = end.unwrap_or_else(|| Utc::now().timestamp());
    let window = period.window_ending(end);

    let store = SqliteStore::open(db)?;
    let plan = planner::plan(window, resolution)?;

    // One-shot cycle; nothing can supersede it.
    let guard = RefreshToken::new().begin();
    let samples = executor::execute(&store, &plan, window, &guard)?.unwrap_or_default();

    let mut points = resample(&samples, window, resolution);
    points.sort_by_key(|p| p.x);

    if json {
        print_json(window.start, window.end, samples.len(), &points);
    } else if csv {
        print_csv(&points);
    } else {
        print_table(period, samples.len(), &points);
    }

    Ok(())
}

fn print_table(period: Period, raw_count: usize, points: &[DisplayPoint]) {
    println!(
        "# period: {period} | raw samples: {raw_count} | display points: {}",
        points.len()
    );
    println!();
    println!("{:<20}  {:>12}  {:>8}", "BUCKET (UTC)", "EPOCH", "MEAN");
    println!("{}", "-".repeat(44));

    for point in points {
        println!(
            "{:<20}  {:>12}  {:>8.2}",
            format_bucket(point.x),
            point.x,
            point.y
        );
    }
}

fn print_json(start: i64, end: i64, raw_count: usize, points: &[DisplayPoint]) {
    println!("{{");
    println!("  \"window\": {{ \"start\": {start}, \"end\": {end} }},");
    println!("  \"raw_samples\": {raw_count},");
    println!("  \"points\": [");

    for (i, point) in points.iter().enumerate() {
        let comma = if i < points.len() - 1 { "," } else { "" };
        println!("    {{ \"x\": {}, \"y\": {:.2} }}{}", point.x, point.y, comma);
    }

    println!("  ]");
    println!("}}");
}

fn print_csv(points: &[DisplayPoint]) {
    println!("bucket_start,mean");
    for point in points {
        println!("{},{:.2}", point.x, point.y);
    }
}

fn format_bucket(epoch: i64) -> String {
    Utc.timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch.to_string())
}
