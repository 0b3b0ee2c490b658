use crate::error::Result;
use crate::model::LatestReading;
use crate::planner;
use crate::store::{ReadingStore, SqliteStore};
use chrono::Utc;
use std::path::Path;

/// Print the most recent reading from today's UTC day partition.
pub fn run(db: &Path) -> Result<()> {
    let store = SqliteStore::open(db)?;
    let today = planner::day_key(Utc::now().timestamp())?;

    match store.latest(&today)? {
        Some(sample) => {
            let reading = LatestReading::from_sample(sample)?;
            println!("{:.1} °C at {} UTC", reading.value, reading.formatted);
        }
        None => {
            // e.g. just after midnight UTC with no new sample yet
            println!("No reading recorded today (UTC)");
        }
    }

    Ok(())
}
