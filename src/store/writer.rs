use super::reader::SqliteStore;
use crate::error::Result;
use crate::model::Sample;
use crate::planner::{Granularity, date_of};

/// All three partition keys for one reading, derived from its timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionKeys {
    pub day: String,
    pub month: String,
    pub year: String,
}

pub fn partition_keys(timestamp: i64) -> Result<PartitionKeys> {
    let date = date_of(timestamp)?;
    Ok(PartitionKeys {
        day: Granularity::Day.key(date),
        month: Granularity::Month.key(date),
        year: Granularity::Year.key(date),
    })
}

impl SqliteStore {
    /// Insert one reading. A reading at an already-recorded second replaces
    /// the previous value.
    pub fn record_reading(&mut self, sample: Sample) -> Result<()> {
        self.import_batch(std::slice::from_ref(&sample))?;
        Ok(())
    }

    /// Bulk-load readings in a single transaction. Returns the number of
    /// rows written.
    pub fn import_batch(&mut self, samples: &[Sample]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO readings
                 (day_key, month_key, year_key, timestamp, value)
                 VALUES (?, ?, ?, ?, ?)",
            )?;

            for sample in samples {
                let keys = partition_keys(sample.timestamp)?;
                stmt.execute(rusqlite::params![
                    keys.day,
                    keys.month,
                    keys.year,
                    sample.timestamp,
                    sample.value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(samples.len())
    }
}
