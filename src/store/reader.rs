use super::schema::{self, SCHEMA_VERSION};
use crate::error::Result;
use crate::model::Sample;
use crate::planner::{PlanEntry, TimeWindow};
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

/// The two query shapes the dashboard needs from its reading store. The
/// shipped implementation is SQLite; tests substitute fakes.
pub trait ReadingStore {
    /// Most recent reading in one day partition (descending, limit 1).
    /// `None` when the partition has no rows yet.
    fn latest(&self, day_key: &str) -> Result<Option<Sample>>;

    /// All samples in one partition whose timestamp falls in the window,
    /// projecting only timestamp and value. Zero rows is not an error.
    fn query_range(&self, entry: &PlanEntry, window: TimeWindow) -> Result<Vec<Sample>>;
}

/// Partitioned SQLite reading store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        // WAL so the dashboard can read while a sensor process writes
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        schema::create_tables(&conn)?;
        schema::set_meta(&conn, "version", &SCHEMA_VERSION.to_string())?;
        Ok(SqliteStore { conn })
    }

    pub(super) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn reading_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl ReadingStore for SqliteStore {
    fn latest(&self, day_key: &str) -> Result<Option<Sample>> {
        let row = self
            .conn
            .query_row(
                "SELECT timestamp, value FROM readings
                 WHERE day_key = ?1
                 ORDER BY timestamp DESC LIMIT 1",
                [day_key],
                |row| {
                    Ok(Sample {
                        timestamp: row.get(0)?,
                        value: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    fn query_range(&self, entry: &PlanEntry, window: TimeWindow) -> Result<Vec<Sample>> {
        // Year and Month are served by their named secondary index; Day by
        // the primary key.
        let sql = match entry.granularity.index_name() {
            Some(index) => format!(
                "SELECT timestamp, value FROM readings INDEXED BY {index}
                 WHERE {key} = ?1 AND timestamp BETWEEN ?2 AND ?3",
                key = entry.granularity.key_column(),
            ),
            None => format!(
                "SELECT timestamp, value FROM readings
                 WHERE {key} = ?1 AND timestamp BETWEEN ?2 AND ?3",
                key = entry.granularity.key_column(),
            ),
        };

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(
            rusqlite::params![entry.key, window.start, window.end],
            |row| {
                Ok(Sample {
                    timestamp: row.get(0)?,
                    value: row.get(1)?,
                })
            },
        )?;

        let mut samples = Vec::new();
        for row in rows {
            samples.push(row?);
        }
        Ok(samples)
    }
}
