use rusqlite::{Connection, OptionalExtension};

pub const SCHEMA_VERSION: i32 = 1;

/// Create the reading store tables if missing. The store persists across
/// runs, so nothing is dropped here.
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Metadata table
        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- One row per reading. Every row carries all three partition keys so
        -- that each granularity is a single key-equality range query.
        CREATE TABLE IF NOT EXISTS readings (
            day_key   TEXT NOT NULL,
            month_key TEXT NOT NULL,
            year_key  TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            value     REAL NOT NULL,
            PRIMARY KEY (day_key, timestamp)
        );

        -- Secondary indexes serving the coarser partitionings
        CREATE INDEX IF NOT EXISTS idx_readings_month ON readings(month_key, timestamp);
        CREATE INDEX IF NOT EXISTS idx_readings_year ON readings(year_key, timestamp);
        "#,
    )
}

/// Set a metadata key
pub fn set_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?, ?)",
        [key, value],
    )?;
    Ok(())
}

/// Get a metadata key
#[allow(dead_code)]
pub fn get_meta(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
        row.get(0)
    })
    .optional()
}
