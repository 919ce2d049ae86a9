use anyhow::Result;
use rusqlite::Connection;

/// Timestamps are integer epoch-milliseconds so period-boundary range
/// queries compare exactly; text timestamps do not order reliably once
/// fractional seconds appear.
pub const HITS_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    recorded_at_ms INTEGER NOT NULL
);
"#;

pub const HITS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_hits_user_recorded ON hits(user_id, recorded_at_ms);
"#;

pub fn init_database(conn: &Connection) -> Result<()> {
    conn.execute_batch(HITS_TABLE_SCHEMA)?;
    conn.execute_batch(HITS_INDEXES)?;
    Ok(())
}
