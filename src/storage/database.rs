use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::error::StorageError;
use super::schema::init_database;
use super::{HitStore, HITS_DB_FILENAME};

/// Sqlite-backed hit log. One connection behind a mutex; hosts needing more
/// write throughput supply their own `HitStore`.
pub struct SqliteHitStore {
    conn: Mutex<Connection>,
}

impl SqliteHitStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join(HITS_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        init_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::InvalidRecord("connection poisoned".into()))
    }
}

impl HitStore for SqliteHitStore {
    fn append_hit(&self, user_id: &str, timestamp: DateTime<Utc>) -> Result<(), StorageError> {
        if user_id.trim().is_empty() {
            return Err(StorageError::InvalidRecord(
                "user id cannot be empty".into(),
            ));
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO hits (user_id, recorded_at_ms) VALUES (?1, ?2)",
            params![user_id, timestamp.timestamp_millis()],
        )?;
        Ok(())
    }

    fn count_hits(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64, StorageError> {
        let conn = self.lock()?;

        let count: i64 = match until {
            Some(until) => conn.query_row(
                r#"
                SELECT COUNT(*) FROM hits
                WHERE user_id = ?1 AND recorded_at_ms >= ?2 AND recorded_at_ms < ?3
                "#,
                params![
                    user_id,
                    since.timestamp_millis(),
                    until.timestamp_millis()
                ],
                |row| row.get(0),
            )?,
            None => conn.query_row(
                r#"
                SELECT COUNT(*) FROM hits
                WHERE user_id = ?1 AND recorded_at_ms >= ?2
                "#,
                params![user_id, since.timestamp_millis()],
                |row| row.get(0),
            )?,
        };

        Ok(count as u64)
    }
}
