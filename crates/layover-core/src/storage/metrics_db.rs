//! SQLite-backed engagement metrics.
//!
//! Provides persistent storage for:
//! - Smoothed per-collection metrics records
//! - An append-only interaction event log
//!
//! The smoothing semantics are identical to the in-memory store; the
//! read-modify-write happens inside one transaction while holding the
//! connection, so concurrent interactions cannot interleave.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::data_dir;
use crate::error::{CoreError, DatabaseError, Result};
use crate::metrics::{Interaction, MetricsRecord, MetricsSnapshot, MetricsStore};

/// SQLite store for engagement metrics and the interaction log.
pub struct SqliteMetricsStore {
    conn: Mutex<Connection>,
}

impl SqliteMetricsStore {
    /// Open the database at `~/.config/layover/layover.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_default() -> Result<Self> {
        let path = data_dir()?.join("layover.db");
        Self::open(&path)
    }

    /// Open the database at an explicit path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| DatabaseError::OpenFailed {
            path: PathBuf::from(path),
            source: e,
        })?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS metrics (
                slug          TEXT PRIMARY KEY,
                click_through REAL NOT NULL DEFAULT 0,
                conversion    REAL NOT NULL DEFAULT 0,
                satisfaction  REAL NOT NULL DEFAULT 0,
                time_spent    REAL NOT NULL DEFAULT 0,
                last_updated  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS interaction_events (
                id          TEXT PRIMARY KEY,
                slug        TEXT NOT NULL,
                kind        TEXT NOT NULL,
                value       REAL,
                recorded_at TEXT NOT NULL
            );

            -- Event lookups are per slug and time-windowed
            CREATE INDEX IF NOT EXISTS idx_events_slug ON interaction_events(slug);
            CREATE INDEX IF NOT EXISTS idx_events_recorded_at ON interaction_events(recorded_at);",
        )
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| CoreError::Custom(format!("metrics db lock failed: {e}")))
    }

    /// Number of logged interaction events.
    pub fn event_count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count = conn
            .query_row("SELECT COUNT(*) FROM interaction_events", [], |row| {
                row.get::<_, u64>(0)
            })
            .map_err(DatabaseError::from)?;
        Ok(count)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, MetricsRecord)> {
    let slug: String = row.get(0)?;
    let last_updated: String = row.get(5)?;
    let last_updated = DateTime::parse_from_rfc3339(&last_updated)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })?;
    Ok((
        slug,
        MetricsRecord {
            click_through: row.get(1)?,
            conversion: row.get(2)?,
            satisfaction: row.get(3)?,
            time_spent: row.get(4)?,
            last_updated,
        },
    ))
}

impl MetricsStore for SqliteMetricsStore {
    fn record_at(
        &self,
        slug: &str,
        kind: Interaction,
        value: Option<f64>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(DatabaseError::from)?;

        let existing = tx
            .query_row(
                "SELECT slug, click_through, conversion, satisfaction, time_spent, last_updated
                 FROM metrics WHERE slug = ?1",
                params![slug],
                |row| row_to_record(row).map(|(_, record)| record),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(DatabaseError::from(other)),
            })?;

        let mut record = existing.unwrap_or_else(|| MetricsRecord::new(at));
        record.apply(kind, value, at);

        tx.execute(
            "INSERT INTO metrics (slug, click_through, conversion, satisfaction, time_spent, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(slug) DO UPDATE SET
                 click_through = ?2,
                 conversion = ?3,
                 satisfaction = ?4,
                 time_spent = ?5,
                 last_updated = ?6",
            params![
                slug,
                record.click_through,
                record.conversion,
                record.satisfaction,
                record.time_spent,
                record.last_updated.to_rfc3339(),
            ],
        )
        .map_err(DatabaseError::from)?;

        tx.execute(
            "INSERT INTO interaction_events (id, slug, kind, value, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Uuid::new_v4().to_string(),
                slug,
                kind.as_str(),
                value,
                at.to_rfc3339(),
            ],
        )
        .map_err(DatabaseError::from)?;

        tx.commit().map_err(DatabaseError::from)?;
        Ok(())
    }

    fn get(&self, slug: &str) -> Result<Option<MetricsRecord>> {
        let conn = self.lock_conn()?;
        let record = conn
            .query_row(
                "SELECT slug, click_through, conversion, satisfaction, time_spent, last_updated
                 FROM metrics WHERE slug = ?1",
                params![slug],
                |row| row_to_record(row).map(|(_, record)| record),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(DatabaseError::from(other)),
            })?;
        Ok(record)
    }

    fn snapshot(&self) -> Result<MetricsSnapshot> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT slug, click_through, conversion, satisfaction, time_spent, last_updated
                 FROM metrics",
            )
            .map_err(DatabaseError::from)?;
        let rows = stmt
            .query_map([], row_to_record)
            .map_err(DatabaseError::from)?;

        let mut snapshot = MetricsSnapshot::new();
        for row in rows {
            let (slug, record) = row.map_err(DatabaseError::from)?;
            snapshot.insert(slug, record);
        }
        Ok(snapshot)
    }

    fn reset(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch("DELETE FROM interaction_events; DELETE FROM metrics;")
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}
