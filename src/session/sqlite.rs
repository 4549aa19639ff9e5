//! SQLite-backed workout history
//!
//! Schema: one `workout_history` table, append-on-start and update-in-place
//! on finish/interrupt. WAL keeps the writer from blocking any reader the
//! surrounding application might open on the same file.

use crate::session::{SessionId, SessionRecorder, SessionRow};
use crate::utils::error::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Workout history store over a SQLite database file
pub struct SqliteHistory {
    conn: Connection,
}

impl SqliteHistory {
    /// Open (and create if needed) the history database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        Self::create_tables(&conn)?;

        Ok(Self { conn })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::create_tables(&conn)?;
        Ok(Self { conn })
    }

    fn create_tables(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workout_history (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 workout_name TEXT NOT NULL,
                 start_time INTEGER NOT NULL,
                 duration_seconds INTEGER NOT NULL,
                 completed INTEGER NOT NULL,
                 created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
             );
             CREATE INDEX IF NOT EXISTS idx_start_time ON workout_history(start_time);
             CREATE INDEX IF NOT EXISTS idx_workout_name ON workout_history(workout_name);",
        )?;
        Ok(())
    }

    /// Fetch one record by id
    pub fn get(&self, id: SessionId) -> Result<Option<SessionRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, workout_name, start_time, duration_seconds, completed
                 FROM workout_history WHERE id = ?1",
                params![id],
                |row| {
                    Ok(SessionRow {
                        id: row.get(0)?,
                        workout_name: row.get(1)?,
                        start_time: row.get::<_, i64>(2)? as u64,
                        duration_seconds: row.get::<_, i64>(3)? as u64,
                        completed: row.get::<_, i64>(4)? != 0,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Number of records in the history
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM workout_history", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl SessionRecorder for SqliteHistory {
    fn begin(&mut self, workout_name: &str, start_time: u64) -> Result<SessionId> {
        self.conn.execute(
            "INSERT INTO workout_history (workout_name, start_time, duration_seconds, completed)
             VALUES (?1, ?2, 0, 0)",
            params![workout_name, start_time as i64],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, id: SessionId, elapsed_seconds: u64, completed: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE workout_history SET duration_seconds = ?1, completed = ?2 WHERE id = ?3",
            params![elapsed_seconds as i64, completed as i64, id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_appends_incomplete_record() {
        let mut history = SqliteHistory::open_in_memory().unwrap();

        let id = history.begin("Morning Circuit", 1_700_000_000).unwrap();
        let row = history.get(id).unwrap().unwrap();

        assert_eq!(row.workout_name, "Morning Circuit");
        assert_eq!(row.start_time, 1_700_000_000);
        assert_eq!(row.duration_seconds, 0);
        assert!(!row.completed);
    }

    #[test]
    fn test_update_in_place() {
        let mut history = SqliteHistory::open_in_memory().unwrap();

        let id = history.begin("Legs", 1_700_000_000).unwrap();
        history.update(id, 85, true).unwrap();

        let row = history.get(id).unwrap().unwrap();
        assert_eq!(row.duration_seconds, 85);
        assert!(row.completed);
        assert_eq!(history.count().unwrap(), 1);
    }

    #[test]
    fn test_repeated_update_is_harmless() {
        let mut history = SqliteHistory::open_in_memory().unwrap();

        let id = history.begin("Legs", 1_700_000_000).unwrap();
        history.update(id, 40, false).unwrap();
        history.update(id, 40, false).unwrap();

        let row = history.get(id).unwrap().unwrap();
        assert_eq!(row.duration_seconds, 40);
        assert!(!row.completed);
        assert_eq!(history.count().unwrap(), 1);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("history.db");
        let mut history = SqliteHistory::open(&path).unwrap();

        let id = history.begin("Core", 1_700_000_000).unwrap();
        assert!(history.get(id).unwrap().is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_get_missing_row_is_none() {
        let history = SqliteHistory::open_in_memory().unwrap();
        assert!(history.get(42).unwrap().is_none());
    }
}
