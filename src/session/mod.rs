//! Session history recording for fitplayer
//!
//! One durable record per playback attempt: appended when the session
//! starts, updated in place when it finishes or is interrupted. The engine
//! only knows this trait; the SQLite store behind it is one implementation.

mod sqlite;

pub use sqlite::SqliteHistory;

use crate::utils::error::Result;
use std::time::{SystemTime, UNIX_EPOCH};

/// Identifier of one workout-history record
pub type SessionId = i64;

/// One row of workout history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub id: SessionId,
    pub workout_name: String,
    /// Unix timestamp of the session start, in seconds
    pub start_time: u64,
    pub duration_seconds: u64,
    pub completed: bool,
}

/// Persists workout-execution records
pub trait SessionRecorder: Send {
    /// Append a new record with elapsed 0 and completed false; returns its id
    fn begin(&mut self, workout_name: &str, start_time: u64) -> Result<SessionId>;

    /// Update an existing record in place
    fn update(&mut self, id: SessionId, elapsed_seconds: u64, completed: bool) -> Result<()>;
}

/// Current wall-clock time as unix seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
