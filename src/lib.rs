//! fitplayer - a timed workout circuit playback engine
//!
//! Workouts are grids of ten optional video exercises; the engine plays the
//! non-empty ones back to back for their assigned durations, with a fixed
//! rest interval in between, and records each attempt in a SQLite history.
//! Video decoding and the visual front end live behind traits
//! ([`video::VideoSource`], [`player::PlayerSurface`]) so the engine can run
//! against any decoder and any UI toolkit, including none at all.

pub mod model;
pub mod player;
pub mod session;
pub mod utils;
pub mod video;

pub use player::{
    Command, EngineHandle, EngineOptions, PlaybackEngine, PlayerSurface, SessionOutcome,
    SessionSummary,
};
pub use utils::error::{PlayerError, Result};
