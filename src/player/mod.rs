//! Playback module for fitplayer
//!
//! This module drives a workout session: a sequence of timed video segments
//! separated by fixed rest periods, with pause/resume, interruption and
//! session-history recording. The visual front end stays behind the
//! [`PlayerSurface`] trait; the engine owns the state machine.

pub mod clock;
mod engine;

pub use engine::{EngineHandle, PlaybackEngine};

use crate::video::Frame;
use std::time::Duration;

/// Rest interval between consecutive exercises
pub const REST_SECS: u64 = 10;

/// Frame rate used when a source reports none
pub const DEFAULT_FPS: f64 = 30.0;

/// User intents flowing from the surface into the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin the session (first press of the start control)
    Start,

    /// Toggle the pause flag while running or resting
    TogglePause,

    /// Close the player; interrupts the session if it has not finished
    Close,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// All segments completed
    Completed,

    /// Closed before the last segment finished
    Interrupted,
}

/// Final report of one playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,

    /// Total elapsed time, rest periods included
    pub total_elapsed: Duration,
}

/// Engine tuning knobs
///
/// Production code uses the defaults; tests shorten the rest interval so a
/// full session runs in well under a second of rest time.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Rest interval between consecutive exercises
    pub rest: Duration,

    /// Frame rate used when a source reports none
    pub default_fps: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            rest: Duration::from_secs(REST_SECS),
            default_fps: DEFAULT_FPS,
        }
    }
}

/// The visual and control front end consumed by the engine
///
/// All calls arrive on the engine's foreground thread, in the order the
/// corresponding frames and timer values were produced.
pub trait PlayerSurface: Send {
    /// Display a decoded frame
    fn render_frame(&mut self, frame: &Frame);

    /// Update the per-segment countdown label ("0:07", "Rest 0:09")
    fn set_segment_timer(&mut self, text: &str);

    /// Update the whole-session timer label
    fn set_total_timer(&mut self, text: &str);

    /// Show "exercise X of Y" progress (1-based current)
    fn set_progress(&mut self, current: usize, total: usize);

    /// Show the upcoming exercise during a rest period, if a preview
    /// frame could be read
    fn show_rest_preview(&mut self, preview: Option<&Frame>);
}
