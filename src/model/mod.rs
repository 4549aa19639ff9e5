//! Workout data model for fitplayer
//!
//! A workout is a fixed grid of ten exercise slots; empty slots are explicit
//! `None` markers, never omitted. The editor that fills the slots lives
//! outside this crate — the player only reads workouts.

mod store;

pub use store::WorkoutStore;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of exercise slots in every workout
pub const WORKOUT_SLOTS: usize = 10;

/// One exercise: a video clip played for an assigned duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Path of the video clip
    pub video_path: PathBuf,

    /// Assigned duration in seconds (always > 0 for exercises the editor
    /// produces; the player filters on active slots, not on this field)
    pub duration_secs: u32,
}

impl Exercise {
    pub fn new(video_path: impl Into<PathBuf>, duration_secs: u32) -> Self {
        Self {
            video_path: video_path.into(),
            duration_secs,
        }
    }
}

/// A named workout with exactly [`WORKOUT_SLOTS`] optional exercise slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Display name (may be empty)
    pub name: String,

    /// Fixed-size slot grid; `None` marks an empty slot
    slots: Vec<Option<Exercise>>,
}

impl Workout {
    /// Create an empty workout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: vec![None; WORKOUT_SLOTS],
        }
    }

    /// Create a workout from existing slots, padding or truncating to the
    /// fixed grid size
    pub fn with_slots(name: impl Into<String>, mut slots: Vec<Option<Exercise>>) -> Self {
        slots.resize(WORKOUT_SLOTS, None);
        Self {
            name: name.into(),
            slots,
        }
    }

    /// Restore the fixed-grid invariant after deserialization
    pub(crate) fn normalize(&mut self) {
        self.slots.resize(WORKOUT_SLOTS, None);
    }

    pub fn slots(&self) -> &[Option<Exercise>] {
        &self.slots
    }

    pub fn set_slot(&mut self, index: usize, exercise: Option<Exercise>) {
        if index < WORKOUT_SLOTS {
            self.slots[index] = exercise;
        }
    }

    /// Non-empty exercises in slot order
    pub fn active_exercises(&self) -> Vec<Exercise> {
        self.slots.iter().flatten().cloned().collect()
    }

    /// Number of non-empty slots
    pub fn exercise_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Sum of assigned durations over non-empty slots, in seconds
    pub fn total_duration_secs(&self) -> u64 {
        self.slots
            .iter()
            .flatten()
            .map(|ex| u64::from(ex.duration_secs))
            .sum()
    }

    /// Name to display and record: empty names fall back to "Untitled"
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Untitled"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workout_has_fixed_slots() {
        let workout = Workout::new("Morning");
        assert_eq!(workout.slots().len(), WORKOUT_SLOTS);
        assert_eq!(workout.exercise_count(), 0);
        assert_eq!(workout.total_duration_secs(), 0);
    }

    #[test]
    fn test_with_slots_pads_and_truncates() {
        let short = Workout::with_slots("a", vec![Some(Exercise::new("x.mp4", 30))]);
        assert_eq!(short.slots().len(), WORKOUT_SLOTS);
        assert_eq!(short.exercise_count(), 1);

        let long = Workout::with_slots("b", vec![None; WORKOUT_SLOTS + 5]);
        assert_eq!(long.slots().len(), WORKOUT_SLOTS);
    }

    #[test]
    fn test_active_exercises_preserves_order_and_skips_gaps() {
        let mut workout = Workout::new("Circuit");
        workout.set_slot(1, Some(Exercise::new("a.mp4", 30)));
        workout.set_slot(4, Some(Exercise::new("b.mp4", 45)));
        workout.set_slot(9, Some(Exercise::new("c.mp4", 60)));

        let active = workout.active_exercises();
        assert_eq!(active.len(), 3);
        assert_eq!(active[0].video_path, PathBuf::from("a.mp4"));
        assert_eq!(active[1].video_path, PathBuf::from("b.mp4"));
        assert_eq!(active[2].video_path, PathBuf::from("c.mp4"));
        assert_eq!(workout.total_duration_secs(), 135);
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Workout::new("").display_name(), "Untitled");
        assert_eq!(Workout::new("Legs").display_name(), "Legs");
    }

    #[test]
    fn test_set_slot_out_of_range_is_ignored() {
        let mut workout = Workout::new("x");
        workout.set_slot(WORKOUT_SLOTS, Some(Exercise::new("a.mp4", 10)));
        assert_eq!(workout.exercise_count(), 0);
    }
}
