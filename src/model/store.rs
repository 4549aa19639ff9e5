//! Workout file storage
//!
//! Workouts are persisted wholesale in a single JSON document of the form
//! `{"workouts": [...]}`. There are no partial updates: the editor loads the
//! whole list, mutates it, and saves the whole list back.

use crate::model::Workout;
use crate::utils::error::{IntoPlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct WorkoutsFile {
    workouts: Vec<Workout>,
}

/// Wholesale load/save of the workout list
pub struct WorkoutStore {
    path: PathBuf,
}

impl WorkoutStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all workouts. A missing file is an empty list, not an error.
    pub fn load_all(&self) -> Result<Vec<Workout>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let data = std::fs::read_to_string(&self.path)
            .config_err("Failed to read workouts file")?;
        let file: WorkoutsFile =
            serde_json::from_str(&data).config_err("Failed to parse workouts file")?;

        let mut workouts = file.workouts;
        for workout in &mut workouts {
            workout.normalize();
        }
        Ok(workouts)
    }

    /// Save all workouts, creating parent directories as needed
    pub fn save_all(&self, workouts: &[Workout]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).config_err("Failed to create data directory")?;
        }

        let file = WorkoutsFile {
            workouts: workouts.to_vec(),
        };
        let data = serde_json::to_string_pretty(&file)
            .config_err("Failed to serialize workouts")?;
        std::fs::write(&self.path, data).config_err("Failed to write workouts file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Exercise, WORKOUT_SLOTS};

    #[test]
    fn test_missing_file_is_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(dir.path().join("workouts.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkoutStore::new(dir.path().join("nested").join("workouts.json"));

        let mut workout = Workout::new("Push Day");
        workout.set_slot(0, Some(Exercise::new("pushups.mp4", 45)));
        workout.set_slot(3, Some(Exercise::new("dips.mp4", 30)));

        store.save_all(&[workout.clone()]).unwrap();
        let loaded = store.load_all().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], workout);
    }

    #[test]
    fn test_short_slot_list_is_normalized_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");

        // A hand-edited file with fewer than the full grid of slots
        std::fs::write(
            &path,
            r#"{"workouts": [{"name": "Short", "slots": [{"video_path": "a.mp4", "duration_secs": 20}]}]}"#,
        )
        .unwrap();

        let loaded = WorkoutStore::new(&path).load_all().unwrap();
        assert_eq!(loaded[0].slots().len(), WORKOUT_SLOTS);
        assert_eq!(loaded[0].exercise_count(), 1);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workouts.json");
        std::fs::write(&path, "not json").unwrap();

        let err = WorkoutStore::new(&path).load_all().unwrap_err();
        assert!(matches!(err, crate::utils::error::PlayerError::Config(_)));
    }
}
