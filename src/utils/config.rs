//! Configuration management for fitplayer
//!
//! This module handles loading and managing application configuration
//! from various sources including config files and environment variables.

use crate::utils::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Playback configuration
    pub playback: PlaybackConfig,

    /// Storage locations
    pub storage: StorageConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Frame rate used when a video source reports none
    pub default_fps: f64,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Workout definitions file (JSON)
    pub workouts_file: PathBuf,

    /// Workout history database (SQLite)
    pub history_db: PathBuf,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            storage: StorageConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { default_fps: 30.0 }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitplayer");

        Self {
            workouts_file: data_dir.join("workouts.json"),
            history_db: data_dir.join("history.db"),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. User config file (~/.config/fitplayer/config.toml on Linux)
    /// 3. Environment variables (FITPLAYER_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Try to load user config
        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config.merge_from_file(&user_path)?;
            }
        }

        // Apply environment variable overrides
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerError::Config("Cannot determine user config path".to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlayerError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| PlayerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, toml)
            .map_err(|e| PlayerError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Merge configuration from a TOML file
    fn merge_from_file(&mut self, path: &Path) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlayerError::Config(format!("Failed to read config file: {}", e)))?;

        let file_config: Config = toml::from_str(&contents)
            .map_err(|e| PlayerError::Config(format!("Failed to parse config file: {}", e)))?;

        *self = file_config;

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(fps) = std::env::var("FITPLAYER_DEFAULT_FPS") {
            self.playback.default_fps = fps
                .parse()
                .map_err(|_| PlayerError::Config("Invalid FITPLAYER_DEFAULT_FPS".to_string()))?;
        }

        if let Ok(path) = std::env::var("FITPLAYER_WORKOUTS_FILE") {
            self.storage.workouts_file = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("FITPLAYER_HISTORY_DB") {
            self.storage.history_db = PathBuf::from(path);
        }

        if let Ok(level) = std::env::var("FITPLAYER_LOG_LEVEL") {
            self.general.log_level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if !self.playback.default_fps.is_finite() || self.playback.default_fps <= 0.0 {
            return Err(PlayerError::Config(
                "playback.default_fps must be a positive number".to_string(),
            ));
        }

        Ok(())
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("fitplayer").join("config.toml"))
    }
}
