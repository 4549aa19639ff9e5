//! Error types for fitplayer
//!
//! This module defines custom error types used throughout the application.
//! We use thiserror for convenient error type definitions and anyhow for
//! application-level error handling.

use thiserror::Error;

/// Main error type for fitplayer
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Video source errors (open or decode failures)
    #[error("Video error: {0}")]
    Video(String),

    /// Session history persistence errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Attempt to start a session on a workout with no exercises
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Generic error for unexpected situations
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for PlayerError {
    fn from(err: rusqlite::Error) -> Self {
        PlayerError::Persistence(format!("SQLite error: {}", err))
    }
}

impl From<serde_json::Error> for PlayerError {
    fn from(err: serde_json::Error) -> Self {
        PlayerError::Config(format!("JSON error: {}", err))
    }
}

impl PlayerError {
    /// Create a video error from string
    pub fn video_error<S: Into<String>>(msg: S) -> Self {
        PlayerError::Video(msg.into())
    }
}

/// Convenience type alias for Results in fitplayer
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Extension trait for converting other errors to PlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerError with the given context
    fn video_err(self, context: &str) -> Result<T>;
    fn persistence_err(self, context: &str) -> Result<T>;
    fn config_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn video_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Video(format!("{}: {}", context, e)))
    }

    fn persistence_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Persistence(format!("{}: {}", context, e)))
    }

    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Config(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlayerError::Video("Failed to open source".to_string());
        assert_eq!(err.to_string(), "Video error: Failed to open source");

        let err = PlayerError::InvalidSession("no exercises".to_string());
        assert_eq!(err.to_string(), "Invalid session: no exercises");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let player_err: PlayerError = io_err.into();
        assert!(matches!(player_err, PlayerError::FileIO(_)));
    }

    #[test]
    fn test_into_player_error_trait() {
        let result: std::result::Result<(), &str> = Err("Something went wrong");
        let converted = result.video_err("Opening source");

        match converted {
            Err(PlayerError::Video(msg)) => {
                assert_eq!(msg, "Opening source: Something went wrong");
            }
            _ => panic!("Expected Video error"),
        }
    }
}
