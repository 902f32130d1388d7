//! Core error types for habitrack-core.
//!
//! This module defines the error hierarchy using thiserror. The tracker
//! itself has a single domain error; everything else belongs to the
//! storage, configuration and reminder layers around it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Tracking errors
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reminder scheduling errors
    #[error("Reminder error: {0}")]
    Reminder(#[from] ReminderError),
}

/// Errors raised by the tracking core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// No habit carries the given id
    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to read or write a data file
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to resolve or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Reminder lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    /// Reminders can be started once per session
    #[error("reminders were already started in this session")]
    AlreadyStarted,
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
