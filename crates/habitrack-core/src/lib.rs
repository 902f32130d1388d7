//! # Habitrack Core Library
//!
//! This library provides the core business logic for the Habitrack habit tracker.
//! The `habitrack` CLI binary is a thin console layer over the same core library.
//!
//! ## Architecture
//!
//! - **Tracking Core**: An in-memory registry of habits plus an append-only
//!   completion log per habit, with consecutive-day streak computation
//! - **Storage**: Delimited text files for habits and logs, TOML-based configuration
//! - **Reminders**: A cancellable periodic task that reads the habit count
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: Habit registry, completion log and streaks
//! - [`SharedTracker`]: Thread-safe handle shared with background readers
//! - [`TextStore`]: Habits/logs persistence
//! - [`Config`]: Application configuration management
//! - [`ReminderService`]: Periodic habit reminders

pub mod error;
pub mod habit;
pub mod reminder;
pub mod storage;
pub mod tracker;

pub use error::{ConfigError, CoreError, ReminderError, Result, StorageError, TrackerError};
pub use habit::{Frequency, Habit, HabitLogEntry};
pub use reminder::{ReminderService, ReminderSink};
pub use storage::{Config, TextStore};
pub use tracker::{HabitTracker, SharedTracker};
