//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Where the habits and logs files live
//! - Reminder timing
//!
//! Configuration is stored at `~/.config/habitrack/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use super::data_dir;
use crate::error::ConfigError;

/// Storage file locations.
///
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_habits_file")]
    pub habits_file: String,
    #[serde(default = "default_logs_file")]
    pub logs_file: String,
}

/// Reminder timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Delay before the first reminder.
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,
    /// Period between reminders. Must be non-zero.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/habitrack/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub reminders: ReminderConfig,
}

// Default functions
fn default_habits_file() -> String {
    "habits.csv".into()
}
fn default_logs_file() -> String {
    "logs.csv".into()
}
fn default_initial_delay_secs() -> u64 {
    10
}
fn default_interval_secs() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            habits_file: default_habits_file(),
            logs_file: default_logs_file(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            initial_delay_secs: default_initial_delay_secs(),
            interval_secs: default_interval_secs(),
        }
    }
}

/// Longest delay or period a reminder timer is armed with (one year).
pub const MAX_REMINDER_SECS: u64 = 365 * 24 * 60 * 60;

impl ReminderConfig {
    /// Delay before the first reminder, capped at [`MAX_REMINDER_SECS`].
    pub fn initial_delay(&self) -> Duration {
        Duration::from_secs(self.initial_delay_secs.min(MAX_REMINDER_SECS))
    }

    /// Reminder period, never zero and capped at [`MAX_REMINDER_SECS`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.clamp(1, MAX_REMINDER_SECS))
    }
}

impl StorageConfig {
    /// Absolute paths of the habits and logs files under `base`.
    pub fn resolve(&self, base: &Path) -> (PathBuf, PathBuf) {
        (base.join(&self.habits_file), base.join(&self.logs_file))
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".to_string()));
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reminders.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "reminders.interval_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        for (key, value) in [
            ("storage.habits_file", &self.storage.habits_file),
            ("storage.logs_file", &self.storage.logs_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Location of `config.toml` inside the data directory.
    pub fn file_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::file_path()?)
    }

    /// Load from an explicit path, writing the default there if it is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the default
    /// cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::file_path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation. `self` is unchanged on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Absolute paths of the habits and logs files.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn storage_paths(&self) -> Result<(PathBuf, PathBuf), crate::error::StorageError> {
        Ok(self.storage.resolve(&data_dir()?))
    }

    /// Load from disk, falling back to defaults (with a warning) on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}
