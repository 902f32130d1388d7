//! Comma-delimited text persistence for habits and completion logs.
//!
//! Habits file, one habit per line:
//!
//! ```text
//! H0001,Read\, then journal,DAILY,2026-10-17
//! ```
//!
//! Logs file, one entry per line:
//!
//! ```text
//! H0001,2026-10-17,true
//! ```
//!
//! Names escape `\` as `\\`, `,` as `\,`, and line breaks as `\n` / `\r`, so
//! every name stays on one line. Lines with too few fields are
//! skipped silently; lines whose date or frequency does not parse are skipped
//! with a warning.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::StorageError;
use crate::habit::{Frequency, Habit, HabitLogEntry};
use crate::storage::Config;
use crate::tracker::HabitTracker;

const HABIT_FIELDS: usize = 4;
const LOG_FIELDS: usize = 3;

/// Reads and writes the habits and logs files.
#[derive(Debug, Clone)]
pub struct TextStore {
    habits_path: PathBuf,
    logs_path: PathBuf,
}

impl TextStore {
    pub fn new(habits_path: impl Into<PathBuf>, logs_path: impl Into<PathBuf>) -> Self {
        Self {
            habits_path: habits_path.into(),
            logs_path: logs_path.into(),
        }
    }

    /// Store at the locations named by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let (habits_path, logs_path) = config.storage_paths()?;
        Ok(Self::new(habits_path, logs_path))
    }

    pub fn habits_path(&self) -> &Path {
        &self.habits_path
    }

    pub fn logs_path(&self) -> &Path {
        &self.logs_path
    }

    // ── Habits ───────────────────────────────────────────────────────

    /// Write all habits, replacing the file.
    pub fn save_habits(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let content: String = habits.iter().map(|h| encode_habit(h) + "\n").collect();
        write_file(&self.habits_path, &content)
    }

    /// Read all habits in file order.
    pub fn load_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let content = read_file(&self.habits_path)?;
        Ok(parse_lines(&self.habits_path, &content, decode_habit))
    }

    // ── Logs ─────────────────────────────────────────────────────────

    /// Write all log entries, replacing the file.
    pub fn save_logs(&self, logs: &[HabitLogEntry]) -> Result<(), StorageError> {
        let content: String = logs.iter().map(|e| encode_log(e) + "\n").collect();
        write_file(&self.logs_path, &content)
    }

    /// Read all log entries in file order.
    pub fn load_logs(&self) -> Result<Vec<HabitLogEntry>, StorageError> {
        let content = read_file(&self.logs_path)?;
        Ok(parse_lines(&self.logs_path, &content, decode_log))
    }

    // ── Tracker ──────────────────────────────────────────────────────

    /// Export the tracker's habits and flattened logs.
    pub fn save(&self, tracker: &HabitTracker) -> Result<(), StorageError> {
        let habits = tracker.list_habits();
        let logs = tracker.all_logs_flattened();
        self.save_habits(&habits)?;
        self.save_logs(&logs)?;
        info!(
            habits = habits.len(),
            log_entries = logs.len(),
            path = %self.habits_path.display(),
            "tracker state saved"
        );
        Ok(())
    }

    /// Replace the tracker's state with the persisted data.
    ///
    /// A missing logs file reads as an empty log. The tracker is untouched if
    /// the habits file is missing or either file cannot be read.
    pub fn load_into(&self, tracker: &mut HabitTracker) -> Result<(), StorageError> {
        let habits = self.load_habits()?;
        let logs = match self.load_logs() {
            Err(e) if e.is_not_found() => Vec::new(),
            other => other?,
        };
        tracker.load_data(habits, logs);
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, StorageError> {
    std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))
}

fn write_file(path: &Path, content: &str) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| StorageError::io(path, e))
}

/// Decode every line, skipping blank and short lines and logging unparsable ones.
fn parse_lines<T>(
    path: &Path,
    content: &str,
    decode: impl Fn(&str) -> Result<Option<T>, String>,
) -> Vec<T> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match decode(line) {
            Ok(item) => item,
            Err(reason) => {
                warn!(
                    path = %path.display(),
                    line = index + 1,
                    %reason,
                    "skipping malformed line"
                );
                None
            }
        })
        .collect()
}

// ── Line codec ───────────────────────────────────────────────────────

pub(crate) fn encode_habit(habit: &Habit) -> String {
    format!(
        "{},{},{},{}",
        habit.id(),
        escape(&habit.name),
        habit.frequency,
        habit.created_at()
    )
}

/// `Ok(None)` means the line has too few fields.
pub(crate) fn decode_habit(line: &str) -> Result<Option<Habit>, String> {
    let fields = split_unescaped(line, HABIT_FIELDS);
    let [id, name, frequency, created_at] = fields.as_slice() else {
        return Ok(None);
    };

    let frequency: Frequency = frequency.parse().map_err(|e| format!("{e}"))?;
    let created_at = parse_date(created_at)?;
    Ok(Some(Habit::new(*id, unescape(name), frequency, created_at)))
}

pub(crate) fn encode_log(entry: &HabitLogEntry) -> String {
    format!("{},{},{}", entry.habit_id, entry.date, entry.completed)
}

/// `Ok(None)` means the line has too few fields.
pub(crate) fn decode_log(line: &str) -> Result<Option<HabitLogEntry>, String> {
    let fields = split_unescaped(line, LOG_FIELDS);
    let [habit_id, date, completed] = fields.as_slice() else {
        return Ok(None);
    };

    let date = parse_date(date)?;
    let completed = completed.trim().eq_ignore_ascii_case("true");
    Ok(Some(HabitLogEntry::new(*habit_id, date, completed)))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    raw.trim()
        .parse::<NaiveDate>()
        .map_err(|e| format!("invalid date '{raw}': {e}"))
}

/// Escape backslashes first, then commas and line breaks.
pub(crate) fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Exact inverse of [`escape`], in a single pass so `\\,` decodes to `\` + `,`.
pub(crate) fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next @ ('\\' | ',')) => out.push(next),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split on the first `limit - 1` commas that are not escaped. The last field
/// keeps the rest of the line.
pub(crate) fn split_unescaped(line: &str, limit: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(limit);
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if fields.len() + 1 >= limit {
            break;
        }
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ',' => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    fields.push(&line[start..]);
    fields
}
