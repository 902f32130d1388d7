//! Habit tracking core.
//!
//! Owns the habit registry and the per-habit completion log, and computes
//! consecutive-day streaks. No I/O happens here: persistence is driven by
//! [`crate::TextStore`] from the outside.
//!
//! ## Streaks
//!
//! The completion log is an append-ordered journal, not a date-indexed set.
//! [`HabitTracker::current_streak`] walks a habit's entries from the most
//! recently appended one backwards, expecting today, then yesterday, and so on,
//! and stops at the first entry that does not match. A second entry for the
//! same day is compared against the previous day, and a backfilled entry
//! appended last ends the streak immediately.

use chrono::{Days, Local, NaiveDate};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::error::TrackerError;
use crate::habit::{format_habit_id, Frequency, Habit, HabitLogEntry};

/// Today's date on the local calendar.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Habit registry plus completion log.
#[derive(Debug, Clone)]
pub struct HabitTracker {
    habits: Vec<Habit>,
    /// Keyed by canonical habit id, in the order habits first received an entry.
    logs: IndexMap<String, Vec<HabitLogEntry>>,
    next_id_number: u64,
}

impl Default for HabitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitTracker {
    pub fn new() -> Self {
        Self {
            habits: Vec::new(),
            logs: IndexMap::new(),
            next_id_number: 1,
        }
    }

    // ── Habits ───────────────────────────────────────────────────────

    /// Create a habit stamped with today's date.
    pub fn add_habit(&mut self, name: impl Into<String>, frequency: Frequency) -> Habit {
        self.add_habit_on(name, frequency, today())
    }

    /// Create a habit with an explicit creation date.
    ///
    /// The name is not validated; an empty name is accepted.
    pub fn add_habit_on(
        &mut self,
        name: impl Into<String>,
        frequency: Frequency,
        created_at: NaiveDate,
    ) -> Habit {
        let id = self.allocate_id();
        let habit = Habit::new(id, name, frequency, created_at);
        debug!(habit_id = habit.id(), "habit added");
        self.habits.push(habit.clone());
        habit
    }

    /// Owned copy of all habits in creation order.
    pub fn list_habits(&self) -> Vec<Habit> {
        self.habits.clone()
    }

    pub fn habit_count(&self) -> usize {
        self.habits.len()
    }

    /// Case-insensitive exact match on id.
    pub fn find_habit_by_id(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.matches_id(habit_id))
    }

    // ── Completion log ───────────────────────────────────────────────

    /// Record a completion for today.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::HabitNotFound`] if no habit has this id. The
    /// tracker is left untouched in that case.
    pub fn log_completion(&mut self, habit_id: &str) -> Result<HabitLogEntry, TrackerError> {
        self.log_completion_on(habit_id, today())
    }

    /// Record a completion on an explicit date.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::HabitNotFound`] if no habit has this id.
    pub fn log_completion_on(
        &mut self,
        habit_id: &str,
        date: NaiveDate,
    ) -> Result<HabitLogEntry, TrackerError> {
        let canonical = self
            .find_habit_by_id(habit_id)
            .map(|h| h.id().to_string())
            .ok_or_else(|| TrackerError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })?;

        let entry = HabitLogEntry::new(canonical.clone(), date, true);
        self.logs.entry(canonical).or_default().push(entry.clone());
        debug!(habit_id = %entry.habit_id, date = %entry.date, "completion logged");
        Ok(entry)
    }

    /// Entries for one habit in append order. Unknown ids yield an empty slice.
    pub fn logs_for(&self, habit_id: &str) -> &[HabitLogEntry] {
        let key = self.log_key(habit_id);
        self.logs.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every habit's entries concatenated, grouped in the order habits first
    /// received an entry.
    pub fn all_logs_flattened(&self) -> Vec<HabitLogEntry> {
        self.logs.values().flatten().cloned().collect()
    }

    // ── Streaks ──────────────────────────────────────────────────────

    /// Consecutive-day streak ending today.
    pub fn current_streak(&self, habit_id: &str) -> u32 {
        self.current_streak_as_of(habit_id, today())
    }

    /// Consecutive-day streak ending on `today`.
    ///
    /// Frequency is not consulted: weekly habits also step back one calendar
    /// day per matching entry.
    pub fn current_streak_as_of(&self, habit_id: &str, today: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut expected = Some(today);

        for entry in self.logs_for(habit_id).iter().rev() {
            match expected {
                Some(date) if entry.date == date => {
                    streak += 1;
                    expected = date.checked_sub_days(Days::new(1));
                }
                _ => break,
            }
        }

        streak
    }

    // ── Bulk load ────────────────────────────────────────────────────

    /// Replace the whole in-memory state with persisted data.
    ///
    /// Logs are appended in the order given. The id counter becomes the
    /// highest numeric id suffix plus one, or 1 when there are no habits.
    pub fn load_data(&mut self, habits: Vec<Habit>, logs: Vec<HabitLogEntry>) {
        self.habits = habits;

        self.logs.clear();
        for entry in logs {
            self.logs
                .entry(entry.habit_id.clone())
                .or_default()
                .push(entry);
        }

        self.next_id_number = self
            .habits
            .iter()
            .filter_map(Habit::id_number)
            .max()
            .map_or(1, |max| max.checked_add(1).unwrap_or(1));

        info!(
            habits = self.habits.len(),
            log_entries = self.logs.values().map(Vec::len).sum::<usize>(),
            next_id = %format_habit_id(self.next_id_number),
            "tracker state loaded"
        );
    }

    /// Next id number not held by any habit. Past `u64::MAX` the counter
    /// wraps to 1 and keeps scanning for a free number.
    fn allocate_id(&mut self) -> String {
        loop {
            let number = self.next_id_number;
            self.next_id_number = number.checked_add(1).unwrap_or(1);
            if !self.habits.iter().any(|h| h.id_number() == Some(number)) {
                return format_habit_id(number);
            }
        }
    }

    /// Logs are keyed by canonical id; fall back to the raw id for entries
    /// whose habit is unknown.
    fn log_key<'a>(&'a self, habit_id: &'a str) -> &'a str {
        self.find_habit_by_id(habit_id)
            .map(Habit::id)
            .unwrap_or(habit_id)
    }
}

/// Thread-safe handle to a [`HabitTracker`].
///
/// The interactive loop mutates through [`SharedTracker::with_mut`]; background
/// readers such as reminders only ever take short read sections.
#[derive(Debug, Clone, Default)]
pub struct SharedTracker {
    inner: Arc<Mutex<HabitTracker>>,
}

impl SharedTracker {
    pub fn new(tracker: HabitTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HabitTracker> {
        // A panic while holding the lock cannot leave the collections half
        // updated, so keep serving the inner value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with<R>(&self, f: impl FnOnce(&HabitTracker) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut HabitTracker) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn habit_count(&self) -> usize {
        self.lock().habit_count()
    }

    /// Point-in-time copy of the tracker.
    pub fn snapshot(&self) -> HabitTracker {
        self.lock().clone()
    }
}
