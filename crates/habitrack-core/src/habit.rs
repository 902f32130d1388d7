//! Habit and completion log types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every habit id (`H0001`).
pub const HABIT_ID_PREFIX: char = 'H';

/// Declared cadence of a habit.
///
/// Stored and displayed only; streaks are always counted in calendar days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Frequency::Daily
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a frequency token is neither `DAILY` nor `WEEKLY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError(pub String);

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown frequency '{}' (expected DAILY or WEEKLY)", self.0)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// A user-defined recurring activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    id: String,
    pub name: String,
    pub frequency: Frequency,
    created_at: NaiveDate,
}

impl Habit {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        frequency: Frequency,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frequency,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    /// Numeric part of the id, if the id has the `H<digits>` shape.
    pub fn id_number(&self) -> Option<u64> {
        parse_id_number(&self.id)
    }

    pub(crate) fn matches_id(&self, habit_id: &str) -> bool {
        self.id.eq_ignore_ascii_case(habit_id)
    }
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | created {}",
            self.id, self.name, self.frequency, self.created_at
        )
    }
}

/// Format a sequence number as a habit id: `H` + 4-digit zero-padded number.
pub fn format_habit_id(number: u64) -> String {
    format!("{HABIT_ID_PREFIX}{number:04}")
}

/// Parse the numeric suffix of a habit id. The prefix is matched case-insensitively.
pub fn parse_id_number(habit_id: &str) -> Option<u64> {
    let mut chars = habit_id.chars();
    let prefix = chars.next()?;
    if !prefix.eq_ignore_ascii_case(&HABIT_ID_PREFIX) {
        return None;
    }
    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A record that a habit was marked done on a specific date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLogEntry {
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl HabitLogEntry {
    pub fn new(habit_id: impl Into<String>, date: NaiveDate, completed: bool) -> Self {
        Self {
            habit_id: habit_id.into(),
            date,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn frequency_parses_case_insensitively() {
        assert_eq!("daily".parse::<Frequency>(), Ok(Frequency::Daily));
        assert_eq!(" Weekly ".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert!("monthly".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_serializes_upper_case() {
        let json = serde_json::to_string(&Frequency::Weekly).unwrap();
        assert_eq!(json, "\"WEEKLY\"");
    }

    #[test]
    fn habit_id_formatting() {
        assert_eq!(format_habit_id(1), "H0001");
        assert_eq!(format_habit_id(42), "H0042");
        assert_eq!(format_habit_id(12345), "H12345");
    }

    #[test]
    fn habit_id_number_parsing() {
        assert_eq!(parse_id_number("H0005"), Some(5));
        assert_eq!(parse_id_number("h0012"), Some(12));
        assert_eq!(parse_id_number("H"), None);
        assert_eq!(parse_id_number("X0001"), None);
        assert_eq!(parse_id_number("H00a1"), None);
        assert_eq!(parse_id_number(""), None);
        assert_eq!(parse_id_number("H4294967296"), Some(4_294_967_296));
        assert_eq!(parse_id_number("H99999999999999999999"), None);
    }

    #[test]
    fn habit_display_format() {
        let habit = Habit::new("H0001", "Read", Frequency::Daily, date(2026, 10, 17));
        assert_eq!(habit.to_string(), "H0001 | Read | DAILY | created 2026-10-17");
    }

    #[test]
    fn habit_matches_id_ignoring_case() {
        let habit = Habit::new("H0003", "Run", Frequency::Weekly, date(2026, 1, 2));
        assert!(habit.matches_id("h0003"));
        assert!(habit.matches_id("H0003"));
        assert!(!habit.matches_id("H003"));
    }

    #[test]
    fn habit_serialization() {
        let habit = Habit::new("H0002", "Stretch, then walk", Frequency::Daily, date(2026, 3, 4));
        let json = serde_json::to_value(&habit).unwrap();
        assert_eq!(json["id"], "H0002");
        assert_eq!(json["frequency"], "DAILY");
        assert_eq!(json["created_at"], "2026-03-04");
        let decoded: Habit = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, habit);
    }
}
