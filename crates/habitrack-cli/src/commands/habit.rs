//! One-shot habit commands.

use clap::Subcommand;
use habitrack_core::{Frequency, TrackerError};
use serde_json::json;

use crate::session::Session;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// DAILY or WEEKLY
        #[arg(long, short, default_value = "DAILY")]
        frequency: Frequency,
        /// Print the created habit as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all habits
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one habit with its streak
    Show {
        /// Habit ID (e.g. H0001)
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Log a completion for today
    Log {
        /// Habit ID (e.g. H0001)
        id: String,
    },
    /// Print the current streak
    Streak {
        /// Habit ID (e.g. H0001)
        id: String,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;

    match action {
        HabitAction::Add {
            name,
            frequency,
            json,
        } => {
            let habit = session.tracker.add_habit(name, frequency);
            session.save()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&habit)?);
            } else {
                println!("Added: {habit}");
            }
        }
        HabitAction::List { json } => {
            let habits = session.tracker.list_habits();
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
            } else if habits.is_empty() {
                println!("No habits yet.");
            } else {
                println!("Habits:");
                for habit in &habits {
                    println!("{habit}");
                }
            }
        }
        HabitAction::Show { id, json } => {
            let tracker = &session.tracker;
            let habit = tracker
                .find_habit_by_id(&id)
                .ok_or_else(|| TrackerError::HabitNotFound { habit_id: id.clone() })?;
            let streak = tracker.current_streak(habit.id());
            let completions = tracker.logs_for(habit.id()).len();
            if json {
                let value = json!({
                    "habit": habit,
                    "streak": streak,
                    "completions": completions,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{habit}");
                println!("Completions logged: {completions}");
                println!("Current streak: {streak} day(s)");
            }
        }
        HabitAction::Log { id } => {
            let entry = session.tracker.log_completion(&id)?;
            session.save()?;
            println!("Logged completion for {} (today).", entry.habit_id);
        }
        HabitAction::Streak { id, json } => {
            let streak = session.tracker.current_streak(&id);
            if json {
                println!("{}", json!({ "id": id, "streak": streak }));
            } else {
                println!("Current streak for {id}: {streak} day(s)");
            }
        }
    }
    Ok(())
}
