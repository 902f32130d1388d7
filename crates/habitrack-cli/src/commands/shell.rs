//! Interactive console menu.
//!
//! Loads saved data on start, saves it on exit (or end of input). Reminders
//! run on a small background runtime and only read the tracker.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use habitrack_core::storage::ReminderConfig;
use habitrack_core::{
    Frequency, HabitTracker, ReminderError, ReminderService, ReminderSink, SharedTracker,
    TextStore,
};
use tokio::runtime::Handle;
use tracing::warn;

use crate::session::Session;

const MENU: &str = "\
Habitrack
1 Add Habit
2 List Habits
3 Log Habit Completion (today)
4 View Current Streak
5 Start Reminders
6 Stop Reminders
7 Exit";

/// Prints reminders between menu prompts.
struct ConsoleReminder;

impl ReminderSink for ConsoleReminder {
    fn remind(&self, habit_count: usize) {
        let mut out = io::stdout().lock();
        // Nothing useful to do if the terminal is gone.
        let _ = write!(
            out,
            "\nReminder: Keep tracking your habits today!\nYou have {habit_count} habit(s) to maintain.\n> "
        );
        let _ = out.flush();
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Session {
        config,
        store,
        tracker,
    } = Session::open()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("habitrack-reminders")
        .enable_time()
        .build()?;

    let mut shell = Shell::new(
        tracker,
        store,
        config.reminders,
        runtime.handle().clone(),
        Arc::new(ConsoleReminder),
        io::stdin().lock(),
        io::stdout(),
    );
    shell.run()?;
    Ok(())
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<R, W> {
    tracker: SharedTracker,
    store: TextStore,
    reminders: ReminderService,
    runtime: Handle,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(
        tracker: HabitTracker,
        store: TextStore,
        reminder_config: ReminderConfig,
        runtime: Handle,
        sink: Arc<dyn ReminderSink>,
        input: R,
        output: W,
    ) -> Self {
        let tracker = SharedTracker::new(tracker);
        let reminders = ReminderService::new(tracker.clone(), reminder_config, sink);
        Self {
            tracker,
            store,
            reminders,
            runtime,
            input,
            output,
        }
    }

    /// Run the menu loop until Exit or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "{MENU}")?;
            let Some(choice) = self.prompt("Choose an option: ")? else {
                break;
            };

            let flow = match choice.as_str() {
                "1" => self.add_habit()?,
                "2" => self.list_habits()?,
                "3" => self.log_completion()?,
                "4" => self.view_streak()?,
                "5" => self.start_reminders()?,
                "6" => self.stop_reminders()?,
                "7" => Flow::Exit,
                _ => {
                    writeln!(self.output, "Invalid option. Try again.")?;
                    Flow::Continue
                }
            };

            if let Flow::Exit = flow {
                break;
            }
        }

        self.exit()
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn add_habit(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Habit name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(frequency) = self.prompt("Frequency (DAILY or WEEKLY): ")? else {
            return Ok(Flow::Exit);
        };

        let frequency = match frequency.parse::<Frequency>() {
            Ok(frequency) => frequency,
            Err(_) => {
                writeln!(self.output, "Invalid frequency. Defaulting to DAILY.")?;
                Frequency::Daily
            }
        };

        let habit = self.tracker.with_mut(|t| t.add_habit(name, frequency));
        writeln!(self.output, "Added: {habit}")?;
        Ok(Flow::Continue)
    }

    fn list_habits(&mut self) -> io::Result<Flow> {
        let habits = self.tracker.with(HabitTracker::list_habits);
        if habits.is_empty() {
            writeln!(self.output, "No habits yet.")?;
        } else {
            writeln!(self.output, "Habits:")?;
            for habit in &habits {
                writeln!(self.output, "{habit}")?;
            }
        }
        Ok(Flow::Continue)
    }

    fn log_completion(&mut self) -> io::Result<Flow> {
        let Some(habit_id) = self.prompt("Enter Habit ID (e.g., H0001): ")? else {
            return Ok(Flow::Exit);
        };

        match self.tracker.with_mut(|t| t.log_completion(&habit_id)) {
            Ok(entry) => writeln!(
                self.output,
                "Logged completion for {} (today).",
                entry.habit_id
            )?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_streak(&mut self) -> io::Result<Flow> {
        let Some(habit_id) = self.prompt("Enter Habit ID (e.g., H0001): ")? else {
            return Ok(Flow::Exit);
        };

        let streak = self.tracker.with(|t| t.current_streak(&habit_id));
        writeln!(
            self.output,
            "Current streak for {habit_id}: {streak} day(s)"
        )?;
        Ok(Flow::Continue)
    }

    fn start_reminders(&mut self) -> io::Result<Flow> {
        match self.reminders.start(&self.runtime) {
            Ok(()) => writeln!(self.output, "Reminders started.")?,
            Err(ReminderError::AlreadyStarted) => writeln!(
                self.output,
                "Reminders can only be started once per session."
            )?,
        }
        Ok(Flow::Continue)
    }

    fn stop_reminders(&mut self) -> io::Result<Flow> {
        if self.reminders.is_running() {
            self.reminders.stop();
            writeln!(self.output, "Reminders stopped.")?;
        } else {
            writeln!(self.output, "Reminders are not running.")?;
        }
        Ok(Flow::Continue)
    }

    fn exit(&mut self) -> io::Result<()> {
        self.reminders.stop();

        if let Err(e) = self.tracker.with(|t| self.store.save(t)) {
            warn!(error = %e, "failed to save habits");
            writeln!(self.output, "Error: could not save data: {e}")?;
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }
}
