//! Periodic habit reminders.
//!
//! A single tokio task ticks at a fixed interval after an initial delay, reads
//! the habit count through a [`SharedTracker`] and hands it to a
//! [`ReminderSink`]. The task only reads tracker state.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle -> Running -> Stopped
//! ```
//!
//! Reminders start at most once per session. `stop` is idempotent and safe to
//! call before `start`.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::ReminderError;
use crate::storage::ReminderConfig;
use crate::tracker::SharedTracker;

/// Receives each reminder.
pub trait ReminderSink: Send + Sync {
    fn remind(&self, habit_count: usize);
}

#[derive(Debug)]
enum ReminderState {
    Idle,
    Running {
        stop_tx: oneshot::Sender<()>,
        task: JoinHandle<()>,
    },
    Stopped,
}

/// Start/stop controller for the reminder task.
pub struct ReminderService {
    tracker: SharedTracker,
    config: ReminderConfig,
    sink: Arc<dyn ReminderSink>,
    state: ReminderState,
}

impl ReminderService {
    pub fn new(tracker: SharedTracker, config: ReminderConfig, sink: Arc<dyn ReminderSink>) -> Self {
        Self {
            tracker,
            config,
            sink,
            state: ReminderState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ReminderState::Running { .. })
    }

    /// Spawn the reminder task on `runtime`.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::AlreadyStarted`] if reminders were started
    /// before in this session, even if they have been stopped since.
    pub fn start(&mut self, runtime: &Handle) -> Result<(), ReminderError> {
        if !matches!(self.state, ReminderState::Idle) {
            return Err(ReminderError::AlreadyStarted);
        }

        let (stop_tx, mut stop_rx) = oneshot::channel();
        let tracker = self.tracker.clone();
        let sink = Arc::clone(&self.sink);
        let period = self.config.interval();
        let now = Instant::now();
        let first = now.checked_add(self.config.initial_delay()).unwrap_or(now + period);

        let task = runtime.spawn(async move {
            let mut ticker = interval_at(first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let count = tracker.habit_count();
                        debug!(habit_count = count, "reminder tick");
                        sink.remind(count);
                    }
                }
            }
        });

        info!(
            initial_delay_secs = self.config.initial_delay_secs,
            interval_secs = period.as_secs(),
            "reminders started"
        );
        self.state = ReminderState::Running { stop_tx, task };
        Ok(())
    }

    /// Stop the reminder task. No reminder is delivered after this returns.
    pub fn stop(&mut self) {
        match std::mem::replace(&mut self.state, ReminderState::Stopped) {
            ReminderState::Running { stop_tx, task } => {
                // The receiver is gone if the task already ended.
                let _ = stop_tx.send(());
                task.abort();
                info!("reminders stopped");
            }
            ReminderState::Idle => self.state = ReminderState::Idle,
            ReminderState::Stopped => {}
        }
    }
}

impl Drop for ReminderService {
    fn drop(&mut self) {
        self.stop();
    }
}
