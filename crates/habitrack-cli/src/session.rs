//! Startup import and exit export shared by every command.

use habitrack_core::{Config, HabitTracker, StorageError, TextStore};
use tracing::{info, warn};

/// Configuration, store and the tracker state loaded from it.
pub struct Session {
    pub config: Config,
    pub store: TextStore,
    pub tracker: HabitTracker,
}

impl Session {
    /// Load configuration and persisted habits.
    ///
    /// A broken config falls back to defaults, and any failure to read the
    /// data files starts from an empty tracker.
    pub fn open() -> habitrack_core::Result<Self> {
        let config = Config::load_or_default();
        let store = TextStore::from_config(&config)?;

        let mut tracker = HabitTracker::new();
        if let Err(e) = store.load_into(&mut tracker) {
            if e.is_not_found() {
                info!(path = %store.habits_path().display(), "no saved data, starting fresh");
            } else {
                warn!(error = %e, "could not load saved data, starting fresh");
            }
        }

        Ok(Self {
            config,
            store,
            tracker,
        })
    }

    pub fn save(&self) -> Result<(), StorageError> {
        self.store.save(&self.tracker)
    }
}
