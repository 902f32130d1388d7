//! `habitrack config`: inspect and change `config.toml`.

use clap::Subcommand;
use habitrack_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted setting name, e.g. "reminders.interval_secs"
        key: String,
    },
    /// Change one setting and write config.toml
    Set {
        /// Dotted setting name
        key: String,
        /// Value, checked against the setting's type
        value: String,
    },
    /// Print every setting as JSON
    List,
    /// Show where config and habit data are stored
    Paths,
    /// Overwrite config.toml with the built-in settings
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Paths => {
            let config = Config::load_or_default();
            let (habits, logs) = config.storage_paths()?;
            println!("config: {}", Config::file_path()?.display());
            println!("habits: {}", habits.display());
            println!("logs:   {}", logs.display());
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("Settings restored to defaults.");
        }
    }
    Ok(())
}
