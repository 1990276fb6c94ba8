use clap::Subcommand;
use pomotimer_core::storage::Database;
use pomotimer_core::{Config, TimerEngine};

use super::{load_state, print_json, save_state, CliResult};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.work_minutes", "notifications.enabled")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let previous = Config::load()?;
            let mut config = previous.clone();
            config.update(&key, &value)?;
            carry_durations(&previous, &config)?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => print_json(&Config::load()?)?,
        ConfigAction::Reset => {
            let previous = Config::load()?;
            let config = Config::default();
            carry_durations(&previous, &config)?;
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Write changed work/break durations into the saved timer state so the
/// next `timer` command counts with them. Presets applied to the saved
/// state survive edits that leave the durations alone.
fn carry_durations(previous: &Config, config: &Config) -> CliResult {
    if previous.timer.work_minutes == config.timer.work_minutes
        && previous.timer.break_minutes == config.timer.break_minutes
    {
        return Ok(());
    }

    let settings = config.timer_settings()?;
    let db = Database::open()?;
    let mut engine = TimerEngine::from_state(load_state(&db, previous)?);
    if !engine.set_durations(settings.work_duration_sec, settings.break_duration_sec) {
        return Err("timer is running; pause or reset it before changing durations".into());
    }
    save_state(&db, engine.state())
}
