pub mod config;
pub mod history;
pub mod run;
pub mod stats;
pub mod timer;

use std::sync::Arc;

use pomotimer_core::storage::{Database, KvHistoryStore};
use pomotimer_core::{Config, Notifier, SessionTimer, SystemClock, TimerState};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// kv key of the timer state carried between CLI invocations.
pub const STATE_KEY: &str = "timer_state";

pub fn load_state(db: &Database, config: &Config) -> CliResult<TimerState> {
    if let Some(json) = db.kv_get(STATE_KEY)? {
        match serde_json::from_str::<TimerState>(&json) {
            Ok(state) => return Ok(state),
            Err(e) => tracing::warn!(error = %e, "discarding unreadable timer state"),
        }
    }
    let settings = config.timer_settings()?;
    Ok(TimerState::new(
        settings.work_duration_sec,
        settings.break_duration_sec,
    ))
}

pub fn save_state(db: &Database, state: &TimerState) -> CliResult {
    db.kv_set(STATE_KEY, &serde_json::to_string(state)?)?;
    Ok(())
}

/// Session timer over the persisted state, history and configuration.
pub fn open_session(
    db: &Database,
    config: &Config,
    notifier: Box<dyn Notifier>,
) -> CliResult<SessionTimer> {
    let state = load_state(db, config)?;
    Ok(SessionTimer::restore(
        state,
        config.timer_settings()?,
        Arc::new(SystemClock),
        notifier,
        Box::new(KvHistoryStore::new(db.clone())),
    ))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
