use clap::Subcommand;
use pomotimer_core::storage::Database;
use pomotimer_core::{Config, Event, NullNotifier};

use super::{open_session, print_json, save_state, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or continue the countdown
    Start,
    /// Pause, keeping the remaining time
    Pause,
    /// Stop and restore the full duration of the current mode
    Reset,
    /// Stop and flip between work and break
    Switch,
    /// Set the current mode's duration while stopped
    Preset {
        /// Minutes, greater than zero
        minutes: u32,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    // Nothing ticks between invocations, so alerts cannot be delivered.
    let mut timer = open_session(&db, &config, Box::new(NullNotifier::new()))?;

    // The process was not running since the last command; catch up first.
    if let Some(completed) = timer.resume() {
        print_json(&completed)?;
    }

    let event: Option<Event> = match action {
        TimerAction::Start => timer.start(),
        TimerAction::Pause => timer.pause(),
        TimerAction::Reset => timer.reset(),
        TimerAction::Switch => timer.switch_mode(),
        TimerAction::Preset { minutes } => {
            let event = timer.apply_preset(minutes);
            if event.is_none() {
                eprintln!("preset ignored: timer is running or minutes is zero");
            }
            event
        }
        TimerAction::Status => None,
    };

    print_json(&event.unwrap_or_else(|| timer.snapshot()))?;
    save_state(&db, timer.state())?;
    Ok(())
}
