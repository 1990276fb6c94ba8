//! Foreground session: the driver ticks while commands arrive on stdin.

use std::io::Write;
use std::sync::Arc;

use pomotimer_core::storage::Database;
use pomotimer_core::{
    Alert, AlertSink, Config, Event, PermissionStatus, ScheduledNotifier, TimerDriver,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::history::render_chart;
use super::{open_session, print_json, save_state, CliResult};

const HELP: &str = "commands: start | pause | reset | switch | preset <MIN> | status | chart | quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Start,
    Pause,
    Reset,
    Switch,
    Preset(u32),
    Status,
    Chart,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let command = match words.next() {
        Some("start") => Command::Start,
        Some("pause") => Command::Pause,
        Some("reset") => Command::Reset,
        Some("switch") => Command::Switch,
        Some("preset") => {
            let minutes = words
                .next()
                .ok_or("preset needs a number of minutes")?
                .parse::<u32>()
                .map_err(|e| format!("invalid minutes: {e}"))?;
            Command::Preset(minutes)
        }
        Some("status") => Command::Status,
        Some("chart") => Command::Chart,
        Some("quit") | Some("exit") => Command::Quit,
        Some(other) => return Err(format!("unknown command: {other}")),
        None => return Err(HELP.to_string()),
    };
    Ok(command)
}

fn terminal_sink() -> AlertSink {
    Arc::new(|alert: Alert| {
        let mut out = std::io::stdout();
        let _ = writeln!(out, "\x07[{}] {}", alert.title, alert.body);
        let _ = out.flush();
    })
}

/// One-line rendering of the events worth announcing unprompted.
fn describe(event: &Event) -> Option<String> {
    match event {
        Event::TimerCompleted {
            record,
            next_mode,
            next_seconds_left,
            ..
        } => Some(format!(
            "{} session complete ({} min). Next: {} {}",
            record.mode,
            record.duration_min(),
            next_mode,
            pomotimer_core::timer::format_clock(*next_seconds_left),
        )),
        Event::TimerStarted { mode, seconds_left, .. } => Some(format!(
            "{mode} started, {} left",
            pomotimer_core::timer::format_clock(*seconds_left)
        )),
        Event::TimerPaused { seconds_left, .. } => Some(format!(
            "paused at {}",
            pomotimer_core::timer::format_clock(*seconds_left)
        )),
        Event::TimerReset { mode, seconds_left, .. }
        | Event::ModeSwitched {
            to: mode,
            seconds_left,
            ..
        }
        | Event::PresetApplied {
            mode, seconds_left, ..
        } => Some(format!(
            "{mode} ready, {}",
            pomotimer_core::timer::format_clock(*seconds_left)
        )),
        Event::StateSnapshot { .. } => None,
    }
}

pub fn run() -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(config, db))
}

async fn session(config: Config, db: Database) -> CliResult {
    let notifier = if config.notifications.enabled {
        ScheduledNotifier::new(terminal_sink())
    } else {
        ScheduledNotifier::denied(terminal_sink())
    };
    let timer = open_session(&db, &config, Box::new(notifier))?;
    let driver = TimerDriver::new(timer, config.tick_interval());

    if driver.request_notification_permission().await == Some(PermissionStatus::Denied) {
        println!("alerts are off; the countdown still runs");
    }

    let mut events = driver.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = describe(&event) {
                        println!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event printer lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Pick up a countdown left running by an earlier invocation.
    driver.resume().await;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        let ignored = match command {
            Command::Start => driver.start().await.is_none(),
            Command::Pause => driver.pause().await.is_none(),
            Command::Reset => driver.reset().await.is_none(),
            Command::Switch => driver.switch_mode().await.is_none(),
            Command::Preset(minutes) => driver.apply_preset(minutes).await.is_none(),
            Command::Status => {
                print_json(&driver.snapshot().await)?;
                false
            }
            Command::Chart => {
                print!("{}", render_chart(&driver.timer().lock().await.daily_counts()));
                false
            }
            Command::Quit => break,
        };
        if ignored {
            println!("ignored in the current state");
        }
    }

    driver.shutdown().await;
    let state = driver.timer().lock().await.state().clone();
    save_state(&db, &state)?;
    printer.abort();
    Ok(())
}
