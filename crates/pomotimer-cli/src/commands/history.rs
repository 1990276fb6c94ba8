use clap::Subcommand;
use pomotimer_core::storage::{Database, KvHistoryStore};
use pomotimer_core::{daily_counts, DayCount, HistoryLog, HistoryStore};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Completed sessions, newest first
    List {
        /// Maximum number of entries
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Sessions per day over the last week
    Chart,
}

pub fn run(action: HistoryAction) -> CliResult {
    let db = Database::open()?;
    let log = HistoryLog::from_records(KvHistoryStore::new(db).load()?);

    match action {
        HistoryAction::List { limit } => print_json(&log.recent(limit))?,
        HistoryAction::Chart => {
            let today = chrono::Local::now().date_naive();
            print!("{}", render_chart(&daily_counts(log.records(), today)));
        }
    }
    Ok(())
}

/// One line per day: `MM-DD | ### 3`.
pub fn render_chart(days: &[DayCount]) -> String {
    let mut out = String::new();
    for day in days {
        let bar = "#".repeat(day.count as usize);
        let gap = if bar.is_empty() { "" } else { " " };
        out.push_str(&format!("{} | {bar}{gap}{}\n", day.label(), day.count));
    }
    out
}
