use pomotimer_core::storage::{Database, KvHistoryStore};
use pomotimer_core::{summarize, HistoryStore};

use super::{print_json, CliResult};

pub fn run() -> CliResult {
    let db = Database::open()?;
    let records = KvHistoryStore::new(db).load()?;
    let today = chrono::Local::now().date_naive();
    print_json(&summarize(&records, today))
}
