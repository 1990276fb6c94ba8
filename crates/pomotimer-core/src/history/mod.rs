//! Completed-session history: records, the capped log, persistence port,
//! and the chart/statistics derived from it.

mod aggregate;
mod log;
mod record;
mod store;

pub use aggregate::{daily_counts, summarize, DayCount, HistoryStats, CHART_DAYS};
pub use log::{HistoryLog, HISTORY_CAP};
pub use record::HistoryRecord;
pub use store::{HistoryStore, MemoryStore};
