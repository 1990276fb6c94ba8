use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SessionMode;

/// One naturally completed session. Never mutated after creation.
///
/// Stored with camelCase field names (`durationSec`, `endedAtISO`, `dayKey`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub mode: SessionMode,
    #[serde(rename = "durationSec")]
    pub duration_sec: u64,
    #[serde(rename = "endedAtISO")]
    pub completed_at: DateTime<Utc>,
    /// Local calendar date of completion.
    #[serde(rename = "dayKey")]
    pub day_key: NaiveDate,
}

impl HistoryRecord {
    /// Build the record for a session of `mode` that finished at
    /// `completed_at` (local time, which decides the day bucket).
    pub fn new(mode: SessionMode, duration_sec: u64, completed_at: DateTime<FixedOffset>) -> Self {
        let utc = completed_at.with_timezone(&Utc);
        let id = format!(
            "{}_{}",
            utc.to_rfc3339_opts(SecondsFormat::Millis, true),
            mode.as_str()
        );
        Self {
            id,
            mode,
            duration_sec,
            completed_at: utc,
            day_key: completed_at.date_naive(),
        }
    }

    pub fn duration_min(&self) -> u64 {
        (self.duration_sec + 30) / 60
    }
}
