use super::database::Database;
use crate::error::Result;
use crate::history::{HistoryRecord, HistoryStore};

/// Fixed kv key of the history blob.
pub const HISTORY_KEY: &str = "pomodoro_history_v1";

/// History persisted as one JSON array in the kv table.
#[derive(Clone)]
pub struct KvHistoryStore {
    db: Database,
}

impl KvHistoryStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl HistoryStore for KvHistoryStore {
    fn load(&self) -> Result<Vec<HistoryRecord>> {
        match self.db.kv_get(HISTORY_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.db.kv_set(HISTORY_KEY, &json)
    }
}
