use std::sync::{Arc, Mutex};

use super::record::HistoryRecord;
use crate::error::{Result, StorageError};

/// Durable home for the completed-session history.
///
/// Writes always replace the whole collection.
pub trait HistoryStore: Send {
    /// Every stored record, newest first. Empty when nothing was saved yet.
    fn load(&self) -> Result<Vec<HistoryRecord>>;

    fn save(&self, records: &[HistoryRecord]) -> Result<()>;
}

/// In-process store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<HistoryRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<HistoryRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<HistoryRecord>> {
        let guard = self.records.lock().map_err(|_| StorageError::Locked)?;
        Ok(guard.clone())
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<()> {
        let mut guard = self.records.lock().map_err(|_| StorageError::Locked)?;
        *guard = records.to_vec();
        Ok(())
    }
}
