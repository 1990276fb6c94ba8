use super::record::HistoryRecord;

/// Maximum number of records retained; older ones are dropped silently.
pub const HISTORY_CAP: usize = 300;

/// Completed sessions, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryLog {
    records: Vec<HistoryRecord>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a loaded sequence. It is assumed newest first already; anything
    /// beyond the cap is trimmed.
    pub fn from_records(mut records: Vec<HistoryRecord>) -> Self {
        records.truncate(HISTORY_CAP);
        Self { records }
    }

    /// Prepend `record`, evicting the oldest entry past the cap.
    pub fn push(&mut self, record: HistoryRecord) {
        self.records.insert(0, record);
        self.records.truncate(HISTORY_CAP);
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn recent(&self, limit: usize) -> &[HistoryRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
