use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::history::HistoryRecord;
use crate::timer::{SessionMode, TimerState};

/// Every state change of the session timer produces an Event.
/// The presentation layer renders from them; the session layer derives its
/// side effects (alerts, history writes) from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: SessionMode,
        seconds_left: u64,
        end_at_epoch_ms: i64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: SessionMode,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: SessionMode,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: SessionMode,
        to: SessionMode,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    PresetApplied {
        mode: SessionMode,
        minutes: u32,
        seconds_left: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. The next mode is primed but not started.
    TimerCompleted {
        record: HistoryRecord,
        next_mode: SessionMode,
        next_seconds_left: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        display: String,
        presets: Vec<u32>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
