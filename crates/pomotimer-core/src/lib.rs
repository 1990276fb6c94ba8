//! # Pomotimer Core Library
//!
//! Core logic for a two-mode (work/break) Pomodoro countdown. The CLI binary
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: A wall-clock deadline state machine. Remaining time is always
//!   recomputed from the absolute end instant, so a suspended process catches
//!   up on its next observation instead of drifting.
//! - **History**: Completed sessions, newest first, capped at 300 entries,
//!   plus a rolling 7-day count for charts.
//! - **Notify**: A port for scheduling one "session finished" alert at the
//!   deadline, independent of whether the process is ticking.
//! - **Storage**: SQLite key-value persistence and TOML configuration.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Pure timer state machine driven by an injected `now`
//! - [`SessionTimer`]: Engine plus clock, notifier and history store
//! - [`TimerDriver`]: Async tick loop and lifecycle resync around a session
//! - [`Database`]: Key-value persistence
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod history;
pub mod notify;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, NotifyError, StorageError, ValidationError};
pub use events::Event;
pub use history::{
    daily_counts, summarize, DayCount, HistoryLog, HistoryRecord, HistoryStats, HistoryStore,
    MemoryStore, CHART_DAYS, HISTORY_CAP,
};
pub use notify::{
    Alert, AlertHandle, AlertSink, Notifier, NullNotifier, PermissionStatus, ScheduledNotifier,
};
pub use storage::{Config, Database, KvHistoryStore};
pub use timer::{
    AppState, SessionMode, SessionTimer, TimerDriver, TimerEngine, TimerSettings, TimerState,
};
