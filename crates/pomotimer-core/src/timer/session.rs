//! Session controller: the engine wired to its ports.
//!
//! [`SessionTimer`] forwards every user intent to the pure [`TimerEngine`]
//! and turns the resulting [`Event`] into side effects: alerts are
//! scheduled or cancelled through the [`Notifier`], completions are
//! appended to the history and the whole history is written back to the
//! [`HistoryStore`]. Port failures are logged and dropped.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::engine::TimerEngine;
use super::mode::{AlertText, SessionMode};
use super::state::TimerState;
use crate::clock::Clock;
use crate::events::Event;
use crate::history::{daily_counts, summarize, DayCount, HistoryLog, HistoryStats, HistoryStore};
use crate::notify::{Notifier, PermissionStatus};

/// Construction-time settings for a [`SessionTimer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub work_duration_sec: u64,
    pub break_duration_sec: u64,
    pub work_presets: Vec<u32>,
    pub break_presets: Vec<u32>,
    pub alert_text: AlertText,
}

impl TimerSettings {
    pub fn presets_for(&self, mode: SessionMode) -> &[u32] {
        match mode {
            SessionMode::Work => &self.work_presets,
            SessionMode::Break => &self.break_presets,
        }
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration_sec: SessionMode::Work.default_minutes() * 60,
            break_duration_sec: SessionMode::Break.default_minutes() * 60,
            work_presets: SessionMode::Work.default_presets().to_vec(),
            break_presets: SessionMode::Break.default_presets().to_vec(),
            alert_text: AlertText::default(),
        }
    }
}

pub struct SessionTimer {
    engine: TimerEngine,
    settings: TimerSettings,
    clock: Arc<dyn Clock>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn HistoryStore>,
    history: HistoryLog,
    permission: Option<PermissionStatus>,
}

impl SessionTimer {
    /// Fresh idle timer in Work mode. History is loaded from `store`; a
    /// failed load starts from an empty history.
    pub fn new(
        settings: TimerSettings,
        clock: Arc<dyn Clock>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        let engine = TimerEngine::new(settings.work_duration_sec, settings.break_duration_sec);
        Self::with_engine(engine, settings, clock, notifier, store)
    }

    /// Continue from a persisted [`TimerState`].
    pub fn restore(
        state: TimerState,
        settings: TimerSettings,
        clock: Arc<dyn Clock>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        Self::with_engine(TimerEngine::from_state(state), settings, clock, notifier, store)
    }

    fn with_engine(
        engine: TimerEngine,
        settings: TimerSettings,
        clock: Arc<dyn Clock>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        let history = match store.load() {
            Ok(records) => HistoryLog::from_records(records),
            Err(e) => {
                warn!(error = %e, "failed to load history, starting empty");
                HistoryLog::new()
            }
        };
        Self {
            engine,
            settings,
            clock,
            notifier,
            store,
            history,
            permission: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        self.engine.state()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Local calendar date according to the clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// The 7-day chart series ending today.
    pub fn daily_counts(&self) -> Vec<DayCount> {
        daily_counts(self.history.records(), self.today())
    }

    pub fn stats(&self) -> HistoryStats {
        summarize(self.history.records(), self.today())
    }

    pub fn snapshot(&self) -> Event {
        let state = self.engine.state().clone();
        Event::StateSnapshot {
            display: state.display(),
            presets: self.settings.presets_for(state.mode).to_vec(),
            state,
            at: self.clock.now().with_timezone(&Utc),
        }
    }

    /// Ask the notifier for permission once. Returns `Some(Denied)` only the
    /// first time a denial is seen so the caller can tell the user once.
    pub fn request_notification_permission(&mut self) -> Option<PermissionStatus> {
        if self.permission.is_some() {
            return None;
        }
        let status = self.notifier.request_permission();
        self.permission = Some(status);
        if status == PermissionStatus::Denied {
            warn!("notification permission denied, countdown continues without alerts");
            return Some(status);
        }
        None
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start(self.clock.now())?;
        if let Event::TimerStarted { mode, seconds_left, .. } = &event {
            debug!(%mode, seconds_left, "timer started");
            self.schedule_alert(*mode, *seconds_left);
        }
        Some(event)
    }

    pub fn tick(&mut self) -> Option<Event> {
        let event = self.engine.tick(self.clock.now())?;
        self.apply(&event);
        Some(event)
    }

    /// Drift correction after returning to the foreground.
    pub fn resume(&mut self) -> Option<Event> {
        if !self.engine.is_running() {
            return None;
        }
        let event = self.engine.resume(self.clock.now());
        debug!(
            seconds_left = self.engine.seconds_left(),
            completed = event.is_some(),
            "resynced from deadline"
        );
        let event = event?;
        self.apply(&event);
        Some(event)
    }

    /// Schedule the alert for a countdown restored in the running state.
    /// Alerts scheduled by an earlier process are not visible here.
    pub fn rearm_alert(&mut self) {
        if self.engine.is_running() && self.engine.seconds_left() > 0 {
            self.schedule_alert(self.engine.mode(), self.engine.seconds_left());
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause(self.clock.now())?;
        self.apply(&event);
        Some(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset(self.clock.now())?;
        self.apply(&event);
        Some(event)
    }

    pub fn switch_mode(&mut self) -> Option<Event> {
        let event = self.engine.switch_mode(self.clock.now())?;
        self.apply(&event);
        Some(event)
    }

    pub fn apply_preset(&mut self, minutes: u32) -> Option<Event> {
        let event = self.engine.apply_preset(minutes, self.clock.now());
        if event.is_none() {
            debug!(minutes, running = self.engine.is_running(), "preset ignored");
        }
        event
    }

    // ── Side effects ─────────────────────────────────────────────────

    fn apply(&mut self, event: &Event) {
        match event {
            Event::TimerPaused { .. } | Event::TimerReset { .. } | Event::ModeSwitched { .. } => {
                self.cancel_alerts();
            }
            Event::TimerCompleted { record, next_mode, .. } => {
                self.cancel_alerts();
                info!(
                    mode = %record.mode,
                    duration_sec = record.duration_sec,
                    next = %next_mode,
                    "session completed"
                );
                self.history.push(record.clone());
                self.persist_history();
            }
            _ => {}
        }
    }

    fn schedule_alert(&mut self, mode: SessionMode, fire_in_secs: u64) {
        self.cancel_alerts();
        let (title, body) = self.settings.alert_text.for_mode(mode);
        if let Err(e) = self.notifier.schedule(fire_in_secs, title, body) {
            warn!(error = %e, "failed to schedule alert");
        }
    }

    fn cancel_alerts(&mut self) {
        if let Err(e) = self.notifier.cancel_all() {
            warn!(error = %e, "failed to cancel pending alerts");
        }
    }

    fn persist_history(&self) {
        if let Err(e) = self.store.save(self.history.records()) {
            warn!(error = %e, "failed to save history");
        }
    }
}
