//! Async driver around a [`SessionTimer`].
//!
//! Owns the periodic tick task (at most one at a time), the lifecycle
//! subscription that triggers drift correction when the app returns to the
//! foreground, and a broadcast channel of [`Event`]s for the presentation
//! layer. All timer access is serialized behind one mutex, so a tick and a
//! resume racing on the same zero crossing complete the session once.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use super::lifecycle::{AppState, LifecycleTracker};
use super::session::SessionTimer;
use crate::events::Event;
use crate::notify::PermissionStatus;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(250);

const EVENT_CAPACITY: usize = 64;

pub struct TimerDriver {
    timer: Arc<Mutex<SessionTimer>>,
    events: broadcast::Sender<Event>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    lifecycle: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
}

impl TimerDriver {
    pub fn new(timer: SessionTimer, tick_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            timer: Arc::new(Mutex::new(timer)),
            events,
            ticker: Mutex::new(None),
            lifecycle: Mutex::new(None),
            tick_interval,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Shared handle for read access (history, stats).
    pub fn timer(&self) -> Arc<Mutex<SessionTimer>> {
        self.timer.clone()
    }

    pub async fn snapshot(&self) -> Event {
        self.timer.lock().await.snapshot()
    }

    pub async fn request_notification_permission(&self) -> Option<PermissionStatus> {
        self.timer.lock().await.request_notification_permission()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub async fn start(&self) -> Option<Event> {
        let event = self.timer.lock().await.start()?;
        self.spawn_ticker().await;
        self.publish(&event);
        Some(event)
    }

    pub async fn pause(&self) -> Option<Event> {
        self.cancel_ticker().await;
        let event = self.timer.lock().await.pause()?;
        self.publish(&event);
        Some(event)
    }

    pub async fn reset(&self) -> Option<Event> {
        self.cancel_ticker().await;
        let event = self.timer.lock().await.reset()?;
        self.publish(&event);
        Some(event)
    }

    pub async fn switch_mode(&self) -> Option<Event> {
        self.cancel_ticker().await;
        let event = self.timer.lock().await.switch_mode()?;
        self.publish(&event);
        Some(event)
    }

    /// Catch up with the deadline of a restored countdown and keep it
    /// ticking with its alert armed. Idle timers are left alone.
    pub async fn resume(&self) -> Option<Event> {
        let (completed, running) = {
            let mut guard = self.timer.lock().await;
            let completed = guard.resume();
            if guard.is_running() {
                guard.rearm_alert();
            }
            (completed, guard.is_running())
        };
        if running {
            self.spawn_ticker().await;
        }
        if let Some(event) = &completed {
            self.publish(event);
        }
        completed
    }

    pub async fn apply_preset(&self, minutes: u32) -> Option<Event> {
        let event = self.timer.lock().await.apply_preset(minutes)?;
        self.publish(&event);
        Some(event)
    }

    /// Subscribe to foreground/background transitions. Replaces any earlier
    /// subscription.
    pub async fn attach_lifecycle(&self, mut signal: watch::Receiver<AppState>) {
        let timer = self.timer.clone();
        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            let mut tracker = LifecycleTracker::new(*signal.borrow_and_update());
            while signal.changed().await.is_ok() {
                let next = *signal.borrow_and_update();
                if !tracker.observe(next) {
                    continue;
                }
                let mut guard = timer.lock().await;
                if !guard.is_running() {
                    continue;
                }
                let completed = guard.resume();
                let snapshot = guard.snapshot();
                drop(guard);
                if let Some(event) = completed {
                    let _ = events.send(event);
                }
                let _ = events.send(snapshot);
            }
            debug!("lifecycle signal closed");
        });

        if let Some(previous) = self.lifecycle.lock().await.replace(handle) {
            previous.abort();
        }
    }

    /// Stop ticking and drop the lifecycle subscription. Pending alerts are
    /// left to the notifier.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        if let Some(handle) = self.lifecycle.lock().await.take() {
            handle.abort();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn publish(&self, event: &Event) {
        // No receivers is fine.
        let _ = self.events.send(event.clone());
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let timer = self.timer.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_seconds = None;
            loop {
                interval.tick().await;

                let (completed, snapshot) = {
                    let mut guard = timer.lock().await;
                    if !guard.is_running() {
                        break;
                    }
                    let completed = guard.tick();
                    let seconds = guard.state().seconds_left;
                    let snapshot = if completed.is_none() && last_seconds != Some(seconds) {
                        last_seconds = Some(seconds);
                        Some(guard.snapshot())
                    } else {
                        None
                    };
                    (completed, snapshot)
                };

                if let Some(snapshot) = snapshot {
                    let _ = events.send(snapshot);
                }
                if let Some(event) = completed {
                    let _ = events.send(event);
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
        if let Some(handle) = self.lifecycle.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::history::{HistoryStore, MemoryStore};
    use crate::notify::testing::RecordingNotifier;
    use crate::timer::{SessionMode, TimerSettings, TimerState};

    fn driver(clock: &ManualClock, store: &MemoryStore) -> TimerDriver {
        let timer = SessionTimer::new(
            TimerSettings {
                work_duration_sec: 60,
                break_duration_sec: 30,
                ..TimerSettings::default()
            },
            Arc::new(clock.clone()),
            Box::new(RecordingNotifier::default()),
            Box::new(store.clone()),
        );
        TimerDriver::new(timer, DEFAULT_TICK_INTERVAL)
    }

    async fn settle() {
        // Let the tick task observe the clock a few times.
        time::sleep(Duration::from_secs(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_completes_session() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);
        let mut events = driver.subscribe();

        assert!(driver.start().await.is_some());
        clock.advance_secs(60);
        settle().await;

        let timer = driver.timer();
        let guard = timer.lock().await;
        assert!(!guard.is_running());
        assert_eq!(guard.state().mode, SessionMode::Break);
        drop(guard);
        assert_eq!(store.load().unwrap().len(), 1);

        let mut completions = 0;
        while let Ok(event) = events.try_recv() {
            if event.is_completion() {
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_single_ticker() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);

        driver.start().await;
        assert!(driver.start().await.is_none());
        driver.pause().await;
        driver.start().await;
        clock.advance_secs(61);
        settle().await;
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);

        driver.start().await;
        clock.advance_secs(20);
        settle().await;
        driver.pause().await;
        clock.advance_secs(600);
        settle().await;

        let timer = driver.timer();
        let guard = timer.lock().await;
        assert!(!guard.is_running());
        assert_eq!(guard.state().seconds_left, 40);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn foreground_return_resyncs_suspended_timer() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);
        let (tx, rx) = watch::channel(AppState::Active);
        driver.attach_lifecycle(rx).await;
        let mut events = driver.subscribe();

        // Started without a tick task, as if the process was suspended.
        driver.timer().lock().await.start();
        tx.send(AppState::Background).unwrap();
        settle().await;
        clock.advance_secs(3600);
        tx.send(AppState::Active).unwrap();
        settle().await;

        assert_eq!(store.load().unwrap().len(), 1);
        let timer = driver.timer();
        assert_eq!(timer.lock().await.state().mode, SessionMode::Break);
        assert!(events.try_recv().unwrap().is_completion());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_and_resume_racing_complete_once() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);
        let (tx, rx) = watch::channel(AppState::Active);
        driver.attach_lifecycle(rx).await;

        driver.start().await;
        tx.send(AppState::Inactive).unwrap();
        settle().await;
        clock.advance_secs(60);
        tx.send(AppState::Active).unwrap();
        settle().await;

        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resume_restarts_ticker_for_running_timer() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);

        // Running state with no tick task, as after a restart.
        driver.timer().lock().await.start();
        clock.advance_secs(30);
        assert!(driver.resume().await.is_none());
        clock.advance_secs(30);
        settle().await;

        assert_eq!(store.load().unwrap().len(), 1);
        assert!(!driver.timer().lock().await.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn resume_while_idle_spawns_nothing() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);

        assert!(driver.resume().await.is_none());
        clock.advance_secs(600);
        settle().await;
        assert_eq!(driver.timer().lock().await.state().seconds_left, 60);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn restored_running_state_without_deadline_stays_idle() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let state = TimerState {
            is_running: true,
            seconds_left: 45,
            end_at_epoch_ms: None,
            ..TimerState::new(60, 30)
        };
        let timer = SessionTimer::restore(
            state,
            TimerSettings::default(),
            Arc::new(clock.clone()),
            Box::new(RecordingNotifier::default()),
            Box::new(store.clone()),
        );
        let driver = TimerDriver::new(timer, DEFAULT_TICK_INTERVAL);

        assert!(driver.resume().await.is_none());
        assert!(!driver.timer().lock().await.is_running());

        // A fresh start counts down the kept remainder.
        assert!(driver.start().await.is_some());
        clock.advance_secs(45);
        settle().await;
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_detaches_lifecycle() {
        let clock = ManualClock::new(1_700_000_000_000);
        let store = MemoryStore::new();
        let driver = driver(&clock, &store);
        let (tx, rx) = watch::channel(AppState::Active);
        driver.attach_lifecycle(rx).await;

        driver.start().await;
        driver.shutdown().await;
        let _ = tx.send(AppState::Background);
        settle().await;
        clock.advance_secs(3600);
        let _ = tx.send(AppState::Active);
        settle().await;

        assert!(store.load().unwrap().is_empty());
        let timer = driver.timer();
        assert!(timer.lock().await.is_running());
    }
}
