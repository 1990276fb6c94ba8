//! Clock port.
//!
//! The timer never measures elapsed time itself; it asks a [`Clock`] for the
//! current instant and derives everything from the absolute deadline.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// The current instant, expressed in the user's local offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Device clock in the system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A settable clock. Clones share the same instant, so a test (or a
/// simulation) can keep a handle and advance time under a running timer.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch_ms: Arc<AtomicI64>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Clock fixed at `epoch_ms`, in UTC.
    pub fn new(epoch_ms: i64) -> Self {
        Self::with_offset(epoch_ms, Utc.fix())
    }

    pub fn with_offset(epoch_ms: i64, offset: FixedOffset) -> Self {
        Self {
            epoch_ms: Arc::new(AtomicI64::new(epoch_ms)),
            offset,
        }
    }

    /// Clock fixed at the given UTC instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::new(instant.timestamp_millis())
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.epoch_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance_ms(secs * 1000);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let ms = self.epoch_ms.load(Ordering::SeqCst);
        self.offset
            .timestamp_millis_opt(ms)
            .single()
            .unwrap_or_else(|| Utc::now().with_timezone(&self.offset))
    }

    fn now_ms(&self) -> i64 {
        self.epoch_ms.load(Ordering::SeqCst)
    }
}
