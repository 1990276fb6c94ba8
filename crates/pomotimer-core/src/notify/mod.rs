//! Notification port.
//!
//! The session layer asks a [`Notifier`] to fire an alert when the current
//! countdown is due and to drop pending alerts on pause/reset/completion.
//! Alert delivery is never required for the countdown to be correct.

mod scheduled;

pub use scheduled::{AlertSink, ScheduledNotifier};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque id of a scheduled alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlertHandle(pub u64);

/// What the user sees when an alert fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

pub trait Notifier: Send {
    /// Ask the platform for permission to alert. Defaults to granted.
    fn request_permission(&mut self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    /// Fire an alert `fire_in_secs` from now.
    fn schedule(&mut self, fire_in_secs: u64, title: &str, body: &str) -> Result<AlertHandle>;

    /// Drop every alert that has not fired yet.
    fn cancel_all(&mut self) -> Result<()>;
}

/// Alerts disabled. Scheduling succeeds and does nothing.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier {
    next: u64,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for NullNotifier {
    fn schedule(&mut self, fire_in_secs: u64, title: &str, _body: &str) -> Result<AlertHandle> {
        self.next += 1;
        tracing::debug!(fire_in_secs, title, "alerts disabled, not scheduling");
        Ok(AlertHandle(self.next))
    }

    fn cancel_all(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::NotifyError;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Schedule { fire_in_secs: u64, title: String },
        CancelAll,
    }

    /// Notifier that records every call, optionally failing them.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingNotifier {
        pub calls: Arc<Mutex<Vec<Call>>>,
        pub fail: bool,
        pub deny: bool,
    }

    impl RecordingNotifier {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn schedules(&self) -> Vec<Call> {
            self.calls()
                .into_iter()
                .filter(|c| matches!(c, Call::Schedule { .. }))
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn request_permission(&mut self) -> PermissionStatus {
            if self.deny {
                PermissionStatus::Denied
            } else {
                PermissionStatus::Granted
            }
        }

        fn schedule(&mut self, fire_in_secs: u64, title: &str, _body: &str) -> Result<AlertHandle> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call::Schedule {
                fire_in_secs,
                title: title.to_string(),
            });
            if self.fail {
                return Err(NotifyError::ScheduleFailed("platform refused".into()).into());
            }
            Ok(AlertHandle(calls.len() as u64))
        }

        fn cancel_all(&mut self) -> Result<()> {
            self.calls.lock().unwrap().push(Call::CancelAll);
            if self.fail {
                return Err(NotifyError::ScheduleFailed("platform refused".into()).into());
            }
            Ok(())
        }
    }
}
