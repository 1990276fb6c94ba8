use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{Alert, AlertHandle, Notifier, PermissionStatus};
use crate::error::{NotifyError, Result};

/// Receives alerts when they come due.
pub type AlertSink = Arc<dyn Fn(Alert) + Send + Sync>;

/// Delivers alerts from tokio timers inside the current process.
///
/// Must be used from within a tokio runtime; scheduling outside one fails
/// with [`NotifyError::NoRuntime`].
pub struct ScheduledNotifier {
    sink: AlertSink,
    pending: Vec<JoinHandle<()>>,
    next: u64,
    permission: PermissionStatus,
}

impl ScheduledNotifier {
    pub fn new(sink: AlertSink) -> Self {
        Self {
            sink,
            pending: Vec::new(),
            next: 0,
            permission: PermissionStatus::Granted,
        }
    }

    /// Start with a denied permission, as when the user turned alerts off.
    pub fn denied(sink: AlertSink) -> Self {
        let mut notifier = Self::new(sink);
        notifier.permission = PermissionStatus::Denied;
        notifier
    }

    /// Alerts scheduled and not yet fired or cancelled.
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|h| !h.is_finished()).count()
    }
}

impl Notifier for ScheduledNotifier {
    fn request_permission(&mut self) -> PermissionStatus {
        self.permission
    }

    fn schedule(&mut self, fire_in_secs: u64, title: &str, body: &str) -> Result<AlertHandle> {
        if self.permission == PermissionStatus::Denied {
            return Err(NotifyError::PermissionDenied.into());
        }
        let runtime = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;

        self.pending.retain(|h| !h.is_finished());
        self.next += 1;
        let alert = Alert {
            title: title.to_string(),
            body: body.to_string(),
        };
        let sink = self.sink.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(Duration::from_secs(fire_in_secs)).await;
            sink(alert);
        });
        self.pending.push(handle);
        Ok(AlertHandle(self.next))
    }

    fn cancel_all(&mut self) -> Result<()> {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
        Ok(())
    }
}

impl Drop for ScheduledNotifier {
    fn drop(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn collecting_sink() -> (AlertSink, Arc<Mutex<Vec<Alert>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let inner = seen.clone();
        let sink: AlertSink = Arc::new(move |alert| inner.lock().unwrap().push(alert));
        (sink, seen)
    }

    #[tokio::test(start_paused = true)]
    async fn alert_fires_after_delay() {
        let (sink, seen) = collecting_sink();
        let mut notifier = ScheduledNotifier::new(sink);
        notifier.schedule(60, "done", "body").unwrap();

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let alerts = seen.lock().unwrap().clone();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "done");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_prevents_delivery() {
        let (sink, seen) = collecting_sink();
        let mut notifier = ScheduledNotifier::new(sink);
        notifier.schedule(10, "a", "").unwrap();
        notifier.schedule(20, "b", "").unwrap();
        assert_eq!(notifier.pending(), 2);

        notifier.cancel_all().unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(notifier.pending(), 0);
    }

    #[test]
    fn scheduling_without_runtime_fails() {
        let (sink, _) = collecting_sink();
        let mut notifier = ScheduledNotifier::new(sink);
        let err = notifier.schedule(1, "x", "y").unwrap_err();
        assert!(err.to_string().contains("No async runtime"));
    }

    #[tokio::test]
    async fn denied_permission_rejects_schedule() {
        let (sink, _) = collecting_sink();
        let mut notifier = ScheduledNotifier::denied(sink);
        assert_eq!(notifier.request_permission(), PermissionStatus::Denied);
        assert!(notifier.schedule(1, "x", "y").is_err());
    }
}
