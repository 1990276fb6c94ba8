use serde::{Deserialize, Serialize};

/// Foreground state reported by the host runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

impl AppState {
    pub fn is_away(self) -> bool {
        matches!(self, AppState::Inactive | AppState::Background)
    }
}

/// Remembers the previous [`AppState`] and reports returns to the foreground.
#[derive(Debug, Clone)]
pub struct LifecycleTracker {
    current: AppState,
}

impl LifecycleTracker {
    pub fn new(initial: AppState) -> Self {
        Self { current: initial }
    }

    pub fn current(&self) -> AppState {
        self.current
    }

    /// Record `next`; true when this is a transition from inactive or
    /// background into active.
    pub fn observe(&mut self, next: AppState) -> bool {
        let returned = self.current.is_away() && next == AppState::Active;
        self.current = next;
        returned
    }
}
