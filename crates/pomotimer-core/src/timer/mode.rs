use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_MINUTES: u64 = 25;
pub const DEFAULT_BREAK_MINUTES: u64 = 5;

/// The kind of countdown currently primed or running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    #[default]
    Work,
    Break,
}

impl SessionMode {
    /// Work <-> Break.
    pub fn flip(self) -> Self {
        match self {
            SessionMode::Work => SessionMode::Break,
            SessionMode::Break => SessionMode::Work,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Work => "work",
            SessionMode::Break => "break",
        }
    }

    pub fn default_minutes(self) -> u64 {
        match self {
            SessionMode::Work => DEFAULT_WORK_MINUTES,
            SessionMode::Break => DEFAULT_BREAK_MINUTES,
        }
    }

    /// Quick-select durations offered for this mode, in minutes.
    pub fn default_presets(self) -> &'static [u32] {
        match self {
            SessionMode::Work => &[15, 25, 50],
            SessionMode::Break => &[5, 10, 15],
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Title and body of the alert fired when a session of a given mode ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertText {
    pub work_title: String,
    pub work_body: String,
    pub break_title: String,
    pub break_body: String,
}

impl AlertText {
    pub fn for_mode(&self, mode: SessionMode) -> (&str, &str) {
        match mode {
            SessionMode::Work => (&self.work_title, &self.work_body),
            SessionMode::Break => (&self.break_title, &self.break_body),
        }
    }
}

impl Default for AlertText {
    fn default() -> Self {
        Self {
            work_title: "Work session finished".into(),
            work_body: "Stand up and stretch for a moment, then come back.".into(),
            break_title: "Break is over".into(),
            break_body: "Time to get back to work.".into(),
        }
    }
}
