//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default work and break durations
//! - Quick-select presets per mode
//! - Tick interval of the foreground loop
//! - Alert toggle and alert wording
//!
//! Configuration is stored at `~/.config/pomotimer/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::timer::{AlertText, SessionMode, TimerSettings};

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_work_presets")]
    pub work_presets: Vec<u32>,
    #[serde(default = "default_break_presets")]
    pub break_presets: Vec<u32>,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_work_title")]
    pub work_title: String,
    #[serde(default = "default_work_body")]
    pub work_body: String,
    #[serde(default = "default_break_title")]
    pub break_title: String,
    #[serde(default = "default_break_body")]
    pub break_body: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotimer/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    SessionMode::Work.default_minutes() as u32
}
fn default_break_minutes() -> u32 {
    SessionMode::Break.default_minutes() as u32
}
fn default_tick_interval_ms() -> u64 {
    250
}
fn default_work_presets() -> Vec<u32> {
    SessionMode::Work.default_presets().to_vec()
}
fn default_break_presets() -> Vec<u32> {
    SessionMode::Break.default_presets().to_vec()
}
fn default_true() -> bool {
    true
}
fn default_work_title() -> String {
    AlertText::default().work_title
}
fn default_work_body() -> String {
    AlertText::default().work_body
}
fn default_break_title() -> String {
    AlertText::default().break_title
}
fn default_break_body() -> String {
    AlertText::default().break_body
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
            work_presets: default_work_presets(),
            break_presets: default_break_presets(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            work_title: default_work_title(),
            work_body: default_work_body(),
            break_title: default_break_title(),
            break_body: default_break_body(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown().into())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without persisting it. Callers save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.timer_settings()?;
        *self = updated;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn alert_text(&self) -> AlertText {
        AlertText {
            work_title: self.notifications.work_title.clone(),
            work_body: self.notifications.work_body.clone(),
            break_title: self.notifications.break_title.clone(),
            break_body: self.notifications.break_body.clone(),
        }
    }

    /// Validated settings for a new session timer.
    ///
    /// # Errors
    ///
    /// Durations, presets and the tick interval must all be positive.
    pub fn timer_settings(&self) -> Result<TimerSettings> {
        let positive = |field: &str, value: u64| -> Result<()> {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".into(),
                }
                .into());
            }
            Ok(())
        };
        positive("timer.work_minutes", self.timer.work_minutes.into())?;
        positive("timer.break_minutes", self.timer.break_minutes.into())?;
        positive("timer.tick_interval_ms", self.timer.tick_interval_ms)?;
        for preset in self.timer.work_presets.iter().chain(&self.timer.break_presets) {
            positive("timer.presets", (*preset).into())?;
        }

        Ok(TimerSettings {
            work_duration_sec: u64::from(self.timer.work_minutes) * 60,
            break_duration_sec: u64::from(self.timer.break_minutes) * 60,
            work_presets: self.timer.work_presets.clone(),
            break_presets: self.timer.break_presets.clone(),
            alert_text: self.alert_text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.work_minutes, 25);
        assert_eq!(parsed.timer.break_presets, vec![5, 10, 15]);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nwork_minutes = 50\n").unwrap();
        assert_eq!(parsed.timer.work_minutes, 50);
        assert_eq!(parsed.timer.break_minutes, 5);
        assert_eq!(parsed.timer.tick_interval_ms, 250);
        assert_eq!(parsed.notifications.break_title, "Break is over");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("timer.work_presets").as_deref(), Some("[15,25,50]"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn update_changes_nested_values() {
        let mut cfg = Config::default();
        cfg.update("timer.break_minutes", "10").unwrap();
        cfg.update("notifications.enabled", "false").unwrap();
        cfg.update("timer.work_presets", "[20, 40]").unwrap();
        cfg.update("notifications.work_title", "Done!").unwrap();
        assert_eq!(cfg.timer.break_minutes, 10);
        assert!(!cfg.notifications.enabled);
        assert_eq!(cfg.timer.work_presets, vec![20, 40]);
        assert_eq!(cfg.alert_text().work_title, "Done!");
    }

    #[test]
    fn update_rejects_unknown_key_and_bad_values() {
        let mut cfg = Config::default();
        assert!(cfg.update("timer.nonexistent", "1").is_err());
        assert!(cfg.update("", "1").is_err());
        assert!(cfg.update("notifications.enabled", "not_a_bool").is_err());
        assert!(cfg.update("timer.work_minutes", "-3").is_err());
        assert!(cfg.update("timer.work_minutes", "0").is_err());
        assert_eq!(cfg.timer.work_minutes, 25);
    }

    #[test]
    fn timer_settings_converts_minutes() {
        let mut cfg = Config::default();
        cfg.timer.work_minutes = 50;
        let settings = cfg.timer_settings().unwrap();
        assert_eq!(settings.work_duration_sec, 3000);
        assert_eq!(settings.break_duration_sec, 300);
        assert_eq!(settings.presets_for(SessionMode::Work), &[15, 25, 50]);
    }

    #[test]
    fn timer_settings_rejects_zero() {
        let mut cfg = Config::default();
        cfg.timer.break_presets = vec![5, 0];
        assert!(cfg.timer_settings().is_err());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.timer.work_minutes, 25);
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.timer.work_minutes = 40;
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.work_minutes, 40);
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [[[").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
