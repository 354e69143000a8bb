//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Pomodoro durations and the long-break cycle
//! - Telegram notification settings and per-event switches
//!
//! Configuration is stored at `~/.config/tomatask/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::PomodoroConfig;

/// Shown in place of secret values when listing the configuration.
pub const SECRET_MASK: &str = "********";

/// Pomodoro durations in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_pomodoros_until_long_break")]
    pub pomodoros_until_long_break: u32,
}

/// Events that may trigger a Telegram message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvents {
    #[serde(default = "default_true")]
    pub task_completed: bool,
    #[serde(default = "default_true")]
    pub task_tomorrow: bool,
    #[serde(default = "default_true")]
    pub task_today: bool,
    #[serde(default = "default_true")]
    pub task_overdue: bool,
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    /// Name used in the greeting of test messages.
    #[serde(default)]
    pub first_name: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Run the daily deadline check once when the CLI starts.
    #[serde(default)]
    pub check_on_start: bool,
    #[serde(default)]
    pub events: NotificationEvents,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomatask/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pomodoro: PomodoroSettings,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

// Default functions
fn default_work_minutes() -> u32 {
    25
}
fn default_short_break_minutes() -> u32 {
    5
}
fn default_long_break_minutes() -> u32 {
    15
}
fn default_pomodoros_until_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}
fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            pomodoros_until_long_break: default_pomodoros_until_long_break(),
        }
    }
}

impl Default for NotificationEvents {
    fn default() -> Self {
        Self {
            task_completed: true,
            task_tomorrow: true,
            task_today: true,
            task_overdue: true,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            chat_id: String::new(),
            first_name: String::new(),
            api_base: default_api_base(),
            check_on_start: false,
            events: NotificationEvents::default(),
        }
    }
}

impl PomodoroSettings {
    /// Timer configuration for sessions started from now on.
    pub fn to_timer_config(&self) -> PomodoroConfig {
        let minutes = |m: u32| Duration::from_secs(u64::from(m) * 60);
        PomodoroConfig {
            work: minutes(self.work_minutes),
            short_break: minutes(self.short_break_minutes),
            long_break: minutes(self.long_break_minutes),
            pomodoros_until_long_break: self.pomodoros_until_long_break,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("pomodoro.work_minutes", self.work_minutes),
            ("pomodoro.short_break_minutes", self.short_break_minutes),
            ("pomodoro.long_break_minutes", self.long_break_minutes),
            ("pomodoro.pomodoros_until_long_break", self.pomodoros_until_long_break),
        ];
        match fields.iter().find(|(_, v)| *v == 0) {
            Some((key, _)) => Err(ConfigError::InvalidValue {
                key: (*key).to_string(),
                message: "must be at least 1".into(),
            }),
            None => Ok(()),
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        if key.is_empty() {
            return Err(unknown());
        }

        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|_| invalid(format!("cannot parse '{value}' as true/false")))?,
                serde_json::Value::Number(_) => value
                    .parse::<u32>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot assign a whole section".into()));
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.pomodoro.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_err = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_err(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_err(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_err(e.to_string()))?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key. The new value keeps the type of the
    /// old one. Nothing changes when the key or value is rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.pomodoro.validate()?;
        *self = updated;
        Ok(())
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Config {
        let mut shown = self.clone();
        if !shown.telegram.bot_token.is_empty() {
            shown.telegram.bot_token = SECRET_MASK.to_string();
        }
        shown
    }

    /// All leaf keys with their current values, sorted by key. Secrets are
    /// masked.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let key = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&key, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self.redacted()) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Timer configuration derived from the `[pomodoro]` section.
    pub fn timer(&self) -> PomodoroConfig {
        self.pomodoro.to_timer_config()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.pomodoro.work_minutes, 25);
        assert_eq!(cfg.pomodoro.short_break_minutes, 5);
        assert_eq!(cfg.pomodoro.long_break_minutes, 15);
        assert_eq!(cfg.pomodoro.pomodoros_until_long_break, 4);
        assert!(!cfg.telegram.enabled);
        assert!(cfg.telegram.events.task_overdue);
        assert_eq!(cfg.telegram.api_base, "https://api.telegram.org");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[pomodoro]\nwork_minutes = 50\n").unwrap();
        assert_eq!(cfg.pomodoro.work_minutes, 50);
        assert_eq!(cfg.pomodoro.short_break_minutes, 5);
        assert_eq!(cfg.telegram, TelegramConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("pomodoro.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("telegram.events.task_today").as_deref(), Some("true"));
        assert_eq!(cfg.get("telegram.bot_token").as_deref(), Some(""));
        assert!(cfg.get("pomodoro.missing").is_none());
        assert!(cfg.get("telegram").is_none());
    }

    #[test]
    fn set_keeps_value_types() {
        let mut cfg = Config::default();
        cfg.set("pomodoro.work_minutes", "50").unwrap();
        cfg.set("telegram.enabled", "true").unwrap();
        cfg.set("telegram.chat_id", "12345").unwrap();
        assert_eq!(cfg.pomodoro.work_minutes, 50);
        assert!(cfg.telegram.enabled);
        assert_eq!(cfg.telegram.chat_id, "12345");
        assert_eq!(cfg.timer().work, Duration::from_secs(50 * 60));
    }

    #[test]
    fn set_rejects_bad_input_without_change() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("pomodoro.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("telegram.enabled", "yes"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("pomodoro.long_break_minutes", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("pomodoro", "3").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("telegram.bot_token", "123:abc").unwrap();
        cfg.set("pomodoro.pomodoros_until_long_break", "3").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_rejects_zero_durations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pomodoro]\nshort_break_minutes = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn listing_masks_bot_token() {
        let mut config = Config::default();
        config.set("telegram.bot_token", "123456:SECRET").unwrap();

        let entries = config.entries();
        let token = entries
            .iter()
            .find(|(k, _)| k == "telegram.bot_token")
            .map(|(_, v)| v.as_str());
        assert_eq!(token, Some(SECRET_MASK));
        assert!(entries.iter().all(|(_, v)| !v.contains("SECRET")));
        assert_eq!(config.redacted().telegram.bot_token, SECRET_MASK);
        assert_eq!(config.get("telegram.bot_token").as_deref(), Some("123456:SECRET"));

        assert_eq!(Config::default().redacted().telegram.bot_token, "");
    }

    #[test]
    fn entries_lists_every_leaf() {
        let keys: Vec<String> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"pomodoro.work_minutes".to_string()));
        assert!(keys.contains(&"telegram.events.task_completed".to_string()));
        assert!(!keys.contains(&"telegram.events".to_string()));
    }
}
