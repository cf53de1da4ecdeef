//! TOML-based application configuration.
//!
//! Stores:
//! - Assistant tuning (focus block length, lookback windows)
//! - The seed dataset and project table
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::dataset::Dataset;
use crate::error::{ConfigError, CoreError, Result};

/// Longest lookback window accepted for focus and energy history (one year).
const MAX_LOOKBACK_HOURS: i64 = 24 * 365;

/// Tuning knobs for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantSettings {
    #[serde(default = "default_database_file")]
    pub database_file: String,
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: i64,
    #[serde(default = "default_focus_lookback_hours")]
    pub focus_lookback_hours: i64,
    #[serde(default = "default_energy_lookback_hours")]
    pub energy_lookback_hours: i64,
    #[serde(default = "default_weekly_window_days")]
    pub weekly_window_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantSettings,
    #[serde(default)]
    pub dataset: Dataset,
}

fn default_database_file() -> String {
    "poa.db".into()
}
fn default_focus_minutes() -> i64 {
    90
}
fn default_focus_lookback_hours() -> i64 {
    8
}
fn default_energy_lookback_hours() -> i64 {
    6
}
fn default_weekly_window_days() -> u32 {
    7
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            focus_minutes: default_focus_minutes(),
            focus_lookback_hours: default_focus_lookback_hours(),
            energy_lookback_hours: default_energy_lookback_hours(),
            weekly_window_days: default_weekly_window_days(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assistant: AssistantSettings::default(),
            dataset: Dataset::default(),
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
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".into(),
        };
        let unparsable = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::MissingKey("config key is empty".into()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| unparsable(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| unparsable(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(unparsable(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| unparsable(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of config.toml inside the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Location of the SQLite database file.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(data_dir()?.join(&self.assistant.database_file))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed or is invalid,
    /// or if the default config cannot be written.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "writing default config");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assistant.focus_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "assistant.focus_minutes".into(),
                message: "must be positive".into(),
            });
        }
        for (key, hours) in [
            ("assistant.focus_lookback_hours", self.assistant.focus_lookback_hours),
            ("assistant.energy_lookback_hours", self.assistant.energy_lookback_hours),
        ] {
            if !(1..=MAX_LOOKBACK_HOURS).contains(&hours) {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    message: format!("must be between 1 and {MAX_LOOKBACK_HOURS}"),
                });
            }
        }
        if self.assistant.database_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "assistant.database_file".into(),
                message: "must not be empty".into(),
            });
        }
        self.dataset.validate()
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

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed, or
    /// the resulting config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(CoreError::from)?;
        updated.validate()?;
        *self = updated;
        Ok(())
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
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("[assistant]\nfocus_minutes = 45\n").unwrap();
        assert_eq!(parsed.assistant.focus_minutes, 45);
        assert_eq!(parsed.assistant.energy_lookback_hours, 6);
        assert_eq!(parsed.dataset, Dataset::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("assistant.focus_minutes").as_deref(), Some("90"));
        assert_eq!(
            cfg.get("dataset.projects.ob1.repo").as_deref(),
            Some("github.com/tuouser/ob1")
        );
        assert!(cfg.get("assistant.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("dataset.projects.ob1.breakthrough_probability", "0.5")
            .unwrap();
        assert_eq!(
            cfg.dataset.projects["ob1"].breakthrough_probability,
            0.5
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("assistant.nonexistent_key", "1").is_err());
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("assistant.focus_minutes", "ninety").is_err());
        assert_eq!(cfg.assistant.focus_minutes, 90);
    }

    #[test]
    fn set_rejects_out_of_range_probability() {
        let mut cfg = Config::default();
        let err = cfg
            .set("dataset.projects.ob1.breakthrough_probability", "2")
            .unwrap_err();
        assert!(err.to_string().contains("breakthrough_probability"));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "assistant = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn set_rejects_out_of_range_lookback() {
        let mut cfg = Config::default();
        let err = cfg
            .set("assistant.energy_lookback_hours", "1000000000000000")
            .unwrap_err();
        assert!(err.to_string().contains("energy_lookback_hours"));
        assert!(cfg.set("assistant.focus_lookback_hours", "-5").is_err());
        assert!(cfg.set("assistant.focus_lookback_hours", "0").is_err());
        assert_eq!(cfg, Config::default());

        cfg.set("assistant.focus_lookback_hours", "12").unwrap();
        assert_eq!(cfg.assistant.focus_lookback_hours, 12);
    }

    #[test]
    fn load_from_rejects_out_of_range_lookback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[assistant]\nenergy_lookback_hours = -5\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn save_and_reload_custom_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.dataset.open_loops = vec!["Consider learning Zig".into()];
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.dataset.open_loops, vec!["Consider learning Zig".to_string()]);
    }
}
