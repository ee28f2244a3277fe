//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Timeline layout and the slow-interval threshold
//! - Display offset and the icon directory
//! - Ledger defaults (commission, default prices)
//! - The default counting user
//!
//! Configuration is stored at `~/.config/kakeibo/config.toml`.

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::ledger::DEFAULT_COMMISSION;
use crate::timeline::{DirectoryIcons, TimelineConfig, TimelineRenderer};

/// How timestamps are shown and where icons come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Minutes east of UTC. Storage is always UTC.
    #[serde(default = "default_utc_offset")]
    pub utc_offset_minutes: i32,
    /// Directory holding `fragment.png`, `core.png` and `wipe.png`.
    #[serde(default)]
    pub icon_dir: Option<String>,
}

/// Ledger defaults. Prices are in 10k G.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_commission")]
    pub commission: f64,
    #[serde(default = "default_cell_cost")]
    pub default_cell_cost: f64,
    #[serde(default = "default_core_price")]
    pub default_core_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_user")]
    pub default_user: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/kakeibo/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timeline: TimelineConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_utc_offset() -> i32 {
    540
}
fn default_commission() -> f64 {
    DEFAULT_COMMISSION
}
fn default_cell_cost() -> f64 {
    7.0
}
fn default_core_price() -> f64 {
    100.0
}
fn default_user() -> String {
    "default".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset(),
            icon_dir: None,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            commission: default_commission(),
            default_cell_cost: default_cell_cost(),
            default_core_price: default_core_price(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

impl DisplayConfig {
    /// The configured offset, or UTC when it is out of range.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
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

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
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

        Err(unknown())
    }

    /// `<data_dir>/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults first if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Like [`Config::load`], against an explicit file.
    ///
    /// # Errors
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
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

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// Same as [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
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

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Renderer wired to the configured layout, offset and icons.
    pub fn renderer(&self) -> TimelineRenderer<DirectoryIcons> {
        let icons = self
            .display
            .icon_dir
            .as_deref()
            .map(DirectoryIcons::load)
            .unwrap_or_default();
        TimelineRenderer::with_icons(self.timeline.clone(), icons).with_offset(self.display.offset())
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
        assert_eq!(parsed.display.utc_offset_minutes, 540);
        assert_eq!(parsed.session.default_user, "default");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[ledger]\ncommission = 0.1\n").unwrap();
        assert_eq!(parsed.ledger.commission, 0.1);
        assert_eq!(parsed.ledger.default_cell_cost, 7.0);
        assert_eq!(parsed.timeline.min_span_min, 5.0);
    }

    #[test]
    fn get_nested_values() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.default_user").as_deref(), Some("default"));
        assert_eq!(cfg.get("display.utc_offset_minutes").as_deref(), Some("540"));
        assert!(cfg.get("display.missing").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_parses_by_existing_type() {
        let mut cfg = Config::default();
        cfg.set_value("timeline.warn_minutes", "3.5").unwrap();
        cfg.set_value("display.utc_offset_minutes", "-300").unwrap();
        cfg.set_value("display.icon_dir", "/tmp/icons").unwrap();
        assert_eq!(cfg.timeline.warn_minutes, 3.5);
        assert_eq!(cfg.display.utc_offset_minutes, -300);
        assert_eq!(cfg.display.icon_dir.as_deref(), Some("/tmp/icons"));
    }

    #[test]
    fn set_value_rejects_bad_input() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("ledger.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("ledger.commission", "abc"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.set_value("ledger.default_core_price", "120").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().ledger.default_core_price, 120.0);
    }

    #[test]
    fn broken_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeline = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn display_offset_in_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.display.offset().local_minus_utc(), 540 * 60);

        let bad = DisplayConfig {
            utc_offset_minutes: 100_000,
            icon_dir: None,
        };
        assert_eq!(bad.offset().local_minus_utc(), 0);
    }
}
