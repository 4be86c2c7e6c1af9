//! TOML-based engine configuration.
//!
//! Stores deployment tunables:
//! - Urgency classification thresholds
//! - Shelf sizes and the Smart7 window size
//! - Scoring weights and the mode-profile switch
//! - Airport clock offset
//!
//! Configuration is stored at `~/.config/layover/config.toml`. All of
//! it is validated once at engine construction; a deployment with a
//! bad table never starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::scoring::ScoreWeights;
use crate::urgency::UrgencyThresholds;

/// Shelf and window sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_core_count")]
    pub core_count: usize,
    #[serde(default = "default_dynamic_count")]
    pub dynamic_count: usize,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Seed for deterministic variety in dynamic picks (unset = off).
    #[serde(default)]
    pub variety_seed: Option<u64>,
}

/// Scoring weight configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// When true, weights follow the urgency-derived mode profile and
    /// `weights` is only the fallback. When false, `weights` always
    /// applies as-is.
    #[serde(default = "default_true")]
    pub mode_profiles: bool,
    #[serde(default)]
    pub weights: ScoreWeights,
}

/// Deployment airport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportConfig {
    /// Offset of the airport's local clock from UTC, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/layover/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub urgency: UrgencyThresholds,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub airport: AirportConfig,
}

// Default functions
fn default_core_count() -> usize {
    4
}
fn default_dynamic_count() -> usize {
    2
}
fn default_window_size() -> usize {
    crate::rotation::DEFAULT_WINDOW_SIZE
}
fn default_true() -> bool {
    true
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            core_count: default_core_count(),
            dynamic_count: default_dynamic_count(),
            window_size: default_window_size(),
            variety_seed: None,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mode_profiles: true,
            weights: ScoreWeights::default(),
        }
    }
}

impl Default for AirportConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            urgency: UrgencyThresholds::default(),
            selection: SelectionConfig::default(),
            scoring: ScoringConfig::default(),
            airport: AirportConfig::default(),
        }
    }
}

impl EngineConfig {
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
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::MissingKey("(empty)".to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: format!("cannot parse '{value}' as bool"),
                        })?,
                    ),
                    serde_json::Value::Number(_) | serde_json::Value::Null => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::MissingKey(key.to_string()))?;
        }

        Err(ConfigError::MissingKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location or return (and write) defaults.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
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

    /// Set a config value by dot-separated key. The caller decides
    /// when to `save`.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Structural validation, run once at engine construction.
    ///
    /// # Errors
    /// Returns the first bad value: non-ascending urgency thresholds,
    /// weights off the unit sum, or a zero shelf/window size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.urgency.validate()?;
        self.scoring.weights.validate()?;
        if self.selection.core_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "selection.core_count".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.selection.window_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "selection.window_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Load from the default location, returning defaults on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
