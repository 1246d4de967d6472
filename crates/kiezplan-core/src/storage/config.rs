//! TOML-based engine configuration.
//!
//! Stores the tunables of the planning engine:
//! - Scoring weights and guardrail multipliers
//! - Schedule limits (buffer, caps, default duration)
//! - Travel-time overrides
//! - User-defined personas
//!
//! Configuration is stored at `~/.config/kiezplan/config.toml`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::persona::{Persona, PresetPersonas};
use crate::scheduler::{ScheduleBuilder, ScheduleLimits};
use crate::scoring::{GuardrailTuning, ScoringEngine, ScoringWeights};
use crate::travel::TravelTimes;

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub weights: ScoringWeights,
    #[serde(default)]
    pub guardrails: GuardrailTuning,
    #[serde(default)]
    pub schedule: ScheduleLimits,
    #[serde(default)]
    pub travel: TravelTimes,
    /// User-defined personas; a key shadows the built-in preset of the same name.
    #[serde(default)]
    pub personas: BTreeMap<String, Persona>,
}

impl Config {
    /// Value at a dotted path such as `schedule.buffer_minutes`.
    fn lookup<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    /// Replace the leaf at a dotted path with `raw`, parsed as the leaf's
    /// current JSON type.
    fn assign(root: &mut serde_json::Value, key: &str, raw: &str) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let parts: Vec<&str> = key.split('.').collect();
        let (leaf, parents) = parts
            .split_last()
            .filter(|_| !key.is_empty())
            .ok_or_else(unknown)?;

        let parent = parents
            .iter()
            .try_fold(root, |node, part| node.get_mut(*part))
            .and_then(serde_json::Value::as_object_mut)
            .ok_or_else(unknown)?;
        let slot = parent.get_mut(*leaf).ok_or_else(unknown)?;

        *slot = coerce(slot, raw).map_err(|message| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        })?;
        Ok(())
    }

    /// Default config file location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
            Ok(cfg)
        }
    }

    /// Load and validate a config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let cfg: Config = toml::from_str(&content).map_err(|e| load_failed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
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
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::lookup(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory.
    ///
    /// The new value must parse as the type of the existing one and the
    /// resulting config must validate; otherwise `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::assign(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check every tunable is within its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        self.weights.validate().map_err(|m| invalid("weights", m))?;
        self.guardrails.validate().map_err(|m| invalid("guardrails", m))?;
        self.schedule.validate().map_err(|m| invalid("schedule", m))?;
        for (key, persona) in &self.personas {
            persona
                .validate()
                .map_err(|e| invalid(&format!("personas.{key}"), e.to_string()))?;
        }
        Ok(())
    }

    /// Scoring engine with the configured weights and guardrails.
    pub fn scoring_engine(&self) -> ScoringEngine {
        ScoringEngine::with_tuning(self.weights, self.guardrails)
    }

    /// Schedule builder with the configured engine and limits.
    pub fn schedule_builder(&self) -> ScheduleBuilder {
        ScheduleBuilder::new()
            .with_engine(self.scoring_engine())
            .with_limits(self.schedule)
    }

    /// Built-in presets plus the personas defined in this config.
    pub fn persona_repository(&self) -> PresetPersonas {
        PresetPersonas::builtin().extend(&self.personas)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

/// Parse `raw` into the JSON type of `existing`.
fn coerce(existing: &serde_json::Value, raw: &str) -> Result<serde_json::Value, String> {
    use serde_json::Value;

    match existing {
        Value::Bool(_) => raw.parse::<bool>().map(Value::Bool).map_err(|e| e.to_string()),
        Value::Number(_) => {
            let number = match raw.parse::<u64>() {
                Ok(n) => Some(n.into()),
                Err(_) => raw.parse::<f64>().ok().and_then(serde_json::Number::from_f64),
            };
            number
                .map(Value::Number)
                .ok_or_else(|| format!("cannot parse '{raw}' as number"))
        }
        Value::Object(_) | Value::Array(_) => serde_json::from_str(raw).map_err(|e| e.to_string()),
        Value::String(_) | Value::Null => Ok(Value::String(raw.to_string())),
    }
}
