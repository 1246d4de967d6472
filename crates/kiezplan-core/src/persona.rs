//! Personas and the repository they are resolved from.
//!
//! A persona is a named bundle of interest weights, crowd preferences and
//! hard constraints. The engine never consults a global registry: callers
//! resolve a persona through a [`PersonaRepository`] and pass it in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::event::{clock, CrowdVector};
use crate::error::ValidationError;

/// A user archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub home_base_districts: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeMap<String, f64>,
    #[serde(default)]
    pub crowd_preferences: CrowdVector,
    #[serde(default)]
    pub constraint_budget_max: Option<f64>,
    #[serde(default, with = "clock::option")]
    pub constraint_earliest_start: Option<NaiveTime>,
    #[serde(default, with = "clock::option")]
    pub constraint_latest_start: Option<NaiveTime>,
    #[serde(default)]
    pub constraint_district_strict: bool,
    #[serde(default)]
    pub hard_nopes: BTreeSet<String>,
}

impl Persona {
    /// The "Custom" persona: no preferences and no constraints.
    ///
    /// Used whenever a persona key cannot be resolved.
    pub fn neutral() -> Self {
        Self {
            id: "preset-custom".to_string(),
            name: "Custom".to_string(),
            home_base_districts: BTreeSet::new(),
            interests: BTreeMap::new(),
            crowd_preferences: CrowdVector::new(),
            constraint_budget_max: None,
            constraint_earliest_start: None,
            constraint_latest_start: None,
            constraint_district_strict: false,
            hard_nopes: BTreeSet::new(),
        }
    }

    /// Interest weight for a category, 0 when absent.
    pub fn interest(&self, category: &str) -> f64 {
        self.interests.get(category).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (category, weight) in &self.interests {
            ValidationError::unit_range(format!("interests.{category}"), *weight)?;
        }
        for (segment, weight) in &self.crowd_preferences {
            ValidationError::unit_range(format!("crowdPreferences.{segment}"), *weight)?;
        }
        if let (Some(earliest), Some(latest)) =
            (self.constraint_earliest_start, self.constraint_latest_start)
        {
            if earliest > latest {
                return Err(ValidationError::InvalidStartWindow { earliest, latest });
            }
        }
        if let Some(budget) = self.constraint_budget_max {
            if !(budget >= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: "constraintBudgetMax".to_string(),
                    message: format!("must be a non-negative number, got {budget}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Lookup of personas by key.
pub trait PersonaRepository {
    /// Persona registered under `key`, if any.
    fn get(&self, key: &str) -> Option<Persona>;

    /// All registered keys, sorted.
    fn keys(&self) -> Vec<String>;

    /// Persona for `key`, falling back to [`Persona::neutral`].
    fn resolve(&self, key: &str) -> Persona {
        self.get(key).unwrap_or_else(Persona::neutral)
    }
}

/// A persona preset with a short description for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaPreset {
    pub key: String,
    pub description: String,
    pub persona: Persona,
}

/// Built-in presets plus any user-defined personas.
#[derive(Debug, Clone)]
pub struct PresetPersonas {
    presets: BTreeMap<String, PersonaPreset>,
}

impl PresetPersonas {
    /// Repository holding the four built-in presets.
    pub fn builtin() -> Self {
        let presets = builtin_presets()
            .into_iter()
            .map(|preset| (preset.key.clone(), preset))
            .collect();
        Self { presets }
    }

    /// Register (or replace) a persona under `key`.
    pub fn with_persona(mut self, key: impl Into<String>, persona: Persona) -> Self {
        let key = key.into();
        let preset = PersonaPreset {
            key: key.clone(),
            description: format!("User-defined persona '{}'", persona.name),
            persona,
        };
        self.presets.insert(key, preset);
        self
    }

    /// Register every persona in `personas`, keyed by map key.
    pub fn extend(mut self, personas: &BTreeMap<String, Persona>) -> Self {
        for (key, persona) in personas {
            self = self.with_persona(key.clone(), persona.clone());
        }
        self
    }

    pub fn preset(&self, key: &str) -> Option<&PersonaPreset> {
        self.presets.get(key)
    }

    pub fn presets(&self) -> impl Iterator<Item = &PersonaPreset> {
        self.presets.values()
    }
}

impl Default for PresetPersonas {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PersonaRepository for PresetPersonas {
    fn get(&self, key: &str) -> Option<Persona> {
        self.presets.get(key).map(|preset| preset.persona.clone())
    }

    fn keys(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }
}

// ============================================================================
// BUILT-IN PRESETS
// ============================================================================

fn builtin_presets() -> Vec<PersonaPreset> {
    vec![founder(), creative(), explorer(), nightlife()]
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weights(items: &[(&str, f64)]) -> BTreeMap<String, f64> {
    items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Founder / Builder
///
/// Tech and community heavy, wants founder and investor crowds.
fn founder() -> PersonaPreset {
    PersonaPreset {
        key: "founder".to_string(),
        description: indoc::indoc! {"
            Builders who treat the city as a network. Strong pull towards
            tech meetups and community formats with founders and investors
            in the room. Lives around Mitte and Kreuzberg.
        "}
        .to_string(),
        persona: Persona {
            id: "preset-founder".to_string(),
            name: "Founder / Builder".to_string(),
            home_base_districts: set(&["Mitte", "Kreuzberg"]),
            interests: weights(&[("tech", 0.9), ("community", 0.7), ("art", 0.3), ("workshop", 0.4)]),
            crowd_preferences: weights(&[("founders", 0.9), ("investors", 0.7), ("artists", 0.2)]),
            ..Persona::neutral()
        },
    }
}

/// Creative / Artist
fn creative() -> PersonaPreset {
    PersonaPreset {
        key: "creative".to_string(),
        description: indoc::indoc! {"
            Artists and makers. Galleries, live music and film first,
            workshops and clubs when the mood fits. Based in Kreuzberg,
            Neukölln and Wedding.
        "}
        .to_string(),
        persona: Persona {
            id: "preset-creative".to_string(),
            name: "Creative / Artist".to_string(),
            home_base_districts: set(&["Kreuzberg", "Neukölln", "Wedding"]),
            interests: weights(&[
                ("art", 0.9),
                ("music", 0.8),
                ("film", 0.6),
                ("workshop", 0.5),
                ("club", 0.4),
            ]),
            crowd_preferences: weights(&[("artists", 0.9), ("founders", 0.2)]),
            ..Persona::neutral()
        },
    }
}

/// Culture Explorer
///
/// The only preset with a budget cap and a latest start.
fn explorer() -> PersonaPreset {
    PersonaPreset {
        key: "explorer".to_string(),
        description: indoc::indoc! {"
            Curious visitors and locals sampling the cultural programme.
            Broad interests, a 40 EUR budget cap and nothing that starts
            after 23:00.
        "}
        .to_string(),
        persona: Persona {
            id: "preset-explorer".to_string(),
            name: "Culture Explorer".to_string(),
            home_base_districts: set(&["Mitte", "Charlottenburg", "Prenzlauer Berg"]),
            interests: weights(&[
                ("art", 0.8),
                ("music", 0.7),
                ("film", 0.7),
                ("community", 0.6),
                ("other", 0.5),
            ]),
            crowd_preferences: weights(&[("artists", 0.6), ("tourists", 0.3)]),
            constraint_budget_max: Some(40.0),
            constraint_latest_start: NaiveTime::from_hms_opt(23, 0, 0),
            ..Persona::neutral()
        },
    }
}

/// Nightlife / Party
fn nightlife() -> PersonaPreset {
    PersonaPreset {
        key: "nightlife".to_string(),
        description: indoc::indoc! {"
            Club and live-music crowd. Nothing before 16:00; the day starts
            in Kreuzberg, Friedrichshain or Neukölln.
        "}
        .to_string(),
        persona: Persona {
            id: "preset-nightlife".to_string(),
            name: "Nightlife / Party".to_string(),
            home_base_districts: set(&["Kreuzberg", "Friedrichshain", "Neukölln"]),
            interests: weights(&[("club", 0.9), ("music", 0.8), ("other", 0.4), ("community", 0.3)]),
            crowd_preferences: weights(&[("artists", 0.5)]),
            constraint_earliest_start: NaiveTime::from_hms_opt(16, 0, 0),
            ..Persona::neutral()
        },
    }
}
