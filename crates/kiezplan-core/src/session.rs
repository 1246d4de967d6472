//! Momentary mood state for one planning request.
//!
//! Intent, energy and social mode are closed enums. Every lookup table the
//! engine consults is an exhaustive `match` on them, so adding a variant is
//! a compile error everywhere it matters.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::event::CrowdVector;
use crate::travel::adjacent_districts;

/// What the user wants out of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Network,
    Learn,
    Explore,
    Party,
    Recover,
}

/// Self-reported energy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    Low,
    Medium,
    High,
}

/// Preferred company for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialMode {
    Solo,
    SmallGroup,
    Crowd,
}

/// Target event features for an intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntentProfile {
    pub density: f64,
    pub energy: f64,
    pub openness: f64,
    pub crowd: &'static [(&'static str, f64)],
}

impl IntentProfile {
    /// Target crowd as a vector comparable with event crowd vectors.
    pub fn crowd_vector(&self) -> CrowdVector {
        self.crowd
            .iter()
            .map(|(segment, weight)| (segment.to_string(), *weight))
            .collect()
    }
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Network,
        Intent::Learn,
        Intent::Explore,
        Intent::Party,
        Intent::Recover,
    ];

    pub fn profile(self) -> IntentProfile {
        match self {
            Intent::Network => IntentProfile {
                density: 0.8,
                energy: 0.6,
                openness: 0.7,
                crowd: &[("founders", 0.9), ("investors", 0.8)],
            },
            Intent::Learn => IntentProfile {
                density: 0.4,
                energy: 0.5,
                openness: 0.5,
                crowd: &[],
            },
            Intent::Explore => IntentProfile {
                density: 0.5,
                energy: 0.6,
                openness: 0.8,
                crowd: &[("artists", 0.6)],
            },
            Intent::Party => IntentProfile {
                density: 0.9,
                energy: 0.9,
                openness: 0.6,
                crowd: &[],
            },
            Intent::Recover => IntentProfile {
                density: 0.15,
                energy: 0.15,
                openness: 0.3,
                crowd: &[],
            },
        }
    }
}

impl Energy {
    /// Event energy level that best fits this self-reported energy.
    pub fn target(self) -> f64 {
        match self {
            Energy::Low => 0.15,
            Energy::Medium => 0.5,
            Energy::High => 0.8,
        }
    }
}

impl SocialMode {
    /// Event social density that best fits this mode.
    pub fn density_target(self) -> f64 {
        match self {
            SocialMode::Solo => 0.15,
            SocialMode::SmallGroup => 0.4,
            SocialMode::Crowd => 0.8,
        }
    }
}

/// Session state for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub intent: Intent,
    pub energy: Energy,
    pub social_mode: SocialMode,
    #[serde(default)]
    pub district_focus: BTreeSet<String>,
    #[serde(default)]
    pub budget_today: Option<f64>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Session {
    /// A small-group session with no district focus or budget.
    pub fn new(intent: Intent, energy: Energy, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            intent,
            energy,
            social_mode: SocialMode::SmallGroup,
            district_focus: BTreeSet::new(),
            budget_today: None,
            date_from,
            date_to,
        }
    }

    pub fn with_social_mode(mut self, mode: SocialMode) -> Self {
        self.social_mode = mode;
        self
    }

    pub fn with_district_focus<I, S>(mut self, districts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.district_focus = districts.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget_today = Some(budget);
        self
    }

    /// Recover intent at any energy.
    pub fn is_recover(&self) -> bool {
        self.intent == Intent::Recover
    }

    /// Recover intent at low energy, the strictest mood gate.
    pub fn is_recover_low(&self) -> bool {
        self.is_recover() && self.energy == Energy::Low
    }

    /// Rejects a negative budget. An inverted date range is allowed; it
    /// simply matches no events.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(budget) = self.budget_today {
            if !(budget >= 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: "budgetToday".to_string(),
                    message: format!("must be a non-negative number, got {budget}"),
                });
            }
        }
        Ok(())
    }

    /// Copy of this session whose district focus also covers neighbouring
    /// districts. Sessions without a focus are returned unchanged.
    pub fn widened(&self) -> Self {
        let mut widened = self.clone();
        let focus: Vec<String> = self.district_focus.iter().cloned().collect();
        widened.district_focus.extend(adjacent_districts(&focus));
        widened
    }
}
