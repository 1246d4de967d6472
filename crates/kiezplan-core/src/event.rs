//! Event and feedback records.
//!
//! Events are owned by the external catalog and are immutable for the
//! duration of a planning request. Missing fields (district, start time,
//! price) mean "unknown" and are never treated as errors by the engine.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Crowd-segment name to weight in [0, 1].
///
/// Ordered so that similarity sums always walk keys in the same order.
pub type CrowdVector = BTreeMap<String, f64>;

/// Tags that mark an event as networking / deal-making oriented.
pub const NETWORKING_TAGS: [&str; 11] = [
    "networking",
    "pitch",
    "dealflow",
    "founder dinner",
    "invite-only",
    "pitching",
    "founders",
    "vc",
    "investing",
    "startups",
    "demo day",
];

/// A catalog event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "clock::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "clock::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    pub category: String,
    #[serde(default)]
    pub subtags: Vec<String>,
    #[serde(default, alias = "priceEurMin")]
    pub price_min: Option<f64>,
    #[serde(default, alias = "priceEurMax")]
    pub price_max: Option<f64>,
    pub social_density: f64,
    pub social_openness: f64,
    pub energy_level: f64,
    #[serde(default)]
    pub crowd_vector: CrowdVector,
    pub access_difficulty: f64,
}

impl Event {
    /// True if any subtag is in [`NETWORKING_TAGS`] (case-insensitive).
    pub fn has_networking_tag(&self) -> bool {
        self.subtags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            NETWORKING_TAGS.contains(&tag.as_str())
        })
    }

    /// Weight of a crowd segment, 0 when absent.
    pub fn crowd(&self, segment: &str) -> f64 {
        self.crowd_vector.get(segment).copied().unwrap_or(0.0)
    }

    /// Number of this event's subtags that also appear on `other`.
    ///
    /// Duplicates on `self` count once per occurrence.
    pub fn shared_subtags(&self, other: &Event) -> usize {
        self.subtags
            .iter()
            .filter(|tag| other.subtags.contains(tag))
            .count()
    }

    /// Check the feature ranges the engine assumes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "id".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        ValidationError::unit_range("socialDensity", self.social_density)?;
        ValidationError::unit_range("socialOpenness", self.social_openness)?;
        ValidationError::unit_range("energyLevel", self.energy_level)?;
        ValidationError::unit_range("accessDifficulty", self.access_difficulty)?;
        for (segment, weight) in &self.crowd_vector {
            ValidationError::unit_range(format!("crowdVector.{segment}"), *weight)?;
        }
        for (field, price) in [("priceMin", self.price_min), ("priceMax", self.price_max)] {
            if let Some(price) = price {
                if !(price >= 0.0) {
                    return Err(ValidationError::InvalidValue {
                        field: field.to_string(),
                        message: format!("must be a non-negative number, got {price}"),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Validate every event in a pool and reject duplicate ids.
pub fn validate_pool(events: &[Event]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for event in events {
        event.validate()?;
        if !seen.insert(event.id.as_str()) {
            return Err(ValidationError::DuplicateId(event.id.clone()));
        }
    }
    Ok(())
}

/// Kind of user feedback on an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    #[serde(alias = "SAVE")]
    Save,
    #[serde(alias = "HIDE")]
    Hide,
    #[serde(alias = "VIEW")]
    View,
}

/// One feedback entry accumulated during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub event_id: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
}

impl Feedback {
    pub fn new(event_id: impl Into<String>, kind: FeedbackType) -> Self {
        Self {
            event_id: event_id.into(),
            kind,
        }
    }
}

/// Ids of every event the user hid.
pub fn hidden_ids(feedback: &[Feedback]) -> HashSet<String> {
    feedback
        .iter()
        .filter(|f| f.kind == FeedbackType::Hide)
        .map(|f| f.event_id.clone())
        .collect()
}

/// Minutes since midnight.
pub fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// `"HH:MM"` (de)serialization for times of day.
pub(crate) mod clock {
    use chrono::NaiveTime;

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(time) => serializer.serialize_some(&time.format(super::FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(s) => super::parse(s)
                    .map(Some)
                    .map_err(|e| D::Error::custom(format!("invalid time '{s}': {e}"))),
            }
        }
    }
}
