//! Inter-district travel estimates.
//!
//! Districts (Bezirke) are the geographic unit. Estimates are table lookups:
//! a fixed same-district time, a default for unknown pairs, and optional
//! per-pair overrides from configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::scheduler::ScoredEvent;

pub const SAME_DISTRICT_MINUTES: u32 = 10;
pub const DEFAULT_TRAVEL_MINUTES: u32 = 25;

/// Neighbouring districts, used to widen a district focus.
const ADJACENT: &[(&str, &[&str])] = &[
    ("Mitte", &["Kreuzberg", "Friedrichshain", "Prenzlauer Berg", "Charlottenburg", "Schöneberg"]),
    ("Kreuzberg", &["Mitte", "Neukölln", "Friedrichshain", "Schöneberg"]),
    ("Friedrichshain", &["Mitte", "Kreuzberg", "Prenzlauer Berg", "Lichtenberg"]),
    ("Neukölln", &["Kreuzberg", "Treptow-Köpenick"]),
    ("Prenzlauer Berg", &["Mitte", "Friedrichshain", "Pankow"]),
    ("Charlottenburg", &["Mitte", "Schöneberg", "Wilmersdorf"]),
    ("Schöneberg", &["Mitte", "Kreuzberg", "Charlottenburg"]),
    ("Wilmersdorf", &["Charlottenburg"]),
    ("Treptow-Köpenick", &["Neukölln"]),
    ("Pankow", &["Prenzlauer Berg"]),
    ("Lichtenberg", &["Friedrichshain"]),
];

/// Districts adjacent to any of `districts` that are not in it, sorted.
pub fn adjacent_districts(districts: &[String]) -> Vec<String> {
    let mut adjacent = BTreeSet::new();
    for district in districts {
        let neighbours = ADJACENT
            .iter()
            .find(|(name, _)| name == district)
            .map(|(_, neighbours)| *neighbours)
            .unwrap_or(&[]);
        for neighbour in neighbours {
            if !districts.iter().any(|d| d == neighbour) {
                adjacent.insert(neighbour.to_string());
            }
        }
    }
    adjacent.into_iter().collect()
}

/// Travel time table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelTimes {
    #[serde(default = "default_same_district")]
    pub same_district_minutes: u32,
    #[serde(default = "default_travel")]
    pub default_minutes: u32,
    /// Overrides keyed by origin, then destination.
    #[serde(default)]
    pub overrides: BTreeMap<String, BTreeMap<String, u32>>,
}

fn default_same_district() -> u32 {
    SAME_DISTRICT_MINUTES
}

fn default_travel() -> u32 {
    DEFAULT_TRAVEL_MINUTES
}

impl Default for TravelTimes {
    fn default() -> Self {
        Self {
            same_district_minutes: SAME_DISTRICT_MINUTES,
            default_minutes: DEFAULT_TRAVEL_MINUTES,
            overrides: BTreeMap::new(),
        }
    }
}

/// Travel between two consecutive stops of a day plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelLeg {
    pub from_event: String,
    pub to_event: String,
    pub from_district: String,
    pub to_district: String,
    pub minutes: u32,
}

impl TravelTimes {
    pub fn with_override(mut self, from: &str, to: &str, minutes: u32) -> Self {
        self.overrides
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), minutes);
        self
    }

    /// Estimated minutes from `from` to `to`.
    ///
    /// Same-district trips use the fixed same-district time even when an
    /// override exists for the pair.
    pub fn minutes(&self, from: &str, to: &str) -> u32 {
        if from == to {
            return self.same_district_minutes;
        }
        self.overrides
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(self.default_minutes)
    }

    /// Full pairwise table for the distinct districts given.
    pub fn matrix<'a, I>(&self, districts: I) -> BTreeMap<String, BTreeMap<String, u32>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unique: BTreeSet<&str> = districts.into_iter().collect();
        unique
            .iter()
            .map(|from| {
                let row = unique
                    .iter()
                    .map(|to| (to.to_string(), self.minutes(from, to)))
                    .collect();
                (from.to_string(), row)
            })
            .collect()
    }

    /// Legs between consecutive stops. Pairs where either district is
    /// unknown are skipped.
    pub fn legs(&self, stops: &[ScoredEvent]) -> Vec<TravelLeg> {
        stops
            .windows(2)
            .filter_map(|pair| {
                let (from, to) = (&pair[0].event, &pair[1].event);
                let from_district = from.district.as_deref()?;
                let to_district = to.district.as_deref()?;
                Some(TravelLeg {
                    from_event: from.id.clone(),
                    to_event: to.id.clone(),
                    from_district: from_district.to_string(),
                    to_district: to_district.to_string(),
                    minutes: self.minutes(from_district, to_district),
                })
            })
            .collect()
    }
}
