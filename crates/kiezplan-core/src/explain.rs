//! Human-readable reasons for a recommendation.
//!
//! Rules use the same feature thresholds as scoring and are checked in a
//! fixed priority order; at most [`MAX_REASONS`] are kept.

use std::fmt;

use crate::event::Event;
use crate::scoring::{focus_districts, ScoringContext};
use crate::session::{Energy, Intent};

pub const MAX_REASONS: usize = 2;

const CALM_ENERGY: f64 = 0.4;
const CALM_DENSITY: f64 = 0.5;
const NETWORK_CROWD: f64 = 0.5;
const PARTY_ENERGY: f64 = 0.7;
const STRONG_INTEREST: f64 = 0.5;
const EASY_ACCESS: f64 = 0.2;

/// One reason an event was picked.
#[derive(Debug, Clone, PartialEq)]
pub enum Reason {
    Recharging,
    CalmEnergy,
    NetworkingCrowd,
    PartyEnergy,
    PreferredDistrict(String),
    Interest(String),
    EasyAccess,
    FreeEntry,
    SimilarToSaved,
    CategoryOption(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Recharging => f.write_str("Low-key atmosphere, good for recharging"),
            Reason::CalmEnergy => f.write_str("Calm energy level for your current state"),
            Reason::NetworkingCrowd => {
                f.write_str("High founder/investor density (networking opportunity)")
            }
            Reason::PartyEnergy => f.write_str("High energy, matches party mode"),
            Reason::PreferredDistrict(d) => write!(f, "In your preferred district: {d}"),
            Reason::Interest(c) => write!(f, "Matches your {c} interest"),
            Reason::EasyAccess => f.write_str("Easy to access, no hassle"),
            Reason::FreeEntry => f.write_str("Free entry"),
            Reason::SimilarToSaved => f.write_str("Similar to events you saved"),
            Reason::CategoryOption(c) => write!(f, "{c} option for your schedule"),
        }
    }
}

/// Every rule that fires for `event`, in priority order.
pub fn reasons(event: &Event, ctx: &ScoringContext<'_>) -> Vec<Reason> {
    let session = ctx.session;
    let calm_state = session.intent == Intent::Recover || session.energy == Energy::Low;
    let mut out = Vec::new();

    if calm_state && event.energy_level <= CALM_ENERGY {
        if event.social_density <= CALM_DENSITY {
            out.push(Reason::Recharging);
        } else {
            out.push(Reason::CalmEnergy);
        }
    }

    if session.intent == Intent::Network
        && (event.crowd("founders") > NETWORK_CROWD || event.crowd("investors") > NETWORK_CROWD)
    {
        out.push(Reason::NetworkingCrowd);
    }

    if session.intent == Intent::Party && event.energy_level > PARTY_ENERGY {
        out.push(Reason::PartyEnergy);
    }

    if let Some(district) = event.district.as_deref() {
        if focus_districts(ctx.persona, session).contains(district) {
            out.push(Reason::PreferredDistrict(district.to_string()));
        }
    }

    if ctx.persona.interest(&event.category) > STRONG_INTEREST {
        out.push(Reason::Interest(event.category.clone()));
    }

    if calm_state && event.access_difficulty <= EASY_ACCESS {
        out.push(Reason::EasyAccess);
    }

    if event.price_min == Some(0.0) {
        out.push(Reason::FreeEntry);
    }

    if ctx.feedback.saved_category(&event.category) {
        out.push(Reason::SimilarToSaved);
    }

    if out.is_empty() {
        out.push(Reason::CategoryOption(event.category.clone()));
    }
    out
}

/// The first [`MAX_REASONS`] reasons, rendered.
pub fn explain(event: &Event, ctx: &ScoringContext<'_>) -> Vec<String> {
    reasons(event, ctx)
        .into_iter()
        .take(MAX_REASONS)
        .map(|reason| reason.to_string())
        .collect()
}
