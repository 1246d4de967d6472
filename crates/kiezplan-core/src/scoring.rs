//! Multi-factor event scoring with mood guardrails.
//!
//! Each event gets five independent sub-scores which are combined with
//! fixed weights:
//!
//! ```text
//! score = 0.40·state + 0.30·identity + 0.15·((behavior+1)/2)
//!       + 0.10·logistics + 0.05·novelty
//! ```
//!
//! The composite then passes through the mood guardrails: multiplicative
//! penalties first, additive bonuses second, then the solo-mode penalty.
//! Guardrails only look at the event and the session, never the persona,
//! so a recover/low-energy session pushes calm events above whatever the
//! persona would otherwise prefer.
//!
//! Scoring is a pure function of its inputs: no randomness, no clock, and
//! all weighted maps are ordered so sums are reproduced bit for bit.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::{CrowdVector, Event, Feedback, FeedbackType};
use crate::persona::Persona;
use crate::session::Session;

// ============================================================================
// Tunables
// ============================================================================

pub const STATE_WEIGHT: f64 = 0.40;
pub const IDENTITY_WEIGHT: f64 = 0.30;
pub const BEHAVIOR_WEIGHT: f64 = 0.15;
pub const LOGISTICS_WEIGHT: f64 = 0.10;
pub const NOVELTY_WEIGHT: f64 = 0.05;

/// Share of interest weight vs. crowd similarity in identity match.
pub const IDENTITY_INTEREST_SHARE: f64 = 0.6;
pub const IDENTITY_CROWD_SHARE: f64 = 0.4;

/// Weights of the five fit terms inside state match.
pub const STATE_DENSITY_FIT: f64 = 0.25;
pub const STATE_ENERGY_FIT: f64 = 0.25;
pub const STATE_SOCIAL_FIT: f64 = 0.20;
pub const STATE_OPENNESS_FIT: f64 = 0.15;
pub const STATE_CROWD_FIT: f64 = 0.15;

pub const SAVED_CATEGORY_BONUS: f64 = 0.5;
pub const HIDDEN_CATEGORY_PENALTY: f64 = 0.8;
pub const SAVED_TAG_BONUS: f64 = 0.2;
pub const HIDDEN_TAG_PENALTY: f64 = 0.3;

pub const FOCUS_DISTRICT_SCORE: f64 = 1.0;
pub const OTHER_DISTRICT_SCORE: f64 = 0.2;
pub const UNKNOWN_DISTRICT_SCORE: f64 = 0.5;

pub const SEEN_CATEGORY_NOVELTY: f64 = 0.2;
pub const FRESH_CATEGORY_NOVELTY: f64 = 0.8;

/// Guardrail thresholds on event features.
pub const HIGH_DENSITY: f64 = 0.7;
pub const HIGH_ENERGY: f64 = 0.7;
pub const HARD_ACCESS: f64 = 0.6;
pub const CALM_DENSITY: f64 = 0.5;
pub const CALM_ENERGY: f64 = 0.4;
pub const EASY_ACCESS: f64 = 0.3;

/// Categories that earn the calm-culture bonus under recover/low.
pub const CALM_CATEGORIES: [&str; 3] = ["art", "film", "music"];

// ============================================================================
// Weights and guardrail tuning
// ============================================================================

/// Weights for each sub-score in the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_state")]
    pub state: f64,
    #[serde(default = "default_identity")]
    pub identity: f64,
    #[serde(default = "default_behavior")]
    pub behavior: f64,
    #[serde(default = "default_logistics")]
    pub logistics: f64,
    #[serde(default = "default_novelty")]
    pub novelty: f64,
}

fn default_state() -> f64 {
    STATE_WEIGHT
}
fn default_identity() -> f64 {
    IDENTITY_WEIGHT
}
fn default_behavior() -> f64 {
    BEHAVIOR_WEIGHT
}
fn default_logistics() -> f64 {
    LOGISTICS_WEIGHT
}
fn default_novelty() -> f64 {
    NOVELTY_WEIGHT
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            state: STATE_WEIGHT,
            identity: IDENTITY_WEIGHT,
            behavior: BEHAVIOR_WEIGHT,
            logistics: LOGISTICS_WEIGHT,
            novelty: NOVELTY_WEIGHT,
        }
    }
}

impl ScoringWeights {
    /// Validate that all weights are in [0.0, 1.0]
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("state", self.state),
            ("identity", self.identity),
            ("behavior", self.behavior),
            ("logistics", self.logistics),
            ("novelty", self.novelty),
        ];

        for (name, weight) in weights {
            if !(0.0..=1.0).contains(&weight) {
                return Err(format!(
                    "Weight '{}' must be in [0.0, 1.0], got {}",
                    name, weight
                ));
            }
        }

        Ok(())
    }
}

/// Multipliers and bonuses applied by the mood guardrails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardrailTuning {
    /// recover + low energy
    pub recover_low_networking: f64,
    pub recover_low_density: f64,
    pub recover_low_energy: f64,
    pub recover_low_access: f64,
    /// recover at medium/high energy
    pub recover_networking: f64,
    pub recover_density: f64,
    pub recover_energy: f64,
    pub calm_culture_bonus: f64,
    pub calm_community_bonus: f64,
    pub easy_access_bonus: f64,
    /// any intent, solo mode
    pub solo_density: f64,
}

impl Default for GuardrailTuning {
    fn default() -> Self {
        Self {
            recover_low_networking: 0.15,
            recover_low_density: 0.25,
            recover_low_energy: 0.4,
            recover_low_access: 0.5,
            recover_networking: 0.4,
            recover_density: 0.5,
            recover_energy: 0.6,
            calm_culture_bonus: 0.12,
            calm_community_bonus: 0.10,
            easy_access_bonus: 0.05,
            solo_density: 0.6,
        }
    }
}

impl GuardrailTuning {
    pub fn validate(&self) -> Result<(), String> {
        let multipliers = [
            ("recover_low_networking", self.recover_low_networking),
            ("recover_low_density", self.recover_low_density),
            ("recover_low_energy", self.recover_low_energy),
            ("recover_low_access", self.recover_low_access),
            ("recover_networking", self.recover_networking),
            ("recover_density", self.recover_density),
            ("recover_energy", self.recover_energy),
            ("solo_density", self.solo_density),
        ];
        for (name, value) in multipliers {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("Multiplier '{name}' must be in [0.0, 1.0], got {value}"));
            }
        }
        let bonuses = [
            ("calm_culture_bonus", self.calm_culture_bonus),
            ("calm_community_bonus", self.calm_community_bonus),
            ("easy_access_bonus", self.easy_access_bonus),
        ];
        for (name, value) in bonuses {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("Bonus '{name}' must be in [0.0, 1.0], got {value}"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Breakdown
// ============================================================================

/// Individual objective term with weight and score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTerm {
    /// Term name
    pub name: String,
    /// Weight for this term
    pub weight: f64,
    /// Raw score, normalized to [0, 1] where the sub-score is not already
    pub score: f64,
    /// Weighted contribution to the composite
    pub contribution: f64,
}

impl ObjectiveTerm {
    pub fn new(name: impl Into<String>, weight: f64, score: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            score,
            contribution: weight * score,
        }
    }
}

/// Which guardrail fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardrailRule {
    NetworkingTag,
    HighDensity,
    HighEnergy,
    HardAccess,
    CalmCulture,
    CalmCommunity,
    EasyAccess,
    SoloCrowd,
}

impl fmt::Display for GuardrailRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GuardrailRule::NetworkingTag => "networking tag",
            GuardrailRule::HighDensity => "high social density",
            GuardrailRule::HighEnergy => "high energy",
            GuardrailRule::HardAccess => "hard to access",
            GuardrailRule::CalmCulture => "calm culture",
            GuardrailRule::CalmCommunity => "low-key community",
            GuardrailRule::EasyAccess => "easy access",
            GuardrailRule::SoloCrowd => "crowded for solo mode",
        };
        f.write_str(label)
    }
}

/// How a guardrail changed the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Scale(f64),
    Bonus(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuardrailAdjustment {
    pub rule: GuardrailRule,
    pub adjustment: Adjustment,
}

/// Complete scoring breakdown for explainability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// The five weighted sub-scores
    pub terms: Vec<ObjectiveTerm>,
    /// Weighted composite before guardrails
    pub base_score: f64,
    /// Guardrails that fired, in application order
    pub adjustments: Vec<GuardrailAdjustment>,
    /// Final score
    pub total_score: f64,
}

impl ScoreBreakdown {
    fn new() -> Self {
        Self {
            terms: Vec::new(),
            base_score: 0.0,
            adjustments: Vec::new(),
            total_score: 0.0,
        }
    }

    fn add_term(&mut self, term: ObjectiveTerm) {
        self.base_score += term.contribution;
        self.total_score = self.base_score;
        self.terms.push(term);
    }

    /// Get the top contributing term
    pub fn top_term(&self) -> Option<&ObjectiveTerm> {
        self.terms
            .iter()
            .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
    }

    /// Get terms sorted by contribution (descending)
    pub fn terms_by_contribution(&self) -> Vec<&ObjectiveTerm> {
        let mut sorted: Vec<_> = self.terms.iter().collect();
        sorted.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
        sorted
    }
}

// ============================================================================
// Context
// ============================================================================

/// Feedback resolved against the full event pool.
///
/// Entries whose id is not in the pool are dropped. When ids repeat in the
/// pool the first event wins.
#[derive(Debug, Clone, Default)]
pub struct FeedbackIndex<'a> {
    resolved: Vec<(FeedbackType, &'a Event)>,
    saved_categories: HashSet<&'a str>,
    hidden_categories: HashSet<&'a str>,
    seen_categories: HashSet<&'a str>,
}

impl<'a> FeedbackIndex<'a> {
    pub fn new(pool: &'a [Event], feedback: &[Feedback]) -> Self {
        let mut by_id: HashMap<&str, &'a Event> = HashMap::with_capacity(pool.len());
        for event in pool {
            by_id.entry(event.id.as_str()).or_insert(event);
        }

        let mut index = Self::default();
        for entry in feedback {
            let Some(event) = by_id.get(entry.event_id.as_str()).copied() else {
                continue;
            };
            let category = event.category.as_str();
            match entry.kind {
                FeedbackType::Save => {
                    index.saved_categories.insert(category);
                }
                FeedbackType::Hide => {
                    index.hidden_categories.insert(category);
                }
                FeedbackType::View => {}
            }
            index.seen_categories.insert(category);
            index.resolved.push((entry.kind, event));
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    pub fn saved_category(&self, category: &str) -> bool {
        self.saved_categories.contains(category)
    }

    pub fn hidden_category(&self, category: &str) -> bool {
        self.hidden_categories.contains(category)
    }

    pub fn seen_category(&self, category: &str) -> bool {
        self.seen_categories.contains(category)
    }

    pub fn resolved(&self) -> impl Iterator<Item = (FeedbackType, &'a Event)> + '_ {
        self.resolved.iter().copied()
    }
}

/// Everything an event is scored against for one request.
#[derive(Debug, Clone)]
pub struct ScoringContext<'a> {
    pub persona: &'a Persona,
    pub session: &'a Session,
    pub feedback: FeedbackIndex<'a>,
}

impl<'a> ScoringContext<'a> {
    /// `pool` is the full, unfiltered event pool that feedback refers to.
    pub fn new(
        persona: &'a Persona,
        session: &'a Session,
        pool: &'a [Event],
        feedback: &[Feedback],
    ) -> Self {
        Self {
            persona,
            session,
            feedback: FeedbackIndex::new(pool, feedback),
        }
    }
}

// ============================================================================
// Sub-scores
// ============================================================================

/// Cosine similarity over the union of keys; 0 for empty or zero vectors.
pub fn cosine_similarity(a: &CrowdVector, b: &CrowdVector) -> f64 {
    let keys: BTreeSet<&str> = a.keys().chain(b.keys()).map(String::as_str).collect();
    if keys.is_empty() {
        return 0.0;
    }
    let (mut dot, mut mag_a, mut mag_b) = (0.0, 0.0, 0.0);
    for key in keys {
        let va = a.get(key).copied().unwrap_or(0.0);
        let vb = b.get(key).copied().unwrap_or(0.0);
        dot += va * vb;
        mag_a += va * va;
        mag_b += vb * vb;
    }
    let denom = f64::sqrt(mag_a) * f64::sqrt(mag_b);
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Persona interest in the category plus crowd-preference similarity.
pub fn identity_match(event: &Event, persona: &Persona) -> f64 {
    let interest = persona.interest(&event.category);
    let crowd = cosine_similarity(&persona.crowd_preferences, &event.crowd_vector);
    IDENTITY_INTEREST_SHARE * interest + IDENTITY_CROWD_SHARE * crowd
}

/// Fit between the event's features and the session's mood targets.
pub fn state_match(event: &Event, session: &Session) -> f64 {
    let profile = session.intent.profile();
    let energy_target = session.energy.target();
    let social_target = session.social_mode.density_target();

    let density_fit = 1.0 - (event.social_density - profile.density).abs();
    let energy_fit = 1.0 - (event.energy_level - energy_target).abs();
    let openness_fit = 1.0 - (event.social_openness - profile.openness).abs();
    let social_fit = 1.0 - (event.social_density - social_target).abs();
    let crowd_fit = cosine_similarity(&profile.crowd_vector(), &event.crowd_vector);

    STATE_DENSITY_FIT * density_fit
        + STATE_ENERGY_FIT * energy_fit
        + STATE_SOCIAL_FIT * social_fit
        + STATE_OPENNESS_FIT * openness_fit
        + STATE_CROWD_FIT * crowd_fit
}

/// Feedback affinity in [-1, 1].
///
/// Category-level and tag-level adjustments can together exceed the range;
/// the final clamp keeps the result bounded.
pub fn behavior_match(event: &Event, feedback: &FeedbackIndex<'_>) -> f64 {
    if feedback.is_empty() {
        return 0.0;
    }

    let mut score = 0.0;
    if feedback.saved_category(&event.category) {
        score += SAVED_CATEGORY_BONUS;
    }
    if feedback.hidden_category(&event.category) {
        score -= HIDDEN_CATEGORY_PENALTY;
    }

    for (kind, other) in feedback.resolved() {
        let overlap = other.shared_subtags(event);
        if overlap == 0 {
            continue;
        }
        let overlap = overlap as f64;
        match kind {
            FeedbackType::Save => score += SAVED_TAG_BONUS * overlap,
            FeedbackType::Hide => score -= HIDDEN_TAG_PENALTY * overlap,
            FeedbackType::View => {}
        }
    }

    score.clamp(-1.0, 1.0)
}

/// Session district focus, or the persona's home base when the session has none.
pub fn focus_districts<'a>(persona: &'a Persona, session: &'a Session) -> &'a BTreeSet<String> {
    if session.district_focus.is_empty() {
        &persona.home_base_districts
    } else {
        &session.district_focus
    }
}

/// District proximity to the focus districts.
pub fn logistics_match(event: &Event, persona: &Persona, session: &Session) -> f64 {
    let focus = focus_districts(persona, session);

    match event.district.as_deref() {
        None => UNKNOWN_DISTRICT_SCORE,
        Some(_) if focus.is_empty() => UNKNOWN_DISTRICT_SCORE,
        Some(district) if focus.contains(district) => FOCUS_DISTRICT_SCORE,
        Some(_) => OTHER_DISTRICT_SCORE,
    }
}

/// Low when any feedback already touched this category.
pub fn novelty_score(event: &Event, feedback: &FeedbackIndex<'_>) -> f64 {
    if feedback.seen_category(&event.category) {
        SEEN_CATEGORY_NOVELTY
    } else {
        FRESH_CATEGORY_NOVELTY
    }
}

// ============================================================================
// Guardrails
// ============================================================================

/// Apply the mood guardrails to a composite score.
///
/// Returns the adjusted score and the rules that fired, in order.
pub fn apply_mood_guardrails(
    base_score: f64,
    event: &Event,
    session: &Session,
    tuning: &GuardrailTuning,
) -> (f64, Vec<GuardrailAdjustment>) {
    let mut score = base_score;
    let mut fired = Vec::new();
    let mut scale = |score: &mut f64, rule: GuardrailRule, factor: f64| {
        *score *= factor;
        fired.push(GuardrailAdjustment {
            rule,
            adjustment: Adjustment::Scale(factor),
        });
    };

    let networking = event.has_networking_tag();
    let dense = event.social_density > HIGH_DENSITY;
    let energetic = event.energy_level > HIGH_ENERGY;

    if session.is_recover_low() {
        if networking {
            scale(&mut score, GuardrailRule::NetworkingTag, tuning.recover_low_networking);
        }
        if dense {
            scale(&mut score, GuardrailRule::HighDensity, tuning.recover_low_density);
        }
        if energetic {
            scale(&mut score, GuardrailRule::HighEnergy, tuning.recover_low_energy);
        }
        if event.access_difficulty > HARD_ACCESS {
            scale(&mut score, GuardrailRule::HardAccess, tuning.recover_low_access);
        }
    } else if session.is_recover() {
        if networking {
            scale(&mut score, GuardrailRule::NetworkingTag, tuning.recover_networking);
        }
        if dense {
            scale(&mut score, GuardrailRule::HighDensity, tuning.recover_density);
        }
        if energetic {
            scale(&mut score, GuardrailRule::HighEnergy, tuning.recover_energy);
        }
    }

    if session.is_recover_low() {
        let calm_density = event.social_density <= CALM_DENSITY;
        let mut bonus = |score: &mut f64, rule: GuardrailRule, amount: f64| {
            *score += amount;
            fired.push(GuardrailAdjustment {
                rule,
                adjustment: Adjustment::Bonus(amount),
            });
        };
        if CALM_CATEGORIES.contains(&event.category.as_str()) && calm_density {
            bonus(&mut score, GuardrailRule::CalmCulture, tuning.calm_culture_bonus);
        }
        if event.category == "community" && event.energy_level <= CALM_ENERGY && calm_density {
            bonus(&mut score, GuardrailRule::CalmCommunity, tuning.calm_community_bonus);
        }
        if event.access_difficulty <= EASY_ACCESS {
            bonus(&mut score, GuardrailRule::EasyAccess, tuning.easy_access_bonus);
        }
    }

    if session.social_mode == crate::session::SocialMode::Solo && dense {
        score *= tuning.solo_density;
        fired.push(GuardrailAdjustment {
            rule: GuardrailRule::SoloCrowd,
            adjustment: Adjustment::Scale(tuning.solo_density),
        });
    }

    (score, fired)
}

// ============================================================================
// Engine
// ============================================================================

/// Multi-factor scoring engine
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    guardrails: GuardrailTuning,
}

impl ScoringEngine {
    /// Create a new engine with default weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom weights and guardrail tuning
    pub fn with_tuning(weights: ScoringWeights, guardrails: GuardrailTuning) -> Self {
        Self {
            weights,
            guardrails,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn guardrails(&self) -> &GuardrailTuning {
        &self.guardrails
    }

    /// Score one event, keeping every term for explanation.
    pub fn score(&self, ctx: &ScoringContext<'_>, event: &Event) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::new();

        breakdown.add_term(ObjectiveTerm::new(
            "state",
            self.weights.state,
            state_match(event, ctx.session),
        ));
        breakdown.add_term(ObjectiveTerm::new(
            "identity",
            self.weights.identity,
            identity_match(event, ctx.persona),
        ));
        let behavior = behavior_match(event, &ctx.feedback);
        breakdown.add_term(ObjectiveTerm::new(
            "behavior",
            self.weights.behavior,
            (behavior + 1.0) / 2.0,
        ));
        breakdown.add_term(ObjectiveTerm::new(
            "logistics",
            self.weights.logistics,
            logistics_match(event, ctx.persona, ctx.session),
        ));
        breakdown.add_term(ObjectiveTerm::new(
            "novelty",
            self.weights.novelty,
            novelty_score(event, &ctx.feedback),
        ));

        let (total, adjustments) =
            apply_mood_guardrails(breakdown.base_score, event, ctx.session, &self.guardrails);
        if !adjustments.is_empty() {
            tracing::trace!(
                event = %event.id,
                base = breakdown.base_score,
                total,
                fired = adjustments.len(),
                "guardrails applied"
            );
        }
        breakdown.total_score = total;
        breakdown.adjustments = adjustments;
        breakdown
    }

    /// Final score only.
    pub fn score_value(&self, ctx: &ScoringContext<'_>, event: &Event) -> f64 {
        self.score(ctx, event).total_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{event, tagged};
    use crate::session::{Energy, Intent, SocialMode};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn crowd(items: &[(&str, f64)]) -> CrowdVector {
        items.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn features(mut e: Event, density: f64, energy: f64, access: f64) -> Event {
        e.social_density = density;
        e.energy_level = energy;
        e.access_difficulty = access;
        e
    }

    fn recover_low() -> Session {
        Session::new(Intent::Recover, Energy::Low, day(16), day(22))
            .with_social_mode(SocialMode::Solo)
            .with_budget(20.0)
    }

    fn network() -> Session {
        Session::new(Intent::Network, Energy::High, day(16), day(22))
            .with_social_mode(SocialMode::Crowd)
            .with_district_focus(["Kreuzberg"])
    }

    fn founder() -> Persona {
        let mut p = Persona::neutral();
        p.home_base_districts = ["Mitte", "Kreuzberg"].iter().map(|s| s.to_string()).collect();
        p.interests = crowd(&[("tech", 0.9), ("community", 0.6), ("art", 0.3), ("club", 0.5)]);
        p.crowd_preferences = crowd(&[("founders", 0.9), ("investors", 0.8), ("artists", 0.3)]);
        p
    }

    fn tech_meetup() -> Event {
        let mut e = tagged(features(event("e1", "tech"), 0.8, 0.6, 0.2), &["ai", "networking"]);
        e.social_openness = 0.7;
        e.district = Some("Kreuzberg".to_string());
        e.crowd_vector = crowd(&[("founders", 0.8), ("investors", 0.5)]);
        e
    }

    fn gallery() -> Event {
        let mut e = tagged(features(event("e2", "art"), 0.6, 0.4, 0.2), &["contemporary", "opening"]);
        e.social_openness = 0.8;
        e.district = Some("Mitte".to_string());
        e.crowd_vector = crowd(&[("artists", 0.9)]);
        e
    }

    fn museum() -> Event {
        let mut e = tagged(features(event("museum", "art"), 0.3, 0.3, 0.1), &["gallery"]);
        e.social_openness = 0.2;
        e.crowd_vector = crowd(&[("tourists", 0.6), ("artists", 0.4)]);
        e
    }

    fn pitch() -> Event {
        let mut e = tagged(features(event("pitch", "tech"), 0.8, 0.7, 0.4), &["web3", "pitching"]);
        e.crowd_vector = crowd(&[("founders", 0.9), ("investors", 0.9)]);
        e
    }

    #[test]
    fn cosine_handles_empty_and_zero_vectors() {
        assert_eq!(cosine_similarity(&CrowdVector::new(), &CrowdVector::new()), 0.0);
        assert_eq!(cosine_similarity(&crowd(&[("a", 1.0)]), &CrowdVector::new()), 0.0);
        assert_eq!(cosine_similarity(&crowd(&[("a", 0.0)]), &crowd(&[("a", 0.5)])), 0.0);
    }

    #[test]
    fn cosine_over_key_union() {
        let same = cosine_similarity(&crowd(&[("a", 0.3)]), &crowd(&[("a", 0.9)]));
        assert!((same - 1.0).abs() < 1e-12);
        let disjoint = cosine_similarity(&crowd(&[("a", 1.0)]), &crowd(&[("b", 1.0)]));
        assert_eq!(disjoint, 0.0);
    }

    #[test]
    fn identity_rewards_interest_and_crowd() {
        assert!(identity_match(&tech_meetup(), &founder()) > 0.7);
        assert!(identity_match(&gallery(), &founder()) < 0.4);
    }

    #[test]
    fn state_prefers_intent_shape() {
        let s = network();
        assert!(state_match(&tech_meetup(), &s) > state_match(&gallery(), &s));

        let r = recover_low();
        let gap = state_match(&museum(), &r) - state_match(&pitch(), &r);
        assert!(gap > 0.15, "gap was {gap}");
    }

    #[test]
    fn social_mode_shifts_state_match() {
        let crowd_session = network();
        let solo_session = network().with_social_mode(SocialMode::Solo);
        assert!(state_match(&tech_meetup(), &crowd_session) > state_match(&tech_meetup(), &solo_session));
    }

    #[test]
    fn behavior_zero_without_feedback() {
        let pool = vec![tech_meetup()];
        let index = FeedbackIndex::new(&pool, &[]);
        assert_eq!(behavior_match(&tech_meetup(), &index), 0.0);
    }

    #[test]
    fn behavior_combines_category_and_tags_then_clamps() {
        let saved = tagged(event("s", "art"), &["gallery", "opening", "modern art"]);
        let pool = vec![saved.clone()];
        let index = FeedbackIndex::new(&pool, &[Feedback::new("s", FeedbackType::Save)]);

        // +0.5 category, +0.2 * 3 tags = 1.1 -> clamped
        let candidate = tagged(event("c", "art"), &["gallery", "opening", "modern art"]);
        assert_eq!(behavior_match(&candidate, &index), 1.0);

        // tag overlap only
        let other_category = tagged(event("d", "film"), &["opening"]);
        assert!((behavior_match(&other_category, &index) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn behavior_penalizes_hidden_and_ignores_unknown_ids() {
        let hidden = tagged(event("h", "club"), &["techno"]);
        let pool = vec![hidden.clone()];
        let fb = [
            Feedback::new("h", FeedbackType::Hide),
            Feedback::new("missing", FeedbackType::Save),
        ];
        let index = FeedbackIndex::new(&pool, &fb);
        let candidate = tagged(event("c", "club"), &["techno"]);
        // -0.8 category, -0.3 tag
        assert_eq!(behavior_match(&candidate, &index), -1.0);
        assert!(!index.saved_category("club"));
    }

    #[test]
    fn logistics_neutral_when_unknown() {
        let s = network();
        assert_eq!(logistics_match(&tech_meetup(), &founder(), &s), 1.0);
        let mut elsewhere = tech_meetup();
        elsewhere.district = Some("Friedrichshain".to_string());
        assert_eq!(logistics_match(&elsewhere, &founder(), &s), 0.2);
        elsewhere.district = None;
        assert_eq!(logistics_match(&elsewhere, &founder(), &s), 0.5);
    }

    #[test]
    fn logistics_falls_back_to_home_base() {
        let s = recover_low();
        // no session focus: founder home base is Mitte + Kreuzberg
        assert_eq!(logistics_match(&gallery(), &founder(), &s), 1.0);
        // no focus anywhere
        assert_eq!(logistics_match(&gallery(), &Persona::neutral(), &s), 0.5);
    }

    #[test]
    fn novelty_counts_any_feedback_type() {
        let pool = vec![tech_meetup()];
        let index = FeedbackIndex::new(&pool, &[Feedback::new("e1", FeedbackType::View)]);
        assert_eq!(novelty_score(&gallery(), &index), 0.8);
        assert_eq!(novelty_score(&tech_meetup(), &index), 0.2);
    }

    #[test]
    fn guardrails_crush_pitch_under_recover_low() {
        let tuning = GuardrailTuning::default();
        let (score, fired) = apply_mood_guardrails(0.5, &pitch(), &recover_low(), &tuning);
        assert!(score < 0.1);
        let rules: Vec<_> = fired.iter().map(|f| f.rule).collect();
        assert_eq!(
            rules,
            vec![GuardrailRule::NetworkingTag, GuardrailRule::HighDensity, GuardrailRule::SoloCrowd]
        );
    }

    #[test]
    fn guardrails_boost_calm_events_under_recover_low() {
        let tuning = GuardrailTuning::default();
        let (score, _) = apply_mood_guardrails(0.5, &museum(), &recover_low(), &tuning);
        assert!((score - (0.5 + 0.12 + 0.05)).abs() < 1e-12);

        let walk = features(event("walk", "community"), 0.2, 0.3, 0.0);
        let (score, _) = apply_mood_guardrails(0.5, &walk, &recover_low(), &tuning);
        assert!((score - (0.5 + 0.10 + 0.05)).abs() < 1e-12);
    }

    #[test]
    fn recover_low_penalties_scale_before_bonuses_add() {
        let tuning = GuardrailTuning::default();
        let remote_gallery = features(event("remote", "art"), 0.4, 0.5, 0.9);
        let (score, fired) = apply_mood_guardrails(0.5, &remote_gallery, &recover_low(), &tuning);
        assert!((score - (0.5 * 0.5 + 0.12)).abs() < 1e-12, "{score}");
        assert_eq!(
            fired,
            vec![
                GuardrailAdjustment {
                    rule: GuardrailRule::HardAccess,
                    adjustment: Adjustment::Scale(0.5),
                },
                GuardrailAdjustment {
                    rule: GuardrailRule::CalmCulture,
                    adjustment: Adjustment::Bonus(0.12),
                },
            ]
        );

        let loud_concert = features(event("concert", "music"), 0.4, 0.8, 0.1);
        let (score, fired) = apply_mood_guardrails(0.5, &loud_concert, &recover_low(), &tuning);
        assert!((score - (0.5 * 0.4 + 0.12 + 0.05)).abs() < 1e-12, "{score}");
        let rules: Vec<_> = fired.iter().map(|f| f.rule).collect();
        assert_eq!(
            rules,
            vec![GuardrailRule::HighEnergy, GuardrailRule::CalmCulture, GuardrailRule::EasyAccess]
        );
    }

    #[test]
    fn solo_penalty_applies_after_bonuses() {
        let tuning = GuardrailTuning::default();
        let packed_hall = features(event("hall", "art"), 0.8, 0.3, 0.1);
        let (score, fired) = apply_mood_guardrails(0.5, &packed_hall, &recover_low(), &tuning);
        assert!((score - (0.5 * 0.25 + 0.05) * 0.6).abs() < 1e-12, "{score}");
        let rules: Vec<_> = fired.iter().map(|f| f.rule).collect();
        assert_eq!(
            rules,
            vec![GuardrailRule::HighDensity, GuardrailRule::EasyAccess, GuardrailRule::SoloCrowd]
        );
    }

    #[test]
    fn softer_guardrails_for_recover_with_energy() {
        let tuning = GuardrailTuning::default();
        let session = Session::new(Intent::Recover, Energy::High, day(16), day(22));
        let loud = tagged(features(event("x", "club"), 0.9, 0.9, 0.9), &["networking"]);
        let (score, fired) = apply_mood_guardrails(1.0, &loud, &session, &tuning);
        assert!((score - 0.4 * 0.5 * 0.6).abs() < 1e-12);
        assert!(fired.iter().all(|f| f.rule != GuardrailRule::HardAccess));
        assert!(fired.iter().all(|f| matches!(f.adjustment, Adjustment::Scale(_))));
    }

    #[test]
    fn network_intent_leaves_networking_alone() {
        let tuning = GuardrailTuning::default();
        let (score, fired) = apply_mood_guardrails(0.5, &pitch(), &network(), &tuning);
        assert_eq!(score, 0.5);
        assert!(fired.is_empty());
    }

    #[test]
    fn solo_penalty_applies_to_any_intent() {
        let tuning = GuardrailTuning::default();
        let session = network().with_social_mode(SocialMode::Solo);
        let (score, _) = apply_mood_guardrails(0.5, &tech_meetup(), &session, &tuning);
        assert!((score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn composite_is_deterministic_and_bounded() {
        let engine = ScoringEngine::new();
        let persona = founder();
        let session = network();
        let pool = vec![tech_meetup(), gallery()];
        let ctx = ScoringContext::new(&persona, &session, &pool, &[]);

        let a = engine.score(&ctx, &pool[0]);
        let b = engine.score(&ctx, &pool[0]);
        assert_eq!(a, b);
        assert!(a.total_score >= 0.0 && a.total_score <= 1.0);
        assert_eq!(a.terms.len(), 5);
        assert!(engine.score_value(&ctx, &pool[0]) > engine.score_value(&ctx, &pool[1]));
    }

    #[test]
    fn mood_dominates_identity() {
        let engine = ScoringEngine::new();
        let persona = founder();
        let session = recover_low();
        let pool = vec![museum(), pitch()];
        let ctx = ScoringContext::new(&persona, &session, &pool, &[]);
        let museum_score = engine.score_value(&ctx, &pool[0]);
        let pitch_score = engine.score_value(&ctx, &pool[1]);
        assert!(museum_score > 3.0 * pitch_score, "{museum_score} vs {pitch_score}");
    }

    #[test]
    fn saving_a_gallery_lifts_other_art_events() {
        let engine = ScoringEngine::new();
        let persona = Persona::neutral();
        let session = network();
        let saved = gallery();
        let candidate = museum();
        let pool = vec![saved.clone(), candidate.clone()];

        let base_ctx = ScoringContext::new(&persona, &session, &pool, &[]);
        let fb = [Feedback::new(saved.id.clone(), FeedbackType::Save)];
        let saved_ctx = ScoringContext::new(&persona, &session, &pool, &fb);
        assert!(engine.score_value(&saved_ctx, &candidate) > engine.score_value(&base_ctx, &candidate));
    }

    #[test]
    fn interest_raises_score_all_else_equal() {
        let engine = ScoringEngine::new();
        let mut persona = Persona::neutral();
        persona.interests.insert("film".to_string(), 0.8);
        let session = Session::new(Intent::Learn, Energy::Medium, day(16), day(22));
        let liked = event("a", "film");
        let unliked = event("b", "sports");
        let pool = vec![liked.clone(), unliked.clone()];
        let ctx = ScoringContext::new(&persona, &session, &pool, &[]);
        assert!(engine.score_value(&ctx, &liked) > engine.score_value(&ctx, &unliked));
    }

    #[test]
    fn breakdown_orders_terms() {
        let engine = ScoringEngine::new();
        let persona = founder();
        let session = network();
        let pool = vec![tech_meetup()];
        let ctx = ScoringContext::new(&persona, &session, &pool, &[]);
        let breakdown = engine.score(&ctx, &pool[0]);
        let sorted = breakdown.terms_by_contribution();
        assert!(sorted.windows(2).all(|w| w[0].contribution >= w[1].contribution));
        assert_eq!(breakdown.top_term().map(|t| t.name.as_str()), Some("state"));
        assert!(breakdown.terms.iter().any(|t| t.name == "novelty"));
    }

    #[test]
    fn weights_validation() {
        assert!(ScoringWeights::default().validate().is_ok());
        let mut bad = ScoringWeights::default();
        bad.state = 1.5;
        assert!(bad.validate().is_err());
        assert!(GuardrailTuning::default().validate().is_ok());
        let mut bad_tuning = GuardrailTuning::default();
        bad_tuning.solo_density = -0.1;
        assert!(bad_tuning.validate().is_err());
    }
}
