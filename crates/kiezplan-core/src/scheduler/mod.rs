//! Day-plan assembly.
//!
//! The builder runs the filter, scores and explains every surviving event,
//! then assigns each day's events greedily by score:
//! - hidden events are skipped entirely
//! - an event goes to `primary` if it does not collide with an accepted
//!   primary event, is not blocked by the mood gate, and the primary cap
//!   is not reached
//! - otherwise it becomes `optional` while there is room, flagged with
//!   `timeConflict` when it collides with a primary pick
//!
//! Scored events live in one arena; each day is a fold over arena indices.

mod window;

pub use window::{add_capped, collides, TimeWindow};

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::event::{Event, Feedback};
use crate::explain::explain;
use crate::filter::filter_events;
use crate::persona::Persona;
use crate::scoring::{ScoringContext, ScoringEngine};
use crate::session::{Energy, Session};

/// Density above which an event counts as high stimulation.
pub const STIMULATING_DENSITY: f64 = 0.6;
/// Energy above which an event counts as high stimulation.
pub const STIMULATING_ENERGY: f64 = 0.7;
/// Density above which two events on a low-energy day are too many.
pub const CROWDED_DENSITY: f64 = 0.7;

/// Tier of a scored event within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Primary,
    Optional,
}

/// An event with its score, reasons and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEvent {
    #[serde(flatten)]
    pub event: Event,
    pub score: f64,
    pub reasons: Vec<String>,
    pub tier: Tier,
    #[serde(default, skip_serializing_if = "is_false")]
    pub time_conflict: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ScoredEvent {
    /// True if the event is likely to be draining.
    pub fn is_high_stimulation(&self) -> bool {
        self.event.social_density > STIMULATING_DENSITY
            || self.event.energy_level > STIMULATING_ENERGY
            || self.event.has_networking_tag()
    }
}

/// Recommendations for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub primary: Vec<ScoredEvent>,
    pub optional: Vec<ScoredEvent>,
}

impl DayPlan {
    /// Events in either tier, primary first.
    pub fn events(&self) -> impl Iterator<Item = &ScoredEvent> {
        self.primary.iter().chain(self.optional.iter())
    }
}

/// Upper bound for buffer and default duration settings.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Capacities and clock constants for day assembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleLimits {
    /// Gap required after an event ends (minutes)
    pub buffer_minutes: u32,
    /// Assumed duration when an event has no end time (minutes)
    pub default_duration_minutes: u32,
    /// Latest clock hour produced by time arithmetic
    pub last_hour: u32,
    pub max_primary: usize,
    /// Primary cap for recover intent at low energy
    pub max_primary_recover_low: usize,
    pub max_optional: usize,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            buffer_minutes: 30,
            default_duration_minutes: 120,
            last_hour: 23,
            max_primary: 3,
            max_primary_recover_low: 2,
            max_optional: 3,
        }
    }
}

impl ScheduleLimits {
    pub fn validate(&self) -> Result<(), String> {
        if self.last_hour > 23 {
            return Err(format!("last_hour must be at most 23, got {}", self.last_hour));
        }
        for (name, minutes) in [
            ("buffer_minutes", self.buffer_minutes),
            ("default_duration_minutes", self.default_duration_minutes),
        ] {
            if minutes > MINUTES_PER_DAY {
                return Err(format!(
                    "{name} must be at most {MINUTES_PER_DAY}, got {minutes}"
                ));
            }
        }
        if self.max_primary_recover_low > self.max_primary {
            return Err(format!(
                "max_primary_recover_low ({}) must not exceed max_primary ({})",
                self.max_primary_recover_low, self.max_primary
            ));
        }
        Ok(())
    }

    /// Primary capacity for a session.
    pub fn primary_cap(&self, session: &Session) -> usize {
        if session.is_recover_low() {
            self.max_primary_recover_low
        } else {
            self.max_primary
        }
    }
}

/// Borrowed inputs for one planning request.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    /// Full, unfiltered pool
    pub events: &'a [Event],
    pub persona: &'a Persona,
    pub session: &'a Session,
    pub feedback: &'a [Feedback],
    pub hidden_ids: Option<&'a HashSet<String>>,
}

impl<'a> PlanRequest<'a> {
    pub fn new(events: &'a [Event], persona: &'a Persona, session: &'a Session) -> Self {
        Self {
            events,
            persona,
            session,
            feedback: &[],
            hidden_ids: None,
        }
    }

    pub fn with_feedback(mut self, feedback: &'a [Feedback]) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_hidden_ids(mut self, hidden_ids: &'a HashSet<String>) -> Self {
        self.hidden_ids = Some(hidden_ids);
        self
    }

    fn is_hidden(&self, id: &str) -> bool {
        self.hidden_ids.is_some_and(|ids| ids.contains(id))
    }
}

/// Counts over a finished plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub days: usize,
    pub primary: usize,
    pub optional: usize,
}

impl PlanSummary {
    pub fn of(plans: &[DayPlan]) -> Self {
        plans.iter().fold(Self::default(), |acc, day| Self {
            days: acc.days + 1,
            primary: acc.primary + day.primary.len(),
            optional: acc.optional + day.optional.len(),
        })
    }
}

/// Arena indices assigned to the two tiers of one day.
#[derive(Debug, Default)]
struct DayAssignment {
    primary: Vec<usize>,
    /// Index and whether it collides with a primary pick
    optional: Vec<(usize, bool)>,
}

/// Greedy day-plan builder
#[derive(Debug, Clone, Default)]
pub struct ScheduleBuilder {
    engine: ScoringEngine,
    limits: ScheduleLimits,
}

impl ScheduleBuilder {
    /// Create a builder with default weights and limits
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: ScoringEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_limits(mut self, limits: ScheduleLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn limits(&self) -> &ScheduleLimits {
        &self.limits
    }

    /// Build day plans, sorted by date.
    pub fn build(&self, request: &PlanRequest<'_>) -> Vec<DayPlan> {
        let ctx = ScoringContext::new(
            request.persona,
            request.session,
            request.events,
            request.feedback,
        );

        let arena: Vec<ScoredEvent> = filter_events(request.events, request.persona, request.session)
            .into_iter()
            .map(|event| ScoredEvent {
                event: event.clone(),
                score: self.engine.score_value(&ctx, event),
                reasons: explain(event, &ctx),
                tier: Tier::Primary,
                time_conflict: false,
            })
            .collect();
        let windows: Vec<Option<TimeWindow>> = arena
            .iter()
            .map(|scored| TimeWindow::of(&scored.event, &self.limits))
            .collect();

        let mut days: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
        for (index, scored) in arena.iter().enumerate() {
            days.entry(scored.event.date).or_default().push(index);
        }

        let plans: Vec<DayPlan> = days
            .into_iter()
            .map(|(date, mut order)| {
                order.sort_by(|a, b| arena[*b].score.total_cmp(&arena[*a].score));
                let assignment = self.assign_day(&arena, &windows, &order, request);
                materialize(date, &arena, assignment)
            })
            .collect();

        let summary = PlanSummary::of(&plans);
        tracing::debug!(
            candidates = request.events.len(),
            eligible = arena.len(),
            days = summary.days,
            primary = summary.primary,
            optional = summary.optional,
            "plan built"
        );
        plans
    }

    /// One ordered pass over a day's events, best score first.
    fn assign_day(
        &self,
        arena: &[ScoredEvent],
        windows: &[Option<TimeWindow>],
        order: &[usize],
        request: &PlanRequest<'_>,
    ) -> DayAssignment {
        let session = request.session;
        let cap = self.limits.primary_cap(session);

        order
            .iter()
            .copied()
            .filter(|&index| !request.is_hidden(&arena[index].event.id))
            .fold(DayAssignment::default(), |mut day, index| {
                let collision = windows[index].is_some_and(|window| {
                    day.primary
                        .iter()
                        .filter_map(|&p| windows[p])
                        .any(|accepted| accepted.collides(&window))
                });
                let blocked = blocked_by_mood(&arena[index], &day.primary, arena, session);

                if !collision && !blocked && day.primary.len() < cap {
                    day.primary.push(index);
                } else if day.optional.len() < self.limits.max_optional {
                    day.optional.push((index, collision));
                } else {
                    tracing::trace!(event = %arena[index].event.id, "dropped, day is full");
                }
                day
            })
    }
}

/// Whether the session's mood keeps `candidate` out of the primary tier.
fn blocked_by_mood(
    candidate: &ScoredEvent,
    primary: &[usize],
    arena: &[ScoredEvent],
    session: &Session,
) -> bool {
    if session.is_recover_low() {
        return candidate.is_high_stimulation();
    }
    if session.energy == Energy::Low {
        return candidate.event.social_density > CROWDED_DENSITY
            && primary
                .iter()
                .any(|&p| arena[p].event.social_density > CROWDED_DENSITY);
    }
    false
}

fn materialize(date: NaiveDate, arena: &[ScoredEvent], assignment: DayAssignment) -> DayPlan {
    let mut primary: Vec<ScoredEvent> = assignment
        .primary
        .into_iter()
        .map(|index| ScoredEvent {
            tier: Tier::Primary,
            time_conflict: false,
            ..arena[index].clone()
        })
        .collect();
    let mut optional: Vec<ScoredEvent> = assignment
        .optional
        .into_iter()
        .map(|(index, time_conflict)| ScoredEvent {
            tier: Tier::Optional,
            time_conflict,
            ..arena[index].clone()
        })
        .collect();

    sort_by_start(&mut primary);
    sort_by_start(&mut optional);
    DayPlan {
        date,
        primary,
        optional,
    }
}

/// Ascending start time, unknown start times last. Stable.
fn sort_by_start(events: &mut [ScoredEvent]) {
    events.sort_by_key(|scored| (scored.event.start_time.is_none(), scored.event.start_time));
}
