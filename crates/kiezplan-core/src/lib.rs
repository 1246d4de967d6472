//! # Kiezplan Core Library
//!
//! Scores a city's event catalogue against who a user is (persona) and how
//! they feel right now (session), then assembles a short, conflict-free plan
//! for each day.
//!
//! ## Architecture
//!
//! - **Filter**: hard eligibility constraints (dates, budget, districts,
//!   hard nopes, start window)
//! - **Scoring**: five weighted sub-scores followed by mood guardrails that
//!   can override persona preference
//! - **Explainer**: up to two human-readable reasons per event
//! - **Scheduler**: greedy per-day assignment into primary and optional tiers
//!   with buffered collision checks
//! - **Storage**: TOML configuration for weights, limits, travel times and
//!   user-defined personas
//!
//! The engine is pure and synchronous. Missing data (district, start time,
//! price) is a neutral signal, never an error.
//!
//! ## Key Components
//!
//! - [`ScheduleBuilder`]: end-to-end planning for one request
//! - [`ScoringEngine`]: per-event score with a full breakdown
//! - [`PersonaRepository`]: explicit persona lookup with a neutral fallback
//! - [`Config`]: engine configuration management

pub mod error;
pub mod event;
pub mod explain;
pub mod filter;
pub mod persona;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod travel;

pub use error::{ConfigError, CoreError, ValidationError};
pub use event::{hidden_ids, validate_pool, Event, Feedback, FeedbackType};
pub use explain::{explain, Reason};
pub use filter::{filter_events, EventFilter, Rejection};
pub use persona::{Persona, PersonaPreset, PersonaRepository, PresetPersonas};
pub use scheduler::{DayPlan, PlanRequest, PlanSummary, ScheduleBuilder, ScheduleLimits, ScoredEvent, Tier};
pub use scoring::{GuardrailTuning, ScoreBreakdown, ScoringContext, ScoringEngine, ScoringWeights};
pub use session::{Energy, Intent, Session, SocialMode};
pub use storage::Config;
pub use travel::{TravelLeg, TravelTimes};
