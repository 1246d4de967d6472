//! Buffered time windows and collision detection.
//!
//! Times are minutes since midnight. Adding minutes caps the hour at
//! [`ScheduleLimits::last_hour`] but keeps the minute component, so
//! `23:45 + 30` yields `23:15`.

use crate::event::{minutes_of, Event};

use super::ScheduleLimits;

/// Add `minutes` to a clock time, capping the hour.
pub fn add_capped(clock: u32, minutes: u32, last_hour: u32) -> u32 {
    let total = clock.saturating_add(minutes);
    (total / 60).min(last_hour) * 60 + total % 60
}

/// Start and buffered end of an event, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
    pub buffered_end: u32,
}

impl TimeWindow {
    /// `None` when the start time is unknown.
    pub fn of(event: &Event, limits: &ScheduleLimits) -> Option<Self> {
        let start = minutes_of(event.start_time?);
        let end = match event.end_time {
            Some(end) => minutes_of(end),
            None => add_capped(start, limits.default_duration_minutes, limits.last_hour),
        };
        Some(Self {
            start,
            end,
            buffered_end: add_capped(end, limits.buffer_minutes, limits.last_hour),
        })
    }

    pub fn collides(&self, other: &TimeWindow) -> bool {
        self.start < other.buffered_end && other.start < self.buffered_end
    }
}

/// True if both events have known start times and their buffered windows
/// overlap.
pub fn collides(a: &Event, b: &Event, limits: &ScheduleLimits) -> bool {
    match (TimeWindow::of(a, limits), TimeWindow::of(b, limits)) {
        (Some(a), Some(b)) => a.collides(&b),
        _ => false,
    }
}
