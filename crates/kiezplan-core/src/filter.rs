//! Hard eligibility constraints.
//!
//! Every predicate is a pure check on one event; an event is eligible when
//! all of them pass. Unknown prices, districts and start times pass.

use std::fmt;

use crate::event::Event;
use crate::persona::Persona;
use crate::session::Session;

/// First constraint an event failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    OutsideDateRange,
    OverSessionBudget { price: f64, budget: f64 },
    OverPersonaBudget { price: f64, budget: f64 },
    DistrictNotAllowed(String),
    HardNope(String),
    BeforeEarliestStart,
    AfterLatestStart,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutsideDateRange => write!(f, "outside the requested dates"),
            Rejection::OverSessionBudget { price, budget } => {
                write!(f, "costs {price} EUR, over today's budget of {budget}")
            }
            Rejection::OverPersonaBudget { price, budget } => {
                write!(f, "costs {price} EUR, over the persona budget of {budget}")
            }
            Rejection::DistrictNotAllowed(d) => write!(f, "district {d} is not allowed"),
            Rejection::HardNope(tag) => write!(f, "'{tag}' is a hard no"),
            Rejection::BeforeEarliestStart => write!(f, "starts too early"),
            Rejection::AfterLatestStart => write!(f, "starts too late"),
        }
    }
}

/// Eligibility filter for one persona and session.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter<'a> {
    persona: &'a Persona,
    session: &'a Session,
}

impl<'a> EventFilter<'a> {
    pub fn new(persona: &'a Persona, session: &'a Session) -> Self {
        Self { persona, session }
    }

    /// `Ok` if the event passes every constraint.
    pub fn check(&self, event: &Event) -> Result<(), Rejection> {
        self.check_dates(event)?;
        self.check_budget(event)?;
        self.check_district(event)?;
        self.check_nopes(event)?;
        self.check_start_window(event)
    }

    pub fn accepts(&self, event: &Event) -> bool {
        match self.check(event) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::trace!(event = %event.id, %rejection, "event filtered out");
                false
            }
        }
    }

    fn check_dates(&self, event: &Event) -> Result<(), Rejection> {
        if event.date < self.session.date_from || event.date > self.session.date_to {
            return Err(Rejection::OutsideDateRange);
        }
        Ok(())
    }

    fn check_budget(&self, event: &Event) -> Result<(), Rejection> {
        let Some(price) = event.price_min else {
            return Ok(());
        };
        if let Some(budget) = self.session.budget_today {
            if price > budget {
                return Err(Rejection::OverSessionBudget { price, budget });
            }
        }
        if let Some(budget) = self.persona.constraint_budget_max {
            if price > budget {
                return Err(Rejection::OverPersonaBudget { price, budget });
            }
        }
        Ok(())
    }

    fn check_district(&self, event: &Event) -> Result<(), Rejection> {
        if !self.persona.constraint_district_strict {
            return Ok(());
        }
        let Some(district) = event.district.as_deref() else {
            return Ok(());
        };
        let home = &self.persona.home_base_districts;
        let focus = &self.session.district_focus;
        if home.is_empty() && focus.is_empty() {
            return Ok(());
        }
        if home.contains(district) || focus.contains(district) {
            Ok(())
        } else {
            Err(Rejection::DistrictNotAllowed(district.to_string()))
        }
    }

    fn check_nopes(&self, event: &Event) -> Result<(), Rejection> {
        let nopes = &self.persona.hard_nopes;
        if nopes.contains(&event.category) {
            return Err(Rejection::HardNope(event.category.clone()));
        }
        match event.subtags.iter().find(|tag| nopes.contains(*tag)) {
            Some(tag) => Err(Rejection::HardNope(tag.clone())),
            None => Ok(()),
        }
    }

    fn check_start_window(&self, event: &Event) -> Result<(), Rejection> {
        let Some(start) = event.start_time else {
            return Ok(());
        };
        if let Some(earliest) = self.persona.constraint_earliest_start {
            if start < earliest {
                return Err(Rejection::BeforeEarliestStart);
            }
        }
        if let Some(latest) = self.persona.constraint_latest_start {
            if start > latest {
                return Err(Rejection::AfterLatestStart);
            }
        }
        Ok(())
    }
}

/// Events from `events` that pass every constraint, in input order.
pub fn filter_events<'e>(events: &'e [Event], persona: &Persona, session: &Session) -> Vec<&'e Event> {
    let filter = EventFilter::new(persona, session);
    events.iter().filter(|event| filter.accepts(event)).collect()
}
