//! Event domain: group events and participant availability
//!
//! An organizer creates an event with candidate dates and a daily time
//! window; participants then submit the 30-minute slots they can make.
//! Submissions are stored compressed as contiguous ranges and expanded
//! back to slots when the event is read.
pub mod db;
mod error;
mod id;
mod slots;

pub use error::EventError;
pub use id::EventId;
pub use slots::{DEFAULT_SLOT_GAP_MINS, TimeRange, ranges_to_slots, slots_to_ranges};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduling event as stored and returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Whether `dates` are concrete calendar dates or stand in for a
    /// repeating weekday pattern
    pub is_specific_dates: bool,
    pub dates: Vec<NaiveDate>,
}

/// Organizer input for creating an event; the id is assigned on insert
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub is_specific_dates: bool,
    pub dates: Vec<NaiveDate>,
}

/// One participant's availability for one event.
///
/// At most one response exists per `(event_id, alias)`; resubmitting
/// replaces the previous availability wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    #[serde(skip_deserializing)]
    pub event_id: EventId,
    pub user_id: Option<Uuid>,
    pub alias: String,
    pub availabilities: Vec<NaiveDateTime>,
}

/// True when `start` comes before `end` within one day. Midnight as an
/// end time means end-of-day and is after every start time.
pub fn times_chronological(start: NaiveTime, end: NaiveTime) -> bool {
    end == NaiveTime::MIN || start < end
}

impl NewEvent {
    /// Re-check the field-level invariants. The HTTP layer validates
    /// requests before they reach the service, but these rules are
    /// domain invariants and hold for any caller.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.name.trim().is_empty() {
            return Err(EventError::Invalid("name must not be empty".to_string()));
        }
        if self.dates.is_empty() {
            return Err(EventError::Invalid(
                "dates must contain at least one date".to_string(),
            ));
        }
        if !times_chronological(self.start_time, self.end_time) {
            return Err(EventError::Invalid(
                "end_time must come after start_time".to_string(),
            ));
        }
        Ok(())
    }
}

impl EventResponse {
    pub fn validate(&self) -> Result<(), EventError> {
        if self.alias.trim().is_empty() {
            return Err(EventError::Invalid("alias must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewEvent {
        NewEvent {
            name: "team offsite".to_string(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            is_specific_dates: true,
            dates: vec![NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()],
        }
    }

    #[test]
    fn it_accepts_a_well_formed_event() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn it_rejects_an_empty_name() {
        let mut event = draft();
        event.name = "  ".to_string();
        assert!(matches!(event.validate(), Err(EventError::Invalid(_))));
    }

    #[test]
    fn it_rejects_an_empty_date_list() {
        let mut event = draft();
        event.dates.clear();
        assert!(matches!(event.validate(), Err(EventError::Invalid(_))));
    }

    #[test]
    fn it_rejects_an_inverted_time_window() {
        let mut event = draft();
        event.end_time = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
        assert!(matches!(event.validate(), Err(EventError::Invalid(_))));
    }

    #[test]
    fn it_treats_a_midnight_end_as_end_of_day() {
        let mut event = draft();
        event.end_time = NaiveTime::MIN;
        assert!(event.validate().is_ok());
    }
}
