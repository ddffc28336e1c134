//! Public types for the events API
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::event::{Event, EventResponse, NewEvent};

/// One participant's submitted availability. The event id comes from
/// the URL, not the body.
#[derive(Deserialize)]
pub struct AvailabilityRequest {
    pub user_id: Option<Uuid>,
    pub alias: String,
    pub availabilities: Vec<NaiveDateTime>,
}

#[derive(Serialize)]
pub struct GetEventResponse {
    pub event: Event,
    pub responses: Vec<EventResponse>,
}
