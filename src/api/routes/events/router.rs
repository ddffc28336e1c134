//! Router for the events API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde_json::{Value, json};

use super::public;
use crate::api::state::AppState;
use crate::event::{self, EventId, EventResponse, NewEvent};

type SharedState = Arc<RwLock<AppState>>;

// Create event endpoint
async fn add_event(
    State(state): State<SharedState>,
    axum::Json(draft): axum::Json<NewEvent>,
) -> Result<axum::Json<Value>, crate::api::public::ApiError> {
    draft.validate()?;

    let db = state.read().unwrap().db.clone();
    let id = event::db::add_event(&db, draft).await?;

    Ok(axum::Json(json!({ "event_id": id })))
}

// View event endpoint, returns the event along with every
// participant's availability expanded to discrete slots
async fn get_event(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
) -> Result<axum::Json<public::GetEventResponse>, crate::api::public::ApiError> {
    let id = EventId::decode(&event_id)?;
    let (db, slot_gap) = {
        let shared_state = state.read().unwrap();
        (shared_state.db.clone(), shared_state.config.slot_gap())
    };

    let (event, responses) = event::db::get_event(&db, id, slot_gap).await?;

    Ok(axum::Json(public::GetEventResponse { event, responses }))
}

// Submit availability endpoint; a resubmission for the same alias
// replaces the earlier one
async fn upsert_availability(
    State(state): State<SharedState>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<public::AvailabilityRequest>,
) -> Result<axum::Json<Value>, crate::api::public::ApiError> {
    let id = EventId::decode(&event_id)?;
    let response = EventResponse {
        event_id: id,
        user_id: request.user_id,
        alias: request.alias,
        availabilities: request.availabilities,
    };
    response.validate()?;

    let (db, slot_gap) = {
        let shared_state = state.read().unwrap();
        (shared_state.db.clone(), shared_state.config.slot_gap())
    };

    event::db::upsert_availability(&db, response, slot_gap).await?;

    Ok(axum::Json(json!({ "success": true })))
}

/// Create the events router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(add_event))
        .route("/{event_id}", get(get_event))
        .route("/{event_id}/availability", post(upsert_availability))
}
