//! Error types for the event domain
use chrono::NaiveDateTime;

/// Failures surfaced by the event service and its supporting codecs.
///
/// `InvalidId` and `Invalid` are caller mistakes, `NotFound` is a missing
/// row, and the rest are server-side failures.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The identifier is neither a canonical UUID nor a base64-encoded one.
    #[error("invalid event id: {0}")]
    InvalidId(String),

    /// A stored availability range ends before it starts.
    #[error("malformed time range: {end} precedes {start}")]
    MalformedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// No event exists for the given identifier.
    #[error("event not found")]
    NotFound,

    /// A request payload failed domain validation.
    #[error("{0}")]
    Invalid(String),

    #[error("storage error: {0}")]
    Storage(#[from] tokio_rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
