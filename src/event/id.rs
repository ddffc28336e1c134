//! Short, URL-safe event identifiers
//!
//! Event ids appear directly in shareable URLs so the public form is a
//! 22-character unpadded base64 encoding of the raw UUID bytes. Older
//! links and database rows carry the canonical hyphenated form, so
//! parsing accepts either representation.
use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::error::EventError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(Uuid);

impl EventId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The short URL-safe form, always 22 characters
    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    /// The canonical hyphenated form used for storage
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Parse either the canonical hyphenated form or the short
    /// base64-encoded form, trying the canonical form first.
    pub fn decode(s: &str) -> Result<Self, EventError> {
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(Self(id));
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|_| EventError::InvalidId(s.to_string()))?;
        let id = Uuid::from_slice(&bytes).map_err(|_| EventError::InvalidId(s.to_string()))?;
        Ok(Self(id))
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl FromStr for EventId {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Serializes as the short form so responses always hand out short URLs
impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
