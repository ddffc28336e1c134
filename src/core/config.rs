use std::env;

use chrono::Duration;

use crate::event::DEFAULT_SLOT_GAP_MINS;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    pub slot_gap_mins: i64,
}

impl AppConfig {
    /// Spacing between adjacent availability slots. Carried in config
    /// and passed into the slot converter explicitly so tests can vary
    /// it without touching process-wide state.
    pub fn slot_gap(&self) -> Duration {
        Duration::minutes(self.slot_gap_mins)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("HUDDLE_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/huddle.db", storage_path);
        let slot_gap_mins = env::var("HUDDLE_SLOT_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|mins| *mins > 0)
            .unwrap_or(DEFAULT_SLOT_GAP_MINS);

        Self {
            db_path,
            slot_gap_mins,
        }
    }
}
