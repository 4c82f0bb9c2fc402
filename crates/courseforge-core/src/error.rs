//! Error types for courseforge-core operations.

use thiserror::Error;

use crate::schedule::TimeOfDay;

#[derive(Error, Debug)]
pub enum CourseForgeError {
    #[error("Invalid time of day '{0}': expected zero-padded HH:MM")]
    InvalidTime(String),

    #[error("Invalid weekday '{0}': expected Monday through Friday")]
    InvalidWeekday(String),

    #[error("Invalid slot: end time {end} must be after start time {start}")]
    InvalidSlot { start: TimeOfDay, end: TimeOfDay },

    #[error("Invalid student identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Invalid date-time '{0}': expected YYYY-MM-DD[THH:MM[:SS]] or RFC 3339")]
    InvalidDateTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Projection horizon of {0} days exceeds the supported date range")]
    HorizonOverflow(u32),

    #[error("Invalid schedule document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CourseForgeError>;
