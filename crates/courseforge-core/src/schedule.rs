//! Weekly schedule model -- weekdays, wall-clock times, slots and schedules.
//!
//! Time strings are parsed once here, at the data boundary. Everything
//! downstream (projection, clash detection) works on validated values, so a
//! malformed `"HH:MM"` string or an inverted slot is rejected before any
//! occurrence is computed.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{CourseForgeError, Result};

/// Teaching day of the week. Weekend days are not part of the lecture model.
///
/// Deserializes through [`FromStr`], so JSON documents accept the same
/// spellings as form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching days, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
        }
    }

    /// Map a chrono weekday back to a teaching day. Saturday and Sunday map to `None`.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = CourseForgeError;

    /// Parse a full day name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Weekday::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CourseForgeError::InvalidWeekday(s.to_string()))
    }
}

impl TryFrom<String> for Weekday {
    type Error = CourseForgeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// A wall-clock time of day with minute precision.
///
/// Only zero-padded 24-hour `"HH:MM"` strings are accepted, so ordering of
/// `TimeOfDay` values agrees with lexicographic ordering of their source strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build a time from an hour (0-23) and minute (0-59).
    pub fn from_hm(hour: u32, minute: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| CourseForgeError::InvalidTime(format!("{:02}:{:02}", hour, minute)))
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(self) -> NaiveTime {
        self.0
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(self) -> u32 {
        self.hour() * 60 + self.minute()
    }
}

impl FromStr for TimeOfDay {
    type Err = CourseForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CourseForgeError::InvalidTime(s.to_string());

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let hour = u32::from(bytes[0] - b'0') * 10 + u32::from(bytes[1] - b'0');
        let minute = u32::from(bytes[3] - b'0') * 10 + u32::from(bytes[4] - b'0');
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CourseForgeError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// One weekly occurrence template: a teaching day plus a start and end time.
///
/// Invariant: `end > start`. Enforced by [`WeeklySlot::new`] and on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawWeeklySlot")]
pub struct WeeklySlot {
    day: Weekday,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeeklySlot {
    day: Weekday,
    start_time: TimeOfDay,
    end_time: TimeOfDay,
}

impl TryFrom<RawWeeklySlot> for WeeklySlot {
    type Error = CourseForgeError;

    fn try_from(raw: RawWeeklySlot) -> Result<Self> {
        WeeklySlot::new(raw.day, raw.start_time, raw.end_time)
    }
}

impl WeeklySlot {
    /// # Errors
    /// Returns `CourseForgeError::InvalidSlot` unless `end` is strictly after `start`.
    pub fn new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Result<Self> {
        if end <= start {
            return Err(CourseForgeError::InvalidSlot { start, end });
        }
        Ok(Self {
            day,
            start_time: start,
            end_time: end,
        })
    }

    /// Validate raw form input (`"Monday"`, `"09:00"`, `"11:00"`) into a slot.
    ///
    /// # Errors
    /// Returns `InvalidWeekday`, `InvalidTime` or `InvalidSlot` for the first
    /// field that fails validation.
    pub fn parse(day: &str, start: &str, end: &str) -> Result<Self> {
        Self::new(day.parse()?, start.parse()?, end.parse()?)
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start_time
    }

    pub fn end(&self) -> TimeOfDay {
        self.end_time
    }

    pub fn duration_minutes(&self) -> i64 {
        i64::from(self.end_time.minutes_since_midnight())
            - i64::from(self.start_time.minutes_since_midnight())
    }
}

/// A named weekly activity (usually a course's lectures) with its time slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSchedule")]
pub struct RecurringSchedule {
    /// Opaque identifier (e.g. the course document id).
    pub id: String,
    /// Display name, copied onto every occurrence.
    pub label: String,
    /// Free-text venue.
    pub location: String,
    /// Slots in weekday order, Monday first; same-day slots by start then end.
    /// Exact duplicates are removed.
    pub slots: Vec<WeeklySlot>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchedule {
    id: String,
    label: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    slots: Vec<WeeklySlot>,
}

impl From<RawSchedule> for RecurringSchedule {
    fn from(raw: RawSchedule) -> Self {
        RecurringSchedule::new(raw.id, raw.label, raw.location, raw.slots)
    }
}

impl RecurringSchedule {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        location: impl Into<String>,
        mut slots: Vec<WeeklySlot>,
    ) -> Self {
        slots.sort_by_key(|slot| (slot.day, slot.start_time, slot.end_time));
        slots.dedup();
        Self {
            id: id.into(),
            label: label.into(),
            location: location.into(),
            slots,
        }
    }
}

/// Parse a JSON array of schedules, validating every slot.
///
/// # Errors
/// Returns `CourseForgeError::Json` if the document is malformed or any slot
/// fails validation; the message names the offending value.
pub fn parse_schedules(json: &str) -> Result<Vec<RecurringSchedule>> {
    let schedules: Vec<RecurringSchedule> = serde_json::from_str(json)?;
    tracing::debug!(
        schedules = schedules.len(),
        slots = schedules.iter().map(|s| s.slots.len()).sum::<usize>(),
        "parsed schedule document"
    );
    Ok(schedules)
}
