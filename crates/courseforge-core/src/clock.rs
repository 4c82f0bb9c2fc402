//! Injectable sources for "now".
//!
//! Projection and level calculation depend on the current instant. Taking it
//! through [`Clock`] keeps both pure and lets tests pin time with [`FixedClock`].
//!
//! All times in this crate are naive wall-clock values in one zone. A
//! [`ZonedClock`] reports the system time as wall-clock time in its zone; that
//! zone must be the same one the schedule slots are written in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::{CourseForgeError, Result};

pub trait Clock {
    /// Current wall-clock date-time.
    fn now(&self) -> NaiveDateTime;

    /// Current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Reads the system clock and converts it into an IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Build a clock from an IANA name such as `"Africa/Accra"`.
    ///
    /// # Errors
    /// Returns `CourseForgeError::InvalidTimezone` if the name is unknown.
    pub fn from_name(name: &str) -> Result<Self> {
        parse_timezone(name).map(Self::new)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// System clock in UTC.
pub type SystemClock = ZonedClock;

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// Look up an IANA timezone by name.
///
/// # Errors
/// Returns `CourseForgeError::InvalidTimezone` if the name is unknown.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| CourseForgeError::InvalidTimezone(name.to_string()))
}

/// Parse a user-supplied instant into wall-clock time in `tz`.
///
/// RFC 3339 strings carry their own offset and are converted into `tz`. Naive
/// forms (`2026-03-05T10:00:00`, `2026-03-05T10:00`, `2026-03-05 10:00`, or a
/// bare date meaning midnight) are taken as already being wall-clock time.
///
/// # Errors
/// Returns `CourseForgeError::InvalidDateTime` if no form matches.
pub fn parse_wall_clock(input: &str, tz: Tz) -> Result<NaiveDateTime> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|date| date.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| CourseForgeError::InvalidDateTime(input.to_string()))
}
