//! Academic level from a student identifier.
//!
//! Identifiers look like `"PS/ITC/21/0001"`: department, programme, two-digit
//! enrollment year, serial. The level is the number of academic years since
//! enrollment, expressed as 100..=400. Academic years begin on 1 August.
//!
//! [`level`] is deliberately lenient: any identifier it cannot read is level 100.
//! [`StudentIdentifier`] is the strict parser for callers that need to reject
//! bad input instead.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CourseForgeError, Result};

/// First month (1-based) of an academic year.
const ACADEMIC_YEAR_START_MONTH: u32 = 8;

/// Class standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Level {
    L100,
    L200,
    L300,
    L400,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::L100, Level::L200, Level::L300, Level::L400];

    pub fn value(self) -> u16 {
        match self {
            Level::L100 => 100,
            Level::L200 => 200,
            Level::L300 => 300,
            Level::L400 => 400,
        }
    }

    pub fn from_value(value: u16) -> Option<Self> {
        Level::ALL.into_iter().find(|level| level.value() == value)
    }

    /// Level after `years` completed academic years, clamped to 100..=400.
    pub fn from_years_enrolled(years: i32) -> Self {
        match years {
            i32::MIN..=0 => Level::L100,
            1 => Level::L200,
            2 => Level::L300,
            _ => Level::L400,
        }
    }
}

impl From<Level> for u16 {
    fn from(level: Level) -> Self {
        level.value()
    }
}

impl TryFrom<u16> for Level {
    type Error = String;

    fn try_from(value: u16) -> std::result::Result<Self, Self::Error> {
        Level::from_value(value).ok_or_else(|| format!("{} is not a level", value))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Academic year containing `today`, named by the calendar year it starts in.
///
/// July 2025 belongs to academic year 2024; August 2025 starts academic year 2025.
pub fn academic_year(today: NaiveDate) -> i32 {
    if today.month() < ACADEMIC_YEAR_START_MONTH {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Level of the student identified by `identifier` on `today`.
///
/// Identifiers with fewer than three `/`-separated parts, or whose third part
/// is not exactly two ASCII digits, are level 100.
pub fn level(identifier: &str, today: NaiveDate) -> Level {
    match identifier.split('/').nth(2).and_then(parse_year_suffix) {
        Some(suffix) => level_for_enrollment(2000 + i32::from(suffix), today),
        None => {
            tracing::debug!(identifier, "unreadable student identifier, defaulting to level 100");
            Level::L100
        }
    }
}

/// [`level`] using the clock's current date.
pub fn level_today<C: Clock>(identifier: &str, clock: C) -> Level {
    level(identifier, clock.today())
}

fn level_for_enrollment(enrollment_year: i32, today: NaiveDate) -> Level {
    Level::from_years_enrolled(academic_year(today) - enrollment_year)
}

fn parse_year_suffix(part: &str) -> Option<u8> {
    let bytes = part.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some((bytes[0] - b'0') * 10 + (bytes[1] - b'0'))
}

/// A strictly parsed `<DEPT>/<PROGRAM>/<YY>/<SERIAL>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentIdentifier {
    pub department: String,
    pub program: String,
    pub enrollment_year_suffix: u8,
    pub serial: String,
}

impl StudentIdentifier {
    /// Calendar year the student enrolled, e.g. 2021 for `"21"`.
    pub fn enrollment_year(&self) -> i32 {
        2000 + i32::from(self.enrollment_year_suffix)
    }

    pub fn level(&self, today: NaiveDate) -> Level {
        level_for_enrollment(self.enrollment_year(), today)
    }
}

impl FromStr for StudentIdentifier {
    type Err = CourseForgeError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('/').collect();
        let [department, program, year, serial] = parts.as_slice() else {
            return Err(CourseForgeError::InvalidIdentifier(format!(
                "'{}' must have four '/'-separated parts",
                s
            )));
        };
        if [department, program, serial].iter().any(|p| p.trim().is_empty()) {
            return Err(CourseForgeError::InvalidIdentifier(format!(
                "'{}' has an empty part",
                s
            )));
        }
        let enrollment_year_suffix = parse_year_suffix(year).ok_or_else(|| {
            CourseForgeError::InvalidIdentifier(format!(
                "'{}' year part '{}' must be two digits",
                s, year
            ))
        })?;

        Ok(Self {
            department: (*department).to_string(),
            program: (*program).to_string(),
            enrollment_year_suffix,
            serial: (*serial).to_string(),
        })
    }
}

impl fmt::Display for StudentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:02}/{}",
            self.department, self.program, self.enrollment_year_suffix, self.serial
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn academic_year_turns_over_on_first_of_august() {
        assert_eq!(academic_year(date(2025, 7, 31)), 2024);
        assert_eq!(academic_year(date(2025, 8, 1)), 2025);
        assert_eq!(academic_year(date(2025, 1, 1)), 2024);
        assert_eq!(academic_year(date(2024, 12, 31)), 2024);
    }

    #[test]
    fn years_enrolled_are_clamped() {
        assert_eq!(Level::from_years_enrolled(-5), Level::L100);
        assert_eq!(Level::from_years_enrolled(0), Level::L100);
        assert_eq!(Level::from_years_enrolled(1), Level::L200);
        assert_eq!(Level::from_years_enrolled(2), Level::L300);
        assert_eq!(Level::from_years_enrolled(3), Level::L400);
        assert_eq!(Level::from_years_enrolled(40), Level::L400);
    }

    #[test]
    fn year_suffix_requires_two_ascii_digits() {
        assert_eq!(parse_year_suffix("21"), Some(21));
        assert_eq!(parse_year_suffix("07"), Some(7));
        assert_eq!(parse_year_suffix("2"), None);
        assert_eq!(parse_year_suffix("021"), None);
        assert_eq!(parse_year_suffix("2a"), None);
        assert_eq!(parse_year_suffix("٢١"), None);
    }

    #[test]
    fn level_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Level::L300).unwrap(), "300");
        let back: Level = serde_json::from_str("200").unwrap();
        assert_eq!(back, Level::L200);
        assert!(serde_json::from_str::<Level>("250").is_err());
    }
}
