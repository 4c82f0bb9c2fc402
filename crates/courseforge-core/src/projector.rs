//! Weekly slot projection -- turns recurring schedules into concrete upcoming occurrences.
//!
//! The projection window is a range of calendar dates, inclusive at both ends,
//! starting at `from`'s date. Instants are then filtered against the current
//! time, which is read separately from `from`: a slot earlier today than "now"
//! is dropped even though its date is inside the window.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CourseForgeError, Result};
use crate::schedule::{RecurringSchedule, Weekday, WeeklySlot};

/// One concrete, dated instance of a schedule's weekly slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// `"<schedule id>-<YYYY-MM-DD>"`, with the slot's start (and end, if
    /// needed) appended when the schedule meets more than once that weekday.
    pub id: String,
    pub schedule_id: String,
    pub label: String,
    pub location: String,
    pub day: Weekday,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
}

impl Occurrence {
    pub fn date(&self) -> NaiveDate {
        self.start_at.date()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_at - self.start_at).num_minutes()
    }
}

/// Project schedules over `[from.date, from.date + horizon_days]`, reading "now" from `clock`.
///
/// The clock is read exactly once, so every occurrence in the result is
/// filtered against the same instant.
///
/// # Errors
/// Returns `CourseForgeError::HorizonOverflow` if the window end is not a representable date.
pub fn project<C: Clock>(
    schedules: &[RecurringSchedule],
    from: NaiveDateTime,
    horizon_days: u32,
    clock: C,
) -> Result<Vec<Occurrence>> {
    project_occurrences(schedules, from, horizon_days, clock.now())
}

/// Project schedules into occurrences strictly after `now`, sorted by start.
///
/// # Arguments
/// - `schedules` -- Validated schedules; may be empty
/// - `from` -- Anchor of the date window (only its date is used)
/// - `horizon_days` -- Number of days after `from`'s date to include
/// - `now` -- Current wall-clock instant; occurrences at or before it are dropped
///
/// Every slot instant in the window that is still upcoming yields an
/// occurrence. Ties on `start_at` across schedules keep the input order of
/// `schedules`.
///
/// # Errors
/// Returns `CourseForgeError::HorizonOverflow` if the window end is not a representable date.
pub fn project_occurrences(
    schedules: &[RecurringSchedule],
    from: NaiveDateTime,
    horizon_days: u32,
    now: NaiveDateTime,
) -> Result<Vec<Occurrence>> {
    let first = from.date();
    let last = first
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .ok_or(CourseForgeError::HorizonOverflow(horizon_days))?;

    let mut occurrences = Vec::new();

    for schedule in schedules {
        let before = occurrences.len();

        for slot in &schedule.slots {
            let id_format = IdFormat::for_slot(schedule, slot);
            occurrences.extend(
                matching_dates(slot.day(), first, last)
                    .map(|date| build_occurrence(schedule, slot, date, id_format))
                    .filter(|occurrence| occurrence.start_at > now),
            );
        }

        tracing::trace!(
            schedule_id = %schedule.id,
            slots = schedule.slots.len(),
            occurrences = occurrences.len() - before,
            "projected schedule"
        );
    }

    // Stable: equal instants keep schedule input order.
    occurrences.sort_by_key(|o| o.start_at);

    tracing::debug!(
        schedules = schedules.len(),
        %first,
        %last,
        %now,
        occurrences = occurrences.len(),
        "projected occurrences"
    );

    Ok(occurrences)
}

/// Dates in `[first, last]` that fall on `day`, ascending.
fn matching_dates(day: Weekday, first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let target = day.to_chrono().num_days_from_monday();
    let current = first.weekday().num_days_from_monday();
    let offset = (target + 7 - current) % 7;

    let start = first.checked_add_days(Days::new(u64::from(offset)));
    std::iter::successors(start, |date| date.checked_add_days(Days::new(7)))
        .take_while(move |date| *date <= last)
}

/// How much of the slot an occurrence id has to carry to stay unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdFormat {
    /// Only slot on its weekday: `c1-2026-03-09`.
    Date,
    /// Shares the weekday with another slot: `c1-2026-03-09T14:00`.
    DateStart,
    /// Shares the weekday and start time: `c1-2026-03-09T14:00-15:00`.
    DateStartEnd,
}

impl IdFormat {
    fn for_slot(schedule: &RecurringSchedule, slot: &WeeklySlot) -> Self {
        let same_day = schedule.slots.iter().filter(|s| s.day() == slot.day());
        if same_day.clone().count() == 1 {
            IdFormat::Date
        } else if same_day.filter(|s| s.start() == slot.start()).count() == 1 {
            IdFormat::DateStart
        } else {
            IdFormat::DateStartEnd
        }
    }
}

fn build_occurrence(
    schedule: &RecurringSchedule,
    slot: &WeeklySlot,
    date: NaiveDate,
    id_format: IdFormat,
) -> Occurrence {
    let id = match id_format {
        IdFormat::Date => format!("{}-{}", schedule.id, date.format("%Y-%m-%d")),
        IdFormat::DateStart => format!("{}-{}T{}", schedule.id, date.format("%Y-%m-%d"), slot.start()),
        IdFormat::DateStartEnd => format!(
            "{}-{}T{}-{}",
            schedule.id,
            date.format("%Y-%m-%d"),
            slot.start(),
            slot.end()
        ),
    };
    Occurrence {
        id,
        schedule_id: schedule.id.clone(),
        label: schedule.label.clone(),
        location: schedule.location.clone(),
        day: slot.day(),
        start_at: date.and_time(slot.start().as_naive()),
        end_at: date.and_time(slot.end().as_naive()),
    }
}

/// Earliest upcoming occurrence of a single schedule within the horizon.
///
/// # Errors
/// Same as [`project_occurrences`].
pub fn next_occurrence(
    schedule: &RecurringSchedule,
    now: NaiveDateTime,
    horizon_days: u32,
) -> Result<Option<Occurrence>> {
    Ok(
        project_occurrences(std::slice::from_ref(schedule), now, horizon_days, now)?
            .into_iter()
            .next(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matching_dates_starts_on_first_matching_weekday() {
        // 2026-03-05 is a Thursday.
        let dates: Vec<NaiveDate> =
            matching_dates(Weekday::Monday, date(2026, 3, 5), date(2026, 3, 19)).collect();
        assert_eq!(dates, vec![date(2026, 3, 9), date(2026, 3, 16)]);
    }

    #[test]
    fn matching_dates_includes_both_window_ends() {
        let dates: Vec<NaiveDate> =
            matching_dates(Weekday::Thursday, date(2026, 3, 5), date(2026, 3, 12)).collect();
        assert_eq!(dates, vec![date(2026, 3, 5), date(2026, 3, 12)]);
    }

    #[test]
    fn matching_dates_empty_when_window_too_short() {
        let dates: Vec<NaiveDate> =
            matching_dates(Weekday::Monday, date(2026, 3, 5), date(2026, 3, 6)).collect();
        assert!(dates.is_empty());
    }

    #[test_log::test]
    fn same_day_slots_each_yield_an_occurrence() {
        let schedule = RecurringSchedule::new(
            "c1",
            "Compilers",
            "LT 3",
            vec![
                WeeklySlot::parse("Monday", "14:00", "15:00").unwrap(),
                WeeklySlot::parse("Monday", "09:00", "10:00").unwrap(),
                WeeklySlot::parse("Wednesday", "09:00", "10:00").unwrap(),
            ],
        );
        // Sunday noon, so the whole of Monday is still ahead.
        let sunday = date(2026, 3, 8).and_hms_opt(12, 0, 0).unwrap();
        let result = project_occurrences(std::slice::from_ref(&schedule), sunday, 7, sunday).unwrap();

        let ids: Vec<&str> = result.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["c1-2026-03-09T09:00", "c1-2026-03-09T14:00", "c1-2026-03-11"]
        );

        // Once the morning slot has passed, the afternoon one is still projected.
        let noon = date(2026, 3, 9).and_hms_opt(12, 0, 0).unwrap();
        let result = project_occurrences(std::slice::from_ref(&schedule), noon, 0, noon).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "c1-2026-03-09T14:00");
    }

    #[test]
    fn slots_sharing_a_start_carry_their_end_in_the_id() {
        let schedule = RecurringSchedule::new(
            "c1",
            "Compilers",
            "LT 3",
            vec![
                WeeklySlot::parse("Monday", "09:00", "10:00").unwrap(),
                WeeklySlot::parse("Monday", "09:00", "11:00").unwrap(),
            ],
        );
        let sunday = date(2026, 3, 8).and_hms_opt(12, 0, 0).unwrap();
        let result = project_occurrences(std::slice::from_ref(&schedule), sunday, 1, sunday).unwrap();

        let ids: Vec<&str> = result.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["c1-2026-03-09T09:00-10:00", "c1-2026-03-09T09:00-11:00"]);
    }
}
