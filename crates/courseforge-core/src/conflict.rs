//! Detect timetable clashes between weekly slots.
//!
//! Two slots clash when they share a weekday and their time ranges overlap.
//! Back-to-back slots (one ends exactly when the other starts) do NOT clash.

use serde::Serialize;

use crate::schedule::{RecurringSchedule, TimeOfDay, Weekday, WeeklySlot};

/// One side of a clash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRef {
    pub schedule_id: String,
    pub label: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl SlotRef {
    fn new(schedule: &RecurringSchedule, slot: &WeeklySlot) -> Self {
        Self {
            schedule_id: schedule.id.clone(),
            label: schedule.label.clone(),
            start_time: slot.start(),
            end_time: slot.end(),
        }
    }
}

/// A detected clash between two weekly slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub day: Weekday,
    pub first: SlotRef,
    pub second: SlotRef,
    pub overlap_minutes: i64,
}

/// Minutes two slots overlap, or `None` if they are on different days or merely adjacent.
pub fn overlap_minutes(a: &WeeklySlot, b: &WeeklySlot) -> Option<i64> {
    // Same day and a.start < b.end && b.start < a.end.
    if a.day() != b.day() || a.start() >= b.end() || b.start() >= a.end() {
        return None;
    }
    let start = a.start().max(b.start()).minutes_since_midnight();
    let end = a.end().min(b.end()).minutes_since_midnight();
    Some(i64::from(end) - i64::from(start))
}

/// Find every pair of clashing slots across (and within) the given schedules.
///
/// Each unordered pair is reported once, with `first` taken from the schedule
/// (or slot) that appears earlier in the input. Results are ordered by weekday,
/// then by the first slot's start time.
pub fn find_conflicts(schedules: &[RecurringSchedule]) -> Vec<Conflict> {
    let slots: Vec<(&RecurringSchedule, &WeeklySlot)> = schedules
        .iter()
        .flat_map(|schedule| schedule.slots.iter().map(move |slot| (schedule, slot)))
        .collect();

    let mut conflicts = Vec::new();

    for (i, (schedule_a, a)) in slots.iter().enumerate() {
        for (schedule_b, b) in &slots[i + 1..] {
            if let Some(overlap) = overlap_minutes(a, b) {
                conflicts.push(Conflict {
                    day: a.day(),
                    first: SlotRef::new(schedule_a, a),
                    second: SlotRef::new(schedule_b, b),
                    overlap_minutes: overlap,
                });
            }
        }
    }

    conflicts.sort_by_key(|c| (c.day, c.first.start_time));

    if !conflicts.is_empty() {
        tracing::debug!(conflicts = conflicts.len(), "timetable clashes found");
    }

    conflicts
}
