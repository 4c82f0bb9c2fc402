//! DST-aware resolution of wall-clock occurrences to absolute instants.
//!
//! Projection works in naive wall-clock time. Callers that need a real instant
//! (for notifications or cross-zone display) resolve it here against the
//! schedule's IANA zone.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::projector::Occurrence;

/// Policy for wall-clock times that fall in a DST gap.
///
/// Ambiguous times (the repeated hour when clocks go back) always resolve to
/// the earlier of the two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DstPolicy {
    /// Drop instants that fall in the gap (e.g. 02:30 during spring forward).
    Skip,
    /// Move the instant forward by the length of the gap.
    #[default]
    ShiftForward,
}

/// Resolve a wall-clock value in `tz` to an absolute UTC instant.
///
/// Returns `None` only for a gap time under [`DstPolicy::Skip`].
pub fn resolve(local: NaiveDateTime, tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => {
                tracing::debug!(%local, %tz, "skipping wall-clock time in DST gap");
                None
            }
            DstPolicy::ShiftForward => shift_past_gap(local, tz),
        },
    }
}

/// Absolute `(start, end)` of an occurrence whose wall-clock times are in `tz`.
///
/// The policy applies to the start only. Returns `None` when the start falls
/// in a gap under [`DstPolicy::Skip`]; an end inside a gap is always shifted
/// forward, since the lecture itself still takes place.
pub fn resolve_occurrence(
    occurrence: &Occurrence,
    tz: Tz,
    policy: DstPolicy,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = resolve(occurrence.start_at, tz, policy)?;
    let end = resolve(occurrence.end_at, tz, DstPolicy::ShiftForward)?;
    Some((start, end))
}

/// Apply the offset in force just before the gap, which moves the wall-clock
/// time forward by the gap's length (02:30 becomes 03:30 across a one-hour gap).
fn shift_past_gap(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    let before = (1..=48)
        .map(|hours| local - Duration::hours(hours))
        .find_map(|probe| tz.from_local_datetime(&probe).earliest())?;
    let offset = before.offset().fix();
    Some((local - Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc())
}
