//! # courseforge-core
//!
//! Scheduling and enrollment logic for the CourseForge course-management portals.
//!
//! Lecture timetables are stored as weekly slots ("Monday 09:00-11:00"). This
//! crate projects them onto the calendar as concrete upcoming occurrences,
//! detects clashes between slots, and derives a student's academic level from
//! their identifier. Everything here is pure: the current time comes in through
//! a [`Clock`], never from a hidden system call.
//!
//! ## Modules
//!
//! - [`schedule`]: weekdays, `HH:MM` times, slots and schedules (validated at parse time)
//! - [`projector`]: schedules → sorted upcoming occurrences within a horizon
//! - [`level`]: student identifier → academic level (100–400)
//! - [`conflict`]: clashing weekly slots
//! - [`dst`]: wall-clock occurrence → absolute instant in an IANA zone
//! - [`clock`]: injectable "now"
//! - [`error`]: Error types

pub mod clock;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod level;
pub mod projector;
pub mod schedule;

pub use clock::{parse_timezone, parse_wall_clock, Clock, FixedClock, SystemClock, ZonedClock};
pub use conflict::{find_conflicts, Conflict};
pub use dst::{resolve_occurrence, DstPolicy};
pub use error::CourseForgeError;
pub use level::{academic_year, level, level_today, Level, StudentIdentifier};
pub use projector::{next_occurrence, project, project_occurrences, Occurrence};
pub use schedule::{parse_schedules, RecurringSchedule, TimeOfDay, Weekday, WeeklySlot};
