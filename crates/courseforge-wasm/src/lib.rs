//! WASM bindings for courseforge-core.
//!
//! Exposes occurrence projection, academic level calculation, clash detection
//! and schedule validation to the CourseForge web portals via `wasm-bindgen`.
//! Schedules cross the boundary as JSON strings in the same camelCase shape the
//! document store holds (`{id, label, location, slots: [{day, startTime, endTime}]}`).
//!
//! The browser has no usable system clock from inside wasm32-unknown-unknown,
//! so "now" is always passed in (e.g. `new Date().toISOString()`).
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p courseforge-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/courseforge-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/courseforge_wasm.wasm
//! ```

use std::fmt::Display;

use chrono_tz::Tz;
use courseforge_core::{parse_schedules, parse_timezone, parse_wall_clock};
use wasm_bindgen::prelude::*;

fn js_error(e: impl Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn timezone_or_utc(timezone: Option<String>) -> Result<Tz, JsValue> {
    match timezone.as_deref() {
        Some(name) => parse_timezone(name).map_err(js_error),
        None => Ok(Tz::UTC),
    }
}

/// Project weekly schedules into upcoming occurrences.
///
/// Returns a JSON string containing an array of occurrence objects
/// (`id`, `scheduleId`, `label`, `location`, `day`, `startAt`, `endAt`) sorted
/// by start.
///
/// # Arguments
/// - `schedules_json` -- JSON array of schedules
/// - `from` -- Start of the date window (RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]`)
/// - `horizon_days` -- Days after `from`'s date to include
/// - `now` -- Current instant; occurrences at or before it are dropped
/// - `timezone` -- IANA zone slot times are written in (default UTC); RFC 3339
///   inputs are converted into it
#[wasm_bindgen(js_name = "projectOccurrences")]
pub fn project_occurrences(
    schedules_json: &str,
    from: &str,
    horizon_days: u32,
    now: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let tz = timezone_or_utc(timezone)?;
    let schedules = parse_schedules(schedules_json).map_err(js_error)?;
    let from = parse_wall_clock(from, tz).map_err(js_error)?;
    let now = parse_wall_clock(now, tz).map_err(js_error)?;

    let occurrences = courseforge_core::project_occurrences(&schedules, from, horizon_days, now)
        .map_err(js_error)?;

    serde_json::to_string(&occurrences)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Academic level (100, 200, 300 or 400) of a student identifier on `today`.
///
/// An RFC 3339 `today` (e.g. `new Date().toISOString()`) is converted into
/// `timezone` (default UTC) before its date is taken, so a browser east of UTC
/// gets its local date. Unreadable identifiers are level 100; only an
/// unparseable `today` or an unknown `timezone` is an error.
#[wasm_bindgen(js_name = "academicLevel")]
pub fn academic_level(identifier: &str, today: &str, timezone: Option<String>) -> Result<u16, JsValue> {
    let tz = timezone_or_utc(timezone)?;
    let today = parse_wall_clock(today, tz).map_err(js_error)?.date();
    Ok(courseforge_core::level(identifier, today).value())
}

/// Find clashing weekly slots.
///
/// Returns a JSON string containing an array of `{day, first, second, overlapMinutes}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(schedules_json: &str) -> Result<String, JsValue> {
    let schedules = parse_schedules(schedules_json).map_err(js_error)?;
    let conflicts = courseforge_core::find_conflicts(&schedules);

    serde_json::to_string(&conflicts)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Validate a schedules document, returning the number of schedules.
///
/// Throws with a message naming the first invalid day, time or slot.
#[wasm_bindgen(js_name = "validateSchedules")]
pub fn validate_schedules(schedules_json: &str) -> Result<u32, JsValue> {
    let schedules = parse_schedules(schedules_json).map_err(js_error)?;
    u32::try_from(schedules.len()).map_err(js_error)
}
