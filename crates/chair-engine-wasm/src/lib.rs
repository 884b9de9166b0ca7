//! WASM bindings for chair-engine.
//!
//! Exposes slot computation and conflict checks to JavaScript via
//! `wasm-bindgen`. Schedules and bookings cross the boundary as JSON strings;
//! times are `"HH:MM"` strings and dates are `"YYYY-MM-DD"`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p chair-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/chair-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/chair_engine_wasm.wasm
//! ```

use chair_engine::{
    AvailableSlots, BookingInterval, CandidateInterval, DaySchedule, WeeklySchedule,
    DEFAULT_SLOT_GRANULARITY_MINUTES,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON plumbing, kept free of JsValue so it runs on native targets too
// ---------------------------------------------------------------------------

fn parse_json<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn compute_slots_json(
    day_json: &str,
    bookings_json: &str,
    duration_minutes: u32,
    granularity_minutes: Option<u32>,
) -> Result<String, String> {
    let day: Option<DaySchedule> = parse_json(day_json, "day schedule")?;
    let bookings: Vec<BookingInterval> = parse_json(bookings_json, "bookings")?;

    let slots = chair_engine::compute_slots(
        day.as_ref(),
        &bookings,
        duration_minutes,
        granularity_minutes.unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES),
    )
    .map_err(|e| e.to_string())?;

    to_json(&slots)
}

fn available_slots_json(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    duration_minutes: u32,
    granularity_minutes: Option<u32>,
) -> Result<String, String> {
    let schedule: WeeklySchedule = parse_json(schedule_json, "weekly schedule")?;
    let date = parse_date(date)?;
    let bookings: Vec<BookingInterval> = parse_json(bookings_json, "bookings")?;

    let response = AvailableSlots::for_date(
        &schedule,
        date,
        &bookings,
        duration_minutes,
        granularity_minutes.unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES),
    )
    .map_err(|e| e.to_string())?;

    to_json(&response)
}

fn is_available_json(
    day_json: &str,
    candidate_json: &str,
    bookings_json: &str,
    exclude_id: Option<&str>,
) -> Result<bool, String> {
    let day: Option<DaySchedule> = parse_json(day_json, "day schedule")?;
    let candidate: CandidateInterval = parse_json(candidate_json, "candidate")?;
    let bookings: Vec<BookingInterval> = parse_json(bookings_json, "bookings")?;

    chair_engine::is_available(day.as_ref(), &candidate, &bookings, exclude_id)
        .map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Bookable start times for one day.
///
/// `day_json` is a day schedule object or `null` (closed). `bookings_json` is an
/// array of `{id, start_time, end_time}`. Returns a JSON array of `"HH:MM"`.
/// `granularity_minutes` defaults to 30.
#[wasm_bindgen(js_name = "computeSlots")]
pub fn compute_slots(
    day_json: &str,
    bookings_json: &str,
    duration_minutes: u32,
    granularity_minutes: Option<u32>,
) -> Result<String, JsValue> {
    compute_slots_json(day_json, bookings_json, duration_minutes, granularity_minutes)
        .map_err(|e| JsValue::from_str(&e))
}

/// Bookable start times for a date, resolved against a weekly schedule.
///
/// Returns `{date, service_duration, available_slots}` as JSON.
#[wasm_bindgen(js_name = "availableSlots")]
pub fn available_slots(
    schedule_json: &str,
    date: &str,
    bookings_json: &str,
    duration_minutes: u32,
    granularity_minutes: Option<u32>,
) -> Result<String, JsValue> {
    available_slots_json(
        schedule_json,
        date,
        bookings_json,
        duration_minutes,
        granularity_minutes,
    )
    .map_err(|e| JsValue::from_str(&e))
}

/// Whether a candidate `{start_time, duration_minutes}` may be booked.
///
/// Pass `exclude_id` when checking a reschedule so the booking does not
/// conflict with itself.
#[wasm_bindgen(js_name = "isAvailable")]
pub fn is_available(
    day_json: &str,
    candidate_json: &str,
    bookings_json: &str,
    exclude_id: Option<String>,
) -> Result<bool, JsValue> {
    is_available_json(day_json, candidate_json, bookings_json, exclude_id.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}
