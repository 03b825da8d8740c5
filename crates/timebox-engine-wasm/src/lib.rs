//! WASM bindings for timebox-engine.
//!
//! Exposes time parsing, conflict repair and the interactive scheduler to
//! JavaScript via `wasm-bindgen`. Complex types cross the boundary as JSON
//! strings; timestamps are naive local datetimes (`2026-03-02T08:00:00`)
//! supplied by the host, since the engine never reads a clock.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p timebox-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/timebox_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use timebox_engine::session::Settled;
use timebox_engine::{
    Conflict, PointerTarget, Resolution, SchedulerConfig, SchedulerSession, Section, TimeInterval,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// An interval with `HH:mm` endpoints, the same form the input uses.
#[derive(Serialize)]
struct IntervalDto {
    id: String,
    start: String,
    end: String,
}

impl From<&TimeInterval> for IntervalDto {
    fn from(iv: &TimeInterval) -> Self {
        Self {
            id: iv.id.clone(),
            start: timebox_engine::minutes_to_time(iv.start),
            end: timebox_engine::minutes_to_time(iv.end),
        }
    }
}

fn interval_dtos(intervals: &[TimeInterval]) -> Vec<IntervalDto> {
    intervals.iter().map(IntervalDto::from).collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto {
    first: IntervalDto,
    second: IntervalDto,
    overlap_minutes: i32,
}

impl From<&Conflict> for ConflictDto {
    fn from(c: &Conflict) -> Self {
        Self {
            first: IntervalDto::from(&c.first),
            second: IntervalDto::from(&c.second),
            overlap_minutes: c.overlap_minutes,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolutionDto {
    intervals: Vec<IntervalDto>,
    shifted: Vec<String>,
    adjusted: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettledDto {
    section_id: String,
    interval: Option<IntervalDto>,
    shifted: Vec<String>,
    adjusted: bool,
}

impl From<Settled> for SettledDto {
    fn from(s: Settled) -> Self {
        let adjusted = s.resolution.adjusted();
        Self {
            section_id: s.section_id,
            interval: s.interval.as_ref().map(IntervalDto::from),
            shifted: s.resolution.shifted,
            adjusted,
        }
    }
}

/// An `{id, start, end}` interval given in `HH:mm` form.
#[derive(Deserialize)]
struct IntervalInput {
    id: String,
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Parse a naive local datetime such as "2026-03-02T08:00:00".
fn parse_now(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_intervals_json(json: &str) -> Result<Vec<TimeInterval>, JsValue> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid intervals JSON: {}", e)))?;

    inputs
        .into_iter()
        .map(|input| {
            let start = timebox_engine::time_to_minutes(&input.start)
                .ok_or_else(|| JsValue::from_str(&format!("Invalid time '{}'", input.start)))?;
            let end = timebox_engine::time_to_minutes(&input.end)
                .ok_or_else(|| JsValue::from_str(&format!("Invalid time '{}'", input.end)))?;
            Ok(TimeInterval::new(input.id, start, end))
        })
        .collect()
}

fn parse_target(s: &str) -> Result<PointerTarget, JsValue> {
    match s {
        "body" => Ok(PointerTarget::Body),
        "top_edge" | "topEdge" => Ok(PointerTarget::TopEdge),
        "bottom_edge" | "bottomEdge" => Ok(PointerTarget::BottomEdge),
        other => Err(JsValue::from_str(&format!(
            "Invalid pointer target '{}'. Expected body, top_edge or bottom_edge",
            other
        ))),
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Minutes since midnight for an `HH:mm` string, or `undefined` if malformed.
#[wasm_bindgen(js_name = "timeToMinutes")]
pub fn time_to_minutes(time: &str) -> Option<i32> {
    timebox_engine::time_to_minutes(time)
}

#[wasm_bindgen(js_name = "minutesToTime")]
pub fn minutes_to_time(minutes: i32) -> String {
    timebox_engine::minutes_to_time(minutes)
}

/// Human duration such as "1 hr 30 min".
#[wasm_bindgen(js_name = "formatDuration")]
pub fn format_duration(minutes: i32) -> String {
    timebox_engine::time::format_duration(minutes)
}

/// Find all pairwise overlaps in a JSON array of `{id, start, end}` objects
/// with `HH:mm` times.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(intervals_json: &str) -> Result<String, JsValue> {
    let intervals = parse_intervals_json(intervals_json)?;
    let conflicts = timebox_engine::find_conflicts(&intervals);
    let dtos: Vec<ConflictDto> = conflicts.iter().map(ConflictDto::from).collect();
    to_json(&dtos)
}

/// Push overlapping intervals later until none overlap.
///
/// Returns `{intervals, shifted, adjusted}` with intervals in start order and
/// `HH:mm` endpoints.
#[wasm_bindgen(js_name = "resolveConflicts")]
pub fn resolve_conflicts(intervals_json: &str) -> Result<String, JsValue> {
    let mut intervals = parse_intervals_json(intervals_json)?;
    let Resolution { shifted, .. } = timebox_engine::resolve_conflicts(&mut intervals);
    to_json(&ResolutionDto {
        adjusted: !shifted.is_empty(),
        intervals: interval_dtos(&intervals),
        shifted,
    })
}

// ---------------------------------------------------------------------------
// Interactive scheduler
// ---------------------------------------------------------------------------

/// An open scheduler over one day's timeboxed sections.
///
/// Drive it with pointer events, read `view()`/`displayed()` after each one to
/// render, then call `save()` to get the reconciled sections back.
#[wasm_bindgen]
pub struct Scheduler {
    inner: SchedulerSession,
}

#[wasm_bindgen]
impl Scheduler {
    /// # Arguments
    /// - `sections_json` -- JSON array of sections (camelCase fields)
    /// - `current_section_id` -- Section to scroll to on days other than today
    /// - `date` -- The plan's date, `YYYY-MM-DD`
    /// - `config_json` -- Optional partial scheduler config
    #[wasm_bindgen(constructor)]
    pub fn new(
        sections_json: &str,
        current_section_id: Option<String>,
        date: &str,
        config_json: Option<String>,
    ) -> Result<Scheduler, JsValue> {
        let sections: Vec<Section> = serde_json::from_str(sections_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid sections JSON: {}", e)))?;
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", date, e)))?;
        let config = match config_json {
            Some(json) => SchedulerConfig::from_json(&json).map_err(js_err)?,
            None => SchedulerConfig::default(),
        };

        let inner =
            SchedulerSession::open(sections, current_section_id, date, config).map_err(js_err)?;
        Ok(Scheduler { inner })
    }

    /// `target` is one of `body`, `top_edge`, `bottom_edge`.
    #[wasm_bindgen(js_name = "pointerDown")]
    pub fn pointer_down(&mut self, section_id: &str, target: &str, y: f64) -> Result<(), JsValue> {
        let target = parse_target(target)?;
        self.inner.pointer_down(section_id, target, y).map_err(js_err)
    }

    #[wasm_bindgen(js_name = "pointerDownUnscheduled")]
    pub fn pointer_down_unscheduled(&mut self, section_id: &str, y: f64) -> Result<(), JsValue> {
        self.inner
            .pointer_down_unscheduled(section_id, y)
            .map_err(js_err)
    }

    /// `timeline_y` is the pointer position within the scrolled timeline, or
    /// `undefined` when the pointer is outside it.
    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, y: f64, timeline_y: Option<f64>) {
        self.inner.pointer_move(y, timeline_y);
    }

    /// Returns the settled section as JSON, or `null` if no drag was active.
    #[wasm_bindgen(js_name = "pointerUp")]
    pub fn pointer_up(&mut self, now: &str) -> Result<String, JsValue> {
        let now = parse_now(now)?;
        to_json(&self.inner.pointer_up(now).map(SettledDto::from))
    }

    /// Lost capture or blur. Settles the drag like `pointerUp`.
    pub fn release(&mut self, now: &str) -> Result<String, JsValue> {
        let now = parse_now(now)?;
        to_json(&self.inner.release(now).map(SettledDto::from))
    }

    /// Expire the notice if its time is up. Returns true when it did.
    pub fn tick(&mut self, now: &str) -> Result<bool, JsValue> {
        Ok(self.inner.tick(parse_now(now)?))
    }

    /// Snap guide, drop preview, ghost and notice as JSON.
    pub fn view(&self) -> Result<String, JsValue> {
        to_json(self.inner.view())
    }

    /// Intervals to draw as `{id, start, end}` with `HH:mm` times, the
    /// dragged one at its tentative position.
    pub fn displayed(&self) -> Result<String, JsValue> {
        to_json(&interval_dtos(&self.inner.displayed()))
    }

    /// Sections in the unscheduled tray.
    pub fn unscheduled(&self) -> Result<String, JsValue> {
        to_json(&self.inner.unscheduled())
    }

    #[wasm_bindgen(js_name = "isDragging")]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    #[wasm_bindgen(js_name = "nowIndicator")]
    pub fn now_indicator(&self, now: &str) -> Result<Option<f64>, JsValue> {
        Ok(self.inner.now_indicator(parse_now(now)?))
    }

    #[wasm_bindgen(js_name = "scrollTarget")]
    pub fn scroll_target(&self, now: &str) -> Result<f64, JsValue> {
        Ok(self.inner.scroll_target(parse_now(now)?))
    }

    /// End the session and return every section as JSON, scheduled ones first
    /// in start order.
    pub fn save(self, now: &str) -> Result<String, JsValue> {
        let now = parse_now(now)?;
        to_json(&self.inner.save(now))
    }

    /// End the session without returning anything.
    pub fn cancel(self) {
        self.inner.cancel();
    }
}
