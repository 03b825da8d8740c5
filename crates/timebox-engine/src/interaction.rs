//! Pointer-driven edits of a single interval.
//!
//! These are the pure pieces of the drag loop. Every frame is computed from
//! the pre-drag endpoints and the total pointer delta, never from the
//! previous frame, so replaying the same pointer position gives the same
//! result.

use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::interval::EditKind;
use crate::time::{Minute, MINUTES_PER_DAY};

/// Where on a scheduled block the pointer went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    Body,
    TopEdge,
    BottomEdge,
}

/// What a drag does to its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Move,
    ResizeStart,
    ResizeEnd,
    /// An unscheduled section being dragged onto the timeline.
    CreateFromUnscheduled,
}

impl From<PointerTarget> for DragKind {
    fn from(target: PointerTarget) -> Self {
        match target {
            PointerTarget::Body => DragKind::Move,
            PointerTarget::TopEdge => DragKind::ResizeStart,
            PointerTarget::BottomEdge => DragKind::ResizeEnd,
        }
    }
}

impl DragKind {
    /// The settle rule used when this drag is committed. A dropped section
    /// lands like a moved one.
    pub fn edit_kind(self) -> EditKind {
        match self {
            DragKind::Move | DragKind::CreateFromUnscheduled => EditKind::Move,
            DragKind::ResizeStart => EditKind::ResizeStart,
            DragKind::ResizeEnd => EditKind::ResizeEnd,
        }
    }

    fn moves_start(self) -> bool {
        matches!(self, DragKind::Move | DragKind::ResizeStart)
    }

    fn moves_end(self) -> bool {
        matches!(self, DragKind::Move | DragKind::ResizeEnd)
    }
}

/// One tentative position of the dragged interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragFrame {
    pub start: Minute,
    pub end: Minute,
    /// The neighbour edge the frame snapped to, if any.
    pub snap: Option<Minute>,
}

/// Convert a vertical pointer delta into whole minutes, capped at one day
/// either way.
pub fn delta_minutes(delta_px: f64, pixels_per_hour: f64) -> Minute {
    clamp_to_day(delta_px / pixels_per_hour * 60.0)
}

/// The snap point nearest to `target` within `tolerance`, if any.
/// Ties go to the earlier point in `points`.
pub fn find_snap(target: Minute, points: &[Minute], tolerance: Minute) -> Option<Minute> {
    points
        .iter()
        .copied()
        .filter(|p| (target - p).abs() <= tolerance)
        .min_by_key(|p| (target - p).abs())
}

/// Compute the frame for a move or resize.
///
/// The delta is applied to `initial` (both edges for a move, one edge for a
/// resize). A start snap is tried first; an end snap is only considered when
/// the start did not snap. The result is clamped to the day window and
/// floored to the minimum duration, so the end never falls on or before the
/// start.
pub fn drag_frame(
    kind: DragKind,
    initial: (Minute, Minute),
    delta: Minute,
    snap_points: &[Minute],
    config: &SchedulerConfig,
) -> DragFrame {
    let (mut start, mut end) = initial;
    match kind {
        DragKind::Move => {
            start += delta;
            end += delta;
        }
        DragKind::ResizeStart => start += delta,
        DragKind::ResizeEnd => end += delta,
        DragKind::CreateFromUnscheduled => {}
    }

    let mut snap = None;
    if kind.moves_start() {
        if let Some(point) = find_snap(start, snap_points, config.snap_tolerance) {
            let duration = end - start;
            start = point;
            if kind == DragKind::Move {
                end = start + duration;
            }
            snap = Some(point);
        }
    }
    if snap.is_none() && kind.moves_end() {
        if let Some(point) = find_snap(end, snap_points, config.snap_tolerance) {
            let duration = end - start;
            end = point;
            if kind == DragKind::Move {
                start = end - duration;
            }
            snap = Some(point);
        }
    }

    let (start, end) = config
        .window()
        .settle(start, end, kind.edit_kind(), config.min_duration);
    DragFrame { start, end, snap }
}

/// Round to the nearest multiple of `step`, halves rounding up.
pub fn round_to_step(minute: Minute, step: Minute) -> Minute {
    (minute + step / 2).div_euclid(step) * step
}

/// Round a settled frame to the grid, re-applying the minimum duration if
/// rounding collapsed it.
pub fn round_frame(start: Minute, end: Minute, config: &SchedulerConfig) -> (Minute, Minute) {
    let start = round_to_step(start, config.rounding_step);
    let mut end = round_to_step(end, config.rounding_step);
    if end - start < config.min_duration {
        end = start + config.min_duration;
    }
    (start, end)
}

/// The minute a pointer at `timeline_y` pixels below the top of the timeline
/// would drop onto, rounded to the grid.
pub fn drop_minute(timeline_y: f64, config: &SchedulerConfig) -> Minute {
    let step = f64::from(config.rounding_step);
    let minutes = f64::from(clamp_to_day(timeline_y / config.pixels_per_hour * 60.0));
    let steps = (minutes / step).round() as Minute;
    config.day_start + steps * config.rounding_step
}

/// Round to whole minutes within `±MINUTES_PER_DAY`. NaN maps to zero.
fn clamp_to_day(minutes: f64) -> Minute {
    let limit = f64::from(MINUTES_PER_DAY);
    minutes.round().clamp(-limit, limit) as Minute
}
