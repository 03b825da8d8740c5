//! The scheduled intervals of a single day.
//!
//! Endpoint writes go through [`DayWindow::settle`], which pins the interval
//! inside the visible day and enforces the minimum duration. [`ScheduledSet`]
//! applies it on every insert and keeps its intervals sorted by start.

use serde::{Deserialize, Serialize};

use crate::conflict::{self, Resolution};
use crate::time::{overlaps, Minute};

/// How an interval's endpoints were changed. Decides which edge gives way
/// when the window or the minimum duration forces a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Both edges moved together; duration is kept when pinned at an edge.
    Move,
    /// Only the start moved.
    ResizeStart,
    /// Only the end moved.
    ResizeEnd,
}

/// The scheduling facet of a section: a stable id and a `[start, end)` range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub id: String,
    pub start: Minute,
    pub end: Minute,
}

impl TimeInterval {
    pub fn new(id: impl Into<String>, start: Minute, end: Minute) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        overlaps((self.start, self.end), (other.start, other.end))
    }
}

/// The visible range of the timeline, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: Minute,
    pub end: Minute,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self::new(4 * 60, 24 * 60)
    }
}

impl DayWindow {
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, start: Minute, end: Minute) -> bool {
        self.start <= start && end <= self.end
    }

    /// Pin `(start, end)` inside the window and restore `min_duration`.
    ///
    /// A `Move` that crosses an edge keeps its duration; a resize only gives
    /// up the edge it was dragging. When the span is too short, the edge that
    /// was *not* being dragged is pushed out: `ResizeStart` pulls the start
    /// earlier, every other kind pushes the end later. The window length must
    /// be at least `min_duration`.
    pub fn settle(
        &self,
        start: Minute,
        end: Minute,
        kind: EditKind,
        min_duration: Minute,
    ) -> (Minute, Minute) {
        let (mut start, mut end) = (start, end);
        let duration = end - start;

        if start < self.start {
            start = self.start;
            if kind == EditKind::Move {
                end = start + duration;
            }
        }
        if end > self.end {
            end = self.end;
            if kind == EditKind::Move {
                start = (end - duration).max(self.start);
            }
        }

        if end - start < min_duration {
            if kind == EditKind::ResizeStart {
                start = end - min_duration;
            } else {
                end = start + min_duration;
            }
        }

        // The floor may have pushed an edge back out of the window.
        if end > self.end {
            end = self.end;
            start = start.min(end - min_duration);
        }
        if start < self.start {
            start = self.start;
            end = end.max(start + min_duration);
        }

        (start, end)
    }
}

/// All intervals of one day that have both endpoints, sorted by start.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSet {
    window: DayWindow,
    min_duration: Minute,
    intervals: Vec<TimeInterval>,
}

impl ScheduledSet {
    pub fn new(window: DayWindow, min_duration: Minute) -> Self {
        Self {
            window,
            min_duration,
            intervals: Vec::new(),
        }
    }

    /// Build a set from existing assignments. The intervals are sorted but
    /// otherwise taken as they are; the first [`resolve`](Self::resolve)
    /// settles them.
    pub fn from_intervals(
        window: DayWindow,
        min_duration: Minute,
        intervals: impl IntoIterator<Item = TimeInterval>,
    ) -> Self {
        let mut set = Self {
            window,
            min_duration,
            intervals: intervals.into_iter().collect(),
        };
        set.sort();
        set
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn min_duration(&self) -> Minute {
        self.min_duration
    }

    /// Write an interval's endpoints, settling them against the window and
    /// the minimum duration, then re-sort. Returns the settled interval.
    pub fn insert_or_update(&mut self, interval: TimeInterval, kind: EditKind) -> TimeInterval {
        let (start, end) =
            self.window
                .settle(interval.start, interval.end, kind, self.min_duration);
        let settled = TimeInterval {
            id: interval.id,
            start,
            end,
        };

        match self.intervals.iter_mut().find(|i| i.id == settled.id) {
            Some(existing) => *existing = settled.clone(),
            None => self.intervals.push(settled.clone()),
        }
        self.sort();
        settled
    }

    pub fn remove(&mut self, id: &str) -> Option<TimeInterval> {
        let pos = self.intervals.iter().position(|i| i.id == id)?;
        Some(self.intervals.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&TimeInterval> {
        self.intervals.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// The intervals in start order.
    pub fn sorted_by_start(&self) -> &[TimeInterval] {
        &self.intervals
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeInterval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn into_intervals(self) -> Vec<TimeInterval> {
        self.intervals
    }

    /// True when no two intervals overlap.
    pub fn is_disjoint(&self) -> bool {
        self.intervals.windows(2).all(|w| !w[0].overlaps(&w[1]))
    }

    /// Edge points other intervals can snap to, excluding `skip_id`.
    pub fn snap_points(&self, skip_id: &str) -> Vec<Minute> {
        self.intervals
            .iter()
            .filter(|i| i.id != skip_id)
            .flat_map(|i| [i.start, i.end])
            .collect()
    }

    /// Bring the whole set back to a settled state after a write: settle
    /// every interval into the window as a `Move`, push overlapping intervals
    /// later until the set is disjoint, then pull anything the push cascaded
    /// past the end of the window back inside.
    pub fn resolve(&mut self) -> Resolution {
        let settled = self.settle_each();
        self.sort();

        let mut resolution = conflict::resolve_conflicts(&mut self.intervals);
        for id in settled.into_iter().chain(self.clamp_tail()) {
            if !resolution.shifted.contains(&id) {
                resolution.shifted.push(id);
            }
        }
        resolution
    }

    /// Settle every interval as a `Move`. Returns the ids that changed.
    fn settle_each(&mut self) -> Vec<String> {
        let (window, min_duration) = (self.window, self.min_duration);
        let mut changed = Vec::new();
        for interval in &mut self.intervals {
            let (start, end) =
                window.settle(interval.start, interval.end, EditKind::Move, min_duration);
            if (start, end) != (interval.start, interval.end) {
                tracing::debug!(
                    id = %interval.id,
                    from = ?(interval.start, interval.end),
                    to = ?(start, end),
                    "settled interval into window"
                );
                interval.start = start;
                interval.end = end;
                changed.push(interval.id.clone());
            }
        }
        changed
    }

    /// Shorten intervals that end past the window. Walks backwards so that a
    /// shortened interval never overlaps the one before it. Returns the ids
    /// that were changed.
    fn clamp_tail(&mut self) -> Vec<String> {
        let mut changed = Vec::new();
        let mut limit = self.window.end;

        for interval in self.intervals.iter_mut().rev() {
            if interval.end <= limit {
                break;
            }
            let end = limit;
            let start = interval.start.min(end - self.min_duration);
            tracing::debug!(
                id = %interval.id,
                from = ?(interval.start, interval.end),
                to = ?(start, end),
                "shortened interval at end of day"
            );
            interval.start = start;
            interval.end = end;
            changed.push(interval.id.clone());
            limit = start;
        }

        changed
    }

    fn sort(&mut self) {
        self.intervals.sort_by_key(|i| i.start);
    }
}
