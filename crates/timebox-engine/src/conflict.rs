//! Detect and repair overlapping intervals.
//!
//! Repair is one-directional: when two intervals overlap, the one that starts
//! later is pushed forward to begin where the earlier one ends, keeping its
//! duration. Earlier intervals never move backwards.
//! Adjacent intervals (where one ends exactly when another starts) are NOT
//! conflicts.

use crate::interval::TimeInterval;
use crate::time::Minute;

/// A detected overlap between two intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub first: TimeInterval,
    pub second: TimeInterval,
    pub overlap_minutes: Minute,
}

/// The outcome of [`resolve_conflicts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Ids of intervals whose endpoints changed, in the order first touched.
    pub shifted: Vec<String>,
    /// Number of scans performed.
    pub passes: usize,
}

impl Resolution {
    /// Whether anything was changed. Drives the "adjusted" notice.
    pub fn adjusted(&self) -> bool {
        !self.shifted.is_empty()
    }
}

/// Find all pairwise overlaps within one list of intervals.
///
/// Two intervals overlap when `a.start < b.end && b.start < a.end`.
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(intervals: &[TimeInterval]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for (i, a) in intervals.iter().enumerate() {
        for b in &intervals[i + 1..] {
            if a.overlaps(b) {
                let overlap_minutes = a.end.min(b.end) - a.start.max(b.start);
                conflicts.push(Conflict {
                    first: a.clone(),
                    second: b.clone(),
                    overlap_minutes,
                });
            }
        }
    }

    conflicts
}

/// Push later intervals forward until no two overlap.
///
/// Each pass sorts by start, then walks adjacent pairs; when `current.end >
/// next.start`, `next` is moved to start at `current.end` with its duration
/// unchanged. A push can cascade down the rest of the list within the same
/// pass. Passes repeat until one changes nothing, bounded by the number of
/// intervals. The list is left sorted by start.
pub fn resolve_conflicts(intervals: &mut [TimeInterval]) -> Resolution {
    let mut resolution = Resolution::default();
    let bound = intervals.len().max(1);

    loop {
        resolution.passes += 1;
        intervals.sort_by_key(|i| i.start);

        let mut changed = false;
        for i in 1..intervals.len() {
            let current_end = intervals[i - 1].end;
            let next = &mut intervals[i];
            if current_end > next.start {
                let duration = next.duration();
                tracing::debug!(
                    id = %next.id,
                    from = next.start,
                    to = current_end,
                    duration,
                    "pushed overlapping interval forward"
                );
                next.start = current_end;
                next.end = current_end + duration;
                if !resolution.shifted.contains(&next.id) {
                    resolution.shifted.push(next.id.clone());
                }
                changed = true;
            }
        }

        if !changed || resolution.passes >= bound {
            break;
        }
    }

    intervals.sort_by_key(|i| i.start);
    resolution
}
