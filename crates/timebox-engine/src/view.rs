//! Transient view state of an open scheduler.
//!
//! None of this is persisted or compared as part of the plan; it only tells a
//! renderer what to draw on top of the committed intervals.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::config::SchedulerConfig;
use crate::time::Minute;

/// Message posted when a settle had to move other intervals.
pub const ADJUSTED_NOTICE: &str = "Overlapping times were automatically adjusted.";

/// Vertical offset of `minute` from the top of the timeline, in pixels.
pub fn minute_to_offset(minute: Minute, config: &SchedulerConfig) -> f64 {
    f64::from(minute - config.day_start) / 60.0 * config.pixels_per_hour
}

/// Dashed line at the neighbour edge a drag is snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapGuide {
    pub minute: Minute,
    pub offset_px: f64,
}

/// Insertion line shown while an unscheduled section hovers over the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropPreview {
    pub minute: Minute,
    pub offset_px: f64,
}

/// Floating copy of an unscheduled section that follows the pointer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ghost {
    pub section_id: String,
    pub translate_y: f64,
}

/// Auto-expiring advisory message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub snap_guide: Option<SnapGuide>,
    pub drop_preview: Option<DropPreview>,
    pub ghost: Option<Ghost>,
    pub notice: Option<Notice>,
    #[serde(skip)]
    next_notice_id: u64,
}

impl ViewState {
    /// Post a notice, replacing any notice still on screen.
    pub fn post_notice(&mut self, message: &str, now: NaiveDateTime, ttl_ms: i64) -> &Notice {
        self.next_notice_id += 1;
        self.notice.insert(Notice {
            id: self.next_notice_id,
            message: message.to_string(),
            expires_at: now + Duration::milliseconds(ttl_ms),
        })
    }

    /// Drop the notice once its time is up. Returns true if one expired.
    pub fn expire(&mut self, now: NaiveDateTime) -> bool {
        match &self.notice {
            Some(notice) if notice.expires_at <= now => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    /// Remove everything tied to a drag.
    pub fn clear_drag(&mut self) {
        self.snap_guide = None;
        self.drop_preview = None;
        self.ghost = None;
    }
}
