//! Scheduler tuning: day window, tolerances and the pixel scale of the timeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeboxError};
use crate::interval::DayWindow;
use crate::time::{Minute, MINUTES_PER_DAY};

/// Scheduler configuration. Every field has a default, so a partial JSON
/// document (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// First minute shown on the timeline (04:00).
    pub day_start: Minute,
    /// Last minute shown on the timeline (24:00).
    pub day_end: Minute,
    /// Shortest span a scheduled section may have.
    pub min_duration: Minute,
    /// Distance within which a dragged edge sticks to a neighbour's edge.
    pub snap_tolerance: Minute,
    /// Vertical scale of the timeline.
    pub pixels_per_hour: f64,
    /// Grid that endpoints are rounded to when a drag settles.
    pub rounding_step: Minute,
    /// Length given to a section dropped from the unscheduled tray.
    pub default_drop_duration: Minute,
    /// Lifetime of the "times were adjusted" notice.
    pub notice_ttl_ms: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_start: 4 * 60,
            day_end: 24 * 60,
            min_duration: 15,
            snap_tolerance: 6,
            pixels_per_hour: 80.0,
            rounding_step: 15,
            default_drop_duration: 60,
            notice_ttl_ms: 3000,
        }
    }
}

impl SchedulerConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.day_start < 0 || self.day_end > MINUTES_PER_DAY {
            return Err(TimeboxError::InvalidConfig(format!(
                "day window {}..{} must lie within 0..{}",
                self.day_start, self.day_end, MINUTES_PER_DAY
            )));
        }
        if self.min_duration <= 0 || self.rounding_step <= 0 {
            return Err(TimeboxError::InvalidConfig(
                "min_duration and rounding_step must be positive".to_string(),
            ));
        }
        if self.day_end - self.day_start < self.min_duration {
            return Err(TimeboxError::InvalidConfig(format!(
                "day window {}..{} is shorter than min_duration {}",
                self.day_start, self.day_end, self.min_duration
            )));
        }
        if self.default_drop_duration < self.min_duration {
            return Err(TimeboxError::InvalidConfig(
                "default_drop_duration must be at least min_duration".to_string(),
            ));
        }
        if !(self.pixels_per_hour.is_finite() && self.pixels_per_hour > 0.0) {
            return Err(TimeboxError::InvalidConfig(
                "pixels_per_hour must be a positive number".to_string(),
            ));
        }
        if self.snap_tolerance < 0 || self.notice_ttl_ms < 0 {
            return Err(TimeboxError::InvalidConfig(
                "snap_tolerance and notice_ttl_ms must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn window(&self) -> DayWindow {
        DayWindow::new(self.day_start, self.day_end)
    }
}
