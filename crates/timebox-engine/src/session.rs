//! An open scheduler: the working copy of a day's timeboxed sections and the
//! pointer state machine that edits it.
//!
//! A session is opened from the day's sections, edited through pointer
//! events, and ended by [`SchedulerSession::save`] (returns the reconciled
//! sections) or [`SchedulerSession::cancel`] (returns nothing). Nothing is
//! written back to the plan in between.
//!
//! Drags never write to the scheduled set while they are in flight. Each
//! pointer move recomputes a tentative frame from the pre-drag snapshot; the
//! set is only touched on pointer-up, where the frame is rounded, settled and
//! conflicts are resolved.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::conflict::Resolution;
use crate::error::{Result, TimeboxError};
use crate::interaction::{self, DragFrame, DragKind, PointerTarget};
use crate::interval::{ScheduledSet, TimeInterval};
use crate::plan::Section;
use crate::time::{minutes_to_time, Minute};
use crate::view::{minute_to_offset, DropPreview, Ghost, SnapGuide, ViewState, ADJUSTED_NOTICE};

/// A pointer event, as delivered by a host UI or a recorded script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PointerInput {
    /// Pointer pressed on a scheduled block.
    Down {
        section: String,
        target: PointerTarget,
        y: f64,
    },
    /// Pointer pressed on an item in the unscheduled tray.
    DownUnscheduled { section: String, y: f64 },
    /// Pointer moved. `timeline_y` is the position relative to the top of the
    /// timeline content (scroll included), or absent when outside it.
    Move {
        y: f64,
        #[serde(default)]
        timeline_y: Option<f64>,
    },
    /// Pointer released.
    Up,
    /// Capture lost or window blurred; ends the drag like `Up`.
    Release,
}

/// In-flight drag state. Lives from pointer-down to pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub section_id: String,
    pub kind: DragKind,
    pub origin_y: f64,
    /// Endpoints before the drag; `None` for a section coming from the tray.
    pub initial: Option<(Minute, Minute)>,
    /// Latest tentative frame. Starts at `initial`.
    pub frame: Option<DragFrame>,
    /// Where a tray item would land if released now.
    pub drop_at: Option<Minute>,
}

/// What a pointer-up committed.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    pub section_id: String,
    /// The section's committed interval, or `None` if a tray item was
    /// released outside the timeline and stays unscheduled.
    pub interval: Option<TimeInterval>,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct SchedulerSession {
    config: SchedulerConfig,
    date: NaiveDate,
    current_section_id: Option<String>,
    scheduled: ScheduledSet,
    unscheduled: Vec<Section>,
    details: HashMap<String, Section>,
    drag: Option<DragSession>,
    view: ViewState,
}

impl SchedulerSession {
    /// Open a session over `sections`, which should be the day's timeboxed
    /// sections. Sections with two valid times are scheduled; the rest go to
    /// the unscheduled tray.
    pub fn open(
        sections: Vec<Section>,
        current_section_id: Option<String>,
        date: NaiveDate,
        config: SchedulerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let mut seen = HashSet::new();
        let mut intervals = Vec::new();
        let mut unscheduled = Vec::new();
        let mut details = HashMap::new();

        for section in sections {
            if !seen.insert(section.id.clone()) {
                return Err(TimeboxError::DuplicateSection(section.id));
            }
            match section.interval() {
                Some(interval) => {
                    intervals.push(interval);
                    details.insert(section.id.clone(), section);
                }
                None => {
                    if section.start_time.is_some() || section.end_time.is_some() {
                        tracing::warn!(
                            id = %section.id,
                            start = ?section.start_time,
                            end = ?section.end_time,
                            "section has incomplete or malformed times; treating as unscheduled"
                        );
                    }
                    unscheduled.push(section);
                }
            }
        }

        let scheduled = ScheduledSet::from_intervals(config.window(), config.min_duration, intervals);
        tracing::info!(
            %date,
            scheduled = scheduled.len(),
            unscheduled = unscheduled.len(),
            "opened scheduler"
        );

        Ok(Self {
            config,
            date,
            current_section_id,
            scheduled,
            unscheduled,
            details,
            drag: None,
            view: ViewState::default(),
        })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn current_section_id(&self) -> Option<&str> {
        self.current_section_id.as_deref()
    }

    /// Committed intervals in start order.
    pub fn scheduled(&self) -> &ScheduledSet {
        &self.scheduled
    }

    pub fn unscheduled(&self) -> &[Section] {
        &self.unscheduled
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.details
            .get(id)
            .or_else(|| self.unscheduled.iter().find(|s| s.id == id))
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// What to draw: committed intervals with the dragged one replaced by its
    /// tentative frame. May overlap while a drag is in flight.
    pub fn displayed(&self) -> Vec<TimeInterval> {
        let tentative = self
            .drag
            .as_ref()
            .and_then(|d| d.frame.map(|f| (d.section_id.as_str(), f)));

        self.scheduled
            .iter()
            .map(|interval| match tentative {
                Some((id, frame)) if id == interval.id => {
                    TimeInterval::new(id, frame.start, frame.end)
                }
                _ => interval.clone(),
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Pointer state machine
    // -----------------------------------------------------------------------

    /// Start moving or resizing a scheduled section.
    pub fn pointer_down(&mut self, section_id: &str, target: PointerTarget, y: f64) -> Result<()> {
        self.ensure_idle()?;
        let interval = self
            .scheduled
            .get(section_id)
            .ok_or_else(|| TimeboxError::UnknownSection(section_id.to_string()))?;

        let initial = (interval.start, interval.end);
        let kind = DragKind::from(target);
        tracing::debug!(id = section_id, ?kind, y, "drag started");

        self.drag = Some(DragSession {
            section_id: section_id.to_string(),
            kind,
            origin_y: y,
            initial: Some(initial),
            frame: Some(DragFrame {
                start: initial.0,
                end: initial.1,
                snap: None,
            }),
            drop_at: None,
        });
        Ok(())
    }

    /// Start dragging a section out of the unscheduled tray.
    pub fn pointer_down_unscheduled(&mut self, section_id: &str, y: f64) -> Result<()> {
        self.ensure_idle()?;
        if !self.unscheduled.iter().any(|s| s.id == section_id) {
            return Err(if self.scheduled.contains(section_id) {
                TimeboxError::NotUnscheduled(section_id.to_string())
            } else {
                TimeboxError::UnknownSection(section_id.to_string())
            });
        }
        tracing::debug!(id = section_id, y, "tray drag started");

        self.drag = Some(DragSession {
            section_id: section_id.to_string(),
            kind: DragKind::CreateFromUnscheduled,
            origin_y: y,
            initial: None,
            frame: None,
            drop_at: None,
        });
        self.view.ghost = Some(Ghost {
            section_id: section_id.to_string(),
            translate_y: 0.0,
        });
        Ok(())
    }

    /// Track the pointer. Ignored when no drag is in flight.
    pub fn pointer_move(&mut self, y: f64, timeline_y: Option<f64>) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let delta_px = y - drag.origin_y;

        if drag.kind == DragKind::CreateFromUnscheduled {
            if let Some(ghost) = self.view.ghost.as_mut() {
                ghost.translate_y = delta_px;
            }
            drag.drop_at = timeline_y.map(|ty| interaction::drop_minute(ty, &self.config));
            self.view.drop_preview = drag.drop_at.map(|minute| DropPreview {
                minute,
                offset_px: minute_to_offset(minute, &self.config),
            });
            return;
        }

        let Some(initial) = drag.initial else {
            return;
        };
        let delta = interaction::delta_minutes(delta_px, self.config.pixels_per_hour);
        let snap_points = self.scheduled.snap_points(&drag.section_id);
        let frame = interaction::drag_frame(drag.kind, initial, delta, &snap_points, &self.config);
        tracing::trace!(id = %drag.section_id, ?frame, "drag frame");

        drag.frame = Some(frame);
        self.view.snap_guide = frame.snap.map(|minute| SnapGuide {
            minute,
            offset_px: minute_to_offset(minute, &self.config),
        });
    }

    /// End the drag: round, settle, resolve conflicts, tear down drag state.
    ///
    /// Teardown happens whatever the outcome. Returns `None` when idle.
    pub fn pointer_up(&mut self, now: NaiveDateTime) -> Option<Settled> {
        let drag = self.drag.take()?;
        self.view.clear_drag();

        let settled = match drag.kind {
            DragKind::CreateFromUnscheduled => self.commit_drop(&drag),
            _ => self.commit_edit(&drag),
        };

        if settled.resolution.adjusted() {
            self.view
                .post_notice(ADJUSTED_NOTICE, now, self.config.notice_ttl_ms);
        }
        tracing::info!(
            id = %settled.section_id,
            interval = ?settled.interval,
            shifted = ?settled.resolution.shifted,
            "drag settled"
        );
        Some(settled)
    }

    /// Lost pointer capture, window blur or any other abrupt end of a drag.
    /// Settles exactly like [`pointer_up`](Self::pointer_up).
    pub fn release(&mut self, now: NaiveDateTime) -> Option<Settled> {
        if self.drag.is_some() {
            tracing::debug!("pointer released without pointer-up");
        }
        self.pointer_up(now)
    }

    /// Feed one recorded or host-delivered event through the state machine.
    pub fn dispatch(&mut self, input: PointerInput, now: NaiveDateTime) -> Result<Option<Settled>> {
        match input {
            PointerInput::Down { section, target, y } => {
                self.pointer_down(&section, target, y)?;
                Ok(None)
            }
            PointerInput::DownUnscheduled { section, y } => {
                self.pointer_down_unscheduled(&section, y)?;
                Ok(None)
            }
            PointerInput::Move { y, timeline_y } => {
                self.pointer_move(y, timeline_y);
                Ok(None)
            }
            PointerInput::Up => Ok(self.pointer_up(now)),
            PointerInput::Release => Ok(self.release(now)),
        }
    }

    /// Settle every interval into the window and resolve all overlaps.
    /// Ends any drag in flight first.
    pub fn settle_all(&mut self, now: NaiveDateTime) -> Resolution {
        self.release(now);
        let resolution = self.scheduled.resolve();
        if resolution.adjusted() {
            self.view
                .post_notice(ADJUSTED_NOTICE, now, self.config.notice_ttl_ms);
        }
        resolution
    }

    /// Advance timers. Returns true if the notice expired.
    pub fn tick(&mut self, now: NaiveDateTime) -> bool {
        self.view.expire(now)
    }

    // -----------------------------------------------------------------------
    // Presentation helpers
    // -----------------------------------------------------------------------

    pub fn is_today(&self, now: NaiveDateTime) -> bool {
        now.date() == self.date
    }

    /// Pixel offset of the "now" line, when the day is today and now is on
    /// the timeline.
    pub fn now_indicator(&self, now: NaiveDateTime) -> Option<f64> {
        if !self.is_today(now) {
            return None;
        }
        let minute = minute_of_day(now);
        (self.config.day_start..=self.config.day_end)
            .contains(&minute)
            .then(|| minute_to_offset(minute, &self.config))
    }

    /// Where to scroll when the scheduler opens: a little above "now" for
    /// today, a little above the current section otherwise.
    pub fn scroll_target(&self, now: NaiveDateTime) -> f64 {
        let pph = self.config.pixels_per_hour;
        let target = if self.is_today(now) {
            let minute = minute_of_day(now);
            if minute > self.config.day_start {
                minute_to_offset(minute, &self.config) - pph * 2.0
            } else {
                0.0
            }
        } else {
            self.current_section_id
                .as_deref()
                .and_then(|id| self.scheduled.get(id))
                .map(|interval| minute_to_offset(interval.start, &self.config) - pph)
                .unwrap_or(0.0)
        };
        target.max(0.0)
    }

    // -----------------------------------------------------------------------
    // Ending the session
    // -----------------------------------------------------------------------

    /// Hand back every section: scheduled ones in start order with their
    /// times written as `HH:mm`, then whatever is left unscheduled.
    pub fn save(mut self, now: NaiveDateTime) -> Vec<Section> {
        self.release(now);

        let mut out = Vec::with_capacity(self.scheduled.len() + self.unscheduled.len());
        for interval in self.scheduled.sorted_by_start() {
            if let Some(mut section) = self.details.remove(&interval.id) {
                section.start_time = Some(minutes_to_time(interval.start));
                section.end_time = Some(minutes_to_time(interval.end));
                out.push(section);
            }
        }
        out.append(&mut self.unscheduled);

        tracing::info!(date = %self.date, sections = out.len(), "saved schedule");
        out
    }

    /// Discard the working copy, including any drag in flight.
    pub fn cancel(self) {
        if let Some(drag) = &self.drag {
            tracing::debug!(id = %drag.section_id, "discarding drag on cancel");
        }
        tracing::info!(date = %self.date, "scheduler cancelled");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_idle(&self) -> Result<()> {
        match &self.drag {
            Some(drag) => Err(TimeboxError::DragInProgress(drag.section_id.clone())),
            None => Ok(()),
        }
    }

    fn commit_edit(&mut self, drag: &DragSession) -> Settled {
        let frame = drag
            .frame
            .or_else(|| drag.initial.map(|(start, end)| DragFrame { start, end, snap: None }));

        let Some(frame) = frame else {
            return Settled {
                section_id: drag.section_id.clone(),
                interval: self.scheduled.get(&drag.section_id).cloned(),
                resolution: Resolution::default(),
            };
        };

        let (start, end) = interaction::round_frame(frame.start, frame.end, &self.config);
        let written = self.scheduled.insert_or_update(
            TimeInterval::new(drag.section_id.clone(), start, end),
            drag.kind.edit_kind(),
        );
        let resolution = self.scheduled.resolve();

        Settled {
            section_id: drag.section_id.clone(),
            interval: self.scheduled.get(&written.id).cloned(),
            resolution,
        }
    }

    fn commit_drop(&mut self, drag: &DragSession) -> Settled {
        let Some(drop_at) = drag.drop_at else {
            tracing::debug!(id = %drag.section_id, "released outside the timeline");
            return Settled {
                section_id: drag.section_id.clone(),
                interval: None,
                resolution: Resolution::default(),
            };
        };

        let Some(pos) = self.unscheduled.iter().position(|s| s.id == drag.section_id) else {
            return Settled {
                section_id: drag.section_id.clone(),
                interval: None,
                resolution: Resolution::default(),
            };
        };
        let section = self.unscheduled.remove(pos);

        let (start, end) = interaction::round_frame(
            drop_at,
            drop_at + self.config.default_drop_duration,
            &self.config,
        );
        self.scheduled.insert_or_update(
            TimeInterval::new(section.id.clone(), start, end),
            drag.kind.edit_kind(),
        );
        self.details.insert(section.id.clone(), section);
        let resolution = self.scheduled.resolve();

        Settled {
            section_id: drag.section_id.clone(),
            interval: self.scheduled.get(&drag.section_id).cloned(),
            resolution,
        }
    }
}

fn minute_of_day(now: NaiveDateTime) -> Minute {
    (now.hour() * 60 + now.minute()) as Minute
}
