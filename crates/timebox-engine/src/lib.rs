//! # timebox-engine
//!
//! Timeline scheduling for timeboxed daily plans.
//!
//! A day is split into sections. Sections with a start and end time live on a
//! timeline between 04:00 and 24:00; the engine keeps that timeline free of
//! overlaps while the user drags, resizes and drops blocks onto it.
//!
//! ## Modules
//!
//! - [`time`]: `HH:mm` parsing/formatting, overlap test, duration text
//! - [`interval`]: day window, settling rules, the sorted [`ScheduledSet`]
//! - [`conflict`]: push-forward overlap repair and pairwise conflict reports
//! - [`interaction`]: pointer deltas, snapping, drop points, rounding
//! - [`view`]: transient view state (snap guide, drop preview, notices)
//! - [`session`]: the scheduler session: open, pointer events, save, cancel
//! - [`plan`]: daily plan, sections, tasks, productivity scores
//! - [`template`]: weekday and weekend starter sections, colour palette
//! - [`store`]: JSON-backed plan store that hands out scheduler sessions
//! - [`config`]: scheduler tuning (window, tolerances, pixel scale)
//! - [`error`]: Error types

pub mod config;
pub mod conflict;
pub mod error;
pub mod interaction;
pub mod interval;
pub mod plan;
pub mod session;
pub mod store;
pub mod template;
pub mod time;
pub mod view;

pub use config::SchedulerConfig;
pub use conflict::{find_conflicts, resolve_conflicts, Conflict, Resolution};
pub use error::TimeboxError;
pub use interaction::{DragKind, PointerTarget};
pub use interval::{DayWindow, EditKind, ScheduledSet, TimeInterval};
pub use plan::{DailyPlan, Section, Task, TaskKind};
pub use session::{PointerInput, SchedulerSession, Settled};
pub use store::PlanStore;
pub use time::{minutes_to_time, time_to_minutes, Minute};
