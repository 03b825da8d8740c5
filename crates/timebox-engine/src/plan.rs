//! Daily plan model: sections, tasks, trackers and the end-of-day review.
//!
//! Field names serialize in camelCase so plans round-trip with the JSON the
//! planner front end stores.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::TimeInterval;
use crate::template::{self, COLOR_PALETTE, INTENTION_PROMPT, WIN_PROMPT};
use crate::time::time_to_minutes;

/// A fresh random id for a section or task.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// What a task records. On the wire the kind is the numeric `type` field
/// (0 checkbox, 1 short text, 2 long text, 3 checkbox with text).
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    Checkbox { checked: bool },
    TextShort { value: String },
    TextLong { value: String },
    CheckboxWithText { checked: bool, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TaskRepr", into = "TaskRepr")]
pub struct Task {
    pub id: String,
    pub label: String,
    pub description: Option<String>,
    /// Signal tasks are the ones that make the day count.
    pub is_signal: bool,
    pub kind: TaskKind,
}

/// Flat stored form of a [`Task`].
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRepr {
    id: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_signal: bool,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

impl TryFrom<TaskRepr> for Task {
    type Error = String;

    fn try_from(repr: TaskRepr) -> Result<Self, Self::Error> {
        let checked = repr.checked.unwrap_or(false);
        let value = repr.value.unwrap_or_default();
        let kind = match repr.kind {
            0 => TaskKind::Checkbox { checked },
            1 => TaskKind::TextShort { value },
            2 => TaskKind::TextLong { value },
            3 => TaskKind::CheckboxWithText { checked, value },
            other => return Err(format!("unknown task type {} for task '{}'", other, repr.id)),
        };
        Ok(Task {
            id: repr.id,
            label: repr.label,
            description: repr.description,
            is_signal: repr.is_signal,
            kind,
        })
    }
}

impl From<Task> for TaskRepr {
    fn from(task: Task) -> Self {
        let (kind, checked, value) = match task.kind {
            TaskKind::Checkbox { checked } => (0, Some(checked), None),
            TaskKind::TextShort { value } => (1, None, Some(value)),
            TaskKind::TextLong { value } => (2, None, Some(value)),
            TaskKind::CheckboxWithText { checked, value } => (3, Some(checked), Some(value)),
        };
        TaskRepr {
            id: task.id,
            label: task.label,
            description: task.description,
            is_signal: task.is_signal,
            kind,
            checked,
            value,
        }
    }
}

impl Task {
    /// A non-signal task with a fresh id.
    pub fn new(label: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: new_id(),
            label: label.into(),
            description: None,
            is_signal: false,
            kind,
        }
    }

    /// A copy for a new day: fresh id, unchecked, and the daily prompts
    /// emptied. Other text is kept.
    pub fn carried_over(&self) -> Self {
        let kind = match &self.kind {
            TaskKind::Checkbox { .. } => TaskKind::Checkbox { checked: false },
            TaskKind::CheckboxWithText { value, .. } => TaskKind::CheckboxWithText {
                checked: false,
                value: value.clone(),
            },
            TaskKind::TextLong { .. } if self.label.contains(WIN_PROMPT) => TaskKind::TextLong {
                value: String::new(),
            },
            TaskKind::TextShort { .. } if self.label.contains(INTENTION_PROMPT) => {
                TaskKind::TextShort {
                    value: String::new(),
                }
            }
            other => other.clone(),
        };
        Self {
            id: new_id(),
            kind,
            ..self.clone()
        }
    }

    /// `Some(checked)` for tasks that can be ticked off.
    pub fn checked(&self) -> Option<bool> {
        match self.kind {
            TaskKind::Checkbox { checked } | TaskKind::CheckboxWithText { checked, .. } => {
                Some(checked)
            }
            TaskKind::TextShort { .. } | TaskKind::TextLong { .. } => None,
        }
    }
}

/// A named block of the day, optionally timeboxed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Absent means timeboxed; only an explicit `false` opts out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_timeboxed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: String::new(),
            goal: None,
            start_time: None,
            end_time: None,
            is_timeboxed: None,
            color: None,
            tasks: Vec::new(),
        }
    }

    /// Builder-style helper for fixtures and templates.
    pub fn with_times(mut self, start: &str, end: &str) -> Self {
        self.start_time = Some(start.to_string());
        self.end_time = Some(end.to_string());
        self
    }

    pub fn is_timeboxed(&self) -> bool {
        self.is_timeboxed != Some(false)
    }

    /// The section's interval when both times parse; `None` means unscheduled.
    pub fn interval(&self) -> Option<TimeInterval> {
        let start = time_to_minutes(self.start_time.as_deref()?)?;
        let end = time_to_minutes(self.end_time.as_deref()?)?;
        Some(TimeInterval::new(self.id.clone(), start, end))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trackers {
    pub urges: u32,
    pub payday_checked: bool,
    pub daily_win: String,
}

/// Percentages computed at the end of the day, plus the user's note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReview {
    pub signal_productivity: u8,
    pub absolute_productivity: u8,
    pub note: String,
}

/// Completion percentages over checkable tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Productivity {
    /// Share of signal tasks checked off.
    pub signal: u8,
    /// Share of all checkable tasks checked off.
    pub absolute: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_confirmed: bool,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub trackers: Trackers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review: Option<DayReview>,
}

impl DailyPlan {
    pub fn new(date: NaiveDate, sections: Vec<Section>) -> Self {
        Self {
            date,
            is_confirmed: false,
            sections,
            trackers: Trackers::default(),
            review: None,
        }
    }

    /// A fresh day from the weekday or weekend template.
    pub fn from_template(date: NaiveDate) -> Self {
        let sections = match date.weekday() {
            Weekday::Sat | Weekday::Sun => template::weekend_template(),
            _ => template::weekday_template(),
        };
        Self::new(date, sections)
    }

    /// This plan's layout for another day. Sections and tasks get new ids,
    /// checkboxes and daily prompts are cleared, trackers start over, and
    /// the copy is neither confirmed nor reviewed.
    pub fn carry_over(&self, date: NaiveDate) -> Self {
        let sections = self
            .sections
            .iter()
            .map(|s| Section {
                id: new_id(),
                tasks: s.tasks.iter().map(Task::carried_over).collect(),
                ..s.clone()
            })
            .collect();
        Self::new(date, sections)
    }

    /// Append an empty timeboxed section. Its colour is the next one in
    /// [`COLOR_PALETTE`] after the timeboxed sections already present.
    pub fn add_section(&mut self) -> &Section {
        let timeboxed = self.sections.iter().filter(|s| s.is_timeboxed()).count();
        let section = Section {
            icon: "📝".to_string(),
            is_timeboxed: Some(true),
            color: Some(COLOR_PALETTE[timeboxed % COLOR_PALETTE.len()].to_string()),
            ..Section::new(new_id(), "New Section")
        };
        let index = self.sections.len();
        self.sections.push(section);
        &self.sections[index]
    }

    /// Remove a section with all its tasks.
    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        let index = self.sections.iter().position(|s| s.id == id)?;
        Some(self.sections.remove(index))
    }

    /// A reviewed day is read-only.
    pub fn is_locked(&self) -> bool {
        self.review.is_some()
    }

    /// Sections that take part in the timeline scheduler.
    pub fn timeboxed_sections(&self) -> Vec<Section> {
        self.sections
            .iter()
            .filter(|s| s.is_timeboxed())
            .cloned()
            .collect()
    }

    /// Replace the timeboxed sections with a scheduler's output, keeping the
    /// non-timeboxed sections in front.
    pub fn apply_schedule(&mut self, scheduled: Vec<Section>) {
        let mut sections: Vec<Section> = self
            .sections
            .drain(..)
            .filter(|s| !s.is_timeboxed())
            .collect();
        sections.extend(scheduled);
        self.sections = sections;
    }

    pub fn productivity(&self) -> Productivity {
        let checkable: Vec<(bool, bool)> = self
            .sections
            .iter()
            .flat_map(|s| &s.tasks)
            .filter_map(|t| t.checked().map(|checked| (checked, t.is_signal)))
            .collect();

        let absolute = percentage(
            checkable.iter().filter(|(checked, _)| *checked).count(),
            checkable.len(),
        );
        let signal = percentage(
            checkable
                .iter()
                .filter(|(checked, signal)| *checked && *signal)
                .count(),
            checkable.iter().filter(|(_, signal)| *signal).count(),
        );

        Productivity { signal, absolute }
    }
}

fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (done as f64 / total as f64 * 100.0).round() as u8
}
