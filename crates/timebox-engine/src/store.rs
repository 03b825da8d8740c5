//! JSON-backed store of daily plans.
//!
//! The store is the only owner of the plans. A scheduler session gets a copy
//! of one day's timeboxed sections from [`PlanStore::open_scheduler`] and
//! writes its output back, all at once, through
//! [`PlanStore::commit_schedule`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::SchedulerConfig;
use crate::error::{Result, TimeboxError};
use crate::plan::{DailyPlan, DayReview, Section};
use crate::session::SchedulerSession;

#[derive(Debug, Default)]
pub struct PlanStore {
    path: Option<PathBuf>,
    plans: BTreeMap<NaiveDate, DailyPlan>,
}

impl PlanStore {
    /// An empty store with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load plans from `path`. A missing file is an empty store that will be
    /// created on the first [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let plans = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no plan file yet");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(path = %path.display(), "loaded plan store");
        Ok(Self {
            path: Some(path),
            plans,
        })
    }

    /// Write all plans back to the file the store was loaded from.
    /// A no-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.plans)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), plans = self.plans.len(), "saved plan store");
        Ok(())
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyPlan> {
        self.plans.get(&date)
    }

    pub fn insert(&mut self, plan: DailyPlan) -> Option<DailyPlan> {
        self.plans.insert(plan.date, plan)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.plans.keys().copied()
    }

    /// The plan for `date`, created when missing: a carry-over of the
    /// previous day's plan if there is one, otherwise a template.
    pub fn open_day(&mut self, date: NaiveDate) -> &DailyPlan {
        let plan = match self.plans.remove(&date) {
            Some(plan) => plan,
            None => {
                let previous = date.pred_opt().and_then(|d| self.plans.get(&d));
                tracing::info!(%date, carried_over = previous.is_some(), "created plan");
                match previous {
                    Some(previous) => previous.carry_over(date),
                    None => DailyPlan::from_template(date),
                }
            }
        };
        self.plans.entry(date).or_insert(plan)
    }

    /// Append a new empty timeboxed section to the day.
    pub fn add_section(&mut self, date: NaiveDate) -> Result<Section> {
        let plan = self.unlocked_plan_mut(date)?;
        Ok(plan.add_section().clone())
    }

    /// Delete a section and its tasks from the day.
    pub fn remove_section(&mut self, date: NaiveDate, section_id: &str) -> Result<Section> {
        let plan = self.unlocked_plan_mut(date)?;
        let removed = plan
            .remove_section(section_id)
            .ok_or_else(|| TimeboxError::UnknownSection(section_id.to_string()))?;
        tracing::info!(%date, section = section_id, "removed section");
        Ok(removed)
    }

    /// Lock in the day's plan.
    pub fn confirm(&mut self, date: NaiveDate) -> Result<()> {
        self.plan_mut(date)?.is_confirmed = true;
        Ok(())
    }

    /// Compute productivity for the day and store it with `note`.
    pub fn record_review(&mut self, date: NaiveDate, note: impl Into<String>) -> Result<DayReview> {
        let plan = self.plan_mut(date)?;
        let scores = plan.productivity();
        let review = DayReview {
            signal_productivity: scores.signal,
            absolute_productivity: scores.absolute,
            note: note.into(),
        };
        plan.review = Some(review.clone());
        tracing::info!(%date, signal = scores.signal, absolute = scores.absolute, "recorded review");
        Ok(review)
    }

    /// Remove the review, unlocking the day.
    pub fn reset_review(&mut self, date: NaiveDate) -> Result<Option<DayReview>> {
        Ok(self.plan_mut(date)?.review.take())
    }

    /// Open a scheduler over a copy of the day's timeboxed sections.
    pub fn open_scheduler(
        &self,
        date: NaiveDate,
        current_section_id: Option<String>,
        config: SchedulerConfig,
    ) -> Result<SchedulerSession> {
        let plan = self.plans.get(&date).ok_or(TimeboxError::PlanNotFound(date))?;
        SchedulerSession::open(plan.timeboxed_sections(), current_section_id, date, config)
    }

    /// Replace the day's timeboxed sections with a scheduler's output.
    pub fn commit_schedule(&mut self, date: NaiveDate, sections: Vec<Section>) -> Result<()> {
        self.unlocked_plan_mut(date)?.apply_schedule(sections);
        tracing::info!(%date, "committed schedule");
        Ok(())
    }

    fn plan_mut(&mut self, date: NaiveDate) -> Result<&mut DailyPlan> {
        self.plans
            .get_mut(&date)
            .ok_or(TimeboxError::PlanNotFound(date))
    }

    fn unlocked_plan_mut(&mut self, date: NaiveDate) -> Result<&mut DailyPlan> {
        let plan = self.plan_mut(date)?;
        if plan.is_locked() {
            return Err(TimeboxError::PlanLocked(date));
        }
        Ok(plan)
    }
}
