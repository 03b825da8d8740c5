//! Error types for timebox-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimeboxError {
    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Duplicate section id: {0}")]
    DuplicateSection(String),

    #[error("Section is already scheduled: {0}")]
    NotUnscheduled(String),

    #[error("A drag is already in progress for section {0}")]
    DragInProgress(String),

    #[error("No plan for {0}")]
    PlanNotFound(NaiveDate),

    #[error("Plan for {0} has been reviewed and is locked")]
    PlanLocked(NaiveDate),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TimeboxError>;
