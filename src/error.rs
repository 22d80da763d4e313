//! Error types.
//!
//! A single error enum covers the whole crate. Conflicts and lookups abort
//! the operation that raised them; batch generation never returns an error
//! for a single unsatisfied demand (see [`AllocationReport`](crate::scheduler::AllocationReport)).

use chrono::{NaiveTime, Weekday};
use std::fmt;
use thiserror::Error;

use crate::models::{Axis, ClassGroupId, EntryId, SubjectId};

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TimetableError>;

/// Kind of record a [`TimetableError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Teacher,
    Subject,
    ClassGroup,
    Classroom,
    Entry,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Teacher => "teacher",
            ResourceKind::Subject => "subject",
            ResourceKind::ClassGroup => "class group",
            ResourceKind::Classroom => "classroom",
            ResourceKind::Entry => "schedule entry",
        };
        f.write_str(name)
    }
}

/// Timetabling errors.
#[derive(Error, Debug)]
pub enum TimetableError {
    /// The candidate overlaps an existing entry on one axis.
    #[error("{axis} conflict with schedule entry {entry_id}")]
    Conflict { axis: Axis, entry_id: EntryId },

    /// A referenced record does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: ResourceKind, id: String },

    /// Grid or generation settings are unusable.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Lessons are only placed Monday to Friday.
    #[error("{0} is not a school day")]
    InvalidDay(Weekday),

    /// A lesson must end after it starts.
    #[error("invalid lesson interval: {start} - {end}")]
    InvalidInterval { start: NaiveTime, end: NaiveTime },

    /// The (subject, class group) pair already holds its weekly lesson count.
    #[error(
        "weekly target reached: subject={subject_id}, class_group={class_group_id}, target={target}"
    )]
    WeeklyTargetReached {
        subject_id: SubjectId,
        class_group_id: ClassGroupId,
        target: u32,
    },

    /// The entry store rejected a write.
    #[error("entry store failure: {0}")]
    Storage(String),

    /// Another thread panicked while holding the schedule lock.
    #[error("schedule lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TimetableError {
    /// Builds a `NotFound` error.
    pub fn not_found(resource: ResourceKind, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// The conflicting axis, if this is a conflict.
    pub fn conflict_axis(&self) -> Option<Axis> {
        match self {
            Self::Conflict { axis, .. } => Some(*axis),
            _ => None,
        }
    }
}
