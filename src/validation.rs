//! Validation of manual schedule edits.
//!
//! Checks a single candidate lesson against the conflict index before it is
//! committed. Detects:
//! - Teacher double booking
//! - Class group double booking
//! - Classroom double booking
//! - Lessons outside the school week or with an empty interval
//!
//! An in-place update excludes the entry being replaced from every check.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::index::ConflictIndex;
use crate::models::{
    Axis, ClassGroupId, ClassroomId, EntryDraft, EntryId, SubjectId, TeacherId, WEEKDAYS,
};

/// The resources and time a new lesson would occupy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonCandidate {
    pub teacher_id: TeacherId,
    pub class_group_id: ClassGroupId,
    pub classroom_id: Option<ClassroomId>,
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl LessonCandidate {
    /// Creates a candidate without a classroom.
    pub fn new(
        teacher_id: TeacherId,
        class_group_id: ClassGroupId,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        Self {
            teacher_id,
            class_group_id,
            classroom_id: None,
            day,
            start,
            end,
        }
    }

    /// Sets the classroom.
    pub fn with_classroom(mut self, classroom_id: ClassroomId) -> Self {
        self.classroom_id = Some(classroom_id);
        self
    }

    /// Resource id on an axis, if the candidate uses that axis.
    pub fn resource(&self, axis: Axis) -> Option<u64> {
        match axis {
            Axis::Teacher => Some(self.teacher_id),
            Axis::ClassGroup => Some(self.class_group_id),
            Axis::Classroom => self.classroom_id,
        }
    }
}

impl From<&EntryDraft> for LessonCandidate {
    fn from(draft: &EntryDraft) -> Self {
        Self {
            teacher_id: draft.teacher_id,
            class_group_id: draft.class_group_id,
            classroom_id: draft.classroom_id,
            day: draft.slot.day,
            start: draft.slot.start,
            end: draft.slot.end,
        }
    }
}

/// A detected double booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub axis: Axis,
    pub entry_id: EntryId,
}

impl From<Conflict> for TimetableError {
    fn from(c: Conflict) -> Self {
        TimetableError::Conflict {
            axis: c.axis,
            entry_id: c.entry_id,
        }
    }
}

/// Gate for manual creates and updates.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleValidator<'a> {
    index: &'a ConflictIndex,
}

impl<'a> ScheduleValidator<'a> {
    pub fn new(index: &'a ConflictIndex) -> Self {
        Self { index }
    }

    /// Validates a candidate.
    ///
    /// Axes are checked in the order teacher, class group, classroom; the
    /// first conflict found is returned.
    ///
    /// # Errors
    /// - `InvalidDay` if the day is not a school day
    /// - `InvalidInterval` if `start >= end`
    /// - `Conflict` naming the axis and the conflicting entry
    pub fn check(&self, candidate: &LessonCandidate, exclude: Option<EntryId>) -> Result<()> {
        check_shape(candidate)?;
        match self.conflicts(candidate, exclude).into_iter().next() {
            Some(conflict) => Err(conflict.into()),
            None => Ok(()),
        }
    }

    /// All conflicts of a candidate, across every axis.
    pub fn conflicts(
        &self,
        candidate: &LessonCandidate,
        exclude: Option<EntryId>,
    ) -> Vec<Conflict> {
        let mut found = Vec::new();
        for axis in Axis::ALL {
            let Some(resource_id) = candidate.resource(axis) else {
                continue;
            };
            let hits = self.index.query_excluding(
                axis,
                resource_id,
                candidate.day,
                candidate.start,
                candidate.end,
                exclude,
            );
            found.extend(hits.into_iter().map(|entry_id| Conflict { axis, entry_id }));
        }
        found
    }
}

fn check_shape(candidate: &LessonCandidate) -> Result<()> {
    if !WEEKDAYS.contains(&candidate.day) {
        return Err(TimetableError::InvalidDay(candidate.day));
    }
    if candidate.start >= candidate.end {
        return Err(TimetableError::InvalidInterval {
            start: candidate.start,
            end: candidate.end,
        });
    }
    Ok(())
}

/// Checks that one more lesson keeps the pair within its weekly target.
///
/// `committed` must already exclude an entry that is being replaced.
pub fn ensure_within_weekly_target(
    subject_id: SubjectId,
    class_group_id: ClassGroupId,
    committed: u32,
    target: u32,
) -> Result<()> {
    if committed >= target {
        return Err(TimetableError::WeeklyTargetReached {
            subject_id,
            class_group_id,
            target,
        });
    }
    Ok(())
}
