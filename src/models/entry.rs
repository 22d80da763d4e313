//! Schedule entries.
//!
//! An entry places one lesson of a subject, taught by one teacher to one
//! class group, into a weekly slot and optionally a classroom. Entries are
//! never edited in place: an edit inserts a new entry and removes the old one.

use serde::{Deserialize, Serialize};

use super::{ClassGroupId, ClassroomId, EntryId, LessonInterval, SubjectId, TeacherId, TimeSlot};

/// A committed lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Identifier assigned by the entry store.
    pub id: EntryId,
    pub class_group_id: ClassGroupId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    /// Room, if the lesson has one.
    pub classroom_id: Option<ClassroomId>,
    pub slot: TimeSlot,
}

/// An entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub class_group_id: ClassGroupId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub classroom_id: Option<ClassroomId>,
    pub slot: TimeSlot,
}

impl EntryDraft {
    /// Creates a draft without a classroom.
    pub fn new(
        class_group_id: ClassGroupId,
        teacher_id: TeacherId,
        subject_id: SubjectId,
        slot: TimeSlot,
    ) -> Self {
        Self {
            class_group_id,
            teacher_id,
            subject_id,
            classroom_id: None,
            slot,
        }
    }

    /// Sets the classroom.
    pub fn with_classroom(mut self, classroom_id: ClassroomId) -> Self {
        self.classroom_id = Some(classroom_id);
        self
    }

    /// Attaches a store-assigned id.
    pub fn into_entry(self, id: EntryId) -> ScheduleEntry {
        ScheduleEntry {
            id,
            class_group_id: self.class_group_id,
            teacher_id: self.teacher_id,
            subject_id: self.subject_id,
            classroom_id: self.classroom_id,
            slot: self.slot,
        }
    }
}

impl ScheduleEntry {
    /// The occupied interval.
    #[inline]
    pub fn interval(&self) -> LessonInterval {
        self.slot.interval()
    }

    /// Whether the entry teaches `subject_id` to `class_group_id`.
    #[inline]
    pub fn is_lesson_of(&self, subject_id: SubjectId, class_group_id: ClassGroupId) -> bool {
        self.subject_id == subject_id && self.class_group_id == class_group_id
    }

    /// The entry without its id, for re-inserting.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            class_group_id: self.class_group_id,
            teacher_id: self.teacher_id,
            subject_id: self.subject_id,
            classroom_id: self.classroom_id,
            slot: self.slot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};

    fn slot() -> TimeSlot {
        TimeSlot::new(
            Weekday::Tue,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 45, 0).unwrap(),
            2,
        )
    }

    #[test]
    fn test_draft_into_entry() {
        let entry = EntryDraft::new(100, 10, 1, slot()).with_classroom(5).into_entry(42);
        assert_eq!(entry.id, 42);
        assert_eq!(entry.classroom_id, Some(5));
        assert_eq!(entry.slot.lesson_number, 2);
        assert!(entry.is_lesson_of(1, 100));
        assert!(!entry.is_lesson_of(1, 101));
    }

    #[test]
    fn test_entry_interval() {
        let entry = EntryDraft::new(100, 10, 1, slot()).into_entry(1);
        let interval = entry.interval();
        assert_eq!(interval.day, Weekday::Tue);
        assert_eq!(interval.duration_minutes(), 45);
    }
}
