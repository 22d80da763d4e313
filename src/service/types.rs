//! Request and view types of the timetable service.
//!
//! All types serialize camelCase so they can be handed to a JSON transport
//! unchanged.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::catalog::ResourceCatalog;
use crate::error::Result;
use crate::grid::GridConfig;
use crate::models::{
    ClassGroupId, EntryDraft, EntryId, ScheduleEntry, SubjectId, TeacherId, TimeSlot,
};
use crate::scheduler::{AllocationReport, GenerationStatus};

/// One teacher teaching one subject to several class groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSubjectMapping {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub class_group_ids: Vec<ClassGroupId>,
}

impl TeacherSubjectMapping {
    pub fn new(
        teacher_id: TeacherId,
        subject_id: SubjectId,
        class_group_ids: Vec<ClassGroupId>,
    ) -> Self {
        Self {
            teacher_id,
            subject_id,
            class_group_ids,
        }
    }
}

/// Batch generation input.
///
/// Unset grid fields fall back to the service's configured grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub day_start_time: Option<NaiveTime>,
    pub day_end_time: Option<NaiveTime>,
    pub lesson_duration_minutes: Option<i64>,
    pub break_duration_minutes: Option<i64>,
    pub teacher_subject_mappings: Vec<TeacherSubjectMapping>,
}

impl GenerateRequest {
    pub fn new(teacher_subject_mappings: Vec<TeacherSubjectMapping>) -> Self {
        Self {
            teacher_subject_mappings,
            ..Default::default()
        }
    }

    /// Overrides the school day bounds.
    pub fn with_day(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.day_start_time = Some(start);
        self.day_end_time = Some(end);
        self
    }

    /// Overrides lesson and break lengths.
    pub fn with_durations(mut self, lesson_minutes: i64, break_minutes: i64) -> Self {
        self.lesson_duration_minutes = Some(lesson_minutes);
        self.break_duration_minutes = Some(break_minutes);
        self
    }

    /// Grid parameters for this request on top of `base`.
    pub fn grid_config(&self, base: &GridConfig) -> GridConfig {
        GridConfig {
            day_start: self.day_start_time.unwrap_or(base.day_start),
            day_end: self.day_end_time.unwrap_or(base.day_end),
            lesson_minutes: self.lesson_duration_minutes.unwrap_or(base.lesson_minutes),
            break_minutes: self.break_duration_minutes.unwrap_or(base.break_minutes),
        }
    }
}

/// Manual create or update input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub class_group_id: ClassGroupId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Room number, resolved through the catalog.
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default = "first_lesson")]
    pub lesson_number: u32,
}

fn first_lesson() -> u32 {
    1
}

impl CreateScheduleRequest {
    pub fn new(
        class_group_id: ClassGroupId,
        teacher_id: TeacherId,
        subject_id: SubjectId,
        day_of_week: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            class_group_id,
            teacher_id,
            subject_id,
            day_of_week,
            start_time,
            end_time,
            room: None,
            lesson_number: first_lesson(),
        }
    }

    pub fn with_room(mut self, room_number: impl Into<String>) -> Self {
        self.room = Some(room_number.into());
        self
    }

    pub fn with_lesson_number(mut self, lesson_number: u32) -> Self {
        self.lesson_number = lesson_number;
        self
    }

    /// Resolves catalog references into a draft.
    ///
    /// # Errors
    /// `NotFound` for an unknown class group, teacher, subject or room number.
    pub(crate) fn to_draft<C: ResourceCatalog + ?Sized>(&self, catalog: &C) -> Result<EntryDraft> {
        catalog.require_class_group(self.class_group_id)?;
        catalog.require_teacher(self.teacher_id)?;
        catalog.require_subject(self.subject_id)?;
        let slot = TimeSlot::new(
            self.day_of_week,
            self.start_time,
            self.end_time,
            self.lesson_number,
        );
        let draft = EntryDraft::new(self.class_group_id, self.teacher_id, self.subject_id, slot);
        match self.room.as_deref() {
            Some(number) => {
                let classroom = catalog.require_classroom_by_number(number)?;
                Ok(draft.with_classroom(classroom.id))
            }
            None => Ok(draft),
        }
    }
}

/// An entry joined with catalog names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub id: EntryId,
    pub class_group_id: ClassGroupId,
    pub class_group_name: String,
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    pub subject_short_name: Option<String>,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Classroom display name.
    pub room: Option<String>,
    pub lesson_number: u32,
}

impl ScheduleView {
    /// Joins an entry with its catalog records.
    ///
    /// # Errors
    /// `NotFound` if a referenced record has left the catalog.
    pub fn resolve<C: ResourceCatalog + ?Sized>(
        entry: &ScheduleEntry,
        catalog: &C,
    ) -> Result<Self> {
        let group = catalog.require_class_group(entry.class_group_id)?;
        let teacher = catalog.require_teacher(entry.teacher_id)?;
        let subject = catalog.require_subject(entry.subject_id)?;
        let room = match entry.classroom_id {
            Some(id) => Some(catalog.require_classroom(id)?.display_name().to_string()),
            None => None,
        };
        Ok(Self {
            id: entry.id,
            class_group_id: group.id,
            class_group_name: group.name.clone(),
            teacher_id: teacher.id,
            teacher_name: teacher.full_name.clone(),
            subject_id: subject.id,
            subject_name: subject.name.clone(),
            subject_short_name: subject.short_name.clone(),
            day_of_week: entry.slot.day,
            start_time: entry.slot.start,
            end_time: entry.slot.end,
            room,
            lesson_number: entry.slot.lesson_number,
        })
    }
}

/// Result of a batch generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub status: GenerationStatus,
    /// Entries created by this run, in commit order.
    pub entries: Vec<ScheduleView>,
    pub report: AllocationReport,
}
