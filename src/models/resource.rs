//! Catalog records.
//!
//! Teachers, subjects, class groups and classrooms are the resources a
//! timetable is built from. They are supplied by the surrounding school
//! system and never mutated by the scheduler.

use serde::{Deserialize, Serialize};

use super::{ClassGroupId, ClassroomId, SubjectId, TeacherId};

/// A teacher and the subjects they are qualified to teach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub full_name: String,
    /// Qualifications. Used when sample data picks a teacher for a subject.
    pub subject_ids: Vec<SubjectId>,
}

/// A taught subject with its weekly lesson count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Short label for compact views (e.g. "Math").
    pub short_name: Option<String>,
    /// Lessons per week for each class group taking the subject.
    pub hours_per_week: u32,
}

/// A group of students attending lessons together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: ClassGroupId,
    pub name: String,
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classroom {
    pub id: ClassroomId,
    /// Unique room number (e.g. "101").
    pub room_number: String,
    /// Optional descriptive name (e.g. "Biology Lab").
    pub name: Option<String>,
    pub floor: i32,
    /// Seats (default: 30).
    pub capacity: u32,
}

impl Teacher {
    /// Creates a teacher with no qualifications.
    pub fn new(id: TeacherId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            subject_ids: Vec::new(),
        }
    }

    /// Adds a qualification.
    pub fn with_subject(mut self, subject_id: SubjectId) -> Self {
        if !self.subject_ids.contains(&subject_id) {
            self.subject_ids.push(subject_id);
        }
        self
    }

    /// Whether the teacher may teach a subject.
    pub fn teaches(&self, subject_id: SubjectId) -> bool {
        self.subject_ids.contains(&subject_id)
    }
}

impl Subject {
    /// Creates a subject.
    pub fn new(id: SubjectId, name: impl Into<String>, hours_per_week: u32) -> Self {
        Self {
            id,
            name: name.into(),
            short_name: None,
            hours_per_week,
        }
    }

    /// Sets the short name.
    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }
}

impl ClassGroup {
    pub fn new(id: ClassGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Classroom {
    /// Creates a ground-floor room with default capacity.
    pub fn new(id: ClassroomId, room_number: impl Into<String>) -> Self {
        Self {
            id,
            room_number: room_number.into(),
            name: None,
            floor: 0,
            capacity: 30,
        }
    }

    /// Sets the descriptive name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the floor.
    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = floor;
        self
    }

    /// Sets the seat count.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Label shown in timetables: the name if set, otherwise the room number.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.room_number)
    }
}
