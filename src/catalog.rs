//! Resource catalog.
//!
//! Read-only access to the teachers, subjects, class groups and classrooms
//! owned by the surrounding school system.

use crate::error::{ResourceKind, Result, TimetableError};
use crate::models::{
    ClassGroup, ClassGroupId, Classroom, ClassroomId, Subject, SubjectId, Teacher, TeacherId,
};

/// Lookup seam for catalog records.
///
/// List methods return records in a stable order; strict allocation scans
/// [`classrooms`](Self::classrooms) in that order.
pub trait ResourceCatalog: Send + Sync {
    fn teacher(&self, id: TeacherId) -> Option<&Teacher>;
    fn subject(&self, id: SubjectId) -> Option<&Subject>;
    fn class_group(&self, id: ClassGroupId) -> Option<&ClassGroup>;
    fn classroom(&self, id: ClassroomId) -> Option<&Classroom>;
    fn classroom_by_number(&self, room_number: &str) -> Option<&Classroom>;

    fn teachers(&self) -> Vec<&Teacher>;
    fn subjects(&self) -> Vec<&Subject>;
    fn class_groups(&self) -> Vec<&ClassGroup>;
    fn classrooms(&self) -> Vec<&Classroom>;

    /// Looks up a teacher or fails with `NotFound`.
    fn require_teacher(&self, id: TeacherId) -> Result<&Teacher> {
        self.teacher(id)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::Teacher, id))
    }

    /// Looks up a subject or fails with `NotFound`.
    fn require_subject(&self, id: SubjectId) -> Result<&Subject> {
        self.subject(id)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::Subject, id))
    }

    /// Looks up a class group or fails with `NotFound`.
    fn require_class_group(&self, id: ClassGroupId) -> Result<&ClassGroup> {
        self.class_group(id)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::ClassGroup, id))
    }

    /// Looks up a classroom by id or fails with `NotFound`.
    fn require_classroom(&self, id: ClassroomId) -> Result<&Classroom> {
        self.classroom(id)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::Classroom, id))
    }

    /// Looks up a classroom by room number or fails with `NotFound`.
    fn require_classroom_by_number(&self, room_number: &str) -> Result<&Classroom> {
        self.classroom_by_number(room_number)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::Classroom, room_number))
    }
}

/// Catalog held in memory, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    class_groups: Vec<ClassGroup>,
    classrooms: Vec<Classroom>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        upsert(&mut self.teachers, teacher, |t| t.id);
        self
    }

    /// Adds or replaces a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        upsert(&mut self.subjects, subject, |s| s.id);
        self
    }

    /// Adds or replaces a class group.
    pub fn with_class_group(mut self, class_group: ClassGroup) -> Self {
        upsert(&mut self.class_groups, class_group, |g| g.id);
        self
    }

    /// Adds or replaces a classroom.
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        upsert(&mut self.classrooms, classroom, |r| r.id);
        self
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> u64) {
    let key = id(&item);
    match items.iter().position(|existing| id(existing) == key) {
        Some(pos) => items[pos] = item,
        None => items.push(item),
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    fn class_group(&self, id: ClassGroupId) -> Option<&ClassGroup> {
        self.class_groups.iter().find(|g| g.id == id)
    }

    fn classroom(&self, id: ClassroomId) -> Option<&Classroom> {
        self.classrooms.iter().find(|r| r.id == id)
    }

    fn classroom_by_number(&self, room_number: &str) -> Option<&Classroom> {
        self.classrooms.iter().find(|r| r.room_number == room_number)
    }

    fn teachers(&self) -> Vec<&Teacher> {
        self.teachers.iter().collect()
    }

    fn subjects(&self) -> Vec<&Subject> {
        self.subjects.iter().collect()
    }

    fn class_groups(&self) -> Vec<&ClassGroup> {
        self.class_groups.iter().collect()
    }

    fn classrooms(&self) -> Vec<&Classroom> {
        self.classrooms.iter().collect()
    }
}
