//! Demand model.
//!
//! A demand asks for `weekly_target` lessons of one subject, taught by one
//! teacher, for each of several class groups.

use serde::{Deserialize, Serialize};

use super::{ClassGroupId, Subject, SubjectId, TeacherId};

/// Lessons to place for a (teacher, subject, class groups) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    /// Class groups, in allocation order.
    pub class_group_ids: Vec<ClassGroupId>,
    /// Lessons per week for each class group.
    pub weekly_target: u32,
}

impl Demand {
    /// Creates a demand with no class groups.
    pub fn new(teacher_id: TeacherId, subject_id: SubjectId, weekly_target: u32) -> Self {
        Self {
            teacher_id,
            subject_id,
            class_group_ids: Vec::new(),
            weekly_target,
        }
    }

    /// Creates a demand whose target is the subject's weekly hours.
    pub fn for_subject(teacher_id: TeacherId, subject: &Subject) -> Self {
        Self::new(teacher_id, subject.id, subject.hours_per_week)
    }

    /// Adds a class group. Duplicates are ignored.
    pub fn with_class_group(mut self, class_group_id: ClassGroupId) -> Self {
        if !self.class_group_ids.contains(&class_group_id) {
            self.class_group_ids.push(class_group_id);
        }
        self
    }

    /// Adds several class groups.
    pub fn with_class_groups(self, ids: impl IntoIterator<Item = ClassGroupId>) -> Self {
        ids.into_iter().fold(self, Self::with_class_group)
    }

    /// Total lessons requested across all class groups, saturating at
    /// `u32::MAX`.
    pub fn total_lessons(&self) -> u32 {
        let groups = u32::try_from(self.class_group_ids.len()).unwrap_or(u32::MAX);
        self.weekly_target.saturating_mul(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demand_from_subject() {
        let math = Subject::new(1, "Mathematics", 5);
        let d = Demand::for_subject(10, &math).with_class_groups([100, 101, 100]);
        assert_eq!(d.weekly_target, 5);
        assert_eq!(d.class_group_ids, vec![100, 101]);
        assert_eq!(d.total_lessons(), 10);
    }

    #[test]
    fn test_empty_demand() {
        let d = Demand::new(1, 2, 3);
        assert_eq!(d.total_lessons(), 0);
    }

    #[test]
    fn test_total_lessons_saturates() {
        let d = Demand::new(1, 2, u32::MAX).with_class_groups([100, 101]);
        assert_eq!(d.total_lessons(), u32::MAX);
    }
}
