//! Timetabling domain models.
//!
//! Catalog records (teachers, subjects, class groups, classrooms) are owned
//! by an external store and only read here. Schedule entries are the one
//! thing this crate produces.
//!
//! # Domain Mappings
//!
//! | Type | School term |
//! |------|-------------|
//! | Demand | Teaching assignment |
//! | TimeSlot | Period |
//! | ScheduleEntry | Timetable cell |
//! | Axis | Teacher / class / room |

mod demand;
mod entry;
mod resource;
mod slot;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use demand::Demand;
pub use entry::{EntryDraft, ScheduleEntry};
pub use resource::{ClassGroup, Classroom, Subject, Teacher};
pub use slot::{LessonInterval, TimeSlot, WEEKDAYS};
pub(crate) use slot::times_overlap;

pub type TeacherId = u64;
pub type SubjectId = u64;
pub type ClassGroupId = u64;
pub type ClassroomId = u64;
pub type EntryId = u64;

/// A conflict axis: a resource kind that may not be double-booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Axis {
    Teacher,
    ClassGroup,
    Classroom,
}

impl Axis {
    /// All axes, in the order conflicts are checked.
    pub const ALL: [Axis; 3] = [Axis::Teacher, Axis::ClassGroup, Axis::Classroom];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Teacher => "teacher",
            Axis::ClassGroup => "class group",
            Axis::Classroom => "classroom",
        };
        f.write_str(name)
    }
}
