//! Weekly time slots and lesson intervals.
//!
//! # Time Model
//! The timetable is a single repeating week. A lesson is placed by weekday
//! and time of day only; there are no dates.
//!
//! Intervals are half-open `[start, end)`: a lesson ending at 08:45 and one
//! starting at 08:45 do not overlap.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// School days, in grid order.
pub const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// A weekday-bound time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonInterval {
    pub day: Weekday,
    /// Interval start (inclusive).
    pub start: NaiveTime,
    /// Interval end (exclusive).
    pub end: NaiveTime,
}

impl LessonInterval {
    /// Creates a new interval.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { day, start, end }
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether `start < end`.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }

    /// Whether two intervals share a day and a strictly positive overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && times_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Strict overlap of `[a_start, a_end)` and `[b_start, b_end)`.
#[inline]
pub(crate) fn times_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// One cell of the weekly slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// 1-based position within the day.
    pub lesson_number: u32,
}

impl TimeSlot {
    /// Creates a new slot.
    pub fn new(day: Weekday, start: NaiveTime, end: NaiveTime, lesson_number: u32) -> Self {
        Self {
            day,
            start,
            end,
            lesson_number,
        }
    }

    /// The slot's interval.
    #[inline]
    pub fn interval(&self) -> LessonInterval {
        LessonInterval::new(self.day, self.start, self.end)
    }
}
