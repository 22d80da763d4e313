//! Weekly slot grid.
//!
//! Enumerates the candidate lesson slots of one school week from the day
//! bounds and the lesson and break lengths.
//!
//! # Algorithm
//! For each weekday (Monday to Friday, in that order) slots start at
//! `day_start` and repeat with stride `lesson + break` as long as the
//! lesson still ends no later than `day_end`. Lesson numbers restart at 1
//! every day.
//!
//! The sequence is finite and restartable: every call to
//! [`SlotGrid::slots`] yields the same slots in the same order.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::{TimeSlot, WEEKDAYS};

const MINUTES_PER_DAY: i64 = 24 * 60;
const DEFAULT_DAY_START: NaiveTime = time_of_day(8, 0);
const DEFAULT_DAY_END: NaiveTime = time_of_day(15, 0);

/// Grid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Start of the first lesson.
    pub day_start: NaiveTime,
    /// No lesson may end after this time.
    pub day_end: NaiveTime,
    pub lesson_minutes: i64,
    pub break_minutes: i64,
}

impl Default for GridConfig {
    /// 08:00 to 15:00, 45-minute lessons, 15-minute breaks.
    fn default() -> Self {
        Self {
            day_start: DEFAULT_DAY_START,
            day_end: DEFAULT_DAY_END,
            lesson_minutes: 45,
            break_minutes: 15,
        }
    }
}

impl GridConfig {
    /// Creates a grid configuration.
    pub fn new(
        day_start: NaiveTime,
        day_end: NaiveTime,
        lesson_minutes: i64,
        break_minutes: i64,
    ) -> Self {
        Self {
            day_start,
            day_end,
            lesson_minutes,
            break_minutes,
        }
    }

    /// Checks the parameters.
    ///
    /// # Errors
    /// `Configuration` if the lesson length is not positive, the break is
    /// negative, either exceeds a day, or the day ends before it starts.
    pub fn validate(&self) -> Result<()> {
        if self.lesson_minutes <= 0 {
            return Err(TimetableError::Configuration(format!(
                "lesson duration must be positive, got {} minutes",
                self.lesson_minutes
            )));
        }
        if self.break_minutes < 0 {
            return Err(TimetableError::Configuration(format!(
                "break duration must not be negative, got {} minutes",
                self.break_minutes
            )));
        }
        if self.lesson_minutes > MINUTES_PER_DAY || self.break_minutes > MINUTES_PER_DAY {
            return Err(TimetableError::Configuration(
                "lesson and break durations must fit in a day".into(),
            ));
        }
        if self.day_end < self.day_start {
            return Err(TimetableError::Configuration(format!(
                "day end {} is before day start {}",
                self.day_end, self.day_start
            )));
        }
        Ok(())
    }
}

/// Validated, immutable slot grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotGrid {
    config: GridConfig,
    start_secs: i64,
    end_secs: i64,
    lesson_secs: i64,
    stride_secs: i64,
}

impl SlotGrid {
    /// Builds a grid, failing fast on unusable parameters.
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            start_secs: i64::from(config.day_start.num_seconds_from_midnight()),
            end_secs: i64::from(config.day_end.num_seconds_from_midnight()),
            lesson_secs: config.lesson_minutes * 60,
            stride_secs: (config.lesson_minutes + config.break_minutes) * 60,
            config,
        })
    }

    /// The parameters this grid was built from.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Iterates all slots of the week in (day, time) order.
    pub fn slots(&self) -> Slots<'_> {
        Slots {
            grid: self,
            day_index: 0,
            cursor: self.start_secs,
            lesson_number: 1,
        }
    }

    /// Iterates the slots of one day.
    pub fn day_slots(&self, day: Weekday) -> impl Iterator<Item = TimeSlot> + '_ {
        self.slots().filter(move |s| s.day == day)
    }

    /// Number of slots per day.
    pub fn slots_per_day(&self) -> usize {
        if self.end_secs - self.start_secs < self.lesson_secs {
            return 0;
        }
        ((self.end_secs - self.start_secs - self.lesson_secs) / self.stride_secs + 1) as usize
    }

    /// Number of slots per week.
    pub fn len(&self) -> usize {
        self.slots_per_day() * WEEKDAYS.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TryFrom<GridConfig> for SlotGrid {
    type Error = TimetableError;

    fn try_from(config: GridConfig) -> Result<Self> {
        Self::new(config)
    }
}

/// Iterator over grid slots. See [`SlotGrid::slots`].
#[derive(Debug, Clone)]
pub struct Slots<'a> {
    grid: &'a SlotGrid,
    day_index: usize,
    cursor: i64,
    lesson_number: u32,
}

impl Iterator for Slots<'_> {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        loop {
            let day = *WEEKDAYS.get(self.day_index)?;
            let end = self.cursor + self.grid.lesson_secs;
            if end <= self.grid.end_secs {
                let slot = TimeSlot::new(
                    day,
                    from_secs(self.cursor)?,
                    from_secs(end)?,
                    self.lesson_number,
                );
                self.cursor += self.grid.stride_secs;
                self.lesson_number += 1;
                return Some(slot);
            }
            self.day_index += 1;
            self.cursor = self.grid.start_secs;
            self.lesson_number = 1;
        }
    }
}

fn from_secs(secs: i64) -> Option<NaiveTime> {
    NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(secs).ok()?, 0)
}

/// Time of day from literal hour and minute.
///
/// Meant for constants: an out-of-range hour or minute fails const
/// evaluation.
pub(crate) const fn time_of_day(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("hour must be < 24 and minute < 60"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(start: (u32, u32), end: (u32, u32), lesson: i64, brk: i64) -> Result<SlotGrid> {
        SlotGrid::new(GridConfig::new(
            time_of_day(start.0, start.1),
            time_of_day(end.0, end.1),
            lesson,
            brk,
        ))
    }

    #[test]
    fn test_six_cycles_yield_thirty_slots() {
        // 08:00-14:00 with 45+15 covers exactly six lesson+break cycles
        let g = grid((8, 0), (14, 0), 45, 15).unwrap();
        let slots: Vec<_> = g.slots().collect();
        assert_eq!(slots.len(), 30);
        assert_eq!(g.len(), 30);
        assert_eq!(g.slots_per_day(), 6);

        for (i, day) in WEEKDAYS.iter().enumerate() {
            let day_slots = &slots[i * 6..(i + 1) * 6];
            assert!(day_slots.iter().all(|s| s.day == *day));
            let numbers: Vec<u32> = day_slots.iter().map(|s| s.lesson_number).collect();
            assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
        }
        assert_eq!(slots[5].start, time_of_day(13, 0));
        assert_eq!(slots[5].end, time_of_day(13, 45));
    }

    #[test]
    fn test_default_grid() {
        let g = SlotGrid::new(GridConfig::default()).unwrap();
        // 08:00, 09:00, ..., 14:00 (ends 14:45 <= 15:00)
        assert_eq!(g.slots_per_day(), 7);
        let first = g.slots().next().unwrap();
        assert_eq!(first.day, Weekday::Mon);
        assert_eq!(first.start, time_of_day(8, 0));
        assert_eq!(first.end, time_of_day(8, 45));
        assert_eq!(first.lesson_number, 1);
    }

    #[test]
    fn test_last_lesson_may_end_exactly_at_day_end() {
        let g = grid((8, 0), (8, 45), 45, 15).unwrap();
        assert_eq!(g.slots_per_day(), 1);
        let g = grid((8, 0), (8, 44), 45, 15).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.slots().count(), 0);
    }

    #[test]
    fn test_grid_is_restartable() {
        let g = grid((8, 0), (12, 0), 40, 5).unwrap();
        let first: Vec<_> = g.slots().collect();
        let second: Vec<_> = g.slots().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), g.len());
    }

    #[test]
    fn test_day_slots() {
        let g = grid((8, 0), (14, 0), 45, 15).unwrap();
        let wed: Vec<_> = g.day_slots(Weekday::Wed).collect();
        assert_eq!(wed.len(), 6);
        assert!(wed.iter().all(|s| s.day == Weekday::Wed));
    }

    #[test]
    fn test_zero_break() {
        let g = grid((8, 0), (10, 0), 30, 0).unwrap();
        let mon: Vec<_> = g.day_slots(Weekday::Mon).collect();
        assert_eq!(mon.len(), 4);
        assert_eq!(mon[1].start, mon[0].end);
    }

    #[test]
    fn test_non_positive_lesson_fails_fast() {
        assert!(matches!(
            grid((8, 0), (15, 0), 0, 15),
            Err(TimetableError::Configuration(_))
        ));
        assert!(matches!(
            grid((8, 0), (15, 0), -45, 15),
            Err(TimetableError::Configuration(_))
        ));
    }

    #[test]
    fn test_day_end_before_start_rejected() {
        assert!(matches!(
            grid((15, 0), (8, 0), 45, 15),
            Err(TimetableError::Configuration(_))
        ));
    }

    #[test]
    fn test_negative_break_rejected() {
        assert!(matches!(
            grid((8, 0), (15, 0), 45, -5),
            Err(TimetableError::Configuration(_))
        ));
    }

    #[test]
    fn test_late_day_does_not_wrap_midnight() {
        let g = grid((22, 0), (23, 59), 45, 15).unwrap();
        let mon: Vec<_> = g.day_slots(Weekday::Mon).collect();
        assert_eq!(mon.len(), 2); // 22:00, 23:00 (ends 23:45)
        assert!(mon.iter().all(|s| s.start < s.end));
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert_eq!(time_of_day(0, 0), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(time_of_day(23, 59).format("%H:%M").to_string(), "23:59");
        assert_eq!(GridConfig::default().day_start, time_of_day(8, 0));
    }

    #[test]
    #[should_panic(expected = "hour must be < 24")]
    fn test_time_of_day_rejects_out_of_range() {
        let _ = time_of_day(24, 0);
    }
}
