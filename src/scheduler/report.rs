//! Generation run report.
//!
//! A generation run is never an error because a target was missed. The
//! report lists, per (subject, class group), how many lessons were asked
//! for and how many exist after the run, so the caller decides whether a
//! partial timetable is acceptable.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | requested | Subject's weekly target |
//! | already_scheduled | Lessons committed before the run |
//! | scheduled | Lessons committed by the run |
//! | shortfall | requested - already_scheduled - scheduled (≥ 0) |

use serde::{Deserialize, Serialize};

use crate::error::TimetableError;
use crate::models::{ClassGroupId, Demand, ScheduleEntry, SubjectId, TeacherId};

/// Final state of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationStatus {
    /// Every target met.
    Done,
    /// Some target unmet, a demand rejected, or the budget ran out.
    Partial,
}

/// Outcome for one (subject, class group) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonTally {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub class_group_id: ClassGroupId,
    pub requested: u32,
    pub already_scheduled: u32,
    pub scheduled: u32,
}

impl LessonTally {
    pub fn new(demand: &Demand, class_group_id: ClassGroupId) -> Self {
        Self {
            teacher_id: demand.teacher_id,
            subject_id: demand.subject_id,
            class_group_id,
            requested: demand.weekly_target,
            already_scheduled: 0,
            scheduled: 0,
        }
    }

    /// Lessons in place after the run.
    #[inline]
    pub fn total(&self) -> u32 {
        self.already_scheduled + self.scheduled
    }

    /// Lessons still missing.
    #[inline]
    pub fn shortfall(&self) -> u32 {
        self.requested.saturating_sub(self.total())
    }

    #[inline]
    pub fn is_met(&self) -> bool {
        self.shortfall() == 0
    }
}

/// A demand that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedDemand {
    /// Position in the request's demand list.
    pub demand_index: usize,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub reason: String,
}

impl RejectedDemand {
    pub fn new(
        demand_index: usize,
        teacher_id: TeacherId,
        subject_id: SubjectId,
        error: &TimetableError,
    ) -> Self {
        Self {
            demand_index,
            teacher_id,
            subject_id,
            reason: error.to_string(),
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationReport {
    /// Entries committed by this run, in commit order.
    pub entries: Vec<ScheduleEntry>,
    pub tallies: Vec<LessonTally>,
    pub rejected: Vec<RejectedDemand>,
    /// Whether the iteration budget stopped the run early.
    pub budget_exhausted: bool,
    /// Candidate slots checked against the index.
    pub slots_examined: usize,
}

impl AllocationReport {
    /// `Done` iff every tally is met, nothing was rejected and the budget held.
    pub fn status(&self) -> GenerationStatus {
        if self.budget_exhausted
            || !self.rejected.is_empty()
            || self.tallies.iter().any(|t| !t.is_met())
        {
            GenerationStatus::Partial
        } else {
            GenerationStatus::Done
        }
    }

    /// Tallies whose target was not reached.
    pub fn shortfalls(&self) -> impl Iterator<Item = &LessonTally> {
        self.tallies.iter().filter(|t| !t.is_met())
    }

    /// Sum of weekly targets.
    pub fn total_requested(&self) -> u32 {
        self.tallies.iter().map(|t| t.requested).sum()
    }

    /// Sum of lessons in place after the run, capped per pair at its target.
    pub fn total_in_place(&self) -> u32 {
        self.tallies.iter().map(|t| t.total().min(t.requested)).sum()
    }

    /// Fraction of requested lessons in place (1.0 if nothing was requested).
    pub fn fill_rate(&self) -> f64 {
        let requested = self.total_requested();
        if requested == 0 {
            1.0
        } else {
            f64::from(self.total_in_place()) / f64::from(requested)
        }
    }

    /// Merges another report (e.g. the resolution step's rejections).
    pub fn absorb(&mut self, other: AllocationReport) {
        self.entries.extend(other.entries);
        self.tallies.extend(other.tallies);
        self.rejected.extend(other.rejected);
        self.budget_exhausted |= other.budget_exhausted;
        self.slots_examined += other.slots_examined;
    }
}
