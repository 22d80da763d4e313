//! Strict greedy lesson allocation.
//!
//! # Algorithm
//!
//! 1. Demands in list order; class groups in demand order.
//! 2. For each (subject, class group), start from the lessons already
//!    committed for the pair.
//! 3. Walk the grid in (weekday, time) order. Skip a slot when the daily
//!    spread cap is reached or the teacher or class group is busy.
//! 4. Take the first free classroom of the pool. Commit.
//! 5. Stop when the weekly target is reached or the grid is exhausted.
//! 6. If the spread cap left the target short, walk the grid once more
//!    without the cap before recording a shortfall.
//!
//! # Complexity
//! O(d * g * s * (log k + c)) where d=demands, g=class groups per demand,
//! s=grid slots, k=entries per (resource, day), c=classroom pool size.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use tracing::{debug, info, instrument, warn};

use super::report::{AllocationReport, LessonTally, RejectedDemand};
use crate::book::ScheduleBook;
use crate::config::DailySpread;
use crate::error::{Result, TimetableError};
use crate::grid::SlotGrid;
use crate::models::{
    Axis, ClassGroupId, ClassroomId, Demand, EntryDraft, TeacherId, TimeSlot, WEEKDAYS,
};
use crate::store::EntryStore;

/// Deterministic first-fit allocator.
///
/// Identical inputs over an identical book give identical entries.
#[derive(Debug, Clone)]
pub struct StrictAllocator {
    grid: SlotGrid,
    spread: DailySpread,
    iteration_budget: Option<usize>,
}

impl StrictAllocator {
    /// Creates an allocator with balanced daily spread and no budget.
    pub fn new(grid: SlotGrid) -> Self {
        Self {
            grid,
            spread: DailySpread::default(),
            iteration_budget: None,
        }
    }

    /// Sets the daily spread policy.
    pub fn with_daily_spread(mut self, spread: DailySpread) -> Self {
        self.spread = spread;
        self
    }

    /// Caps the number of candidate slots examined per run.
    pub fn with_iteration_budget(mut self, budget: Option<usize>) -> Self {
        self.iteration_budget = budget;
        self
    }

    pub fn grid(&self) -> &SlotGrid {
        &self.grid
    }

    /// Allocates every demand into the book.
    ///
    /// Unmet targets, rejected demands and budget exhaustion are recorded in
    /// the report. Entries committed before a failure stay committed.
    ///
    /// # Errors
    /// `Configuration` if some demand needs lessons and the classroom pool
    /// is empty.
    #[instrument(skip_all, fields(demands = demands.len(), classrooms = classrooms.len()))]
    pub fn allocate<S: EntryStore>(
        &self,
        demands: &[Demand],
        classrooms: &[ClassroomId],
        book: &mut ScheduleBook<S>,
    ) -> Result<AllocationReport> {
        if classrooms.is_empty() && demands.iter().any(|d| d.total_lessons() > 0) {
            return Err(TimetableError::Configuration(
                "strict allocation needs at least one classroom".into(),
            ));
        }

        let mut report = AllocationReport::default();
        let mut budget = Budget::new(self.iteration_budget);

        for (i, demand) in demands.iter().enumerate() {
            debug!(
                demand = i,
                teacher_id = demand.teacher_id,
                subject_id = demand.subject_id,
                class_groups = demand.class_group_ids.len(),
                target = demand.weekly_target,
                "allocating demand"
            );

            for &class_group_id in &demand.class_group_ids {
                let mut tally = LessonTally::new(demand, class_group_id);
                let outcome = self.allocate_pair(
                    demand,
                    class_group_id,
                    classrooms,
                    book,
                    &mut budget,
                    &mut tally,
                    &mut report,
                );
                if tally.shortfall() > 0 {
                    warn!(
                        teacher_id = tally.teacher_id,
                        subject_id = tally.subject_id,
                        class_group_id,
                        requested = tally.requested,
                        in_place = tally.total(),
                        "weekly target not reached"
                    );
                }
                report.tallies.push(tally);

                if let Err(e) = outcome {
                    warn!(demand = i, error = %e, "demand rejected");
                    report
                        .rejected
                        .push(RejectedDemand::new(i, demand.teacher_id, demand.subject_id, &e));
                    break;
                }
            }
        }

        report.budget_exhausted = budget.exhausted;
        info!(
            committed = report.entries.len(),
            shortfalls = report.shortfalls().count(),
            rejected = report.rejected.len(),
            slots_examined = report.slots_examined,
            status = ?report.status(),
            "strict allocation finished"
        );
        Ok(report)
    }

    #[allow(clippy::too_many_arguments)]
    fn allocate_pair<S: EntryStore>(
        &self,
        demand: &Demand,
        class_group_id: ClassGroupId,
        classrooms: &[ClassroomId],
        book: &mut ScheduleBook<S>,
        budget: &mut Budget,
        tally: &mut LessonTally,
        report: &mut AllocationReport,
    ) -> Result<()> {
        let target = demand.weekly_target;
        tally.already_scheduled = book.lessons_for(demand.subject_id, class_group_id);
        if tally.total() >= target {
            return Ok(());
        }
        // Spread first; if the cap leaves the target short, fill without it.
        let passes = match self.spread.daily_cap(target, WEEKDAYS.len()) {
            Some(cap) => vec![Some(cap), None],
            None => vec![None],
        };

        for cap in passes {
            for slot in self.grid.slots() {
                if let Some(cap) = cap {
                    if book.lessons_on(demand.subject_id, class_group_id, slot.day) >= cap {
                        continue;
                    }
                }
                if !budget.take() {
                    return Ok(());
                }
                report.slots_examined += 1;

                let Some(classroom_id) =
                    free_classroom(book, demand.teacher_id, class_group_id, &slot, classrooms)
                else {
                    continue;
                };

                let draft =
                    EntryDraft::new(class_group_id, demand.teacher_id, demand.subject_id, slot)
                        .with_classroom(classroom_id);
                let entry = book.commit(draft)?;
                report.entries.push(entry);
                tally.scheduled += 1;

                if tally.total() >= target {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// First classroom of the pool that is free at `slot`, provided the teacher
/// and class group are free too.
fn free_classroom<S: EntryStore>(
    book: &ScheduleBook<S>,
    teacher_id: TeacherId,
    class_group_id: ClassGroupId,
    slot: &TimeSlot,
    classrooms: &[ClassroomId],
) -> Option<ClassroomId> {
    let index = book.index();
    let free = |axis: Axis, id: u64| index.is_free(axis, id, slot.day, slot.start, slot.end);

    if !free(Axis::Teacher, teacher_id) || !free(Axis::ClassGroup, class_group_id) {
        return None;
    }
    classrooms
        .iter()
        .copied()
        .find(|&room| free(Axis::Classroom, room))
}

#[derive(Debug)]
struct Budget {
    remaining: Option<usize>,
    exhausted: bool,
}

impl Budget {
    fn new(limit: Option<usize>) -> Self {
        Self {
            remaining: limit,
            exhausted: false,
        }
    }

    /// Consumes one unit; false once nothing is left.
    fn take(&mut self) -> bool {
        match self.remaining.as_mut() {
            None => true,
            Some(0) => {
                self.exhausted = true;
                false
            }
            Some(n) => {
                *n -= 1;
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{time_of_day, GridConfig};
    use crate::models::{ScheduleEntry, TimeSlot};
    use crate::scheduler::GenerationStatus;
    use crate::store::{EntryStore, MemoryStore};
    use chrono::Weekday;
    use std::collections::HashSet;

    fn default_grid() -> SlotGrid {
        SlotGrid::new(GridConfig::default()).unwrap()
    }

    fn book() -> ScheduleBook<MemoryStore> {
        ScheduleBook::new(MemoryStore::new()).unwrap()
    }

    fn assert_no_double_booking(entries: &[ScheduleEntry]) {
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                if !a.interval().overlaps(&b.interval()) {
                    continue;
                }
                assert_ne!(a.teacher_id, b.teacher_id, "teacher double booked: {a:?} {b:?}");
                assert_ne!(a.class_group_id, b.class_group_id, "class double booked");
                if a.classroom_id.is_some() {
                    assert_ne!(a.classroom_id, b.classroom_id, "room double booked");
                }
            }
        }
    }

    #[test]
    fn test_five_lessons_one_per_weekday() {
        let mut book = book();
        let demand = Demand::new(10, 1, 5).with_class_group(100);
        let report = StrictAllocator::new(default_grid())
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert_eq!(report.status(), GenerationStatus::Done);
        assert_eq!(report.entries.len(), 5);
        let days: Vec<Weekday> = report.entries.iter().map(|e| e.slot.day).collect();
        assert_eq!(days, WEEKDAYS.to_vec());
        let numbers: Vec<u32> = report.entries.iter().map(|e| e.slot.lesson_number).collect();
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
        assert!(report.entries.iter().all(|e| e.classroom_id == Some(1000)));
    }

    #[test]
    fn test_capped_shortfall_falls_back_to_uncapped_pass() {
        // class group 100 is busy all day Tuesday to Friday
        let grid = default_grid();
        let blocked: Vec<ScheduleEntry> = grid
            .slots()
            .filter(|s| s.day != Weekday::Mon)
            .enumerate()
            .map(|(i, slot)| EntryDraft::new(100, 11, 2, slot).into_entry(i as u64 + 1))
            .collect();
        let mut book = ScheduleBook::new(MemoryStore::with_entries(blocked)).unwrap();

        let demand = Demand::new(10, 1, 5).with_class_group(100);
        let report = StrictAllocator::new(grid)
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert_eq!(report.status(), GenerationStatus::Done);
        assert_eq!(report.tallies[0].scheduled, 5);
        assert!(report.entries.iter().all(|e| e.slot.day == Weekday::Mon));
        let numbers: Vec<u32> = report.entries.iter().map(|e| e.slot.lesson_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_no_double_booking(&book.entries().unwrap());
    }

    #[test]
    fn test_balanced_spreads_before_doubling_up() {
        let mut book = book();
        let demand = Demand::new(10, 1, 7).with_class_group(100);
        let report = StrictAllocator::new(default_grid())
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert_eq!(report.status(), GenerationStatus::Done);
        let placed: Vec<(Weekday, u32)> = report
            .entries
            .iter()
            .map(|e| (e.slot.day, e.slot.lesson_number))
            .collect();
        // cap is ceil(7 / 5) = 2, so Mon-Tue take two each before the rest
        assert_eq!(
            placed,
            vec![
                (Weekday::Mon, 1),
                (Weekday::Mon, 2),
                (Weekday::Tue, 1),
                (Weekday::Tue, 2),
                (Weekday::Wed, 1),
                (Weekday::Wed, 2),
                (Weekday::Thu, 1),
            ]
        );
    }

    #[test]
    fn test_packed_mode_fills_monday_first() {
        let mut book = book();
        let demand = Demand::new(10, 1, 5).with_class_group(100);
        let report = StrictAllocator::new(default_grid())
            .with_daily_spread(DailySpread::Packed)
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert_eq!(report.entries.len(), 5);
        assert!(report.entries.iter().all(|e| e.slot.day == Weekday::Mon));
        let numbers: Vec<u32> = report.entries.iter().map(|e| e.slot.lesson_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_single_room_contention() {
        let mut book = book();
        let demands = vec![
            Demand::new(10, 1, 5).with_class_group(100),
            Demand::new(11, 2, 5).with_class_group(101),
        ];
        let report = StrictAllocator::new(default_grid())
            .allocate(&demands, &[1000], &mut book)
            .unwrap();

        assert_eq!(report.status(), GenerationStatus::Done);
        assert_eq!(report.entries.len(), 10);
        assert_no_double_booking(&report.entries);

        // second demand takes the next free period each day
        let second: Vec<u32> = report.entries[5..].iter().map(|e| e.slot.lesson_number).collect();
        assert_eq!(second, vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn test_shared_teacher_is_never_double_booked() {
        let mut book = book();
        let demands = vec![
            Demand::new(10, 1, 4).with_class_groups([100, 101, 102]),
            Demand::new(10, 2, 3).with_class_groups([100, 103]),
            Demand::new(11, 3, 5).with_class_groups([100, 101]),
        ];
        let report = StrictAllocator::new(default_grid())
            .allocate(&demands, &[1000, 1001], &mut book)
            .unwrap();

        let all = book.entries().unwrap();
        assert_eq!(all.len(), report.entries.len());
        assert_no_double_booking(&all);
        for tally in &report.tallies {
            let committed = all
                .iter()
                .filter(|e| e.is_lesson_of(tally.subject_id, tally.class_group_id))
                .count() as u32;
            assert!(committed <= tally.requested);
        }
    }

    #[test]
    fn test_grid_exhaustion_reports_shortfall() {
        // one slot per day, two groups share the teacher
        let grid = SlotGrid::new(GridConfig::new(
            time_of_day(8, 0),
            time_of_day(8, 45),
            45,
            15,
        ))
        .unwrap();
        let mut book = book();
        let demand = Demand::new(10, 1, 3).with_class_groups([100, 101]);
        let report = StrictAllocator::new(grid)
            .with_daily_spread(DailySpread::Packed)
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert_eq!(report.status(), GenerationStatus::Partial);
        assert_eq!(report.tallies[0].scheduled, 3);
        assert_eq!(report.tallies[1].scheduled, 2);
        assert_eq!(report.tallies[1].shortfall(), 1);
        assert_eq!(report.shortfalls().count(), 1);
    }

    #[test]
    fn test_committed_lessons_count_toward_target() {
        let slot = TimeSlot::new(Weekday::Wed, time_of_day(10, 0), time_of_day(10, 45), 3);
        let store = MemoryStore::with_entries(vec![EntryDraft::new(100, 10, 1, slot)
            .with_classroom(1000)
            .into_entry(1)]);
        let mut book = ScheduleBook::new(store).unwrap();

        let demand = Demand::new(10, 1, 5).with_class_group(100);
        let allocator = StrictAllocator::new(default_grid());
        let report = allocator.allocate(&[demand.clone()], &[1000], &mut book).unwrap();

        assert_eq!(report.tallies[0].already_scheduled, 1);
        assert_eq!(report.entries.len(), 4);
        assert!(report.entries.iter().all(|e| e.slot.day != Weekday::Wed));
        assert_eq!(book.lessons_for(1, 100), 5);

        // a second run adds nothing
        let again = allocator.allocate(&[demand], &[1000], &mut book).unwrap();
        assert!(again.entries.is_empty());
        assert_eq!(again.status(), GenerationStatus::Done);
        assert_eq!(book.store().len(), 5);
    }

    #[test]
    fn test_iteration_budget_stops_run() {
        let mut book = book();
        let demand = Demand::new(10, 1, 5).with_class_group(100);
        let report = StrictAllocator::new(default_grid())
            .with_iteration_budget(Some(3))
            .allocate(&[demand], &[1000], &mut book)
            .unwrap();

        assert!(report.budget_exhausted);
        assert_eq!(report.slots_examined, 3);
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.status(), GenerationStatus::Partial);
    }

    #[test]
    fn test_empty_classroom_pool_is_configuration_error() {
        let mut book = book();
        let demand = Demand::new(10, 1, 2).with_class_group(100);
        let err = StrictAllocator::new(default_grid())
            .allocate(&[demand], &[], &mut book)
            .unwrap_err();
        assert!(matches!(err, TimetableError::Configuration(_)));

        // nothing to place, nothing needed
        let report = StrictAllocator::new(default_grid())
            .allocate(&[Demand::new(10, 1, 2)], &[], &mut book)
            .unwrap();
        assert!(report.tallies.is_empty());
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let demands = vec![
            Demand::new(10, 1, 3).with_class_groups([100, 101]),
            Demand::new(11, 2, 2).with_class_groups([101, 102]),
        ];
        let run = || {
            let mut book = book();
            StrictAllocator::new(default_grid())
                .allocate(&demands, &[1000, 1001], &mut book)
                .unwrap()
                .entries
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_room_pool_order_is_respected() {
        let mut book = book();
        let demands = vec![
            Demand::new(10, 1, 1).with_class_group(100),
            Demand::new(11, 2, 1).with_class_group(101),
        ];
        let report = StrictAllocator::new(default_grid())
            .allocate(&demands, &[2000, 1000], &mut book)
            .unwrap();
        let rooms: HashSet<_> = report.entries.iter().map(|e| e.classroom_id).collect();
        assert_eq!(report.entries[0].classroom_id, Some(2000));
        assert_eq!(report.entries[1].classroom_id, Some(1000));
        assert_eq!(rooms.len(), 2);
    }

    struct FailingStore;

    impl EntryStore for FailingStore {
        fn insert(&mut self, _draft: EntryDraft) -> Result<ScheduleEntry> {
            Err(TimetableError::Storage("disk full".into()))
        }
        fn remove(&mut self, id: u64) -> Result<ScheduleEntry> {
            Err(TimetableError::not_found(crate::error::ResourceKind::Entry, id))
        }
        fn get(&self, _id: u64) -> Option<ScheduleEntry> {
            None
        }
        fn entries(&self) -> Result<Vec<ScheduleEntry>> {
            Ok(Vec::new())
        }
        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_store_failure_rejects_demand_and_continues() {
        let mut book = ScheduleBook::new(FailingStore).unwrap();
        let demands = vec![
            Demand::new(10, 1, 2).with_class_groups([100, 101]),
            Demand::new(11, 2, 2).with_class_group(102),
        ];
        let report = StrictAllocator::new(default_grid())
            .allocate(&demands, &[1000], &mut book)
            .unwrap();

        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].demand_index, 0);
        assert_eq!(report.rejected[1].demand_index, 1);
        assert!(report.rejected[0].reason.contains("disk full"));
        // first demand stops at its first class group
        assert_eq!(report.tallies.len(), 2);
        assert_eq!(report.status(), GenerationStatus::Partial);
    }
}
