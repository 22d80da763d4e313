//! Timetable service.
//!
//! [`Timetable`] is the transport-independent entry point: batch generation,
//! manual create, update and delete, weekly views and sample seeding. The
//! schedule book sits behind one mutex; every operation that reads the
//! conflict index and then commits holds the lock for both steps.

mod types;

use rand::Rng;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};

use crate::book::ScheduleBook;
use crate::catalog::ResourceCatalog;
use crate::config::TimetableConfig;
use crate::error::{ResourceKind, Result, TimetableError};
use crate::grid::SlotGrid;
use crate::models::{
    ClassGroupId, ClassroomId, Demand, EntryDraft, EntryId, ScheduleEntry, TeacherId,
};
use crate::scheduler::{AllocationReport, RejectedDemand, SampleGenerator, StrictAllocator};
use crate::store::EntryStore;
use crate::validation::{ensure_within_weekly_target, LessonCandidate, ScheduleValidator};

pub use types::{
    CreateScheduleRequest, GenerateRequest, GenerationOutcome, ScheduleView,
    TeacherSubjectMapping,
};

/// Timetable facade over a resource catalog and an entry store.
#[derive(Debug)]
pub struct Timetable<C, S> {
    catalog: C,
    config: TimetableConfig,
    book: Mutex<ScheduleBook<S>>,
}

impl<C: ResourceCatalog, S: EntryStore> Timetable<C, S> {
    /// Creates a service with default configuration.
    pub fn new(catalog: C, store: S) -> Result<Self> {
        Self::with_config(catalog, store, TimetableConfig::default())
    }

    /// Creates a service, indexing whatever the store already holds.
    pub fn with_config(catalog: C, store: S, config: TimetableConfig) -> Result<Self> {
        config.validate()?;
        let book = ScheduleBook::new(store)?;
        info!(entries = book.index().len(), "timetable ready");
        Ok(Self {
            catalog,
            config,
            book: Mutex::new(book),
        })
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &TimetableConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, ScheduleBook<S>>> {
        self.book.lock().map_err(|_| TimetableError::LockPoisoned)
    }

    /// Runs strict generation for the request's mappings.
    ///
    /// A mapping naming an unknown teacher, subject or class group is
    /// rejected on its own; the others are still allocated. Weekly targets
    /// come from the subjects' hours per week.
    ///
    /// # Errors
    /// `Configuration` for an unusable grid or an empty classroom pool.
    #[instrument(skip_all, fields(mappings = request.teacher_subject_mappings.len()))]
    pub fn generate(&self, request: &GenerateRequest) -> Result<GenerationOutcome> {
        let grid = SlotGrid::new(request.grid_config(&self.config.grid))?;
        let (demands, positions, rejected) =
            self.resolve_mappings(&request.teacher_subject_mappings);
        let classrooms: Vec<ClassroomId> =
            self.catalog.classrooms().iter().map(|r| r.id).collect();

        let allocator = StrictAllocator::new(grid)
            .with_daily_spread(self.config.daily_spread)
            .with_iteration_budget(self.config.iteration_budget);
        let mut report = {
            let mut book = self.lock()?;
            allocator.allocate(&demands, &classrooms, &mut *book)?
        };

        for r in &mut report.rejected {
            r.demand_index = positions[r.demand_index];
        }
        report.absorb(AllocationReport {
            rejected,
            ..Default::default()
        });
        report.rejected.sort_by_key(|r| r.demand_index);

        let entries = self.views(&report.entries)?;
        info!(
            entries = entries.len(),
            status = ?report.status(),
            "generation finished"
        );
        Ok(GenerationOutcome {
            status: report.status(),
            entries,
            report,
        })
    }

    /// Splits mappings into resolvable demands (with their request positions)
    /// and rejections.
    fn resolve_mappings(
        &self,
        mappings: &[TeacherSubjectMapping],
    ) -> (Vec<Demand>, Vec<usize>, Vec<RejectedDemand>) {
        let mut demands = Vec::with_capacity(mappings.len());
        let mut positions = Vec::with_capacity(mappings.len());
        let mut rejected = Vec::new();

        for (i, mapping) in mappings.iter().enumerate() {
            match self.resolve_mapping(mapping) {
                Ok(demand) => {
                    demands.push(demand);
                    positions.push(i);
                }
                Err(e) => {
                    warn!(mapping = i, error = %e, "mapping rejected");
                    rejected.push(RejectedDemand::new(
                        i,
                        mapping.teacher_id,
                        mapping.subject_id,
                        &e,
                    ));
                }
            }
        }
        (demands, positions, rejected)
    }

    fn resolve_mapping(&self, mapping: &TeacherSubjectMapping) -> Result<Demand> {
        let teacher = self.catalog.require_teacher(mapping.teacher_id)?;
        let subject = self.catalog.require_subject(mapping.subject_id)?;
        for &id in &mapping.class_group_ids {
            self.catalog.require_class_group(id)?;
        }
        Ok(Demand::for_subject(teacher.id, subject)
            .with_class_groups(mapping.class_group_ids.iter().copied()))
    }

    /// Inserts one lesson after validating it.
    ///
    /// # Errors
    /// - `NotFound` for unknown references
    /// - `InvalidDay` / `InvalidInterval` for a malformed slot
    /// - `Conflict` naming the first busy axis
    /// - `WeeklyTargetReached` if the pair already has all its lessons
    #[instrument(
        skip_all,
        fields(class_group_id = request.class_group_id, teacher_id = request.teacher_id)
    )]
    pub fn create_entry(&self, request: &CreateScheduleRequest) -> Result<ScheduleView> {
        let draft = request.to_draft(&self.catalog)?;
        let entry = {
            let mut book = self.lock()?;
            self.check(&book, &draft, None)?;
            book.commit(draft)?
        };
        info!(entry_id = entry.id, "entry created");
        ScheduleView::resolve(&entry, &self.catalog)
    }

    /// Replaces an entry: the new lesson is validated with the old one
    /// ignored, inserted, and only then the old entry is removed.
    ///
    /// The replacement gets a new id. On any error the old entry is still in
    /// place under its own id.
    #[instrument(skip_all, fields(entry_id = id))]
    pub fn update_entry(
        &self,
        id: EntryId,
        request: &CreateScheduleRequest,
    ) -> Result<ScheduleView> {
        let draft = request.to_draft(&self.catalog)?;
        let entry = {
            let mut book = self.lock()?;
            if book.get(id).is_none() {
                return Err(TimetableError::not_found(ResourceKind::Entry, id));
            }
            self.check(&book, &draft, Some(id))?;
            let entry = book.commit(draft)?;
            if let Err(e) = book.remove(id) {
                if let Err(rollback) = book.remove(entry.id) {
                    warn!(
                        entry_id = entry.id,
                        error = %rollback,
                        "could not roll back replacement entry"
                    );
                }
                return Err(e);
            }
            entry
        };
        info!(old_id = id, new_id = entry.id, "entry updated");
        ScheduleView::resolve(&entry, &self.catalog)
    }

    /// Deletes an entry.
    ///
    /// # Errors
    /// `NotFound` if no entry has this id.
    pub fn delete_entry(&self, id: EntryId) -> Result<()> {
        self.lock()?.remove(id)?;
        info!(entry_id = id, "entry deleted");
        Ok(())
    }

    fn check(
        &self,
        book: &ScheduleBook<S>,
        draft: &EntryDraft,
        exclude: Option<EntryId>,
    ) -> Result<()> {
        ScheduleValidator::new(book.index()).check(&LessonCandidate::from(draft), exclude)?;

        let subject = self.catalog.require_subject(draft.subject_id)?;
        let mut committed = book.lessons_for(draft.subject_id, draft.class_group_id);
        if let Some(old) = exclude.and_then(|id| book.get(id)) {
            if old.is_lesson_of(draft.subject_id, draft.class_group_id) {
                committed = committed.saturating_sub(1);
            }
        }
        ensure_within_weekly_target(
            draft.subject_id,
            draft.class_group_id,
            committed,
            subject.hours_per_week,
        )
    }

    /// Every entry, ordered by day then start time.
    pub fn all_entries(&self) -> Result<Vec<ScheduleView>> {
        self.views_where(|_| true)
    }

    /// Weekly timetable of a class group.
    pub fn for_class_group(&self, id: ClassGroupId) -> Result<Vec<ScheduleView>> {
        self.views_where(|e| e.class_group_id == id)
    }

    /// Weekly timetable of a teacher.
    pub fn for_teacher(&self, id: TeacherId) -> Result<Vec<ScheduleView>> {
        self.views_where(|e| e.teacher_id == id)
    }

    /// Weekly occupancy of a classroom.
    pub fn for_classroom(&self, id: ClassroomId) -> Result<Vec<ScheduleView>> {
        self.views_where(|e| e.classroom_id == Some(id))
    }

    fn views_where(&self, keep: impl Fn(&ScheduleEntry) -> bool) -> Result<Vec<ScheduleView>> {
        let mut entries: Vec<ScheduleEntry> = self
            .lock()?
            .entries()?
            .into_iter()
            .filter(|e| keep(e))
            .collect();
        entries.sort_by_key(|e| (e.slot.day.num_days_from_monday(), e.slot.start, e.id));
        self.views(&entries)
    }

    fn views(&self, entries: &[ScheduleEntry]) -> Result<Vec<ScheduleView>> {
        entries
            .iter()
            .map(|e| ScheduleView::resolve(e, &self.catalog))
            .collect()
    }

    /// Fills an empty timetable with random sample lessons.
    ///
    /// Sample lessons skip conflict and weekly-target checks. Does nothing
    /// and returns 0 when the store already holds entries.
    pub fn seed_sample<R: Rng>(&self, rng: R) -> Result<usize> {
        let mut book = self.lock()?;
        if !book.store().is_empty() {
            info!(entries = book.store().len(), "store not empty, sample seeding skipped");
            return Ok(0);
        }
        let drafts = SampleGenerator::new(&self.config.sample, rng)?.generate(&self.catalog)?;
        let count = drafts.len();
        for draft in drafts {
            book.commit(draft)?;
        }
        info!(entries = count, "sample timetable seeded");
        Ok(count)
    }
}
