//! Randomized sample timetable.
//!
//! Fills a short school day with plausible lessons for demos and seed data.
//! Per slot the classroom pool is shuffled and handed out to class groups in
//! catalog order; a class group may get a free period instead. Subjects are
//! random, teachers are a random qualified one (first teacher if nobody is
//! qualified). Teacher double booking is possible and not checked.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::debug;

use crate::catalog::ResourceCatalog;
use crate::config::SampleConfig;
use crate::error::{Result, TimetableError};
use crate::grid::SlotGrid;
use crate::models::{ClassroomId, EntryDraft, SubjectId, Teacher};

/// Lenient generator driven by a caller-supplied RNG.
#[derive(Debug)]
pub struct SampleGenerator<R> {
    grid: SlotGrid,
    free_period_probability: f64,
    rng: R,
}

impl<R: Rng> SampleGenerator<R> {
    /// Creates a generator.
    ///
    /// # Errors
    /// `Configuration` if the sample grid or probability is invalid.
    pub fn new(config: &SampleConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: SlotGrid::new(config.grid.clone())?,
            free_period_probability: config.free_period_probability,
            rng,
        })
    }

    /// Produces drafts for every class group of the catalog.
    ///
    /// Rooms are never shared within a slot. Returns no drafts when the
    /// catalog has no class groups, subjects or teachers.
    ///
    /// # Errors
    /// `Configuration` if the catalog has no classrooms.
    pub fn generate<C: ResourceCatalog + ?Sized>(
        &mut self,
        catalog: &C,
    ) -> Result<Vec<EntryDraft>> {
        let rooms: Vec<ClassroomId> = catalog.classrooms().iter().map(|r| r.id).collect();
        if rooms.is_empty() {
            return Err(TimetableError::Configuration(
                "sample generation needs at least one classroom".into(),
            ));
        }
        let class_groups = catalog.class_groups();
        let subjects = catalog.subjects();
        let teachers = catalog.teachers();
        if class_groups.is_empty() || subjects.is_empty() || teachers.is_empty() {
            debug!("catalog incomplete, no sample lessons");
            return Ok(Vec::new());
        }

        let mut drafts = Vec::new();
        for slot in self.grid.slots() {
            let mut pool = rooms.clone();
            pool.shuffle(&mut self.rng);
            let mut pool = pool.into_iter();

            for group in &class_groups {
                if pool.as_slice().is_empty() {
                    break;
                }
                if self.rng.random_bool(self.free_period_probability) {
                    continue;
                }
                let Some(subject) = subjects.choose(&mut self.rng) else {
                    continue;
                };
                let Some(teacher) = pick_teacher(&mut self.rng, &teachers, subject.id) else {
                    continue;
                };
                let Some(room) = pool.next() else {
                    break;
                };
                drafts.push(
                    EntryDraft::new(group.id, teacher.id, subject.id, slot).with_classroom(room),
                );
            }
        }

        debug!(drafts = drafts.len(), "sample lessons generated");
        Ok(drafts)
    }
}

/// A random qualified teacher, else the first teacher.
fn pick_teacher<'t, R: Rng>(
    rng: &mut R,
    teachers: &[&'t Teacher],
    subject_id: SubjectId,
) -> Option<&'t Teacher> {
    let qualified: Vec<&Teacher> = teachers
        .iter()
        .copied()
        .filter(|t| t.teaches(subject_id))
        .collect();
    match qualified.choose(rng) {
        Some(teacher) => Some(*teacher),
        None => teachers.first().copied(),
    }
}
