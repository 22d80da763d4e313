//! Schedule book: the committed entries and their conflict index.
//!
//! Every write goes through [`ScheduleBook::commit`] or
//! [`ScheduleBook::remove`], which update the entry store first and the
//! derived state second. The store stays the source of truth: the index and
//! lesson counts can be rebuilt from it at any time.

use chrono::Weekday;
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::index::ConflictIndex;
use crate::models::{ClassGroupId, EntryDraft, EntryId, ScheduleEntry, SubjectId, WEEKDAYS};
use crate::store::EntryStore;

type LessonKey = (SubjectId, ClassGroupId, Weekday);

/// Entry store plus derived conflict index and lesson counts.
#[derive(Debug)]
pub struct ScheduleBook<S> {
    store: S,
    index: ConflictIndex,
    lessons: HashMap<LessonKey, u32>,
}

impl<S: EntryStore> ScheduleBook<S> {
    /// Wraps a store, indexing whatever it already holds.
    pub fn new(store: S) -> Result<Self> {
        let mut book = Self {
            store,
            index: ConflictIndex::new(),
            lessons: HashMap::new(),
        };
        book.rebuild()?;
        Ok(book)
    }

    /// Recomputes the index and lesson counts from the store in one pass.
    pub fn rebuild(&mut self) -> Result<()> {
        let entries = self.store.entries()?;
        self.index = ConflictIndex::from_entries(&entries);
        self.lessons.clear();
        for entry in &entries {
            self.count(entry, 1);
        }
        debug!(entries = entries.len(), "schedule index rebuilt");
        Ok(())
    }

    /// Stores a draft and records it in the index.
    ///
    /// Performs no conflict checks; callers validate first.
    pub fn commit(&mut self, draft: EntryDraft) -> Result<ScheduleEntry> {
        let entry = self.store.insert(draft)?;
        self.index.insert(&entry);
        self.count(&entry, 1);
        debug!(
            entry_id = entry.id,
            teacher_id = entry.teacher_id,
            class_group_id = entry.class_group_id,
            day = %entry.slot.day,
            start = %entry.slot.start,
            "entry committed"
        );
        Ok(entry)
    }

    /// Deletes an entry from the store and the index.
    pub fn remove(&mut self, id: EntryId) -> Result<ScheduleEntry> {
        let entry = self.store.remove(id)?;
        self.index.remove(id);
        self.count(&entry, -1);
        debug!(entry_id = id, "entry removed");
        Ok(entry)
    }

    pub fn index(&self) -> &ConflictIndex {
        &self.index
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up a committed entry.
    pub fn get(&self, id: EntryId) -> Option<ScheduleEntry> {
        self.store.get(id)
    }

    /// All committed entries.
    pub fn entries(&self) -> Result<Vec<ScheduleEntry>> {
        self.store.entries()
    }

    /// Committed lessons of a subject for a class group across the week.
    pub fn lessons_for(&self, subject_id: SubjectId, class_group_id: ClassGroupId) -> u32 {
        WEEKDAYS
            .iter()
            .map(|&day| self.lessons_on(subject_id, class_group_id, day))
            .sum()
    }

    /// Committed lessons of a subject for a class group on one day.
    pub fn lessons_on(
        &self,
        subject_id: SubjectId,
        class_group_id: ClassGroupId,
        day: Weekday,
    ) -> u32 {
        self.lessons
            .get(&(subject_id, class_group_id, day))
            .copied()
            .unwrap_or(0)
    }

    fn count(&mut self, entry: &ScheduleEntry, delta: i32) {
        let key = (entry.subject_id, entry.class_group_id, entry.slot.day);
        let n = self.lessons.entry(key).or_insert(0);
        *n = n.saturating_add_signed(delta);
        if *n == 0 {
            self.lessons.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Axis, TimeSlot};
    use crate::store::MemoryStore;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn draft(subject: u64, group: u64, day: Weekday, hour: u32) -> EntryDraft {
        EntryDraft::new(group, 10, subject, TimeSlot::new(day, t(hour, 0), t(hour, 45), 1))
            .with_classroom(1000)
    }

    #[test]
    fn test_commit_updates_index_and_counts() {
        let mut book = ScheduleBook::new(MemoryStore::new()).unwrap();
        let e = book.commit(draft(1, 100, Weekday::Mon, 8)).unwrap();
        book.commit(draft(1, 100, Weekday::Tue, 8)).unwrap();

        assert!(!book.index().is_free(Axis::Classroom, 1000, Weekday::Mon, t(8, 0), t(8, 45)));
        assert_eq!(book.lessons_for(1, 100), 2);
        assert_eq!(book.lessons_on(1, 100, Weekday::Mon), 1);
        assert_eq!(book.get(e.id), Some(e));
    }

    #[test]
    fn test_remove_updates_index_and_counts() {
        let mut book = ScheduleBook::new(MemoryStore::new()).unwrap();
        let e = book.commit(draft(1, 100, Weekday::Mon, 8)).unwrap();
        book.remove(e.id).unwrap();

        assert!(book.index().is_empty());
        assert_eq!(book.lessons_for(1, 100), 0);
        assert!(book.remove(e.id).is_err());
    }

    #[test]
    fn test_new_indexes_existing_store() {
        let store = MemoryStore::with_entries(vec![
            draft(1, 100, Weekday::Mon, 8).into_entry(1),
            draft(2, 100, Weekday::Mon, 9).into_entry(2),
        ]);
        let book = ScheduleBook::new(store).unwrap();
        assert_eq!(book.index().len(), 2);
        assert_eq!(book.lessons_for(2, 100), 1);
        assert_eq!(
            book.index().query(Axis::ClassGroup, 100, Weekday::Mon, t(8, 0), t(10, 0)),
            vec![1, 2]
        );
    }

    #[test]
    fn test_rebuild_twice_gives_same_answers() {
        let mut book = ScheduleBook::new(MemoryStore::new()).unwrap();
        for (i, day) in WEEKDAYS.iter().enumerate() {
            book.commit(draft(1, 100 + i as u64, *day, 8)).unwrap();
        }
        let before: Vec<_> = WEEKDAYS
            .iter()
            .map(|&d| book.index().query(Axis::Teacher, 10, d, t(7, 0), t(16, 0)))
            .collect();

        book.rebuild().unwrap();
        book.rebuild().unwrap();
        let after: Vec<_> = WEEKDAYS
            .iter()
            .map(|&d| book.index().query(Axis::Teacher, 10, d, t(7, 0), t(16, 0)))
            .collect();
        assert_eq!(before, after);
        assert_eq!(book.lessons_for(1, 102), 1);
    }
}
