//! Entry store.
//!
//! The committed schedule lives in an external store; the scheduler only
//! inserts and removes entries through [`EntryStore`]. [`MemoryStore`] is an
//! in-process implementation for tests, demos and embedding.

use std::collections::BTreeMap;

use crate::error::{ResourceKind, Result, TimetableError};
use crate::models::{EntryDraft, EntryId, ScheduleEntry};

/// Persistence seam for schedule entries.
///
/// Implementations assign entry ids on insert. The store is the source of
/// truth; the conflict index is rebuilt from [`entries`](Self::entries).
pub trait EntryStore: Send {
    /// Persists a draft and returns the stored entry.
    fn insert(&mut self, draft: EntryDraft) -> Result<ScheduleEntry>;

    /// Deletes an entry, returning it.
    ///
    /// # Errors
    /// `NotFound` if no entry has this id.
    fn remove(&mut self, id: EntryId) -> Result<ScheduleEntry>;

    /// Looks up one entry.
    fn get(&self, id: EntryId) -> Option<ScheduleEntry>;

    /// All entries, in id order.
    fn entries(&self) -> Result<Vec<ScheduleEntry>>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory entry store with sequential ids starting at 1.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<EntryId, ScheduleEntry>,
    next_id: EntryId,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Creates a store holding existing entries (e.g. loaded at startup).
    ///
    /// New ids continue after the largest existing id.
    pub fn with_entries(entries: impl IntoIterator<Item = ScheduleEntry>) -> Self {
        let entries: BTreeMap<_, _> = entries.into_iter().map(|e| (e.id, e)).collect();
        let next_id = entries.keys().next_back().map_or(1, |id| id + 1);
        Self { entries, next_id }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryStore {
    fn insert(&mut self, draft: EntryDraft) -> Result<ScheduleEntry> {
        let id = self.next_id;
        self.next_id += 1;
        let entry = draft.into_entry(id);
        self.entries.insert(id, entry.clone());
        Ok(entry)
    }

    fn remove(&mut self, id: EntryId) -> Result<ScheduleEntry> {
        self.entries
            .remove(&id)
            .ok_or_else(|| TimetableError::not_found(ResourceKind::Entry, id))
    }

    fn get(&self, id: EntryId) -> Option<ScheduleEntry> {
        self.entries.get(&id).cloned()
    }

    fn entries(&self) -> Result<Vec<ScheduleEntry>> {
        Ok(self.entries.values().cloned().collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeSlot;
    use chrono::{NaiveTime, Weekday};

    fn draft(group: u64) -> EntryDraft {
        EntryDraft::new(
            group,
            10,
            1,
            TimeSlot::new(
                Weekday::Mon,
                NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(8, 45, 0).unwrap(),
                1,
            ),
        )
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let mut store = MemoryStore::new();
        let a = store.insert(draft(100)).unwrap();
        let b = store.insert(draft(101)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().class_group_id, 101);
    }

    #[test]
    fn test_remove_unknown_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store.remove(99).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::NotFound {
                resource: ResourceKind::Entry,
                ..
            }
        ));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = MemoryStore::new();
        let a = store.insert(draft(100)).unwrap();
        store.remove(a.id).unwrap();
        let b = store.insert(draft(100)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(store.get(a.id).is_none());
    }

    #[test]
    fn test_with_entries_continues_ids() {
        let existing = vec![draft(100).into_entry(7), draft(101).into_entry(3)];
        let mut store = MemoryStore::with_entries(existing);
        let ids: Vec<_> = store.entries().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 7]);
        assert_eq!(store.insert(draft(102)).unwrap().id, 8);
    }
}
