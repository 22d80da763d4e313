//! Conflict index.
//!
//! In-memory occupancy of every conflict axis, derived from the committed
//! schedule entries and rebuildable from them at any time.
//!
//! # Structure
//! One map per axis keyed by `(resource id, weekday)`. Each value is the
//! list of occupied `[start, end)` ranges for that resource and day, kept
//! sorted by start time, each pointing back to its entry. A query only
//! touches the ranges of one resource on one day, so its cost does not grow
//! with the size of the whole timetable.
//!
//! # Overlap
//! Two ranges conflict iff they overlap by a positive amount. Lessons that
//! merely touch (one ends when the other starts) do not conflict.

use chrono::{NaiveTime, Weekday};
use std::collections::HashMap;

use crate::models::{times_overlap, Axis, EntryId, ScheduleEntry};

type AxisKey = (u64, Weekday);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Occupancy {
    start: NaiveTime,
    end: NaiveTime,
    entry_id: EntryId,
}

/// Where an entry is recorded, for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Footprint {
    teacher: u64,
    class_group: u64,
    classroom: Option<u64>,
    day: Weekday,
}

/// Per-axis occupancy index over committed entries.
#[derive(Debug, Clone, Default)]
pub struct ConflictIndex {
    teachers: HashMap<AxisKey, Vec<Occupancy>>,
    class_groups: HashMap<AxisKey, Vec<Occupancy>>,
    classrooms: HashMap<AxisKey, Vec<Occupancy>>,
    footprints: HashMap<EntryId, Footprint>,
}

impl ConflictIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a full entry list in one pass.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a ScheduleEntry>) -> Self {
        let mut index = Self::new();
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Whether an entry is indexed.
    pub fn contains(&self, entry_id: EntryId) -> bool {
        self.footprints.contains_key(&entry_id)
    }

    /// Records an entry on every applicable axis.
    ///
    /// An entry without a classroom is recorded on the teacher and
    /// class-group axes only. Re-inserting a known id replaces it.
    pub fn insert(&mut self, entry: &ScheduleEntry) {
        if self.contains(entry.id) {
            self.remove(entry.id);
        }

        let day = entry.slot.day;
        let occupancy = Occupancy {
            start: entry.slot.start,
            end: entry.slot.end,
            entry_id: entry.id,
        };

        place(&mut self.teachers, (entry.teacher_id, day), occupancy);
        place(&mut self.class_groups, (entry.class_group_id, day), occupancy);
        if let Some(room) = entry.classroom_id {
            place(&mut self.classrooms, (room, day), occupancy);
        }

        self.footprints.insert(
            entry.id,
            Footprint {
                teacher: entry.teacher_id,
                class_group: entry.class_group_id,
                classroom: entry.classroom_id,
                day,
            },
        );
    }

    /// Removes an entry from every axis. Returns `false` if it was unknown.
    pub fn remove(&mut self, entry_id: EntryId) -> bool {
        let Some(fp) = self.footprints.remove(&entry_id) else {
            return false;
        };

        evict(&mut self.teachers, (fp.teacher, fp.day), entry_id);
        evict(&mut self.class_groups, (fp.class_group, fp.day), entry_id);
        if let Some(room) = fp.classroom {
            evict(&mut self.classrooms, (room, fp.day), entry_id);
        }
        true
    }

    /// Entries on `axis` for `resource_id` overlapping `[start, end)` on `day`.
    pub fn query(
        &self,
        axis: Axis,
        resource_id: u64,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Vec<EntryId> {
        self.query_excluding(axis, resource_id, day, start, end, None)
    }

    /// Like [`query`](Self::query), ignoring `exclude` (the entry being replaced).
    pub fn query_excluding(
        &self,
        axis: Axis,
        resource_id: u64,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<EntryId>,
    ) -> Vec<EntryId> {
        let Some(ranges) = self.axis(axis).get(&(resource_id, day)) else {
            return Vec::new();
        };

        ranges
            .iter()
            // sorted by start: nothing from here on can overlap
            .take_while(|occ| occ.start < end)
            .filter(|occ| times_overlap(occ.start, occ.end, start, end))
            .filter(|occ| Some(occ.entry_id) != exclude)
            .map(|occ| occ.entry_id)
            .collect()
    }

    /// First conflicting entry, if any.
    pub fn first_conflict(
        &self,
        axis: Axis,
        resource_id: u64,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<EntryId>,
    ) -> Option<EntryId> {
        self.query_excluding(axis, resource_id, day, start, end, exclude)
            .into_iter()
            .next()
    }

    /// Whether the resource is free for `[start, end)` on `day`.
    pub fn is_free(
        &self,
        axis: Axis,
        resource_id: u64,
        day: Weekday,
        start: NaiveTime,
        end: NaiveTime,
    ) -> bool {
        self.first_conflict(axis, resource_id, day, start, end, None)
            .is_none()
    }

    fn axis(&self, axis: Axis) -> &HashMap<AxisKey, Vec<Occupancy>> {
        match axis {
            Axis::Teacher => &self.teachers,
            Axis::ClassGroup => &self.class_groups,
            Axis::Classroom => &self.classrooms,
        }
    }
}

fn place(map: &mut HashMap<AxisKey, Vec<Occupancy>>, key: AxisKey, occupancy: Occupancy) {
    let ranges = map.entry(key).or_default();
    let pos =
        ranges.partition_point(|o| (o.start, o.entry_id) < (occupancy.start, occupancy.entry_id));
    ranges.insert(pos, occupancy);
}

fn evict(map: &mut HashMap<AxisKey, Vec<Occupancy>>, key: AxisKey, entry_id: EntryId) {
    if let Some(ranges) = map.get_mut(&key) {
        ranges.retain(|o| o.entry_id != entry_id);
        if ranges.is_empty() {
            map.remove(&key);
        }
    }
}
