//! Lesson allocation strategies and run reports.
//!
//! Two strategies, kept apart on purpose:
//!
//! - [`StrictAllocator`]: deterministic greedy first-fit over the slot grid.
//!   Never double-books a teacher, class group or classroom and never
//!   exceeds a subject's weekly target. Used for real timetables.
//! - [`SampleGenerator`]: randomized filler for demo and seed data. Leaves
//!   free periods, picks subjects at random and does not check teacher
//!   conflicts. Never used on the validated path.
//!
//! # Algorithm
//!
//! Strict allocation walks demands in list order, class groups in demand
//! order, and slots in (weekday, time) order, taking the first classroom of
//! the pool that is free. There is no backtracking, so a feasible timetable
//! may be missed; unmet targets are reported, not raised.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod report;
mod sample;
mod strict;

pub use report::{AllocationReport, GenerationStatus, LessonTally, RejectedDemand};
pub use sample::SampleGenerator;
pub use strict::StrictAllocator;
