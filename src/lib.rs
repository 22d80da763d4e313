//! Weekly school timetabling for the U-Engine ecosystem.
//!
//! Places recurring lessons (subject × teacher × class group) into a
//! Monday-to-Friday slot grid and a shared classroom pool. Teachers, class
//! groups and classrooms are never double-booked, and no subject gets more
//! lessons per class group than its weekly hours.
//!
//! # Modules
//!
//! - **`grid`**: Slot enumeration from day bounds and lesson/break lengths
//! - **`index`**: Per-axis occupancy index answering "is R busy at S"
//! - **`validation`**: Conflict checks for manual creates and updates
//! - **`scheduler`**: Strict greedy allocator, seeded sample generator, run reports
//! - **`book`**: Entry store and index kept in step
//! - **`service`**: `Timetable` facade with one lock around validation and commit
//! - **`catalog`** / **`store`**: Seams to the surrounding school system
//! - **`config`**, **`error`**, **`logging`**: Ambient setup
//!
//! # Architecture
//!
//! Catalog records and entry persistence belong to the host application;
//! this crate owns the conflict rules and the allocation order. The conflict
//! index is derived state and can always be rebuilt from the store.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod book;
pub mod catalog;
pub mod config;
pub mod error;
pub mod grid;
pub mod index;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Result, TimetableError};
