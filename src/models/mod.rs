//! Timetabling domain models.
//!
//! Core data types for the generation engine and its consumers:
//! teachers with availability, subjects with weekly session targets,
//! placed timetable entries, and the conflict records surfaced to the
//! rendering layer.
//!
//! Classrooms carry no structure of their own — an opaque unique name
//! is all the engine ever needs — so they stay plain strings.

mod conflict;
mod entry;
mod subject;
mod teacher;

pub use conflict::Conflict;
pub use entry::TimetableEntry;
pub use subject::{parse_sessions_per_week, subject_color, Subject};
pub use teacher::Teacher;

/// Opaque classroom identifier.
pub type Classroom = String;

/// Cohort id used when a subject declares no semester.
pub const DEFAULT_SEMESTER: &str = "General";
