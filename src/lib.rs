//! Timetable generation engine for recurring teaching sessions.
//!
//! Assigns (subject × teacher × classroom × day × time-slot) sessions for
//! a set of cohorts (semesters), respecting teacher availability and
//! avoiding double-booking, then reports shortfalls and conflicts. The
//! placement algorithm is first-fit with heuristics — it spreads a
//! cohort's sessions across days and balances teacher load, but never
//! backtracks and never guarantees a conflict-free schedule.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Teacher`, `Subject`, `TimetableEntry`,
//!   `Conflict`
//! - **`slots`**: Chronological ordering of free-text time-slot labels
//!   and reserved break-slot handling
//! - **`generator`**: Greedy constrained placement (`TimetableGenerator`)
//! - **`validation`**: Caller-side duplicate checks and the post-hoc
//!   conflict detector
//! - **`session`**: In-memory session store and manual-edit reconciler
//!
//! # Data Flow
//!
//! Input collections → [`generator::TimetableGenerator::generate`] →
//! entry list + conflicts → [`session::SessionStore`] → rendering layer.
//! Manual edits re-enter through [`session::Session`] methods, which
//! re-run [`validation::detect_conflicts`] over the whole entry list.

pub mod generator;
pub mod models;
pub mod session;
pub mod slots;
pub mod validation;
