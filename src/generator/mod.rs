//! Greedy constrained placement.
//!
//! First-fit with heuristics, not a constraint solver: subjects are
//! processed in input order, candidates are ranked by an explicit total
//! order, and there is no backtracking. Cost is bounded by
//! O(subjects × days × slots × teachers × classrooms); the price is
//! that unmet demand is reported (as `student` conflicts) rather than
//! solved.
//!
//! # Algorithm
//!
//! For each subject:
//! 1. Resolve eligible teachers (pinned teacher or case-insensitive
//!    subject match).
//! 2. Enumerate every feasible (day, slot, teacher, classroom) tuple.
//! 3. Rank candidates: teacher weekly load, day, slot, teacher name,
//!    classroom name — ascending.
//! 4. Pass A: walk the ranking holding one session per distinct day
//!    (only when enough distinct days are feasible); Pass B refills
//!    without the day restriction.
//! 5. Under target? Emit a shortfall conflict with suggestions and
//!    per-cell reasons.

mod placer;
mod ranking;
mod state;

pub use placer::{GenerationResult, TimetableGenerator};
pub use state::ScheduleState;
