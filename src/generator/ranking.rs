//! Candidate ranking.
//!
//! Two orderings, both explicit total orders so generation is
//! reproducible for identical input:
//!
//! 1. **Cell ranking** (per cohort): (day, slot) pairs ascending by
//!    `committed sessions for this cohort on that day × 10`, ties by
//!    original day index then slot index. Days the cohort has not used
//!    yet come first, spreading its sessions across the week.
//! 2. **Candidate ranking**: full (day, slot, teacher, classroom)
//!    tuples ascending by the teacher's current weekly booked-slot
//!    count (load balancing), then day index, slot index, teacher name
//!    lowercased, classroom name.

use std::cmp::Ordering;

use crate::models::Teacher;

use super::state::ScheduleState;

/// One feasible (day, slot, teacher, classroom) tuple, as indices into
/// the generator's input collections.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub day: usize,
    pub slot: usize,
    pub teacher: usize,
    pub classroom: usize,
    /// The teacher's total booked slots when the universe was built.
    pub teacher_load: usize,
}

/// Weight applied to a cohort's per-day session count when ranking
/// cells.
const DAY_LOAD_WEIGHT: u32 = 10;

/// Ranks all (day index, slot index) cells for one cohort.
pub(crate) fn rank_cells(
    state: &ScheduleState,
    cohort: &str,
    days: &[String],
    slots: &[String],
) -> Vec<(usize, usize)> {
    let mut ranked: Vec<(u32, usize, usize)> = Vec::with_capacity(days.len() * slots.len());
    for (d, day) in days.iter().enumerate() {
        let score = state.cohort_day_load(cohort, day) * DAY_LOAD_WEIGHT;
        for s in 0..slots.len() {
            ranked.push((score, d, s));
        }
    }
    ranked.sort_by_key(|&(score, d, s)| (score, d, s));
    ranked.into_iter().map(|(_, d, s)| (d, s)).collect()
}

/// Sorts candidates by the full total order described above.
pub(crate) fn sort_candidates(
    candidates: &mut [Candidate],
    teachers: &[Teacher],
    classrooms: &[String],
) {
    candidates.sort_by(|a, b| compare_candidates(a, b, teachers, classrooms));
}

fn compare_candidates(
    a: &Candidate,
    b: &Candidate,
    teachers: &[Teacher],
    classrooms: &[String],
) -> Ordering {
    a.teacher_load
        .cmp(&b.teacher_load)
        .then(a.day.cmp(&b.day))
        .then(a.slot.cmp(&b.slot))
        .then_with(|| {
            teachers[a.teacher]
                .name
                .to_lowercase()
                .cmp(&teachers[b.teacher].name.to_lowercase())
        })
        .then_with(|| classrooms[a.classroom].cmp(&classrooms[b.classroom]))
}
