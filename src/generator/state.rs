//! Occupancy state for one generation run.
//!
//! Three independent tables: teacher bookings, classroom bookings, and
//! cohort cells. A cohort cell remembers *which* subject claimed it, so
//! parallel sections of the same subject can share a cell while any
//! second subject is refused.
//!
//! Built fresh (everything vacant) at the start of a run and discarded
//! afterwards; manual edits never touch this state.

use std::collections::{HashMap, HashSet};

/// A (day label, slot label) cell key.
type Cell = (String, String);

/// Mutable occupancy tables for the placer.
#[derive(Debug, Default)]
pub struct ScheduleState {
    teacher_busy: HashMap<String, HashSet<Cell>>,
    classroom_busy: HashMap<String, HashSet<Cell>>,
    /// cohort → cell → subject name that claimed it.
    cohort_cells: HashMap<String, HashMap<Cell, String>>,
    /// cohort → day → committed session count (drives day spreading).
    cohort_day_load: HashMap<String, HashMap<String, u32>>,
}

impl ScheduleState {
    /// Creates an all-vacant state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a teacher is already booked at (day, slot).
    pub fn teacher_booked(&self, teacher: &str, day: &str, slot: &str) -> bool {
        self.teacher_busy
            .get(teacher)
            .is_some_and(|cells| cells.contains(&(day.to_string(), slot.to_string())))
    }

    /// Whether a classroom is already booked at (day, slot).
    pub fn classroom_booked(&self, classroom: &str, day: &str, slot: &str) -> bool {
        self.classroom_busy
            .get(classroom)
            .is_some_and(|cells| cells.contains(&(day.to_string(), slot.to_string())))
    }

    /// The subject that claimed a cohort's (day, slot) cell, if any.
    pub fn cohort_subject_at(&self, cohort: &str, day: &str, slot: &str) -> Option<&str> {
        self.cohort_cells
            .get(cohort)?
            .get(&(day.to_string(), slot.to_string()))
            .map(String::as_str)
    }

    /// Committed session count for a cohort on one day.
    pub fn cohort_day_load(&self, cohort: &str, day: &str) -> u32 {
        self.cohort_day_load
            .get(cohort)
            .and_then(|days| days.get(day))
            .copied()
            .unwrap_or(0)
    }

    /// Total booked slots for a teacher across the whole week.
    pub fn teacher_week_load(&self, teacher: &str) -> usize {
        self.teacher_busy.get(teacher).map_or(0, HashSet::len)
    }

    /// Commits one placement atomically: marks the teacher and classroom
    /// occupied, and claims the cohort cell (bumping that cohort's
    /// per-day counter) when it is still vacant.
    pub fn book(
        &mut self,
        teacher: &str,
        classroom: &str,
        cohort: &str,
        subject: &str,
        day: &str,
        slot: &str,
    ) {
        let cell = (day.to_string(), slot.to_string());
        self.teacher_busy
            .entry(teacher.to_string())
            .or_default()
            .insert(cell.clone());
        self.classroom_busy
            .entry(classroom.to_string())
            .or_default()
            .insert(cell.clone());

        let cells = self.cohort_cells.entry(cohort.to_string()).or_default();
        if !cells.contains_key(&cell) {
            cells.insert(cell, subject.to_string());
            *self
                .cohort_day_load
                .entry(cohort.to_string())
                .or_default()
                .entry(day.to_string())
                .or_insert(0) += 1;
        }
    }
}
