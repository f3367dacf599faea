//! Input validation and post-hoc conflict detection.
//!
//! Two separate concerns live here:
//!
//! - [`validate_input`] is the fail-fast gate the calling layer runs
//!   *before* generation: duplicate teacher identities and duplicate
//!   time-slot labels. The engine itself assumes deduplicated input.
//! - [`detect_conflicts`] is the stateless full re-scan of placed
//!   entries for double-bookings. It reads only the entry list — never
//!   the generation-time occupancy state — so it is equally correct
//!   after generation and after any manual edit, and idempotent.

use itertools::Itertools;
use std::collections::HashSet;

use crate::models::{Conflict, Teacher, TimetableEntry, DEFAULT_SEMESTER};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two teachers share the same identity (case-insensitive).
    DuplicateTeacher,
    /// Two time slots share the same label.
    DuplicateTimeSlot,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input collections before generation.
///
/// Checks:
/// 1. No duplicate teacher names (case-insensitive, trimmed)
/// 2. No duplicate time-slot labels
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(teachers: &[Teacher], time_slots: &[String]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for t in teachers {
        if !names.insert(t.name.trim().to_lowercase()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTeacher,
                format!("Duplicate teacher: {}", t.name),
            ));
        }
    }

    let mut labels = HashSet::new();
    for slot in time_slots {
        if !labels.insert(slot.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateTimeSlot,
                format!("Duplicate time slot: {slot}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Scans the entry list for double-bookings, cell by cell.
///
/// For every (day, slot): entries there are grouped by teacher, by each
/// classroom they list, and by cohort. A teacher or classroom group
/// with more than one member yields one conflict naming all involved
/// subjects. A cohort group spanning more than one distinct subject
/// name yields one `student` conflict — parallel sections of a single
/// subject are deliberately not a conflict.
pub fn detect_conflicts(
    entries: &[TimetableEntry],
    days: &[String],
    time_slots: &[String],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for day in days {
        for slot in time_slots {
            let cell: Vec<&TimetableEntry> =
                entries.iter().filter(|e| e.is_at(day, slot)).collect();
            if cell.len() < 2 {
                continue;
            }

            let mut by_teacher: Vec<(String, Vec<&TimetableEntry>)> = Vec::new();
            let mut by_classroom: Vec<(String, Vec<&TimetableEntry>)> = Vec::new();
            let mut by_cohort: Vec<(String, Vec<&TimetableEntry>)> = Vec::new();

            for &e in &cell {
                group_push(&mut by_teacher, &e.teacher, e);
                for room in &e.classrooms {
                    group_push(&mut by_classroom, room, e);
                }
                let cohort = if e.semester.is_empty() {
                    DEFAULT_SEMESTER
                } else {
                    &e.semester
                };
                group_push(&mut by_cohort, cohort, e);
            }

            for (teacher, group) in &by_teacher {
                if group.len() > 1 {
                    conflicts.push(Conflict::teacher_clash(
                        teacher,
                        day,
                        slot,
                        group.iter().map(|e| e.subject.clone()).collect(),
                    ));
                }
            }
            for (classroom, group) in &by_classroom {
                if group.len() > 1 {
                    conflicts.push(Conflict::classroom_clash(
                        classroom,
                        day,
                        slot,
                        group.iter().map(|e| e.subject.clone()).collect(),
                    ));
                }
            }
            for (cohort, group) in &by_cohort {
                let subjects: Vec<String> = group
                    .iter()
                    .map(|e| e.subject.clone())
                    .unique()
                    .collect();
                if subjects.len() > 1 {
                    conflicts.push(Conflict::cohort_clash(cohort, day, slot, subjects));
                }
            }
        }
    }

    conflicts
}

/// Appends to a keyed group, preserving first-occurrence key order.
fn group_push<'a>(
    groups: &mut Vec<(String, Vec<&'a TimetableEntry>)>,
    key: &str,
    entry: &'a TimetableEntry,
) {
    if let Some((_, members)) = groups.iter_mut().find(|(k, _)| k == key) {
        members.push(entry);
    } else {
        groups.push((key.to_string(), vec![entry]));
    }
}
