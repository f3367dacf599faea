//! The placer: consumes ranked candidates, commits sessions greedily,
//! and records unmet demand with diagnostics.

use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::models::{Classroom, Conflict, Subject, Teacher, TimetableEntry};
use crate::slots::is_break_slot;
use crate::validation::detect_conflicts;

use super::ranking::{rank_cells, sort_candidates, Candidate};
use super::state::ScheduleState;

/// Output of one generation run: the placed entries plus every
/// shortfall and double-booking conflict found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationResult {
    pub entries: Vec<TimetableEntry>,
    pub conflicts: Vec<Conflict>,
}

/// Greedy constrained timetable generator.
///
/// Owns its input collections for the duration of one run; `generate`
/// is a pure function of them — identical inputs (including order)
/// produce identical output.
///
/// # Example
///
/// ```
/// use tt_engine::generator::TimetableGenerator;
/// use tt_engine::models::{Subject, Teacher};
///
/// let generator = TimetableGenerator::new(
///     vec![Teacher::new("Ada").with_subject("Math")],
///     vec![Subject::new("Math").with_sessions_per_week(2)],
///     vec!["R1".into()],
///     vec!["9:00 AM - 10:00 AM".into()],
///     vec!["Monday".into(), "Tuesday".into()],
///     vec![],
/// );
/// let result = generator.generate();
/// assert_eq!(result.entries.len(), 2);
/// assert!(result.conflicts.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TimetableGenerator {
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub classrooms: Vec<Classroom>,
    pub time_slots: Vec<String>,
    pub days: Vec<String>,
    /// Carried for session metadata; placement derives cohorts from the
    /// subjects themselves.
    pub semesters: Vec<String>,
}

impl TimetableGenerator {
    /// Creates a generator over the given input collections.
    pub fn new(
        teachers: Vec<Teacher>,
        subjects: Vec<Subject>,
        classrooms: Vec<Classroom>,
        time_slots: Vec<String>,
        days: Vec<String>,
        semesters: Vec<String>,
    ) -> Self {
        Self {
            teachers,
            subjects,
            classrooms,
            time_slots,
            days,
            semesters,
        }
    }

    /// Runs one full generation pass.
    ///
    /// Occupancy state is built fresh, consumed, and discarded here;
    /// the returned entry and conflict lists are the only output. The
    /// final conflict list is the per-subject shortfalls followed by a
    /// full [`detect_conflicts`] scan of the placed entries.
    pub fn generate(&self) -> GenerationResult {
        let mut state = ScheduleState::new();
        let mut entries: Vec<TimetableEntry> = Vec::new();
        let mut conflicts: Vec<Conflict> = Vec::new();

        for subject in &self.subjects {
            let target = subject.sessions_target();
            let placed = self.place_subject(subject, target, &mut state, &mut entries);

            debug!(
                "placed {placed}/{target} sessions for '{}' ({})",
                subject.name,
                subject.cohort()
            );

            if placed < target {
                let missing = target - placed;
                warn!(
                    "shortfall for '{}': {missing} session(s) unplaced",
                    subject.name
                );
                conflicts.push(self.shortfall_conflict(subject, missing, &state));
            }
        }

        conflicts.extend(detect_conflicts(&entries, &self.days, &self.time_slots));
        GenerationResult { entries, conflicts }
    }

    /// Places up to `target` sessions for one subject. Returns the
    /// number actually placed.
    fn place_subject(
        &self,
        subject: &Subject,
        target: u32,
        state: &mut ScheduleState,
        entries: &mut Vec<TimetableEntry>,
    ) -> u32 {
        let eligible = self.eligible_teachers(subject);
        let feasible = self.candidate_universe(subject, &eligible, state);

        let feasible_days: HashSet<usize> = feasible.iter().map(|c| c.day).collect();
        // Diversity-first: hold Pass A to one session per distinct day
        // only when enough distinct days are on offer to hit the target.
        let one_per_day = feasible_days.len() as u32 >= target;

        let mut placed = 0u32;
        let mut used_positions: HashSet<(usize, usize)> = HashSet::new();
        let mut used_days: HashSet<usize> = HashSet::new();

        // Pass A: spread across days.
        for candidate in &feasible {
            if placed >= target {
                break;
            }
            if used_positions.contains(&(candidate.day, candidate.slot)) {
                continue;
            }
            if one_per_day && used_days.contains(&candidate.day) {
                continue;
            }
            // State has mutated since the universe was built; re-verify.
            if self.commit_if_placeable(subject, candidate, state, entries) {
                used_positions.insert((candidate.day, candidate.slot));
                used_days.insert(candidate.day);
                placed += 1;
            }
        }

        // Pass B: fill remaining sessions any way possible, including
        // parallel sections of this subject at an already-used cell.
        if placed < target {
            for candidate in &feasible {
                if placed >= target {
                    break;
                }
                if self.commit_if_placeable(subject, candidate, state, entries) {
                    placed += 1;
                }
            }
        }

        placed
    }

    /// Re-checks the placement predicate and, when it still holds,
    /// commits the candidate: entry appended, occupancy booked.
    fn commit_if_placeable(
        &self,
        subject: &Subject,
        candidate: &Candidate,
        state: &mut ScheduleState,
        entries: &mut Vec<TimetableEntry>,
    ) -> bool {
        let day = &self.days[candidate.day];
        let slot = &self.time_slots[candidate.slot];
        let teacher = &self.teachers[candidate.teacher];
        let classroom = &self.classrooms[candidate.classroom];

        if !self.can_place(subject, teacher, classroom, day, slot, state) {
            return false;
        }

        entries.push(
            TimetableEntry::new(
                day,
                slot,
                &subject.name,
                &teacher.name,
                subject.cohort(),
                classroom,
            )
            .with_department_codes(subject.department_codes()),
        );
        state.book(
            &teacher.name,
            classroom,
            subject.cohort(),
            &subject.name,
            day,
            slot,
        );
        true
    }

    /// The placement predicate: one check for every constraint the
    /// generator enforces.
    fn can_place(
        &self,
        subject: &Subject,
        teacher: &Teacher,
        classroom: &str,
        day: &str,
        slot: &str,
        state: &ScheduleState,
    ) -> bool {
        if is_break_slot(slot) {
            return false;
        }
        if state.teacher_booked(&teacher.name, day, slot) {
            return false;
        }
        if state.classroom_booked(classroom, day, slot) {
            return false;
        }
        if let Some(existing) = state.cohort_subject_at(subject.cohort(), day, slot) {
            if existing != subject.name {
                return false;
            }
        }
        teacher.is_available(day, slot)
    }

    /// Teachers eligible to take this subject: the pinned teacher when
    /// `teacher_id` is set, otherwise everyone who covers the subject
    /// name. Indices into `self.teachers`.
    fn eligible_teachers(&self, subject: &Subject) -> Vec<usize> {
        let mut eligible = self.covering_teachers(subject);
        if let Some(pin) = &subject.teacher_id {
            eligible.retain(|&t| self.teachers[t].name == *pin);
        }
        eligible
    }

    /// Teachers whose subject list covers this subject name, ignoring
    /// any `teacher_id` pin. The shortfall diagnostics use this wider
    /// set — the pin is advisory there.
    fn covering_teachers(&self, subject: &Subject) -> Vec<usize> {
        self.teachers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.teaches(&subject.name))
            .map(|(i, _)| i)
            .collect()
    }

    /// Builds and ranks every currently-feasible candidate tuple for
    /// one subject.
    fn candidate_universe(
        &self,
        subject: &Subject,
        eligible: &[usize],
        state: &ScheduleState,
    ) -> Vec<Candidate> {
        if eligible.is_empty() {
            return Vec::new();
        }

        let mut candidates: Vec<Candidate> = Vec::new();
        for (day_idx, slot_idx) in rank_cells(state, subject.cohort(), &self.days, &self.time_slots)
        {
            let day = &self.days[day_idx];
            let slot = &self.time_slots[slot_idx];
            for &teacher_idx in eligible {
                let teacher = &self.teachers[teacher_idx];
                if !teacher.is_available(day, slot) {
                    continue;
                }
                for (classroom_idx, classroom) in self.classrooms.iter().enumerate() {
                    if self.can_place(subject, teacher, classroom, day, slot, state) {
                        candidates.push(Candidate {
                            day: day_idx,
                            slot: slot_idx,
                            teacher: teacher_idx,
                            classroom: classroom_idx,
                            teacher_load: state.teacher_week_load(&teacher.name),
                        });
                    }
                }
            }
        }

        sort_candidates(&mut candidates, &self.teachers, &self.classrooms);
        candidates
    }

    /// Builds the shortfall conflict for a subject that missed its
    /// target: missing count, up to 5 placement suggestions, and
    /// deduplicated per-cell reasons.
    fn shortfall_conflict(
        &self,
        subject: &Subject,
        missing: u32,
        state: &ScheduleState,
    ) -> Conflict {
        let covering = self.covering_teachers(subject);

        let reasons: Vec<String> = if covering.is_empty() {
            vec!["No teacher associated with subject".to_string()]
        } else {
            self.shortfall_reasons(subject, &covering, state)
        };

        let suggestions = self.placement_suggestions(subject, &covering, state);

        Conflict::shortfall(
            subject.cohort(),
            &subject.name,
            missing,
            suggestions,
            reasons.into_iter().unique().collect(),
        )
    }

    /// Scans every cell for what blocked this subject there.
    fn shortfall_reasons(
        &self,
        subject: &Subject,
        covering: &[usize],
        state: &ScheduleState,
    ) -> Vec<String> {
        let mut reasons = Vec::new();
        for day in &self.days {
            for slot in &self.time_slots {
                let any_teacher_free = covering.iter().any(|&t| {
                    let teacher = &self.teachers[t];
                    teacher.is_available(day, slot)
                        && !state.teacher_booked(&teacher.name, day, slot)
                });
                let any_classroom_free = self
                    .classrooms
                    .iter()
                    .any(|c| !state.classroom_booked(c, day, slot));
                let cohort_busy_with = state
                    .cohort_subject_at(subject.cohort(), day, slot)
                    .filter(|existing| *existing != subject.name);

                if !any_teacher_free {
                    reasons.push(format!("No available teacher at {day} {slot}"));
                }
                if !any_classroom_free {
                    reasons.push(format!("No available classroom at {day} {slot}"));
                }
                if let Some(existing) = cohort_busy_with {
                    reasons.push(format!("Semester busy with {existing} at {day} {slot}"));
                }
            }
        }
        reasons
    }

    /// Scans for up to 5 cells where the subject could still go: cohort
    /// not blocked by a different subject, at least one covering
    /// teacher free and available, at least one classroom free.
    fn placement_suggestions(
        &self,
        subject: &Subject,
        covering: &[usize],
        state: &ScheduleState,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();
        'outer: for day in &self.days {
            for slot in &self.time_slots {
                if state
                    .cohort_subject_at(subject.cohort(), day, slot)
                    .is_some_and(|existing| existing != subject.name)
                {
                    continue;
                }
                let teacher_free = covering.iter().any(|&t| {
                    let teacher = &self.teachers[t];
                    teacher.is_available(day, slot)
                        && !state.teacher_booked(&teacher.name, day, slot)
                });
                let classroom_free = self
                    .classrooms
                    .iter()
                    .any(|c| !state.classroom_booked(c, day, slot));

                if teacher_free && classroom_free {
                    suggestions.push(format!("{day} @ {slot}"));
                }
                if suggestions.len() >= 5 {
                    break 'outer;
                }
            }
        }
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::BREAK_SLOT;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn week_days() -> Vec<String> {
        labels(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"])
    }

    #[test]
    fn test_three_sessions_spread_across_distinct_days() {
        let generator = TimetableGenerator::new(
            vec![Teacher::new("Ada").with_subject("Math")],
            vec![Subject::new("Math").with_sessions_per_week(3)],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert_eq!(result.entries.len(), 3);
        assert!(result.conflicts.is_empty());

        let days: HashSet<&str> = result.entries.iter().map(|e| e.day.as_str()).collect();
        assert_eq!(days.len(), 3, "sessions must land on distinct days");
    }

    #[test]
    fn test_break_slot_never_assigned() {
        let generator = TimetableGenerator::new(
            vec![Teacher::new("Ada").with_subject("Math")],
            vec![Subject::new("Math").with_sessions_per_week(10)],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM", BREAK_SLOT, "2:00 PM - 3:00 PM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert!(!result.entries.is_empty());
        assert!(result.entries.iter().all(|e| e.time_slot != BREAK_SLOT));
    }

    #[test]
    fn test_overconstrained_pair_reports_shortfall() {
        // 2 subjects, same cohort, same single teacher, one classroom,
        // 5 usable cells total, 3 sessions each: at most 5 placements.
        let teacher = Teacher::new("Ada").with_subject("Math").with_subject("Physics");
        let generator = TimetableGenerator::new(
            vec![teacher],
            vec![
                Subject::new("Math")
                    .with_semester("Semester 1")
                    .with_sessions_per_week(3),
                Subject::new("Physics")
                    .with_semester("Semester 1")
                    .with_sessions_per_week(3),
            ],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert!(result.entries.len() <= 5);

        let shortfalls: Vec<&Conflict> =
            result.conflicts.iter().filter(|c| c.is_shortfall()).collect();
        assert!(!shortfalls.is_empty());
        match shortfalls[0] {
            Conflict::Student {
                missing_sessions,
                reasons,
                ..
            } => {
                assert!(*missing_sessions > 0);
                assert!(!reasons.is_empty());
            }
            other => panic!("expected student shortfall, got {other:?}"),
        }
    }

    #[test]
    fn test_no_teacher_for_subject() {
        let generator = TimetableGenerator::new(
            vec![Teacher::new("Ada").with_subject("Math")],
            vec![Subject::new("History").with_sessions_per_week(2)],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert!(result.entries.is_empty());
        assert_eq!(result.conflicts.len(), 1);
        match &result.conflicts[0] {
            Conflict::Student {
                missing_sessions,
                reasons,
                suggestions,
                ..
            } => {
                assert_eq!(*missing_sessions, 2);
                assert_eq!(reasons, &vec!["No teacher associated with subject".to_string()]);
                assert!(suggestions.is_empty());
            }
            other => panic!("expected student shortfall, got {other:?}"),
        }
    }

    #[test]
    fn test_teacher_pin_restricts_placement() {
        let generator = TimetableGenerator::new(
            vec![
                Teacher::new("Ada").with_subject("Math"),
                Teacher::new("Bob").with_subject("Math"),
            ],
            vec![
                Subject::new("Math")
                    .with_sessions_per_week(2)
                    .with_teacher("Bob"),
            ],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert_eq!(result.entries.len(), 2);
        assert!(result.entries.iter().all(|e| e.teacher == "Bob"));
    }

    #[test]
    fn test_availability_restricts_placement() {
        let teacher = Teacher::new("Ada")
            .with_subject("Math")
            .with_availability("Monday", vec!["9:00 AM - 10:00 AM"]);
        let generator = TimetableGenerator::new(
            vec![teacher],
            vec![Subject::new("Math").with_sessions_per_week(3)],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM", "10:00 AM - 11:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        // Only one cell is ever permitted for Ada
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].day, "Monday");
        assert_eq!(result.entries[0].time_slot, "9:00 AM - 10:00 AM");
        assert!(result.conflicts.iter().any(Conflict::is_shortfall));
    }

    #[test]
    fn test_parallel_sections_share_a_cell() {
        // One day, one usable slot, two teachers, two rooms: Pass A
        // places one session, Pass B stacks the second as a parallel
        // section of the same subject. The detector stays silent.
        let generator = TimetableGenerator::new(
            vec![
                Teacher::new("Ada").with_subject("Math"),
                Teacher::new("Bob").with_subject("Math"),
            ],
            vec![
                Subject::new("Math")
                    .with_semester("Semester 1")
                    .with_sessions_per_week(2),
            ],
            vec!["R1".into(), "R2".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            labels(&["Monday"]),
            vec![],
        );
        let result = generator.generate();

        assert_eq!(result.entries.len(), 2);
        assert!(result.entries.iter().all(|e| e.is_at("Monday", "9:00 AM - 10:00 AM")));
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_teacher_load_balances_across_subjects() {
        // Teacher load is snapshotted when a subject's candidate
        // universe is built, so balancing shows up between subjects:
        // Ada (name tie-break) takes all of Math, which pushes Calculus
        // onto the now-less-loaded Bob.
        let teachers = vec![
            Teacher::new("Ada").with_subject("Math").with_subject("Calculus"),
            Teacher::new("Bob").with_subject("Math").with_subject("Calculus"),
        ];
        let generator = TimetableGenerator::new(
            teachers,
            vec![
                Subject::new("Math").with_semester("S1").with_sessions_per_week(2),
                Subject::new("Calculus").with_semester("S2").with_sessions_per_week(2),
            ],
            vec!["R1".into(), "R2".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert_eq!(result.entries.len(), 4);
        assert!(result
            .entries
            .iter()
            .filter(|e| e.subject == "Math")
            .all(|e| e.teacher == "Ada"));
        assert!(result
            .entries
            .iter()
            .filter(|e| e.subject == "Calculus")
            .all(|e| e.teacher == "Bob"));
    }

    #[test]
    fn test_no_double_booking_invariants() {
        // A denser configuration: assert the generation-time invariants
        // directly on the output.
        let generator = TimetableGenerator::new(
            vec![
                Teacher::new("Ada").with_subject("Math").with_subject("Physics"),
                Teacher::new("Bob").with_subject("Chemistry").with_subject("Math"),
            ],
            vec![
                Subject::new("Math").with_semester("Semester 1").with_sessions_per_week(3),
                Subject::new("Physics").with_semester("Semester 1").with_sessions_per_week(3),
                Subject::new("Chemistry").with_semester("Semester 2").with_sessions_per_week(3),
            ],
            vec!["R1".into(), "R2".into()],
            labels(&["9:00 AM - 10:00 AM", "10:00 AM - 11:00 AM", "2:00 PM - 3:00 PM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        let mut teacher_cells = HashSet::new();
        let mut classroom_cells = HashSet::new();
        for e in &result.entries {
            assert!(
                teacher_cells.insert((e.teacher.clone(), e.day.clone(), e.time_slot.clone())),
                "teacher double-booked: {e:?}"
            );
            for room in &e.classrooms {
                assert!(
                    classroom_cells.insert((room.clone(), e.day.clone(), e.time_slot.clone())),
                    "classroom double-booked: {e:?}"
                );
            }
        }
        // Cohort cells may repeat only for one subject name
        for e in &result.entries {
            for other in &result.entries {
                if e.semester == other.semester && e.is_at(&other.day, &other.time_slot) {
                    assert_eq!(e.subject, other.subject);
                }
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let build = || {
            TimetableGenerator::new(
                vec![
                    Teacher::new("Ada").with_subject("Math"),
                    Teacher::new("Bob").with_subject("Math"),
                ],
                vec![Subject::new("Math").with_sessions_per_week(3)],
                vec!["R2".into(), "R1".into()],
                labels(&["9:00 AM - 10:00 AM", "10:00 AM - 11:00 AM"]),
                week_days(),
                vec![],
            )
        };
        let a = build().generate();
        let b = build().generate();
        assert_eq!(a.entries, b.entries);
        assert_eq!(a.conflicts, b.conflicts);
    }

    #[test]
    fn test_department_codes_carried_onto_entries() {
        let generator = TimetableGenerator::new(
            vec![Teacher::new("Ada").with_subject("Math")],
            vec![
                Subject::new("Math")
                    .with_sessions_per_week(1)
                    .with_department("CSE – Computer Science")
                    .with_department("EEE - Electrical"),
            ],
            vec!["R1".into()],
            labels(&["9:00 AM - 10:00 AM"]),
            week_days(),
            vec![],
        );
        let result = generator.generate();

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].department_codes, vec!["CSE", "EEE"]);
    }
}
