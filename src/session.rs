//! Session store and manual-edit reconciliation.
//!
//! A [`Session`] owns one generated timetable: the entry list, the
//! combined conflict list, the grid metadata the rendering layer needs,
//! and a memory of the inputs that produced it. Sessions live in a
//! [`SessionStore`] keyed by an opaque identifier; regeneration
//! replaces a session wholesale.
//!
//! Manual edits (move/add/edit/delete) mutate the entry list directly
//! and never consult generation-time occupancy state. Conflicts from
//! edits are therefore detected, not prevented: after every successful
//! mutation the whole entry list is re-scanned and the conflict list
//! replaced. Validation failures block the mutation and are reported
//! as [`EditError`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::generator::TimetableGenerator;
use crate::models::{Classroom, Conflict, Subject, Teacher, TimetableEntry};
use crate::slots::{is_break_slot, prepare_time_slots};
use crate::validation::{detect_conflicts, validate_input, ValidationError};

/// Grid metadata consumed by the rendering layer alongside the entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub classrooms: Vec<Classroom>,
    pub days: Vec<String>,
    /// Prepared slot labels: sorted, deduplicated, break slot included.
    pub time_slots: Vec<String>,
    pub semesters: Vec<String>,
}

/// The input collections a generation run was fed, remembered so a
/// returning caller can repopulate its forms and regenerate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInputs {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub days: Vec<String>,
    /// Raw slot labels as supplied, before break injection and sorting.
    #[serde(default)]
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub semesters: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl Default for SessionInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionInputs {
    /// Creates an empty input set stamped with the current time.
    pub fn new() -> Self {
        Self {
            teachers: Vec::new(),
            subjects: Vec::new(),
            classrooms: Vec::new(),
            days: Vec::new(),
            time_slots: Vec::new(),
            semesters: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: impl Into<Classroom>) -> Self {
        self.classrooms.push(classroom.into());
        self
    }

    /// Adds a day label.
    pub fn with_day(mut self, day: impl Into<String>) -> Self {
        self.days.push(day.into());
        self
    }

    /// Adds a raw time-slot label.
    pub fn with_time_slot(mut self, slot: impl Into<String>) -> Self {
        self.time_slots.push(slot.into());
        self
    }

    /// Adds a semester label.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semesters.push(semester.into());
        self
    }
}

/// Caller-supplied fields for an `add_entry` or `edit_entry` mutation.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub day: String,
    pub time_slot: String,
    pub subject: String,
    pub teacher: String,
    pub semester: String,
    pub classrooms: Vec<Classroom>,
    pub description: Option<String>,
}

impl EntryDraft {
    /// Creates a draft with no classrooms and no description.
    pub fn new(
        day: impl Into<String>,
        time_slot: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        semester: impl Into<String>,
    ) -> Self {
        Self {
            day: day.into(),
            time_slot: time_slot.into(),
            subject: subject.into(),
            teacher: teacher.into(),
            semester: semester.into(),
            classrooms: Vec::new(),
            description: None,
        }
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: impl Into<Classroom>) -> Self {
        self.classrooms.push(classroom.into());
        self
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn validate(&self) -> Result<(), EditError> {
        if self.subject.trim().is_empty() {
            return Err(EditError::MissingField("subject"));
        }
        if self.teacher.trim().is_empty() {
            return Err(EditError::MissingField("teacher"));
        }
        if self.semester.trim().is_empty() {
            return Err(EditError::MissingField("semester"));
        }
        if is_break_slot(&self.time_slot) {
            return Err(EditError::BreakSlot);
        }
        Ok(())
    }
}

/// A manual-edit failure. Every variant blocks the mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The target slot is the reserved break slot.
    BreakSlot,
    /// The entry index does not exist.
    InvalidIndex(usize),
    /// A required text field is empty.
    MissingField(&'static str),
    /// No classroom was supplied and none is configured to fall back on.
    NoClassroom,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BreakSlot => write!(f, "cannot place an entry on the break slot"),
            Self::InvalidIndex(index) => write!(f, "no entry at index {index}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::NoClassroom => write!(f, "no classroom supplied and none configured"),
        }
    }
}

impl std::error::Error for EditError {}

/// One timetable session: entries, conflicts, grid metadata, and the
/// inputs that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub entries: Vec<TimetableEntry>,
    pub conflicts: Vec<Conflict>,
    pub metadata: SessionMetadata,
    pub inputs: SessionInputs,
}

impl Session {
    /// Moves the entry at `index` to a new (day, slot) cell.
    ///
    /// The break slot is rejected. On success the whole entry list is
    /// re-scanned for conflicts.
    pub fn move_entry(
        &mut self,
        index: usize,
        day: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Result<(), EditError> {
        let time_slot = time_slot.into();
        if is_break_slot(&time_slot) {
            return Err(EditError::BreakSlot);
        }
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(EditError::InvalidIndex(index))?;
        entry.day = day.into();
        entry.time_slot = time_slot;
        self.rescan();
        Ok(())
    }

    /// Appends a new entry from the draft.
    ///
    /// Subject, teacher, and semester must be non-empty. An empty
    /// classroom list falls back to the first configured classroom and
    /// is rejected when none is configured.
    pub fn add_entry(&mut self, draft: EntryDraft) -> Result<(), EditError> {
        draft.validate()?;
        let classrooms = self.resolve_classrooms(draft.classrooms, &[])?;

        let department_codes = self.department_codes_for(&draft.subject);
        self.entries.push(TimetableEntry {
            day: draft.day,
            time_slot: draft.time_slot,
            subject: draft.subject,
            teacher: draft.teacher,
            semester: draft.semester,
            classrooms,
            department_codes,
            description: draft.description,
        });
        self.rescan();
        Ok(())
    }

    /// Overwrites the mutable fields of the entry at `index`.
    ///
    /// Same validation as [`add_entry`](Self::add_entry), except an
    /// empty classroom list keeps the entry's existing classrooms.
    pub fn edit_entry(&mut self, index: usize, draft: EntryDraft) -> Result<(), EditError> {
        if index >= self.entries.len() {
            return Err(EditError::InvalidIndex(index));
        }
        draft.validate()?;
        let existing = self.entries[index].classrooms.clone();
        let classrooms = self.resolve_classrooms(draft.classrooms, &existing)?;
        let department_codes = self.department_codes_for(&draft.subject);

        let entry = &mut self.entries[index];
        entry.day = draft.day;
        entry.time_slot = draft.time_slot;
        entry.subject = draft.subject;
        entry.teacher = draft.teacher;
        entry.semester = draft.semester;
        entry.classrooms = classrooms;
        entry.department_codes = department_codes;
        entry.description = draft.description;
        self.rescan();
        Ok(())
    }

    /// Removes the entry at `index`.
    pub fn delete_entry(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.entries.len() {
            return Err(EditError::InvalidIndex(index));
        }
        self.entries.remove(index);
        self.rescan();
        Ok(())
    }

    /// Picks the classroom list for a mutation: the draft's rooms if it
    /// supplied any, else the existing rooms, else the first configured
    /// classroom.
    fn resolve_classrooms(
        &self,
        supplied: Vec<Classroom>,
        existing: &[Classroom],
    ) -> Result<Vec<Classroom>, EditError> {
        let supplied: Vec<Classroom> = supplied
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        if !supplied.is_empty() {
            return Ok(supplied);
        }
        if !existing.is_empty() {
            return Ok(existing.to_vec());
        }
        match self.metadata.classrooms.first() {
            Some(fallback) => Ok(vec![fallback.clone()]),
            None => Err(EditError::NoClassroom),
        }
    }

    /// Department codes for a manually supplied subject name, taken
    /// from the remembered subject definitions when one matches.
    fn department_codes_for(&self, subject: &str) -> Vec<String> {
        let needle = subject.trim().to_lowercase();
        self.inputs
            .subjects
            .iter()
            .find(|s| s.name.trim().to_lowercase() == needle)
            .map(|s| s.department_codes())
            .unwrap_or_default()
    }

    fn rescan(&mut self) {
        self.conflicts = detect_conflicts(
            &self.entries,
            &self.metadata.days,
            &self.metadata.time_slots,
        );
    }
}

/// In-memory session store keyed by an opaque identifier.
///
/// The store defines only the session shape; storage and transport
/// beyond this map are the embedding service's concern. Access must be
/// serialized per session by the caller.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a full generation for `id`, replacing any existing session.
    ///
    /// Input validation fails fast: on duplicate teacher identities or
    /// duplicate slot labels nothing is generated and any existing
    /// session is left untouched.
    pub fn generate(
        &mut self,
        id: impl Into<String>,
        mut inputs: SessionInputs,
    ) -> Result<&Session, Vec<ValidationError>> {
        validate_input(&inputs.teachers, &inputs.time_slots)?;

        let id = id.into();
        let time_slots = prepare_time_slots(&inputs.time_slots);
        let generator = TimetableGenerator::new(
            inputs.teachers.clone(),
            inputs.subjects.clone(),
            inputs.classrooms.clone(),
            time_slots.clone(),
            inputs.days.clone(),
            inputs.semesters.clone(),
        );
        let result = generator.generate();
        info!(
            "session '{id}': generated {} entries, {} conflicts",
            result.entries.len(),
            result.conflicts.len()
        );

        inputs.last_updated = Utc::now();
        let session = Session {
            entries: result.entries,
            conflicts: result.conflicts,
            metadata: SessionMetadata {
                classrooms: inputs.classrooms.clone(),
                days: inputs.days.clone(),
                time_slots,
                semesters: inputs.semesters.clone(),
            },
            inputs,
        };
        let stored = match self.sessions.entry(id) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(session);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(session),
        };
        Ok(stored)
    }

    /// Looks up a session.
    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Looks up a session for mutation.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Discards a session.
    pub fn remove(&mut self, id: &str) -> Option<Session> {
        self.sessions.remove(id)
    }
}
