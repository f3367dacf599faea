//! Placed timetable entry.

use serde::{Deserialize, Serialize};

use super::Classroom;

/// One placed session: a subject taught by a teacher to a cohort in one
/// or more classrooms at a (day, time-slot) cell.
///
/// `classrooms` is conceptually a set but historically a singleton —
/// generation always emits one room; manual edits may attach several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub day: String,
    pub time_slot: String,
    pub subject: String,
    pub teacher: String,
    pub semester: String,
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub department_codes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimetableEntry {
    /// Creates an entry with a single classroom and no department codes.
    pub fn new(
        day: impl Into<String>,
        time_slot: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
        semester: impl Into<String>,
        classroom: impl Into<Classroom>,
    ) -> Self {
        Self {
            day: day.into(),
            time_slot: time_slot.into(),
            subject: subject.into(),
            teacher: teacher.into(),
            semester: semester.into(),
            classrooms: vec![classroom.into()],
            department_codes: Vec::new(),
            description: None,
        }
    }

    /// Sets the derived department codes.
    pub fn with_department_codes(mut self, codes: Vec<String>) -> Self {
        self.department_codes = codes;
        self
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this entry occupies the given (day, slot) cell.
    pub fn is_at(&self, day: &str, slot: &str) -> bool {
        self.day == day && self.time_slot == slot
    }
}
