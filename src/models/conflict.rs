//! Conflict records.
//!
//! Everything the engine cannot satisfy is surfaced as a `Conflict`,
//! never as an error: double-booked teachers or classrooms, cohorts
//! facing two different subjects at once, and per-subject generation
//! shortfalls. The rendering layer consumes these as tagged JSON
//! objects (`"type": "teacher" | "classroom" | "student"`).

use serde::{Deserialize, Serialize};

/// A detected scheduling conflict or shortfall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Conflict {
    /// One teacher booked more than once at a (day, slot).
    Teacher {
        teacher: String,
        day: String,
        time_slot: String,
        /// Subjects involved, in entry order (duplicates preserved).
        subjects: Vec<String>,
    },
    /// One classroom booked more than once at a (day, slot).
    Classroom {
        classroom: String,
        day: String,
        time_slot: String,
        subjects: Vec<String>,
    },
    /// A cohort-level problem: either two different subjects at one
    /// (day, slot), or a generation shortfall — in the latter case
    /// `day`/`time_slot` are absent and the shortfall fields are set.
    Student {
        semester: String,
        day: Option<String>,
        time_slot: Option<String>,
        subjects: Vec<String>,
        #[serde(default)]
        missing_sessions: u32,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        suggestions: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        reasons: Vec<String>,
    },
}

impl Conflict {
    /// Creates a teacher double-booking conflict.
    pub fn teacher_clash(
        teacher: impl Into<String>,
        day: impl Into<String>,
        time_slot: impl Into<String>,
        subjects: Vec<String>,
    ) -> Self {
        Self::Teacher {
            teacher: teacher.into(),
            day: day.into(),
            time_slot: time_slot.into(),
            subjects,
        }
    }

    /// Creates a classroom double-booking conflict.
    pub fn classroom_clash(
        classroom: impl Into<String>,
        day: impl Into<String>,
        time_slot: impl Into<String>,
        subjects: Vec<String>,
    ) -> Self {
        Self::Classroom {
            classroom: classroom.into(),
            day: day.into(),
            time_slot: time_slot.into(),
            subjects,
        }
    }

    /// Creates a cohort clash: two different subjects at one cell.
    pub fn cohort_clash(
        semester: impl Into<String>,
        day: impl Into<String>,
        time_slot: impl Into<String>,
        subjects: Vec<String>,
    ) -> Self {
        Self::Student {
            semester: semester.into(),
            day: Some(day.into()),
            time_slot: Some(time_slot.into()),
            subjects,
            missing_sessions: 0,
            suggestions: Vec::new(),
            reasons: Vec::new(),
        }
    }

    /// Creates a generation shortfall for one subject.
    pub fn shortfall(
        semester: impl Into<String>,
        subject: impl Into<String>,
        missing_sessions: u32,
        suggestions: Vec<String>,
        reasons: Vec<String>,
    ) -> Self {
        Self::Student {
            semester: semester.into(),
            day: None,
            time_slot: None,
            subjects: vec![subject.into()],
            missing_sessions,
            suggestions,
            reasons,
        }
    }

    /// Whether this is a shortfall record (as opposed to a cell clash).
    pub fn is_shortfall(&self) -> bool {
        matches!(
            self,
            Self::Student {
                missing_sessions, ..
            } if *missing_sessions > 0
        )
    }
}
