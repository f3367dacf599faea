//! Subject model.
//!
//! A subject is one teachable unit for one cohort: it carries a weekly
//! session target, the departments that attend it (used only to derive
//! short display codes), and optionally a pinned teacher.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::DEFAULT_SEMESTER;

/// A subject to be placed on the timetable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Subject name (matched against teacher subject lists
    /// case-insensitively).
    pub name: String,
    /// Cohort id. Empty means the generic cohort.
    #[serde(default)]
    pub semester: String,
    /// Weekly session target. `None` means the default of 2.
    #[serde(default)]
    pub sessions_per_week: Option<u32>,
    /// Free-text department descriptors, e.g. `"CSE – Computer Science"`.
    #[serde(default)]
    pub departments: Vec<String>,
    /// Pins this subject to exactly one teacher name (exact match).
    #[serde(default)]
    pub teacher_id: Option<String>,
}

impl Subject {
    /// Creates a subject for the generic cohort with the default target.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            semester: String::new(),
            sessions_per_week: None,
            departments: Vec::new(),
            teacher_id: None,
        }
    }

    /// Sets the cohort (semester) id.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    /// Sets the weekly session target.
    pub fn with_sessions_per_week(mut self, sessions: u32) -> Self {
        self.sessions_per_week = Some(sessions);
        self
    }

    /// Adds a department descriptor.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.departments.push(department.into());
        self
    }

    /// Pins this subject to one teacher name.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher.into());
        self
    }

    /// The cohort this subject belongs to.
    pub fn cohort(&self) -> &str {
        if self.semester.is_empty() {
            DEFAULT_SEMESTER
        } else {
            &self.semester
        }
    }

    /// Weekly session target; a target is a goal, not a hard constraint.
    pub fn sessions_target(&self) -> u32 {
        self.sessions_per_week.unwrap_or(2)
    }

    /// Derives short department display codes.
    ///
    /// Each descriptor contributes the substring before its first
    /// dash-like separator (or its first whitespace token when no
    /// separator exists); blanks are dropped and the result is
    /// deduplicated preserving first occurrence.
    pub fn department_codes(&self) -> Vec<String> {
        self.departments
            .iter()
            .filter_map(|d| department_code(d))
            .unique()
            .collect()
    }
}

/// Extracts the display code from one department descriptor.
fn department_code(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for sep in ['–', '—', '-'] {
        if let Some((head, _)) = raw.split_once(sep) {
            let code = head.trim();
            if code.is_empty() {
                return None;
            }
            return Some(code.to_string());
        }
    }
    raw.split_whitespace().next().map(str::to_string)
}

/// Defensive parse of a weekly session target from raw form input.
///
/// Reads a leading unsigned integer; anything non-numeric (or empty)
/// yields the default of 2.
pub fn parse_sessions_per_week(raw: &str) -> u32 {
    let digits: String = raw.trim().chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(2)
}

/// Deterministic pastel display color for a subject name.
///
/// Rolling 31-multiplier hash over the name's code points, mapped to an
/// HSL hue. Consumed by the rendering layer; the engine itself never
/// reads colors.
pub fn subject_color(name: &str) -> String {
    let mut h: u32 = 0;
    for c in name.chars() {
        h = (h.wrapping_mul(31).wrapping_add(c as u32)) % 360;
    }
    format!("hsl({h},65%,85%)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohort_defaults_to_general() {
        let s = Subject::new("Math");
        assert_eq!(s.cohort(), "General");

        let s = Subject::new("Math").with_semester("Semester 1");
        assert_eq!(s.cohort(), "Semester 1");
    }

    #[test]
    fn test_sessions_target_default() {
        assert_eq!(Subject::new("Math").sessions_target(), 2);
        assert_eq!(
            Subject::new("Math").with_sessions_per_week(5).sessions_target(),
            5
        );
        // An explicit zero is honored: the subject is simply never placed
        assert_eq!(
            Subject::new("Math").with_sessions_per_week(0).sessions_target(),
            0
        );
    }

    #[test]
    fn test_parse_sessions_per_week() {
        assert_eq!(parse_sessions_per_week("3"), 3);
        assert_eq!(parse_sessions_per_week(" 4 "), 4);
        assert_eq!(parse_sessions_per_week("3x"), 3);
        assert_eq!(parse_sessions_per_week(""), 2);
        assert_eq!(parse_sessions_per_week("weekly"), 2);
    }

    #[test]
    fn test_department_codes() {
        let s = Subject::new("Math")
            .with_department("CSE – Computer Science")
            .with_department("EEE - Electrical")
            .with_department("Mechanical Engineering")
            .with_department("CSE – duplicated")
            .with_department("   ");
        assert_eq!(s.department_codes(), vec!["CSE", "EEE", "Mechanical"]);
    }

    #[test]
    fn test_subject_color_deterministic() {
        assert_eq!(subject_color("Math"), subject_color("Math"));
        let c = subject_color("Math");
        assert!(c.starts_with("hsl(") && c.ends_with(",65%,85%)"));
    }
}
