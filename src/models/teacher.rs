//! Teacher model and availability index.
//!
//! A teacher's `availability` maps day labels to the slot labels they
//! may teach in. An *empty* mapping means unrestricted — declaring no
//! availability opts the teacher in at every (day, slot). This matches
//! how the configuration layer treats an untouched availability form.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A teacher who can cover one or more subjects.
///
/// `name` is the unique identity, compared case-insensitively by the
/// calling layer's duplicate validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher name.
    pub name: String,
    /// Subjects this teacher can cover (matched case-insensitively).
    pub subjects: Vec<String>,
    /// Day label → permitted slot labels. Empty = available everywhere.
    #[serde(default)]
    pub availability: HashMap<String, Vec<String>>,
}

impl Teacher {
    /// Creates a teacher with no subjects and unrestricted availability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: Vec::new(),
            availability: HashMap::new(),
        }
    }

    /// Adds a subject this teacher can cover.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subjects.push(subject.into());
        self
    }

    /// Restricts availability on a day to the given slots.
    pub fn with_availability<S: Into<String>>(
        mut self,
        day: impl Into<String>,
        slots: Vec<S>,
    ) -> Self {
        self.availability
            .insert(day.into(), slots.into_iter().map(Into::into).collect());
        self
    }

    /// Whether this teacher covers `subject` (case-insensitive, trimmed).
    pub fn teaches(&self, subject: &str) -> bool {
        let key = subject.trim().to_lowercase();
        if key.is_empty() {
            return false;
        }
        self.subjects
            .iter()
            .any(|s| s.trim().to_lowercase() == key)
    }

    /// Whether this teacher may teach at (day, slot).
    ///
    /// Opt-out semantics: an empty availability mapping is `true`
    /// unconditionally. Otherwise the day must be declared and the slot
    /// listed under it.
    pub fn is_available(&self, day: &str, slot: &str) -> bool {
        if self.availability.is_empty() {
            return true;
        }
        self.availability
            .get(day)
            .map(|slots| slots.iter().any(|s| s == slot))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teaches_case_insensitive() {
        let t = Teacher::new("Ada").with_subject("Math").with_subject(" physics ");
        assert!(t.teaches("math"));
        assert!(t.teaches("MATH"));
        assert!(t.teaches("Physics"));
        assert!(!t.teaches("Chemistry"));
        assert!(!t.teaches(""));
        assert!(!t.teaches("   "));
    }

    #[test]
    fn test_empty_availability_means_any_time() {
        let t = Teacher::new("Ada").with_subject("Math");
        assert!(t.is_available("Monday", "9:00 AM - 10:00 AM"));
        assert!(t.is_available("Sunday", "whatever"));
    }

    #[test]
    fn test_restricted_availability() {
        let t = Teacher::new("Ada")
            .with_subject("Math")
            .with_availability("Monday", vec!["9:00 AM - 10:00 AM"]);

        assert!(t.is_available("Monday", "9:00 AM - 10:00 AM"));
        assert!(!t.is_available("Monday", "10:00 AM - 11:00 AM"));
        // Undeclared days are unavailable once any restriction exists
        assert!(!t.is_available("Tuesday", "9:00 AM - 10:00 AM"));
    }
}
