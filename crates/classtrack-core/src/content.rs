// ABOUTME: Course content types: lecture materials, assignments, submissions.
// ABOUTME: Assignment grades are a private sparse map with a Pending sentinel.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// A piece of lecture material. The file reference is an opaque string; the
/// system does not manage the file contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub title: String,
    pub description: String,
    pub file_path: String,
}

impl Material {
    pub fn new(title: &str, description: &str, file_path: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            file_path: file_path.to_string(),
        }
    }
}

/// A grade lookup result. Students without a recorded score get the Pending
/// sentinel rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Pending,
    Score(i64),
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Pending => write!(f, "Pending"),
            Grade::Score(n) => write!(f, "{n}"),
        }
    }
}

/// An assignment within a course, identified by title. The grade map is
/// sparse: only graded students appear in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub max_marks: i64,
    grades: BTreeMap<String, i64>,
}

impl Assignment {
    pub fn new(title: &str, description: &str, deadline: &str, max_marks: i64) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
            max_marks,
            grades: BTreeMap::new(),
        }
    }

    /// Record or overwrite a student's score.
    pub fn set_grade(&mut self, student_username: &str, score: i64) {
        self.grades.insert(student_username.to_string(), score);
    }

    /// Look up a student's grade, defaulting to Pending when absent.
    pub fn get_grade(&self, student_username: &str) -> Grade {
        match self.grades.get(student_username) {
            Some(score) => Grade::Score(*score),
            None => Grade::Pending,
        }
    }

    /// Persistence-only view of the grade map, for flattening into rows.
    /// Callers use get_grade/set_grade.
    pub fn export_grades(&self) -> impl Iterator<Item = (&str, i64)> {
        self.grades.iter().map(|(user, score)| (user.as_str(), *score))
    }
}

/// A student's submission for an assignment. The assignment link is the
/// title string, not a stable id; within a course the first assignment with
/// a matching title is the resolution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub student_username: String,
    pub assignment_title: String,
    pub content: String,
    pub date: String,
    pub is_graded: bool,
}

impl Submission {
    /// Create an ungraded submission stamped with the current local time.
    pub fn new(student_username: &str, assignment_title: &str, content: &str) -> Self {
        Self {
            student_username: student_username.to_string(),
            assignment_title: assignment_title.to_string(),
            content: content.to_string(),
            date: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            is_graded: false,
        }
    }

    /// Rehydrate a submission with its original date and graded flag.
    pub fn from_stored(
        student_username: String,
        assignment_title: String,
        content: String,
        date: String,
        is_graded: bool,
    ) -> Self {
        Self {
            student_username,
            assignment_title,
            content,
            date,
            is_graded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungraded_student_gets_pending_sentinel() {
        let mut hw = Assignment::new("HW1", "intro", "2026-09-01", 100);
        hw.set_grade("amy", 90);

        assert_eq!(hw.get_grade("amy"), Grade::Score(90));
        assert_eq!(hw.get_grade("amy2"), Grade::Pending);
    }

    #[test]
    fn set_grade_overwrites() {
        let mut hw = Assignment::new("HW1", "intro", "2026-09-01", 100);
        hw.set_grade("amy", 50);
        hw.set_grade("amy", 75);

        assert_eq!(hw.get_grade("amy"), Grade::Score(75));
        assert_eq!(hw.export_grades().count(), 1);
    }

    #[test]
    fn grade_display() {
        assert_eq!(Grade::Pending.to_string(), "Pending");
        assert_eq!(Grade::Score(42).to_string(), "42");
    }

    #[test]
    fn new_submission_starts_ungraded() {
        let sub = Submission::new("amy", "HW1", "my answer");
        assert!(!sub.is_graded);
        assert_eq!(sub.assignment_title, "HW1");
        assert!(!sub.date.is_empty());
    }
}
