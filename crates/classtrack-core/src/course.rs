// ABOUTME: The Course aggregate: roster, materials, assignments, submissions.
// ABOUTME: Holds students and the instructor by username; no live user aliases.

use serde::{Deserialize, Serialize};

use crate::content::{Assignment, Material, Submission};

/// A course, identified by its cid. Owns its content sequences; the
/// instructor and enrolled students are referenced by username and resolved
/// through the caller's user index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub cid: String,
    pub title: String,
    pub instructor: String,
    pub students: Vec<String>,
    pub materials: Vec<Material>,
    pub assignments: Vec<Assignment>,
    pub submissions: Vec<Submission>,
    pub announcements: Vec<String>,
}

impl Course {
    pub fn new(cid: &str, title: &str, instructor_username: &str) -> Self {
        Self {
            cid: cid.to_string(),
            title: title.to_string(),
            instructor: instructor_username.to_string(),
            students: Vec::new(),
            materials: Vec::new(),
            assignments: Vec::new(),
            submissions: Vec::new(),
            announcements: Vec::new(),
        }
    }

    /// Enroll a student by username. No-op if already enrolled.
    pub fn add_student(&mut self, username: &str) {
        if !self.students.iter().any(|s| s == username) {
            self.students.push(username.to_string());
        }
    }

    /// Whether the student has a submission for the given assignment title.
    /// Linear scan over the submission sequence.
    pub fn has_submitted(&self, student_username: &str, assignment_title: &str) -> bool {
        self.submissions.iter().any(|s| {
            s.student_username == student_username && s.assignment_title == assignment_title
        })
    }

    /// Resolve an assignment by exact title. When two assignments share a
    /// title the first one wins; submissions stored against that title all
    /// resolve to it.
    pub fn assignment_by_title(&self, title: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.title == title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_student_is_idempotent() {
        let mut course = Course::new("C100", "Intro", "bob");
        course.add_student("amy");
        course.add_student("amy");
        course.add_student("zed");

        assert_eq!(course.students, ["amy", "zed"]);
    }

    #[test]
    fn has_submitted_matches_both_keys() {
        let mut course = Course::new("C100", "Intro", "bob");
        course
            .submissions
            .push(Submission::new("amy", "HW1", "answer"));

        assert!(course.has_submitted("amy", "HW1"));
        assert!(!course.has_submitted("amy", "HW2"));
        assert!(!course.has_submitted("zed", "HW1"));
    }

    #[test]
    fn duplicate_assignment_titles_resolve_to_first() {
        let mut course = Course::new("C100", "Intro", "bob");
        course
            .assignments
            .push(Assignment::new("HW1", "first", "2026-09-01", 100));
        course
            .assignments
            .push(Assignment::new("HW1", "second", "2026-09-08", 50));

        let resolved = course.assignment_by_title("HW1").unwrap();
        assert_eq!(resolved.description, "first");
        assert_eq!(resolved.max_marks, 100);

        assert!(course.assignment_by_title("HW9").is_none());
    }
}
