// ABOUTME: Rebuilds the in-memory graph from stored rows, resolving references.
// ABOUTME: Fatal on structural corruption; unresolvable single rows are skipped.

use std::collections::HashMap;

use classtrack_core::{Course, PrivateMessage, Role, Submission, User};
use classtrack_core::content::{Assignment, Material};
use rusqlite::{Connection, params};

use crate::StoreError;
use crate::schema;

/// A reference-resolution gap the caller must be told about. The affected
/// course is still returned; only the broken link is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A course row whose instructor username is absent from the users
    /// table or names a non-instructor. The course is loaded as a skeleton
    /// without the instructor back-reference.
    DanglingInstructor { cid: String, username: String },
}

/// The fully reconstructed state plus any resolution warnings. Ordering of
/// users, courses, and every owned sequence follows storage order.
#[derive(Debug)]
pub struct LoadOutcome {
    pub users: Vec<User>,
    pub courses: Vec<Course>,
    pub logs: Vec<String>,
    pub warnings: Vec<LoadWarning>,
}

/// Rebuild the full graph. Users come first so that courses, enrollments,
/// and submissions can resolve usernames through the index; assignments are
/// attached before submissions so title resolution sees them. Unresolvable
/// enrollment and submission rows are dropped one at a time with a warn log;
/// a missing table or unknown role tag aborts the whole load.
pub fn load(conn: &Connection) -> Result<LoadOutcome, StoreError> {
    schema::verify_tables(conn)?;

    let mut warnings = Vec::new();

    // Users, in insertion order, indexed by username for reference
    // resolution. An unknown role tag means the schema and this build
    // disagree about the data; nothing sensible can be instantiated.
    let user_rows = {
        let mut stmt =
            conn.prepare("SELECT username, password, email, role FROM users ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        let mut collected = Vec::new();
        for row in rows {
            collected.push(row?);
        }
        collected
    };

    let mut order: Vec<String> = Vec::with_capacity(user_rows.len());
    let mut users: HashMap<String, User> = HashMap::with_capacity(user_rows.len());

    for (username, password, email, tag) in user_rows {
        let role = Role::from_tag(&tag).ok_or_else(|| {
            StoreError::SchemaInconsistent(format!(
                "unknown role tag {tag:?} for user {username:?}"
            ))
        })?;
        let mut user = User::new(username.clone(), password, email, role);

        let mut stmt =
            conn.prepare("SELECT message FROM notifications WHERE username = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![username], |row| row.get::<_, String>(0))?;
        for row in rows {
            user.notifications.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT sender, subject, body, timestamp, is_read
             FROM messages WHERE recipient = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![username], |row| {
            Ok(PrivateMessage::from_stored(
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get::<_, i64>(4)? != 0,
            ))
        })?;
        for row in rows {
            user.inbox.push(row?);
        }

        order.push(username.clone());
        users.insert(username, user);
    }

    // Courses, with the instructor back-reference established through the
    // index. A dangling instructor still yields the course; the gap is
    // surfaced to the caller rather than fabricating an instructor.
    let course_rows = {
        let mut stmt =
            conn.prepare("SELECT cid, title, instructor_username FROM courses ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut collected = Vec::new();
        for row in rows {
            collected.push(row?);
        }
        collected
    };

    let mut courses = Vec::with_capacity(course_rows.len());

    for (cid, title, instructor_username) in course_rows {
        let mut course = Course::new(&cid, &title, &instructor_username);

        match users.get_mut(&instructor_username) {
            Some(user) if user.role() == Role::Instructor => {
                user.record_assigned_course(&cid);
            }
            _ => {
                tracing::warn!(
                    "course {} has dangling instructor {:?}",
                    cid,
                    instructor_username
                );
                warnings.push(LoadWarning::DanglingInstructor {
                    cid: cid.clone(),
                    username: instructor_username.clone(),
                });
            }
        }

        // Enrollments: each row resolves independently. A row naming an
        // unknown user or a non-student is dropped; the rest of the course
        // loads normally.
        let enrollment_rows = {
            let mut stmt = conn.prepare(
                "SELECT student_username FROM enrollments WHERE course_cid = ?1 ORDER BY rowid",
            )?;
            let rows = stmt.query_map(params![cid], |row| row.get::<_, String>(0))?;
            let mut collected = Vec::new();
            for row in rows {
                collected.push(row?);
            }
            collected
        };

        for student_username in enrollment_rows {
            match users.get_mut(&student_username) {
                Some(user) if user.role() == Role::Student => {
                    course.add_student(&student_username);
                    user.record_enrolled_course(&cid);
                }
                _ => {
                    tracing::warn!(
                        "skipping enrollment of {:?} in course {}: not a known student",
                        student_username,
                        cid
                    );
                }
            }
        }

        let mut stmt = conn.prepare(
            "SELECT message FROM announcements WHERE course_cid = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![cid], |row| row.get::<_, String>(0))?;
        for row in rows {
            course.announcements.push(row?);
        }

        let mut stmt = conn.prepare(
            "SELECT title, description, file_path FROM materials WHERE course_cid = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![cid], |row| {
            Ok(Material {
                title: row.get(0)?,
                description: row.get(1)?,
                file_path: row.get(2)?,
            })
        })?;
        for row in rows {
            course.materials.push(row?);
        }

        // Assignments and their grade maps. Grade rows are keyed by the
        // generated assignment id, which only exists between one save and
        // the next.
        let assignment_rows = {
            let mut stmt = conn.prepare(
                "SELECT id, title, description, deadline, max_marks
                 FROM assignments WHERE course_cid = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![cid], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?;
            let mut collected = Vec::new();
            for row in rows {
                collected.push(row?);
            }
            collected
        };

        for (assignment_id, title, description, deadline, max_marks) in assignment_rows {
            let mut assignment = Assignment::new(&title, &description, &deadline, max_marks);

            let mut stmt = conn.prepare(
                "SELECT student_username, score FROM assignment_grades WHERE assignment_id = ?1",
            )?;
            let rows = stmt.query_map(params![assignment_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (student, score) = row?;
                assignment.set_grade(&student, score);
            }

            course.assignments.push(assignment);
        }

        // Submissions resolve the student through the index and the
        // assignment by first exact title match among the assignments
        // attached above. Either failure drops the single row.
        let submission_rows = {
            let mut stmt = conn.prepare(
                "SELECT assignment_title, student_username, content, date, is_graded
                 FROM submissions WHERE course_cid = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![cid], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)? != 0,
                ))
            })?;
            let mut collected = Vec::new();
            for row in rows {
                collected.push(row?);
            }
            collected
        };

        for (assignment_title, student_username, content, date, is_graded) in submission_rows {
            if !users.contains_key(&student_username) {
                tracing::warn!(
                    "skipping submission in course {}: unknown student {:?}",
                    cid,
                    student_username
                );
                continue;
            }
            if course.assignment_by_title(&assignment_title).is_none() {
                tracing::warn!(
                    "skipping submission in course {}: no assignment titled {:?}",
                    cid,
                    assignment_title
                );
                continue;
            }
            course.submissions.push(Submission::from_stored(
                student_username,
                assignment_title,
                content,
                date,
                is_graded,
            ));
        }

        courses.push(course);
    }

    let mut logs = Vec::new();
    {
        let mut stmt = conn.prepare("SELECT message FROM logs ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        for row in rows {
            logs.push(row?);
        }
    }

    let users = order
        .into_iter()
        .filter_map(|username| users.remove(&username))
        .collect();

    Ok(LoadOutcome {
        users,
        courses,
        logs,
        warnings,
    })
}
