// ABOUTME: Serializes the full in-memory graph into the relational schema.
// ABOUTME: Total-replace snapshot: clear every table, reinsert, one transaction.

use classtrack_core::{Course, User};
use rusqlite::{Connection, params};

use crate::StoreError;
use crate::schema;

/// Write the complete state as a single transaction. Every table is cleared
/// first; the previous snapshot does not survive in any form. Assignment
/// rows get fresh generated ids on every save, and grade rows are keyed by
/// that id. Submissions reference their assignment by title string, which
/// the reader resolves back by first exact match.
pub fn save(
    conn: &mut Connection,
    users: &[User],
    courses: &[Course],
    logs: &[String],
) -> Result<(), StoreError> {
    let tx = conn.transaction()?;

    for table in schema::TABLES {
        tx.execute(&format!("DELETE FROM {table}"), [])?;
    }

    for user in users {
        tx.execute(
            "INSERT INTO users (username, password, email, role) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.username(),
                user.export_password(),
                user.email(),
                user.role().as_str(),
            ],
        )?;

        for notification in &user.notifications {
            tx.execute(
                "INSERT INTO notifications (username, message) VALUES (?1, ?2)",
                params![user.username(), notification],
            )?;
        }

        for message in &user.inbox {
            tx.execute(
                "INSERT INTO messages (sender, recipient, subject, body, timestamp, is_read)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    message.sender,
                    user.username(),
                    message.subject,
                    message.body,
                    message.timestamp,
                    message.is_read as i64,
                ],
            )?;
        }
    }

    for course in courses {
        tx.execute(
            "INSERT INTO courses (cid, title, instructor_username) VALUES (?1, ?2, ?3)",
            params![course.cid, course.title, course.instructor],
        )?;

        for student in &course.students {
            tx.execute(
                "INSERT INTO enrollments (student_username, course_cid) VALUES (?1, ?2)",
                params![student, course.cid],
            )?;
        }

        for announcement in &course.announcements {
            tx.execute(
                "INSERT INTO announcements (course_cid, message) VALUES (?1, ?2)",
                params![course.cid, announcement],
            )?;
        }

        for assignment in &course.assignments {
            tx.execute(
                "INSERT INTO assignments (course_cid, title, description, deadline, max_marks)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    course.cid,
                    assignment.title,
                    assignment.description,
                    assignment.deadline,
                    assignment.max_marks,
                ],
            )?;
            let assignment_id = tx.last_insert_rowid();

            for (student, score) in assignment.export_grades() {
                tx.execute(
                    "INSERT INTO assignment_grades (assignment_id, student_username, score)
                     VALUES (?1, ?2, ?3)",
                    params![assignment_id, student, score],
                )?;
            }
        }

        for material in &course.materials {
            tx.execute(
                "INSERT INTO materials (course_cid, title, description, file_path)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    course.cid,
                    material.title,
                    material.description,
                    material.file_path,
                ],
            )?;
        }

        for submission in &course.submissions {
            tx.execute(
                "INSERT INTO submissions
                    (course_cid, assignment_title, student_username, content, date, is_graded)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    course.cid,
                    submission.assignment_title,
                    submission.student_username,
                    submission.content,
                    submission.date,
                    submission.is_graded as i64,
                ],
            )?;
        }
    }

    for log in logs {
        tx.execute("INSERT INTO logs (message) VALUES (?1)", params![log])?;
    }

    tx.commit()?;

    tracing::debug!(
        "saved full state snapshot: {} users, {} courses, {} log entries",
        users.len(),
        courses.len(),
        logs.len()
    );
    Ok(())
}
