// ABOUTME: Idempotent creation of the normalized relational schema.
// ABOUTME: Also verifies table presence before a load touches any rows.

use rusqlite::Connection;

use crate::StoreError;

/// Every persisted table, children before parents so the writer can clear
/// them in declaration order.
pub(crate) const TABLES: [&str; 11] = [
    "assignment_grades",
    "enrollments",
    "submissions",
    "materials",
    "announcements",
    "assignments",
    "messages",
    "notifications",
    "courses",
    "users",
    "logs",
];

/// Create all tables if they do not exist. Existing rows are never touched.
/// Foreign keys are declared for documentation; there is no cascading
/// delete, so removing a user or course row by hand leaves dependents
/// orphaned. The load path tolerates that (see reader).
pub fn create_tables(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY,
            password TEXT,
            email TEXT,
            role TEXT
        );

        CREATE TABLE IF NOT EXISTS courses (
            cid TEXT PRIMARY KEY,
            title TEXT,
            instructor_username TEXT,
            FOREIGN KEY (instructor_username) REFERENCES users(username)
        );

        CREATE TABLE IF NOT EXISTS enrollments (
            student_username TEXT,
            course_cid TEXT,
            FOREIGN KEY (student_username) REFERENCES users(username),
            FOREIGN KEY (course_cid) REFERENCES courses(cid)
        );

        CREATE TABLE IF NOT EXISTS assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_cid TEXT,
            title TEXT,
            description TEXT,
            deadline TEXT,
            max_marks INTEGER,
            FOREIGN KEY (course_cid) REFERENCES courses(cid)
        );

        CREATE TABLE IF NOT EXISTS assignment_grades (
            assignment_id INTEGER,
            student_username TEXT,
            score INTEGER,
            FOREIGN KEY (assignment_id) REFERENCES assignments(id),
            FOREIGN KEY (student_username) REFERENCES users(username)
        );

        CREATE TABLE IF NOT EXISTS materials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_cid TEXT,
            title TEXT,
            description TEXT,
            file_path TEXT,
            FOREIGN KEY (course_cid) REFERENCES courses(cid)
        );

        CREATE TABLE IF NOT EXISTS submissions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_cid TEXT,
            assignment_title TEXT,
            student_username TEXT,
            content TEXT,
            date TEXT,
            is_graded INTEGER,
            FOREIGN KEY (course_cid) REFERENCES courses(cid),
            FOREIGN KEY (student_username) REFERENCES users(username)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sender TEXT,
            recipient TEXT,
            subject TEXT,
            body TEXT,
            timestamp TEXT,
            is_read INTEGER,
            FOREIGN KEY (recipient) REFERENCES users(username)
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT,
            message TEXT,
            FOREIGN KEY (username) REFERENCES users(username)
        );

        CREATE TABLE IF NOT EXISTS announcements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            course_cid TEXT,
            message TEXT,
            FOREIGN KEY (course_cid) REFERENCES courses(cid)
        );

        CREATE TABLE IF NOT EXISTS logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            message TEXT
        );",
    )?;
    Ok(())
}

/// Fail with SchemaInconsistent if any expected table is missing. Run before
/// a load so structural corruption surfaces as one clear error instead of a
/// mid-read query failure.
pub(crate) fn verify_tables(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut present = Vec::new();
    for row in rows {
        present.push(row?);
    }

    for table in TABLES {
        if !present.iter().any(|name| name == table) {
            return Err(StoreError::SchemaInconsistent(format!(
                "missing table {table:?}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;
    use tempfile::TempDir;

    #[test]
    fn create_tables_twice_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let conn = Connection::open(dir.path().join("classtrack.db")).unwrap();

        create_tables(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (username, password, email, role) VALUES (?1, ?2, ?3, ?4)",
            params!["bob", "secret1", "bob@gmail.com", "Instructor"],
        )
        .unwrap();

        create_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn verify_tables_passes_on_fresh_schema() {
        let dir = TempDir::new().unwrap();
        let conn = Connection::open(dir.path().join("classtrack.db")).unwrap();
        create_tables(&conn).unwrap();

        verify_tables(&conn).unwrap();
    }

    #[test]
    fn verify_tables_reports_missing_table() {
        let dir = TempDir::new().unwrap();
        let conn = Connection::open(dir.path().join("classtrack.db")).unwrap();
        create_tables(&conn).unwrap();
        conn.execute_batch("DROP TABLE submissions;").unwrap();

        let err = verify_tables(&conn).unwrap_err();
        match err {
            crate::StoreError::SchemaInconsistent(msg) => {
                assert!(msg.contains("submissions"));
            }
            other => panic!("expected SchemaInconsistent, got {other:?}"),
        }
    }
}
