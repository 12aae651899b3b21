//! Ordered, versioned schema migrations.
//!
//! Applied versions are recorded in `schema_migrations`. `migrate` applies every
//! pending migration in ascending order, each inside its own transaction, so running
//! it twice is a no-op. `rollback_to` runs the `down` scripts in descending order.

use log::info;
use rusqlite::{params, Connection, OptionalExtension};

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_reference_tables",
        up: "
            CREATE TABLE colleges(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                code TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            );
            CREATE TABLE academic_years(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year_label TEXT NOT NULL UNIQUE,
                start_year INTEGER NOT NULL,
                end_year INTEGER NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            );
            CREATE TABLE courses(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                code TEXT,
                college_id INTEGER REFERENCES colleges(id),
                level TEXT,
                total_years INTEGER NOT NULL DEFAULT 0,
                semesters_per_year INTEGER NOT NULL DEFAULT 2,
                year_semester_config TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            );
            CREATE TABLE course_branches(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                course_id INTEGER NOT NULL REFERENCES courses(id),
                name TEXT NOT NULL,
                code TEXT,
                academic_year_id INTEGER REFERENCES academic_years(id),
                is_active INTEGER NOT NULL DEFAULT 1
            );
            CREATE UNIQUE INDEX idx_course_branches_unique
                ON course_branches(course_id, name, COALESCE(academic_year_id, 0));
        ",
        down: "
            DROP INDEX IF EXISTS idx_course_branches_unique;
            DROP TABLE IF EXISTS course_branches;
            DROP TABLE IF EXISTS courses;
            DROP TABLE IF EXISTS academic_years;
            DROP TABLE IF EXISTS colleges;
        ",
    },
    Migration {
        version: 2,
        name: "create_students",
        up: "
            CREATE TABLE students(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                admission_number TEXT NOT NULL UNIQUE,
                student_name TEXT NOT NULL,
                father_name TEXT,
                gender TEXT,
                dob TEXT,
                adhar_no TEXT,
                caste TEXT,
                student_mobile TEXT,
                parent_mobile1 TEXT,
                parent_mobile2 TEXT,
                email TEXT,
                student_address TEXT,
                city_village TEXT,
                mandal_name TEXT,
                district TEXT,
                college TEXT,
                course TEXT,
                branch TEXT,
                batch TEXT,
                current_year INTEGER,
                current_semester INTEGER,
                fee_status TEXT,
                registration_status TEXT,
                scholar_status TEXT,
                certificates_status TEXT,
                student_status TEXT NOT NULL DEFAULT 'Regular',
                student_photo TEXT,
                remarks TEXT,
                extra TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX idx_students_course_batch ON students(course, batch);
            CREATE INDEX idx_students_status ON students(student_status);
            CREATE TABLE student_credentials(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id INTEGER NOT NULL UNIQUE REFERENCES students(id),
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
        ",
        down: "
            DROP TABLE IF EXISTS student_credentials;
            DROP INDEX IF EXISTS idx_students_status;
            DROP INDEX IF EXISTS idx_students_course_batch;
            DROP TABLE IF EXISTS students;
        ",
    },
    Migration {
        version: 3,
        name: "create_forms_and_submissions",
        up: "
            CREATE TABLE forms(
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                fields TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE submissions(
                id TEXT PRIMARY KEY,
                form_id TEXT NOT NULL REFERENCES forms(id),
                data TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                certificates_status TEXT NOT NULL,
                student_id INTEGER REFERENCES students(id),
                review_note TEXT,
                created_at TEXT NOT NULL,
                reviewed_at TEXT
            );
            CREATE INDEX idx_submissions_status ON submissions(status);
            CREATE TABLE submission_documents(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                submission_id TEXT NOT NULL REFERENCES submissions(id),
                name TEXT NOT NULL,
                original_filename TEXT NOT NULL,
                stored_path TEXT NOT NULL,
                size_bytes INTEGER NOT NULL
            );
            CREATE INDEX idx_submission_documents_submission
                ON submission_documents(submission_id);
        ",
        down: "
            DROP INDEX IF EXISTS idx_submission_documents_submission;
            DROP TABLE IF EXISTS submission_documents;
            DROP INDEX IF EXISTS idx_submissions_status;
            DROP TABLE IF EXISTS submissions;
            DROP TABLE IF EXISTS forms;
        ",
    },
    Migration {
        version: 4,
        name: "create_document_requirements",
        up: "
            CREATE TABLE document_requirements(
                course_type TEXT NOT NULL,
                academic_stage TEXT NOT NULL,
                documents TEXT NOT NULL,
                PRIMARY KEY(course_type, academic_stage)
            );
        ",
        down: "DROP TABLE IF EXISTS document_requirements;",
    },
    Migration {
        version: 5,
        name: "create_attendance",
        up: "
            CREATE TABLE attendance(
                student_id INTEGER NOT NULL REFERENCES students(id),
                date TEXT NOT NULL,
                status TEXT NOT NULL,
                marked_at TEXT NOT NULL,
                PRIMARY KEY(student_id, date)
            );
        ",
        down: "DROP TABLE IF EXISTS attendance;",
    },
    Migration {
        version: 6,
        name: "add_students_mobile_verified",
        up: "ALTER TABLE students ADD COLUMN mobile_verified INTEGER NOT NULL DEFAULT 0;",
        down: "ALTER TABLE students DROP COLUMN mobile_verified;",
    },
];

fn ensure_migrations_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations(
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        );",
    )
}

/// Highest applied version, `0` for an empty database.
pub fn current_version(conn: &Connection) -> rusqlite::Result<i64> {
    ensure_migrations_table(conn)?;
    let version: Option<i64> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| row.get(0))
        .optional()?
        .flatten();
    Ok(version.unwrap_or(0))
}

/// Applies every pending migration. Returns the versions applied by this call.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<Vec<i64>> {
    let current = current_version(conn)?;
    let mut applied = Vec::new();

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.up)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
            params![migration.version, migration.name, super::now()],
        )?;
        tx.commit()?;
        info!("Applied migration {} ({})", migration.version, migration.name);
        applied.push(migration.version);
    }
    Ok(applied)
}

/// Reverts applied migrations newer than `target`, newest first.
pub fn rollback_to(conn: &mut Connection, target: i64) -> rusqlite::Result<Vec<i64>> {
    let current = current_version(conn)?;
    let mut reverted = Vec::new();

    for migration in MIGRATIONS
        .iter()
        .rev()
        .filter(|m| m.version > target && m.version <= current)
    {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.down)?;
        tx.execute(
            "DELETE FROM schema_migrations WHERE version = ?1",
            params![migration.version],
        )?;
        tx.commit()?;
        info!("Reverted migration {} ({})", migration.version, migration.name);
        reverted.push(migration.version);
    }
    Ok(reverted)
}
