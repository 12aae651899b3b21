//! SQLite access.
//!
//! Every request opens its own connection through `Database::open`, which turns on
//! foreign keys and a busy timeout. The schema is owned by `migrations`.

pub mod migrations;

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Handle to the database file, shared with handlers as `web::Data<Database>`.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Opens the database and applies pending migrations. Returns the versions applied.
    pub fn initialize(&self) -> rusqlite::Result<Vec<i64>> {
        let mut conn = self.open()?;
        migrations::migrate(&mut conn)
    }
}

/// Current UTC time as stored in `*_at` columns.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Whether `table` has a column named `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|n| n == column))
}


/// Whether `err` is a UNIQUE/CHECK/FOREIGN KEY constraint failure.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
