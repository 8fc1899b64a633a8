//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the book store.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Book rows must not be read or written before migrations succeed.
//! - The `books` table enforces `isbn UNIQUE` and
//!   `publication_year >= 1000` on every write path, not only through
//!   request validation.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Book store SQLite failure.
#[derive(Debug)]
pub enum DbError {
    /// Any SQLite error, including `books` constraint rejections.
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer Bookstan build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) if self.is_constraint_violation() => {
                write!(f, "book store constraint violated: {err}")
            }
            Self::Sqlite(err) => write!(f, "book store sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "book store schema version {db_version} requires a newer build (this build supports up to {latest_supported})"
            ),
        }
    }
}

impl DbError {
    /// True when SQLite rejected a write on a table constraint
    /// (duplicate isbn, out-of-range publication year, NOT NULL).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
