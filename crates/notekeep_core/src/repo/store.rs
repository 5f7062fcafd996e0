//! SQLite store shared by the profile and note repositories.
//!
//! # Responsibility
//! - Hold the borrowed connection and open immediate write transactions.
//! - Verify the connection carries the schema both repositories need.
//! - Define the repository error type.

use crate::db::DbError;
use crate::model::note::NoteId;
use crate::model::profile::PrincipalId;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current time in epoch milliseconds, evaluated by SQLite.
pub(crate) const NOW_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000.0 AS INTEGER)";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "profiles",
        &[
            "profile_id",
            "principal_id",
            "nickname",
            "created_at",
            "updated_at",
            "deleted_at",
        ],
    ),
    (
        "notes",
        &[
            "note_id",
            "owner_profile_id",
            "title",
            "body",
            "created_at",
            "updated_at",
            "deleted_at",
        ],
    ),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for profile and note persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// No live profile for the principal or owner.
    ProfileNotFound,
    /// Note absent, tombstoned, or owned by another profile.
    NoteNotFound(NoteId),
    /// A live profile already exists for the principal.
    DuplicateProfile(PrincipalId),
    /// Requested values equal the stored ones; nothing was written.
    Unchanged,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
            Self::ProfileNotFound => write!(f, "profile not found"),
            Self::NoteNotFound(note_id) => write!(f, "note not found: {note_id}"),
            Self::DuplicateProfile(principal) => {
                write!(f, "profile already exists for principal {principal}")
            }
            Self::Unchanged => write!(f, "no changes to persist"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// SQLite-backed store implementing both `ProfileRepository` and
/// `NoteRepository` over one connection.
///
/// The store is a cheap borrow; both managers may hold a copy of it.
#[derive(Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    /// Begins `BEGIN IMMEDIATE`; dropping the handle without commit rolls back.
    pub(crate) fn write_tx(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

pub(crate) fn principal_to_db(principal: PrincipalId) -> RepoResult<i64> {
    i64::try_from(principal.get()).map_err(|_| {
        RepoError::InvalidData(format!(
            "principal id {principal} exceeds the storable range"
        ))
    })
}

pub(crate) fn principal_from_db(value: i64) -> RepoResult<PrincipalId> {
    u64::try_from(value)
        .map(PrincipalId::new)
        .map_err(|_| RepoError::InvalidData(format!("invalid principal id `{value}` in profiles")))
}

/// Only UNIQUE failures; CHECK, NOT NULL and trigger aborts stay store errors.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
