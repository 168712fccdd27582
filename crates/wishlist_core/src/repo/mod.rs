//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL for each table behind a small trait.
//! - Translate SQLite failures into semantic errors (constraint kinds,
//!   transaction failures) callers can act on.
//!
//! # Invariants
//! - Repositories borrow a connection (or an open transaction through deref);
//!   they never begin or commit transactions themselves.
//! - Absent rows on reads are `None`, not errors.

use crate::db::DbError;
use rusqlite::{ffi, Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod product_repo;
pub mod user_repo;
pub mod wishlist_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Which constraint rejected a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    PrimaryKey,
    Check,
    NotNull,
    Other,
}

impl ConstraintKind {
    fn from_extended_code(code: i32) -> Self {
        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE => Self::Unique,
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Self::ForeignKey,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Self::PrimaryKey,
            ffi::SQLITE_CONSTRAINT_CHECK => Self::Check,
            ffi::SQLITE_CONSTRAINT_NOTNULL => Self::NotNull,
            _ => Self::Other,
        }
    }
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unique => "unique",
            Self::ForeignKey => "foreign_key",
            Self::PrimaryKey => "primary_key",
            Self::Check => "check",
            Self::NotNull => "not_null",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub enum RepoError {
    /// Store lifecycle or transport failure.
    Db(DbError),
    /// A unique, foreign-key or other constraint rejected the statement.
    ConstraintViolation {
        kind: ConstraintKind,
        message: String,
    },
    /// A transaction could not begin or commit, including busy timeouts.
    Transaction(rusqlite::Error),
    /// Delete target does not exist.
    NotFound { table: &'static str, id: i64 },
    /// Persisted row cannot be converted into a model.
    InvalidData(String),
}

impl RepoError {
    pub fn is_constraint(&self, expected: ConstraintKind) -> bool {
        matches!(self, Self::ConstraintViolation { kind, .. } if *kind == expected)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::ConstraintViolation { kind, message } => {
                write!(f, "{kind} constraint violation: {message}")
            }
            Self::Transaction(err) => write!(f, "transaction failed: {err}"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Transaction(err) => Some(err),
            Self::ConstraintViolation { .. } | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        let failure = match &value {
            rusqlite::Error::SqliteFailure(err, _) => Some(*err),
            _ => None,
        };

        match failure {
            Some(err) if err.code == ffi::ErrorCode::ConstraintViolation => {
                Self::ConstraintViolation {
                    kind: ConstraintKind::from_extended_code(err.extended_code),
                    message: value.to_string(),
                }
            }
            Some(err)
                if matches!(
                    err.code,
                    ffi::ErrorCode::DatabaseBusy | ffi::ErrorCode::DatabaseLocked
                ) =>
            {
                Self::Transaction(value)
            }
            _ => Self::Db(DbError::Sqlite(value)),
        }
    }
}

/// Begins a transaction; failure to acquire it is a `Transaction` error.
pub(crate) fn begin(
    conn: &mut Connection,
    behavior: TransactionBehavior,
) -> RepoResult<Transaction<'_>> {
    conn.transaction_with_behavior(behavior)
        .map_err(RepoError::Transaction)
}

pub(crate) fn commit(tx: Transaction<'_>) -> RepoResult<()> {
    tx.commit().map_err(RepoError::Transaction)
}

#[cfg(test)]
mod tests {
    use super::{ConstraintKind, RepoError};
    use crate::db::DbError;
    use rusqlite::ffi;

    fn sqlite_failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), Some("boom".to_string()))
    }

    #[test]
    fn unique_failures_map_to_constraint_violation() {
        let err = RepoError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT_UNIQUE));
        assert!(err.is_constraint(ConstraintKind::Unique));
        assert!(err.to_string().starts_with("unique constraint violation"));
    }

    #[test]
    fn foreign_key_failures_keep_their_kind() {
        let err = RepoError::from(sqlite_failure(ffi::SQLITE_CONSTRAINT_FOREIGNKEY));
        assert!(err.is_constraint(ConstraintKind::ForeignKey));
    }

    #[test]
    fn busy_failures_map_to_transaction_errors() {
        let err = RepoError::from(sqlite_failure(ffi::SQLITE_BUSY));
        assert!(matches!(err, RepoError::Transaction(_)));
    }

    #[test]
    fn lifecycle_errors_pass_through() {
        let err = RepoError::from(DbError::StoreClosed);
        assert!(matches!(err, RepoError::Db(DbError::StoreClosed)));
    }
}
