//! SQLite storage handle, bootstrap and schema management.
//!
//! # Responsibility
//! - Open and configure the single connection owned by the core.
//! - Create and verify the four wishlist tables.
//!
//! # Invariants
//! - Every returned store has `foreign_keys=ON` and a bounded busy timeout.
//! - Data access requires the store to be `Ready` (schema verified).

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;
mod store;

pub use open::{open_store, open_store_in_memory};
pub use schema::{
    ensure_schema, Constraint, SchemaReport, TableFailure, TableFailureReason, TABLES,
};
pub use store::{Store, StoreState};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The handle was closed; no further statements can run.
    StoreClosed,
    /// Data access attempted before `ensure_schema` verified all tables.
    SchemaNotReady,
    /// One or more tables could not be created or verified.
    Schema(SchemaError),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::StoreClosed => write!(f, "store is closed"),
            Self::SchemaNotReady => write!(f, "store schema has not been ensured"),
            Self::Schema(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::StoreClosed | Self::SchemaNotReady => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<SchemaError> for DbError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

/// Per-table failures collected by one `ensure_schema` pass.
#[derive(Debug)]
pub struct SchemaError {
    pub failures: Vec<TableFailure>,
}

impl SchemaError {
    /// Whether `table` is among the failed tables.
    pub fn failed(&self, table: &str) -> bool {
        self.failures.iter().any(|failure| failure.table == table)
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema setup failed for {} table(s):", self.failures.len())?;
        for failure in &self.failures {
            write!(f, " [{failure}]")?;
        }
        Ok(())
    }
}

impl Error for SchemaError {}
