//! Owned storage handle with an explicit lifecycle.
//!
//! # Invariants
//! - `Open <-> Ready`: a failed schema pass demotes a ready store.
//! - `Closed` is terminal.
//! - A closed store never hands out a connection again.

use super::{DbError, DbResult};
use crate::config::StoreConfig;
use log::{error, info};
use rusqlite::Connection;

/// Lifecycle position of a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Connection configured, schema not yet verified.
    Open,
    /// All four tables exist with the expected columns and constraints.
    Ready,
    /// Connection released.
    Closed,
}

/// The single connection to the wishlist database.
pub struct Store {
    conn: Option<Connection>,
    state: StoreState,
    config: StoreConfig,
}

impl Store {
    pub(crate) fn new(conn: Connection, config: StoreConfig) -> Self {
        Self {
            conn: Some(conn),
            state: StoreState::Open,
            config,
        }
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Raw connection regardless of schema readiness.
    pub fn connection(&self) -> DbResult<&Connection> {
        self.conn.as_ref().ok_or(DbError::StoreClosed)
    }

    pub fn connection_mut(&mut self) -> DbResult<&mut Connection> {
        self.conn.as_mut().ok_or(DbError::StoreClosed)
    }

    /// Connection for data access; requires a verified schema.
    pub fn ready_connection(&self) -> DbResult<&Connection> {
        self.ensure_ready()?;
        self.connection()
    }

    pub fn ready_connection_mut(&mut self) -> DbResult<&mut Connection> {
        self.ensure_ready()?;
        self.connection_mut()
    }

    pub(crate) fn mark_ready(&mut self) {
        if self.state == StoreState::Open {
            self.state = StoreState::Ready;
        }
    }

    pub(crate) fn mark_not_ready(&mut self) {
        if self.state == StoreState::Ready {
            self.state = StoreState::Open;
        }
    }

    /// Releases the connection. Closing twice is a no-op.
    ///
    /// On failure the connection is kept and the store stays usable.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                self.state = StoreState::Closed;
                info!(
                    "event=store_close module=db status=ok mode={}",
                    self.config.mode_label()
                );
                Ok(())
            }
            Err((conn, err)) => {
                error!(
                    "event=store_close module=db status=error mode={} error={}",
                    self.config.mode_label(),
                    err
                );
                self.conn = Some(conn);
                Err(err.into())
            }
        }
    }

    fn ensure_ready(&self) -> DbResult<()> {
        match self.state {
            StoreState::Ready => Ok(()),
            StoreState::Open => Err(DbError::SchemaNotReady),
            StoreState::Closed => Err(DbError::StoreClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreState;
    use crate::db::{ensure_schema, open_store_in_memory, DbError};

    #[test]
    fn data_access_requires_ready_state() {
        let mut store = open_store_in_memory().unwrap();
        assert_eq!(store.state(), StoreState::Open);
        assert!(matches!(
            store.ready_connection(),
            Err(DbError::SchemaNotReady)
        ));

        ensure_schema(&mut store).unwrap();
        assert_eq!(store.state(), StoreState::Ready);
        assert!(store.ready_connection().is_ok());
    }

    #[test]
    fn failed_schema_pass_demotes_a_ready_store() {
        let mut store = open_store_in_memory().unwrap();
        ensure_schema(&mut store).unwrap();

        store
            .connection()
            .unwrap()
            .execute_batch(
                "DROP TABLE wishlist_items;
                 CREATE TABLE wishlist_items (wishlist_id INTEGER, product_id INTEGER);",
            )
            .unwrap();

        assert!(matches!(
            ensure_schema(&mut store),
            Err(DbError::Schema(ref schema)) if schema.failed("wishlist_items")
        ));
        assert_eq!(store.state(), StoreState::Open);
        assert!(matches!(
            store.ready_connection(),
            Err(DbError::SchemaNotReady)
        ));
    }

    #[test]
    fn closed_store_rejects_all_access_and_close_is_repeatable() {
        let mut store = open_store_in_memory().unwrap();
        ensure_schema(&mut store).unwrap();

        store.close().unwrap();
        store.close().unwrap();

        assert_eq!(store.state(), StoreState::Closed);
        assert!(matches!(store.connection(), Err(DbError::StoreClosed)));
        assert!(matches!(
            store.ready_connection_mut(),
            Err(DbError::StoreClosed)
        ));
    }
}
