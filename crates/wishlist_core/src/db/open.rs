//! Connection bootstrap for the wishlist store.
//!
//! # Responsibility
//! - Open a file or in-memory SQLite connection from `StoreConfig`.
//! - Apply connection pragmas required by the core.
//!
//! # Invariants
//! - Returned stores have `foreign_keys=ON`.
//! - Lock waits are bounded by `StoreConfig::busy_timeout`.
//! - Schema creation is not part of opening; callers run `ensure_schema`.

use super::store::Store;
use super::DbResult;
use crate::config::{StoreConfig, StoreLocation};
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Opens the store described by `config`.
///
/// # Side effects
/// - Creates the database file when it does not exist.
/// - Emits `db_open` events with duration and status.
pub fn open_store(config: &StoreConfig) -> DbResult<Store> {
    let started_at = Instant::now();
    let mode = config.mode_label();
    info!("event=db_open module=db status=start mode={mode}");

    let opened = match &config.location {
        StoreLocation::File(path) => Connection::open(path),
        StoreLocation::Memory => Connection::open_in_memory(),
    };
    let conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = configure_connection(&conn, config) {
        error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err);
    }

    info!(
        "event=db_open module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(Store::new(conn, config.clone()))
}

/// Opens a private in-memory store with default options.
pub fn open_store_in_memory() -> DbResult<Store> {
    open_store(&StoreConfig::in_memory())
}

fn configure_connection(conn: &Connection, config: &StoreConfig) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(config.busy_timeout())?;
    Ok(())
}
