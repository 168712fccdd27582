//! Wishlist schema declaration and creation.
//!
//! # Responsibility
//! - Declare the `users`, `products`, `wishlists` and `wishlist_items` tables.
//! - Create missing tables and verify the columns and constraints of
//!   existing ones.
//!
//! # Invariants
//! - Creation uses `IF NOT EXISTS`; repeated calls add no rows and no tables.
//! - With `SchemaPolicy::BestEffort` every table is attempted even after a
//!   failure; failures are collected and returned together.
//! - With `SchemaPolicy::Atomic` the first failure rolls back the whole pass.
//! - The store is marked `Ready` only when all four tables verify; a failed
//!   pass demotes a `Ready` store back to `Open`.

use super::store::Store;
use super::{DbError, DbResult, SchemaError};
use crate::config::SchemaPolicy;
use log::{info, warn};
use rusqlite::Connection;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Static description of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    create_sql: &'static str,
    columns: &'static [&'static str],
    constraints: &'static [Constraint],
}

/// Table constraint checked on every pass, since `IF NOT EXISTS` keeps an
/// older definition untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Primary key columns in key order.
    PrimaryKey(&'static [&'static str]),
    /// Unique index covering exactly this column.
    Unique(&'static str),
    /// `column REFERENCES parent (id) ON DELETE CASCADE`.
    CascadeFrom {
        column: &'static str,
        parent: &'static str,
    },
    /// CHECK clause, matched against the stored DDL ignoring whitespace and case.
    Check(&'static str),
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PrimaryKey(columns) => write!(f, "PRIMARY KEY ({})", columns.join(", ")),
            Self::Unique(column) => write!(f, "UNIQUE ({column})"),
            Self::CascadeFrom { column, parent } => {
                write!(f, "FOREIGN KEY ({column}) REFERENCES {parent} ON DELETE CASCADE")
            }
            Self::Check(clause) => write!(f, "CHECK ({clause})"),
        }
    }
}

/// Tables in creation order; parents precede children.
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "users",
        create_sql: "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        );",
        columns: &["id", "first_name", "last_name", "email"],
        constraints: &[Constraint::PrimaryKey(&["id"]), Constraint::Unique("email")],
    },
    TableDef {
        name: "products",
        create_sql: "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0)
        );",
        columns: &["id", "title", "description", "quantity"],
        constraints: &[
            Constraint::PrimaryKey(&["id"]),
            Constraint::Check("quantity >= 0"),
        ],
    },
    TableDef {
        name: "wishlists",
        create_sql: "CREATE TABLE IF NOT EXISTS wishlists (
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            creation_date INTEGER NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users (id) ON DELETE CASCADE
        );",
        columns: &["id", "owner_id", "title", "creation_date"],
        constraints: &[
            Constraint::PrimaryKey(&["id"]),
            Constraint::CascadeFrom {
                column: "owner_id",
                parent: "users",
            },
        ],
    },
    TableDef {
        name: "wishlist_items",
        create_sql: "CREATE TABLE IF NOT EXISTS wishlist_items (
            wishlist_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            list_order INTEGER NOT NULL,
            PRIMARY KEY (wishlist_id, product_id, list_order),
            FOREIGN KEY (wishlist_id) REFERENCES wishlists (id) ON DELETE CASCADE,
            FOREIGN KEY (product_id) REFERENCES products (id) ON DELETE CASCADE
        );",
        columns: &["wishlist_id", "product_id", "list_order"],
        constraints: &[
            Constraint::PrimaryKey(&["wishlist_id", "product_id", "list_order"]),
            Constraint::CascadeFrom {
                column: "wishlist_id",
                parent: "wishlists",
            },
            Constraint::CascadeFrom {
                column: "product_id",
                parent: "products",
            },
        ],
    },
];

/// Outcome of a successful `ensure_schema` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Tables that did not exist before this pass.
    pub created: Vec<&'static str>,
    /// Tables that already existed and verified.
    pub existing: Vec<&'static str>,
}

/// One table that could not be created or verified.
#[derive(Debug)]
pub struct TableFailure {
    pub table: &'static str,
    pub reason: TableFailureReason,
}

#[derive(Debug)]
pub enum TableFailureReason {
    Sqlite(rusqlite::Error),
    /// Table exists but lacks a required column.
    MissingColumn(&'static str),
    /// Table exists with the columns but without a required constraint.
    MissingConstraint(Constraint),
}

impl Display for TableFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.reason {
            TableFailureReason::Sqlite(err) => write!(f, "{}: {err}", self.table),
            TableFailureReason::MissingColumn(column) => {
                write!(f, "{}: missing column `{column}`", self.table)
            }
            TableFailureReason::MissingConstraint(constraint) => {
                write!(f, "{}: missing constraint `{constraint}`", self.table)
            }
        }
    }
}

/// Creates missing tables and enables foreign-key enforcement.
///
/// # Errors
/// - `DbError::StoreClosed` when the handle was closed.
/// - `DbError::Schema` listing every table that failed.
/// - `DbError::Sqlite` when the connection itself cannot be configured.
pub fn ensure_schema(store: &mut Store) -> DbResult<SchemaReport> {
    let started_at = Instant::now();
    let policy = store.config().schema_policy;
    let conn = store.connection_mut()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let outcome = match policy {
        SchemaPolicy::BestEffort => create_best_effort(conn),
        SchemaPolicy::Atomic => create_atomic(conn),
    };

    match outcome {
        Ok(report) => {
            store.mark_ready();
            info!(
                "event=schema_ensure module=db status=ok created={} existing={} duration_ms={}",
                report.created.len(),
                report.existing.len(),
                started_at.elapsed().as_millis()
            );
            Ok(report)
        }
        Err(err) => {
            store.mark_not_ready();
            warn!(
                "event=schema_ensure module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn create_best_effort(conn: &Connection) -> DbResult<SchemaReport> {
    let mut report = SchemaReport::default();
    let mut failures = Vec::new();

    for table in TABLES {
        match create_table(conn, table) {
            Ok(true) => report.created.push(table.name),
            Ok(false) => report.existing.push(table.name),
            Err(reason) => {
                let failure = TableFailure {
                    table: table.name,
                    reason,
                };
                warn!("event=table_create module=db status=error failure={failure}");
                failures.push(failure);
            }
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(DbError::Schema(SchemaError { failures }))
    }
}

fn create_atomic(conn: &mut Connection) -> DbResult<SchemaReport> {
    let mut report = SchemaReport::default();
    let tx = conn.transaction()?;

    for table in TABLES {
        match create_table(&tx, table) {
            Ok(true) => report.created.push(table.name),
            Ok(false) => report.existing.push(table.name),
            Err(reason) => {
                return Err(DbError::Schema(SchemaError {
                    failures: vec![TableFailure {
                        table: table.name,
                        reason,
                    }],
                }));
            }
        }
    }

    tx.commit()?;
    Ok(report)
}

/// Returns whether the table was newly created.
fn create_table(conn: &Connection, table: &TableDef) -> Result<bool, TableFailureReason> {
    let existed = table_exists(conn, table.name).map_err(TableFailureReason::Sqlite)?;
    conn.execute_batch(table.create_sql)
        .map_err(TableFailureReason::Sqlite)?;

    let present = table_columns(conn, table.name).map_err(TableFailureReason::Sqlite)?;
    if let Some(missing) = table
        .columns
        .iter()
        .find(|column| !present.iter().any(|name| name.as_str() == **column))
    {
        return Err(TableFailureReason::MissingColumn(*missing));
    }

    for constraint in table.constraints {
        let holds = constraint_holds(conn, table.name, constraint)
            .map_err(TableFailureReason::Sqlite)?;
        if !holds {
            return Err(TableFailureReason::MissingConstraint(*constraint));
        }
    }

    Ok(!existed)
}

fn constraint_holds(
    conn: &Connection,
    table: &str,
    constraint: &Constraint,
) -> rusqlite::Result<bool> {
    match constraint {
        Constraint::PrimaryKey(columns) => {
            let key = column_list(
                conn,
                "SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk;",
                table,
            )?;
            Ok(key.iter().map(String::as_str).eq(columns.iter().copied()))
        }
        Constraint::Unique(column) => {
            let indexes = column_list(
                conn,
                "SELECT name FROM pragma_index_list(?1) WHERE \"unique\" = 1 AND partial = 0;",
                table,
            )?;
            for index in indexes {
                let covered = column_list(
                    conn,
                    "SELECT name FROM pragma_index_info(?1) ORDER BY seqno;",
                    &index,
                )?;
                if covered.len() == 1 && covered[0] == *column {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Constraint::CascadeFrom { column, parent } => {
            let matching: i64 = conn.query_row(
                "SELECT COUNT(*)
                 FROM pragma_foreign_key_list(?1)
                 WHERE \"from\" = ?2
                   AND lower(\"table\") = ?3
                   AND on_delete = 'CASCADE';",
                [table, *column, *parent],
                |row| row.get(0),
            )?;
            Ok(matching > 0)
        }
        Constraint::Check(clause) => {
            let sql: String = conn.query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1;",
                [table],
                |row| row.get(0),
            )?;
            Ok(squash(&sql).contains(&format!("check({})", squash(clause))))
        }
    }
}

fn column_list(conn: &Connection, sql: &str, arg: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let names = stmt
        .query_map([arg], |row| row.get::<_, Option<String>>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.into_iter().flatten().collect())
}

/// Lowercases and drops whitespace so DDL formatting does not matter.
fn squash(sql: &str) -> String {
    sql.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
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

fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}
