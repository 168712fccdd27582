//! Wishlist and wishlist-item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist wishlists and their product membership rows.
//! - Resolve the active wishlist (highest `id`).
//!
//! # Invariants
//! - Membership is a set relation on `(wishlist_id, product_id)`:
//!   `add_item_if_absent` never inserts a second row for a present pair and
//!   `remove_items` deletes every row of a pair regardless of `list_order`.
//! - Items are returned in insertion (rowid) order.

use super::{RepoError, RepoResult};
use crate::model::product::ProductId;
use crate::model::wishlist::{NewWishlist, Wishlist, WishlistId, WishlistItem};
use rusqlite::{params, Connection, OptionalExtension, Row};

const WISHLIST_SELECT_SQL: &str = "SELECT id, owner_id, title, creation_date FROM wishlists";

pub trait WishlistRepository {
    fn create_wishlist(&self, wishlist: &NewWishlist) -> RepoResult<WishlistId>;
    fn list_wishlists(&self) -> RepoResult<Vec<Wishlist>>;
    /// The wishlist with the highest surrogate key, if any.
    fn active_wishlist(&self) -> RepoResult<Option<Wishlist>>;
    fn delete_wishlist(&self, id: WishlistId) -> RepoResult<()>;
    fn list_items(&self, wishlist_id: WishlistId) -> RepoResult<Vec<WishlistItem>>;
    fn contains_product(&self, wishlist_id: WishlistId, product_id: ProductId)
        -> RepoResult<bool>;
    /// Inserts one membership row unless the pair is already present.
    ///
    /// Returns `true` when a row was inserted.
    fn add_item_if_absent(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
        list_order: i64,
    ) -> RepoResult<bool>;
    /// Deletes every row of the pair; returns the number removed.
    fn remove_items(&self, wishlist_id: WishlistId, product_id: ProductId) -> RepoResult<usize>;
}

pub struct SqliteWishlistRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWishlistRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WishlistRepository for SqliteWishlistRepository<'_> {
    fn create_wishlist(&self, wishlist: &NewWishlist) -> RepoResult<WishlistId> {
        self.conn.execute(
            "INSERT INTO wishlists (owner_id, title, creation_date) VALUES (?1, ?2, ?3);",
            params![
                wishlist.owner_id,
                wishlist.title.as_str(),
                wishlist.creation_date
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn list_wishlists(&self) -> RepoResult<Vec<Wishlist>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WISHLIST_SELECT_SQL} ORDER BY id ASC;"))?;
        let wishlists = stmt
            .query_map([], parse_wishlist_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(wishlists)
    }

    fn active_wishlist(&self) -> RepoResult<Option<Wishlist>> {
        let wishlist = self
            .conn
            .query_row(
                &format!("{WISHLIST_SELECT_SQL} ORDER BY id DESC LIMIT 1;"),
                [],
                parse_wishlist_row,
            )
            .optional()?;
        Ok(wishlist)
    }

    fn delete_wishlist(&self, id: WishlistId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM wishlists WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "wishlists",
                id,
            });
        }
        Ok(())
    }

    fn list_items(&self, wishlist_id: WishlistId) -> RepoResult<Vec<WishlistItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT wishlist_id, product_id, list_order
             FROM wishlist_items
             WHERE wishlist_id = ?1
             ORDER BY rowid ASC;",
        )?;
        let items = stmt
            .query_map([wishlist_id], parse_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn contains_product(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM wishlist_items
                WHERE wishlist_id = ?1 AND product_id = ?2
            );",
            params![wishlist_id, product_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn add_item_if_absent(
        &self,
        wishlist_id: WishlistId,
        product_id: ProductId,
        list_order: i64,
    ) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT INTO wishlist_items (wishlist_id, product_id, list_order)
             SELECT ?1, ?2, ?3
             WHERE NOT EXISTS (
                SELECT 1
                FROM wishlist_items
                WHERE wishlist_id = ?1 AND product_id = ?2
             );",
            params![wishlist_id, product_id, list_order],
        )?;
        Ok(changed == 1)
    }

    fn remove_items(&self, wishlist_id: WishlistId, product_id: ProductId) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM wishlist_items WHERE wishlist_id = ?1 AND product_id = ?2;",
            params![wishlist_id, product_id],
        )?;
        Ok(removed)
    }
}

fn parse_wishlist_row(row: &Row<'_>) -> rusqlite::Result<Wishlist> {
    Ok(Wishlist {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        title: row.get("title")?,
        creation_date: row.get("creation_date")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> rusqlite::Result<WishlistItem> {
    Ok(WishlistItem {
        wishlist_id: row.get("wishlist_id")?,
        product_id: row.get("product_id")?,
        list_order: row.get("list_order")?,
    })
}
