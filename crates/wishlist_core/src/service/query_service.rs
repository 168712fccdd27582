//! Read-side facade for one refresh cycle.
//!
//! # Responsibility
//! - Provide the three reads the UI collaborator needs: products, the
//!   active wishlist, and that wishlist's items.
//! - Bundle them into a consistent `WishlistSnapshot`.
//!
//! # Invariants
//! - `snapshot` runs its reads sequentially inside one read transaction; the
//!   items query uses the wishlist resolved by the preceding step of the same
//!   pass, never one from an earlier cycle.
//! - No pagination: every read loads the full result set.

use crate::db::Store;
use crate::model::product::{Product, ProductId};
use crate::model::wishlist::{Wishlist, WishlistId, WishlistItem};
use crate::repo::product_repo::{ProductRepository, SqliteProductRepository};
use crate::repo::wishlist_repo::{SqliteWishlistRepository, WishlistRepository};
use crate::repo::{commit, RepoError, RepoResult};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

/// State observed by one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WishlistSnapshot {
    pub products: Vec<Product>,
    pub wishlist: Option<Wishlist>,
    /// Items of `wishlist`; empty when there is no wishlist.
    pub items: Vec<WishlistItem>,
}

impl WishlistSnapshot {
    /// Whether `product_id` is a member of the active wishlist.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    /// Distinct product ids in the active wishlist.
    pub fn member_product_ids(&self) -> BTreeSet<ProductId> {
        self.items.iter().map(|item| item.product_id).collect()
    }

    /// Seeding is offered only while no wishlist exists.
    pub fn seed_available(&self) -> bool {
        self.wishlist.is_none()
    }
}

pub struct QueryService<'store> {
    store: &'store Store,
}

impl<'store> QueryService<'store> {
    pub fn new(store: &'store Store) -> Self {
        Self { store }
    }

    /// Every product in storage order.
    pub fn list_products(&self) -> RepoResult<Vec<Product>> {
        let conn = self.store.ready_connection()?;
        SqliteProductRepository::new(conn).list_products()
    }

    /// Wishlist with the highest id, or `None`.
    pub fn active_wishlist(&self) -> RepoResult<Option<Wishlist>> {
        let conn = self.store.ready_connection()?;
        SqliteWishlistRepository::new(conn).active_wishlist()
    }

    /// Items of `wishlist_id`; empty when absent or unfilled.
    pub fn list_wishlist_items(&self, wishlist_id: WishlistId) -> RepoResult<Vec<WishlistItem>> {
        let conn = self.store.ready_connection()?;
        SqliteWishlistRepository::new(conn).list_items(wishlist_id)
    }

    /// Runs one refresh cycle as dependent steps over a single snapshot.
    pub fn snapshot(&self) -> RepoResult<WishlistSnapshot> {
        let conn = self.store.ready_connection()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(RepoError::Transaction)?;

        let products = SqliteProductRepository::new(&tx).list_products()?;
        let wishlists = SqliteWishlistRepository::new(&tx);
        let wishlist = wishlists.active_wishlist()?;
        let items = match wishlist.as_ref() {
            Some(active) => wishlists.list_items(active.id)?,
            None => Vec::new(),
        };
        commit(tx)?;

        debug!(
            "event=snapshot module=service status=ok products={} wishlist_id={:?} items={}",
            products.len(),
            wishlist.as_ref().map(|active| active.id),
            items.len()
        );
        Ok(WishlistSnapshot {
            products,
            wishlist,
            items,
        })
    }
}
