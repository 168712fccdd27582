//! Use-case entry points for the UI collaborator.
//!
//! # Responsibility
//! - Own the store handle and the refresh signal for one process.
//! - Expose schema, seed, query and toggle operations as result values.
//!
//! # Invariants
//! - No operation panics; every failure is returned to the caller.
//! - Mutations do not bump the refresh token themselves; the collaborator
//!   calls `bump_refresh` after each mutating call it wants re-rendered.

use crate::config::StoreConfig;
use crate::db::{ensure_schema, open_store, DbResult, SchemaReport, Store};
use crate::model::product::{Product, ProductId};
use crate::model::wishlist::{Wishlist, WishlistId, WishlistItem};
use crate::refresh::RefreshSignal;
use crate::repo::RepoResult;
use crate::service::membership_service::{MembershipService, ToggleOutcome};
use crate::service::query_service::{QueryService, WishlistSnapshot};
use crate::service::seed_service::{SeedPlan, SeedReport, SeedService};

pub struct WishlistApp {
    store: Store,
    refresh: RefreshSignal,
}

impl WishlistApp {
    /// Opens the store; call `ensure_schema` before any data operation.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        Ok(Self::from_store(open_store(config)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    pub fn from_store(store: Store) -> Self {
        Self {
            store,
            refresh: RefreshSignal::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn ensure_schema(&mut self) -> DbResult<SchemaReport> {
        ensure_schema(&mut self.store)
    }

    /// True while no wishlist exists; gates the seed action.
    pub fn seed_available(&self) -> RepoResult<bool> {
        Ok(self.active_wishlist()?.is_none())
    }

    pub fn seed_initial_data(&mut self) -> RepoResult<SeedReport> {
        SeedService::new(&mut self.store).seed_initial_data()
    }

    pub fn seed_with(&mut self, plan: &SeedPlan) -> RepoResult<SeedReport> {
        SeedService::new(&mut self.store).seed(plan)
    }

    pub fn list_products(&self) -> RepoResult<Vec<Product>> {
        QueryService::new(&self.store).list_products()
    }

    pub fn active_wishlist(&self) -> RepoResult<Option<Wishlist>> {
        QueryService::new(&self.store).active_wishlist()
    }

    pub fn list_wishlist_items(&self, wishlist_id: WishlistId) -> RepoResult<Vec<WishlistItem>> {
        QueryService::new(&self.store).list_wishlist_items(wishlist_id)
    }

    pub fn snapshot(&self) -> RepoResult<WishlistSnapshot> {
        QueryService::new(&self.store).snapshot()
    }

    pub fn toggle_membership(
        &mut self,
        wishlist_id: WishlistId,
        product_id: ProductId,
        currently_present: bool,
    ) -> RepoResult<ToggleOutcome> {
        MembershipService::new(&mut self.store).toggle_membership(
            wishlist_id,
            product_id,
            currently_present,
        )
    }

    pub fn toggle_membership_verified(
        &mut self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> RepoResult<ToggleOutcome> {
        MembershipService::new(&mut self.store).toggle_membership_verified(wishlist_id, product_id)
    }

    pub fn bump_refresh(&self) -> u64 {
        self.refresh.bump()
    }

    pub fn refresh_token(&self) -> u64 {
        self.refresh.token()
    }

    /// Re-reads state when the token moved past `last_seen` (or nothing was
    /// read yet) and records the token the snapshot corresponds to.
    pub fn refresh_if_changed(
        &self,
        last_seen: &mut Option<u64>,
    ) -> RepoResult<Option<WishlistSnapshot>> {
        let token = self.refresh.token();
        if last_seen.is_some_and(|seen| !self.refresh.changed_since(seen)) {
            return Ok(None);
        }

        let snapshot = self.snapshot()?;
        *last_seen = Some(token);
        Ok(Some(snapshot))
    }

    pub fn close(&mut self) -> DbResult<()> {
        self.store.close()
    }
}
