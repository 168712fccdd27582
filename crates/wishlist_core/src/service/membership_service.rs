//! Membership toggling between a wishlist and a product.
//!
//! # Responsibility
//! - Add or remove a product from a wishlist in one transaction.
//! - Assign a random `list_order` hint to new membership rows.
//!
//! # Invariants
//! - `toggle_membership` trusts the caller's `currently_present` flag; a stale
//!   flag can only produce a no-op (`AlreadyPresent`/`AlreadyAbsent`), never a
//!   duplicate presence row.
//! - Removal deletes every row of the pair regardless of `list_order`.
//! - A failed toggle rolls back and leaves the join table unchanged.
//! - Callers must pass a resolved wishlist id; there is no "no wishlist" mode.

use crate::db::Store;
use crate::model::product::ProductId;
use crate::model::wishlist::{WishlistId, LIST_ORDER_MAX, LIST_ORDER_MIN};
use crate::repo::wishlist_repo::{SqliteWishlistRepository, WishlistRepository};
use crate::repo::{begin, commit, RepoResult};
use log::{info, warn};
use rand::Rng;
use rusqlite::TransactionBehavior;
use std::time::Instant;

/// What a toggle did to the join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// One row inserted with this `list_order`.
    Added { list_order: i64 },
    /// Asked to add, but the pair was already present.
    AlreadyPresent,
    /// All rows of the pair deleted.
    Removed { rows: usize },
    /// Asked to remove, but no row matched.
    AlreadyAbsent,
}

impl ToggleOutcome {
    /// Whether the join table changed.
    pub fn mutated(&self) -> bool {
        matches!(self, Self::Added { .. } | Self::Removed { .. })
    }

    fn action(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::AlreadyPresent => "already_present",
            Self::Removed { .. } => "removed",
            Self::AlreadyAbsent => "already_absent",
        }
    }
}

pub struct MembershipService<'store> {
    store: &'store mut Store,
}

impl<'store> MembershipService<'store> {
    pub fn new(store: &'store mut Store) -> Self {
        Self { store }
    }

    /// Removes the pair when `currently_present`, otherwise adds it.
    ///
    /// `currently_present` must come from the latest read of the wishlist's
    /// items.
    ///
    /// # Errors
    /// - `ConstraintViolation(ForeignKey)` when the wishlist or product is gone.
    /// - `Transaction` when the write lock cannot be acquired in time.
    pub fn toggle_membership(
        &mut self,
        wishlist_id: WishlistId,
        product_id: ProductId,
        currently_present: bool,
    ) -> RepoResult<ToggleOutcome> {
        self.run(wishlist_id, product_id, |_| Ok(currently_present))
    }

    /// Like `toggle_membership`, but reads presence inside the transaction.
    pub fn toggle_membership_verified(
        &mut self,
        wishlist_id: WishlistId,
        product_id: ProductId,
    ) -> RepoResult<ToggleOutcome> {
        self.run(wishlist_id, product_id, |repo| {
            repo.contains_product(wishlist_id, product_id)
        })
    }

    fn run<F>(
        &mut self,
        wishlist_id: WishlistId,
        product_id: ProductId,
        presence: F,
    ) -> RepoResult<ToggleOutcome>
    where
        F: FnOnce(&SqliteWishlistRepository<'_>) -> RepoResult<bool>,
    {
        let started_at = Instant::now();
        let result = toggle_in_transaction(self.store, wishlist_id, product_id, presence);

        match &result {
            Ok(outcome) => info!(
                "event=membership_toggle module=service status=ok action={} wishlist_id={} product_id={} duration_ms={}",
                outcome.action(),
                wishlist_id,
                product_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=membership_toggle module=service status=error wishlist_id={} product_id={} duration_ms={} error={}",
                wishlist_id,
                product_id,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn toggle_in_transaction<F>(
    store: &mut Store,
    wishlist_id: WishlistId,
    product_id: ProductId,
    presence: F,
) -> RepoResult<ToggleOutcome>
where
    F: FnOnce(&SqliteWishlistRepository<'_>) -> RepoResult<bool>,
{
    let conn = store.ready_connection_mut()?;
    let tx = begin(conn, TransactionBehavior::Immediate)?;
    let repo = SqliteWishlistRepository::new(&tx);
    let present = presence(&repo)?;
    let outcome = apply_toggle(&repo, wishlist_id, product_id, present)?;
    commit(tx)?;
    Ok(outcome)
}

fn apply_toggle(
    repo: &SqliteWishlistRepository<'_>,
    wishlist_id: WishlistId,
    product_id: ProductId,
    present: bool,
) -> RepoResult<ToggleOutcome> {
    if present {
        let rows = repo.remove_items(wishlist_id, product_id)?;
        return Ok(if rows == 0 {
            ToggleOutcome::AlreadyAbsent
        } else {
            ToggleOutcome::Removed { rows }
        });
    }

    let list_order = random_list_order();
    if repo.add_item_if_absent(wishlist_id, product_id, list_order)? {
        Ok(ToggleOutcome::Added { list_order })
    } else {
        Ok(ToggleOutcome::AlreadyPresent)
    }
}

/// Uniform in `[LIST_ORDER_MIN, LIST_ORDER_MAX]`; collisions are expected.
pub fn random_list_order() -> i64 {
    rand::rng().random_range(LIST_ORDER_MIN..=LIST_ORDER_MAX)
}

#[cfg(test)]
mod tests {
    use super::{random_list_order, ToggleOutcome};
    use crate::model::wishlist::{LIST_ORDER_MAX, LIST_ORDER_MIN};

    #[test]
    fn random_list_order_stays_in_range() {
        for _ in 0..2_000 {
            let order = random_list_order();
            assert!((LIST_ORDER_MIN..=LIST_ORDER_MAX).contains(&order));
        }
    }

    #[test]
    fn only_added_and_removed_count_as_mutations() {
        assert!(ToggleOutcome::Added { list_order: 3 }.mutated());
        assert!(ToggleOutcome::Removed { rows: 1 }.mutated());
        assert!(!ToggleOutcome::AlreadyPresent.mutated());
        assert!(!ToggleOutcome::AlreadyAbsent.mutated());
    }
}
