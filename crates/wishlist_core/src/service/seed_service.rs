//! Demo data seeding.
//!
//! # Responsibility
//! - Insert demo products, one user and one wishlist in a single transaction.
//! - Report every sub-insert outcome individually.
//!
//! # Invariants
//! - Sub-inserts do not short-circuit each other: a failed product insert
//!   does not prevent the user insert, and vice versa.
//! - The wishlist insert is attempted only after, and only if, the user
//!   insert succeeded; it is owned by the key generated for that user.
//! - Successful sub-inserts are committed together even when siblings failed.
//! - Seeding is not guarded against re-invocation; callers gate it on
//!   "no wishlist exists yet".

use crate::db::Store;
use crate::model::product::{NewProduct, ProductId};
use crate::model::user::{NewUser, UserId};
use crate::model::wishlist::{NewWishlist, WishlistId};
use crate::repo::product_repo::{ProductRepository, SqliteProductRepository};
use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
use crate::repo::wishlist_repo::{SqliteWishlistRepository, WishlistRepository};
use crate::repo::{begin, commit, RepoError, RepoResult};
use log::{info, warn};
use rusqlite::TransactionBehavior;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const DEMO_PRODUCT_COUNT: usize = 3;
const DEMO_PRODUCT_DESCRIPTION: &str = "Description de l'article";
const DEMO_PRODUCT_QUANTITY: u32 = 100;

/// Rows inserted by one seed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub products: Vec<NewProduct>,
    pub user: NewUser,
    pub wishlist_title: String,
}

impl SeedPlan {
    /// Three products `Produit1..Produit3`, one user and their wishlist.
    pub fn demo() -> Self {
        let products = (1..=DEMO_PRODUCT_COUNT)
            .map(|index| {
                NewProduct::new(
                    format!("Produit{index}"),
                    DEMO_PRODUCT_DESCRIPTION,
                    DEMO_PRODUCT_QUANTITY,
                )
            })
            .collect();

        Self {
            products,
            user: NewUser::new("Andréas", "HANSS", "contact@codingspark.io"),
            wishlist_title: "La liste d'Andréas".to_string(),
        }
    }
}

/// Sub-insert of a seed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    /// Index into `SeedPlan::products`.
    Product(usize),
    User,
    Wishlist,
}

impl Display for SeedStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product(index) => write!(f, "product[{index}]"),
            Self::User => f.write_str("user"),
            Self::Wishlist => f.write_str("wishlist"),
        }
    }
}

#[derive(Debug)]
pub struct SeedFailure {
    pub step: SeedStep,
    pub error: RepoError,
}

/// Per-step outcome of a committed seed pass.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub product_ids: Vec<ProductId>,
    pub user_id: Option<UserId>,
    pub wishlist_id: Option<WishlistId>,
    pub failures: Vec<SeedFailure>,
}

impl SeedReport {
    /// Whether every sub-insert succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.wishlist_id.is_some()
    }

    pub fn failure(&self, step: SeedStep) -> Option<&RepoError> {
        self.failures
            .iter()
            .find(|failure| failure.step == step)
            .map(|failure| &failure.error)
    }

    fn record(&mut self, step: SeedStep, error: RepoError) {
        warn!("event=seed_step module=service status=error step={step} error={error}");
        self.failures.push(SeedFailure { step, error });
    }
}

pub struct SeedService<'store> {
    store: &'store mut Store,
}

impl<'store> SeedService<'store> {
    pub fn new(store: &'store mut Store) -> Self {
        Self { store }
    }

    /// Seeds the demo plan.
    pub fn seed_initial_data(&mut self) -> RepoResult<SeedReport> {
        self.seed(&SeedPlan::demo())
    }

    /// Runs one seed pass for `plan`.
    ///
    /// # Errors
    /// - Store not ready or closed.
    /// - `RepoError::Transaction` when the transaction cannot begin or commit.
    ///
    /// Constraint violations of individual rows are not errors here; they are
    /// listed in `SeedReport::failures`.
    pub fn seed(&mut self, plan: &SeedPlan) -> RepoResult<SeedReport> {
        let started_at = Instant::now();
        let conn = self.store.ready_connection_mut()?;
        let tx = begin(conn, TransactionBehavior::Immediate)?;
        let mut report = SeedReport::default();

        let products = SqliteProductRepository::new(&tx);
        for (index, product) in plan.products.iter().enumerate() {
            match products.create_product(product) {
                Ok(id) => report.product_ids.push(id),
                Err(err) => report.record(SeedStep::Product(index), err),
            }
        }

        match SqliteUserRepository::new(&tx).create_user(&plan.user) {
            Ok(user_id) => {
                report.user_id = Some(user_id);
                let wishlist = NewWishlist::now(user_id, plan.wishlist_title.as_str());
                match SqliteWishlistRepository::new(&tx).create_wishlist(&wishlist) {
                    Ok(wishlist_id) => report.wishlist_id = Some(wishlist_id),
                    Err(err) => report.record(SeedStep::Wishlist, err),
                }
            }
            Err(err) => report.record(SeedStep::User, err),
        }

        commit(tx)?;
        info!(
            "event=seed module=service status=ok products={} user={} wishlist={} failures={} duration_ms={}",
            report.product_ids.len(),
            report.user_id.is_some(),
            report.wishlist_id.is_some(),
            report.failures.len(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::{SeedPlan, SeedStep};

    #[test]
    fn demo_plan_matches_demo_content() {
        let plan = SeedPlan::demo();
        let titles: Vec<_> = plan.products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Produit1", "Produit2", "Produit3"]);
        assert!(plan.products.iter().all(|p| p.quantity == 100));
        assert_eq!(plan.user.email, "contact@codingspark.io");
    }

    #[test]
    fn seed_steps_render_for_logs() {
        assert_eq!(SeedStep::Product(2).to_string(), "product[2]");
        assert_eq!(SeedStep::Wishlist.to_string(), "wishlist");
    }
}
