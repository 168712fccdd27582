//! Local relational data layer for a personal wishlist manager.
//! Owns the schema, seeding, reads and membership toggling; rendering is left
//! to the caller.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod refresh;
pub mod repo;
pub mod service;

pub use app::WishlistApp;
pub use config::{LogConfig, SchemaPolicy, StoreConfig, StoreLocation};
pub use db::{DbError, DbResult, SchemaError, SchemaReport, Store, StoreState};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::product::{NewProduct, Product, ProductId};
pub use model::user::{NewUser, User, UserId};
pub use model::wishlist::{NewWishlist, Wishlist, WishlistId, WishlistItem};
pub use refresh::RefreshSignal;
pub use repo::{ConstraintKind, RepoError, RepoResult};
pub use service::membership_service::{MembershipService, ToggleOutcome};
pub use service::query_service::{QueryService, WishlistSnapshot};
pub use service::seed_service::{SeedPlan, SeedReport, SeedService, SeedStep};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
