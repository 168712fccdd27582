//! Row models for the wishlist schema.
//!
//! # Responsibility
//! - Mirror the four persisted tables as plain data structures.
//! - Separate insert inputs (`New*`) from persisted rows carrying surrogate keys.
//!
//! # Invariants
//! - Surrogate keys are assigned by SQLite and never chosen by callers.
//! - Membership of a product in a wishlist is a set relation on
//!   `(wishlist_id, product_id)`; `list_order` is only a positional hint.

pub mod product;
pub mod user;
pub mod wishlist;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix epoch milliseconds.
///
/// Clocks set before the epoch yield `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
