//! Wishlist and wishlist item rows.
//!
//! # Invariants
//! - The active wishlist is the one with the highest `id`.
//! - `WishlistItem::list_order` is not unique and not dense; it only
//!   participates in the primary key.

use super::product::ProductId;
use super::user::UserId;
use serde::{Deserialize, Serialize};

pub type WishlistId = i64;

/// Lower bound (inclusive) of generated `list_order` hints.
pub const LIST_ORDER_MIN: i64 = 1;
/// Upper bound (inclusive) of generated `list_order` hints.
pub const LIST_ORDER_MAX: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    pub id: WishlistId,
    /// Deleting the owner cascades to the wishlist.
    pub owner_id: UserId,
    pub title: String,
    /// Unix epoch milliseconds.
    pub creation_date: i64,
}

/// Insert input for a wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWishlist {
    pub owner_id: UserId,
    pub title: String,
    pub creation_date: i64,
}

impl NewWishlist {
    /// Wishlist stamped with the current time.
    pub fn now(owner_id: UserId, title: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            creation_date: super::now_epoch_ms(),
        }
    }
}

/// One row of the wishlist/product join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WishlistItem {
    pub wishlist_id: WishlistId,
    pub product_id: ProductId,
    pub list_order: i64,
}
