//! Product rows.
//!
//! Products are created once and never updated.

use serde::{Deserialize, Serialize};

pub type ProductId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Stock on hand; the column rejects negative values.
    pub quantity: u32,
}

/// Insert input for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub quantity: u32,
}

impl NewProduct {
    pub fn new(title: impl Into<String>, description: impl Into<String>, quantity: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            quantity,
        }
    }
}
