use serde::{Deserialize, Serialize};

use crate::collection::RecordId;

/// A product placed in the cart. Items have no quantity: adding the same
/// product twice stores two items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: RecordId,
    pub name: String,
    pub price: f64,
    /// Image URL shown next to the item.
    pub image: String,
}

impl CartItem {
    pub fn new(name: impl Into<String>, price: f64, image: impl Into<String>) -> Self {
        Self {
            id: RecordId::generate(),
            name: name.into(),
            price,
            image: image.into(),
        }
    }
}

/// What "purchase all" bought.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub items: Vec<CartItem>,
    pub total: f64,
}
