//! Product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeeper_core::{CategoryId, Entity, ProductId};

/// Highest accepted unit price.
///
/// A line of `i32::MAX` units at this price, plus tax, stays far inside the
/// `Decimal` range, so cart, order and invoice totals cannot overflow.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A catalog product with its stock level.
///
/// `quantity_in_stock` is only changed through the stock ledger or a
/// validated catalog update; it is never negative at rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Unit price, in `(0, MAX_UNIT_PRICE]`.
    pub price: Decimal,
    /// Units on hand.
    pub quantity_in_stock: i32,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When stock was last adjusted; `None` until the first adjustment.
    pub last_restocked: Option<DateTime<Utc>>,
}

impl Product {
    /// Build a product with a fresh identity.
    #[must_use]
    pub fn new(input: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::generate(),
            name: input.name,
            description: input.description,
            category_id: input.category_id,
            price: input.price,
            quantity_in_stock: input.quantity_in_stock,
            created_at: now,
            last_restocked: None,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &ProductId {
        &self.id
    }
}

/// Input for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Unit price.
    pub price: Decimal,
    /// Opening stock level.
    pub quantity_in_stock: i32,
}
