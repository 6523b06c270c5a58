//! Order and line item models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storekeeper_core::{Entity, OrderId, OrderStatus, PaymentMethod, ProductId, UserId};

/// A product, quantity and price snapshot.
///
/// Inside a cart session this is a pending line; inside an [`Order`] it is
/// frozen and no longer follows catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product the line refers to.
    pub product_id: ProductId,
    /// Product name when the line was created.
    pub product_name: String,
    /// Unit price when the line was created.
    pub unit_price: Decimal,
    /// Units, always positive.
    pub quantity: i32,
}

impl LineItem {
    /// `quantity × unit_price` at full precision.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID (`ORD-YYYYMMDD-HHMMSS-xxxx`).
    pub id: OrderId,
    /// Customer display name.
    pub customer_name: String,
    /// Customer phone in `09xxxxxxxx` form.
    pub customer_phone: String,
    /// Lines in cart insertion order.
    pub items: Vec<LineItem>,
    /// Sum of line totals when the order was created.
    pub total_amount: Decimal,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Back-office user who rang up the sale.
    pub employee_id: UserId,
    /// How the customer paid.
    pub payment_method: PaymentMethod,
}

impl Order {
    /// Sum of line totals.
    #[must_use]
    pub fn total_of(items: &[LineItem]) -> Decimal {
        items.iter().map(LineItem::line_total).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &OrderId {
        &self.id
    }
}
