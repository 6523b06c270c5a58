//! Per-session shopping cart.

use rust_decimal::Decimal;

use storekeeper_core::ProductId;

use crate::error::AppError;
use crate::models::{LineItem, MAX_UNIT_PRICE, Order, Product};

/// In-memory cart owned by one front-end session.
///
/// Lines keep insertion order and at most one line exists per product. The
/// name and price are captured when a product is first added and do not
/// follow later catalog edits. Nothing here touches stock; availability is
/// checked again at checkout.
#[derive(Debug, Clone, Default)]
pub struct CartSession {
    lines: Vec<LineItem>,
}

impl CartSession {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidInput` for a non-positive quantity,
    /// `AppError::InvalidProduct` for a price outside `(0, MAX_UNIT_PRICE]`
    /// and `AppError::InsufficientStock` when the combined quantity would
    /// exceed the product's current stock. The cart is unchanged on error.
    pub fn add_item(&mut self, product: &Product, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "Quantity must be positive".to_string(),
            ));
        }

        // Documents edited by hand can bypass catalog validation
        if product.price <= Decimal::ZERO || product.price > MAX_UNIT_PRICE {
            return Err(AppError::InvalidProduct(format!(
                "Product {} has an invalid price {}",
                product.name, product.price
            )));
        }

        let requested = self.quantity_of(&product.id) + i64::from(quantity);
        let available = i64::from(product.quantity_in_stock);
        if requested > available {
            return Err(AppError::InsufficientStock {
                product: product.name.clone(),
                requested,
                available,
            });
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id)
        {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(LineItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                unit_price: product.price,
                quantity,
            }),
        }

        tracing::debug!(product_id = %product.id, quantity, "Added to cart");
        Ok(())
    }

    /// Drop the line for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product_id != product_id);
    }

    /// Set a line's quantity. Zero or less removes the line; unknown ids are
    /// ignored. Stock is not rechecked here.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        Order::total_of(&self.lines)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    /// Units of one product already in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.lines
            .iter()
            .filter(|line| &line.product_id == product_id)
            .map(|line| i64::from(line.quantity))
            .sum()
    }
}
