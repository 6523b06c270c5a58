//! Checkout: turns a cart into a persisted order.

use chrono::Utc;
use tracing::instrument;

use storekeeper_core::{OrderId, OrderStatus, PaymentMethod, Phone};

use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::{Order, Product, User};
use crate::services::cart::CartSession;
use crate::services::stock::StockLedger;

/// Customer details collected at the point of sale.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Customer display name, required.
    pub customer_name: String,
    /// Customer phone, `09xxxxxxxx`.
    pub phone: String,
    /// How the customer pays.
    pub payment_method: PaymentMethod,
}

/// Checkout coordinator.
///
/// Runs validation, stock decrement and order persistence as one unit of
/// work:
///
/// 1. Validate the request, the cart and the actor. Nothing is touched yet.
/// 2. Decrement stock for every line through [`StockLedger::apply_batch`],
///    which rechecks availability against the products document and writes
///    once.
/// 3. Persist the order. If that fails, restore the stock snapshot.
/// 4. Clear the cart.
///
/// Any failure leaves stock, orders and the cart as they were.
pub struct CheckoutCoordinator<'a> {
    products: &'a mut JsonStore<Product>,
    orders: &'a mut JsonStore<Order>,
}

impl<'a> CheckoutCoordinator<'a> {
    /// Create a new checkout coordinator.
    #[must_use]
    pub const fn new(
        products: &'a mut JsonStore<Product>,
        orders: &'a mut JsonStore<Order>,
    ) -> Self {
        Self { products, orders }
    }

    /// Place an order for the cart's contents.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` for a blank customer name, malformed phone
    ///   or empty cart
    /// - `AppError::Unauthorized` when no actor is given or the actor is inactive
    /// - `AppError::InsufficientStock` / `AppError::InvalidProduct` when stock
    ///   no longer covers a line
    /// - `AppError::FileFormat` when a document cannot be written
    #[instrument(skip(self, cart, request, actor), fields(lines = cart.lines().len()))]
    pub fn checkout(
        &mut self,
        cart: &mut CartSession,
        request: &CheckoutRequest,
        actor: Option<&User>,
    ) -> Result<Order, AppError> {
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(AppError::InvalidInput(
                "Customer name is required".to_string(),
            ));
        }
        let phone = Phone::parse(&request.phone)?;

        if cart.is_empty() {
            return Err(AppError::InvalidInput("Cart is empty".to_string()));
        }

        let actor =
            actor.ok_or_else(|| AppError::Unauthorized("No user is logged in".to_string()))?;
        if !actor.is_active {
            return Err(AppError::Unauthorized(format!(
                "User {} is inactive",
                actor.username
            )));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::generate_at(now),
            customer_name: customer_name.to_string(),
            customer_phone: phone.into_inner(),
            items: cart.lines().to_vec(),
            total_amount: cart.total(),
            order_date: now,
            status: OrderStatus::Completed,
            employee_id: actor.id.clone(),
            payment_method: request.payment_method,
        };

        let deltas: Vec<_> = order
            .items
            .iter()
            .map(|line| (line.product_id.clone(), -line.quantity))
            .collect();

        let mut ledger = StockLedger::new(&mut *self.products);
        let snapshot = ledger.apply_batch(&deltas)?;

        if let Err(err) = self.orders.add(order.clone()) {
            tracing::error!(order_id = %order.id, error = %err, "Failed to persist order, restoring stock");
            if let Err(restore_err) = ledger.restore(snapshot) {
                tracing::error!(error = %restore_err, "Failed to restore stock after order failure");
            }
            return Err(err.into());
        }

        cart.clear();

        tracing::info!(
            order_id = %order.id,
            employee_id = %order.employee_id,
            total = %order.total_amount,
            units = order.units(),
            "Order placed"
        );
        Ok(order)
    }
}
