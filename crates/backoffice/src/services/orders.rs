//! Read-only order queries.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;

use storekeeper_core::{OrderId, OrderStatus};

use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::Order;

/// Whether `date` falls in the given calendar month (UTC).
#[must_use]
pub fn is_in_month(date: DateTime<Utc>, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Order queries. Orders are immutable once placed.
pub struct OrderService<'a> {
    orders: &'a mut JsonStore<Order>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(orders: &'a mut JsonStore<Order>) -> Self {
        Self { orders }
    }

    /// All orders in insertion order, re-read from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn all_orders(&mut self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.load_all()?)
    }

    /// Look up one order.
    #[must_use]
    pub fn get_order(&self, id: &OrderId) -> Option<Order> {
        self.orders.get_by_id(id).cloned()
    }

    /// Orders whose customer name contains `name`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn orders_by_customer(&mut self, name: &str) -> Result<Vec<Order>, AppError> {
        let needle = name.to_lowercase();
        Ok(self
            .orders
            .load_all()?
            .into_iter()
            .filter(|order| order.customer_name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Orders placed within `[start, end]`, both ends inclusive.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn orders_by_date_range(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Order>, AppError> {
        Ok(self
            .orders
            .load_all()?
            .into_iter()
            .filter(|order| order.order_date >= start && order.order_date <= end)
            .collect())
    }

    /// Orders placed in one calendar month.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn orders_by_month(&mut self, year: i32, month: u32) -> Result<Vec<Order>, AppError> {
        Ok(self
            .orders
            .load_all()?
            .into_iter()
            .filter(|order| is_in_month(order.order_date, year, month))
            .collect())
    }

    /// Sum of `total_amount` over Completed orders in one month.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn monthly_revenue(&mut self, year: i32, month: u32) -> Result<Decimal, AppError> {
        Ok(self
            .orders_by_month(year, month)?
            .iter()
            .filter(|order| order.status == OrderStatus::Completed)
            .map(|order| order.total_amount)
            .sum())
    }
}
