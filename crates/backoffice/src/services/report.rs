//! Sales summaries over Completed orders.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use storekeeper_core::{CurrencyCode, Money, OrderStatus, ProductId};

use crate::models::Order;
use crate::services::invoice::INVOICE_WIDTH;
use crate::services::orders::is_in_month;

/// Number of products listed under "Top Selling Products".
pub const TOP_PRODUCT_LIMIT: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Units sold of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub product_id: ProductId,
    /// Name from the first line seen for this product.
    pub product_name: String,
    pub quantity: i64,
}

/// Aggregates over a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalesSummary {
    /// Completed orders counted.
    pub order_count: usize,
    /// Units across all counted lines.
    pub units_sold: i64,
    /// Sum of `total_amount` (pre-tax).
    pub revenue: Decimal,
    /// Best sellers by units, at most [`TOP_PRODUCT_LIMIT`].
    pub top_products: Vec<ProductSales>,
}

impl SalesSummary {
    /// Summarize the Completed orders among `orders`.
    ///
    /// Sales are grouped by product id. Ties on quantity are ordered by
    /// product name, then id.
    #[must_use]
    pub fn from_orders<'o>(orders: impl IntoIterator<Item = &'o Order>) -> Self {
        let mut summary = Self::default();
        let mut by_product: HashMap<&ProductId, ProductSales> = HashMap::new();

        for order in orders
            .into_iter()
            .filter(|order| order.status == OrderStatus::Completed)
        {
            summary.order_count += 1;
            summary.revenue += order.total_amount;

            for item in &order.items {
                summary.units_sold += i64::from(item.quantity);
                by_product
                    .entry(&item.product_id)
                    .or_insert_with(|| ProductSales {
                        product_id: item.product_id.clone(),
                        product_name: item.product_name.clone(),
                        quantity: 0,
                    })
                    .quantity += i64::from(item.quantity);
            }
        }

        let mut ranked: Vec<ProductSales> = by_product.into_values().collect();
        ranked.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.product_name.cmp(&b.product_name))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(TOP_PRODUCT_LIMIT);
        summary.top_products = ranked;

        summary
    }
}

/// Summary of orders placed in one calendar month (UTC).
#[must_use]
pub fn monthly_summary(orders: &[Order], year: i32, month: u32) -> SalesSummary {
    SalesSummary::from_orders(
        orders
            .iter()
            .filter(|order| is_in_month(order.order_date, year, month)),
    )
}

/// Summary of orders placed within `[start, end]`.
#[must_use]
pub fn range_summary(orders: &[Order], start: DateTime<Utc>, end: DateTime<Utc>) -> SalesSummary {
    SalesSummary::from_orders(
        orders
            .iter()
            .filter(|order| order.order_date >= start && order.order_date <= end),
    )
}

/// Text block for a monthly report.
#[must_use]
pub fn render_monthly_report(
    year: i32,
    month: u32,
    summary: &SalesSummary,
    currency: CurrencyCode,
) -> String {
    render_report(
        &format!("MONTHLY SALES REPORT - {month}/{year}"),
        summary,
        currency,
    )
}

/// Text block for a date-range report.
#[must_use]
pub fn render_range_report(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    summary: &SalesSummary,
    currency: CurrencyCode,
) -> String {
    render_report(
        &format!(
            "SALES REPORT - {} to {}",
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT)
        ),
        summary,
        currency,
    )
}

fn render_report(title: &str, summary: &SalesSummary, currency: CurrencyCode) -> String {
    let rule = "=".repeat(INVOICE_WIDTH);

    let mut lines = vec![
        rule.clone(),
        format!("{title:^INVOICE_WIDTH$}").trim_end().to_string(),
        rule.clone(),
        format!("Total Orders: {}", summary.order_count),
        format!("Total Items Sold: {}", summary.units_sold),
        format!("Total Revenue: {}", Money::new(summary.revenue, currency)),
        "-".repeat(INVOICE_WIDTH),
        "Top Selling Products:".to_string(),
    ];

    if summary.top_products.is_empty() {
        lines.push("  (no sales)".to_string());
    }
    lines.extend(
        summary
            .top_products
            .iter()
            .map(|sales| format!("  {}: {} units", sales.product_name, sales.quantity)),
    );
    lines.push(rule);

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
