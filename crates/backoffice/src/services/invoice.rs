//! Invoice rendering and persistence.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::instrument;

use storekeeper_core::{CurrencyCode, InvoiceId, Money, OrderId};

use crate::config::BackofficeConfig;
use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::{Invoice, LineItem, Order};

/// Width of the ruled header and footer lines.
pub const INVOICE_WIDTH: usize = 41;

const PRODUCT_WIDTH: usize = 20;
const QTY_WIDTH: usize = 6;
const PRICE_WIDTH: usize = 12;
const TOTAL_WIDTH: usize = 12;
const LABEL_WIDTH: usize = PRODUCT_WIDTH + QTY_WIDTH + PRICE_WIDTH;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the fixed-width invoice text for an order.
///
/// Rendering is pure: the same order, timestamp and settings always produce
/// the same text.
#[derive(Debug, Clone)]
pub struct InvoiceRenderer {
    store_name: String,
    tax_rate: Decimal,
    currency: CurrencyCode,
}

impl Default for InvoiceRenderer {
    fn default() -> Self {
        Self::from_config(&BackofficeConfig::new("data"))
    }
}

impl InvoiceRenderer {
    #[must_use]
    pub fn new(store_name: impl Into<String>, tax_rate: Decimal, currency: CurrencyCode) -> Self {
        Self {
            store_name: store_name.into(),
            tax_rate,
            currency,
        }
    }

    #[must_use]
    pub fn from_config(config: &BackofficeConfig) -> Self {
        Self::new(config.store_name.clone(), config.tax_rate, config.currency)
    }

    #[must_use]
    pub const fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Format an amount in the configured currency.
    #[must_use]
    pub fn money(&self, amount: Decimal) -> String {
        Money::new(amount, self.currency).to_string()
    }

    /// Render the invoice for `order` as of `generated_at`.
    #[must_use]
    pub fn render(&self, order: &Order, generated_at: DateTime<Utc>) -> String {
        let rule = "=".repeat(INVOICE_WIDTH);
        let thin_rule = "-".repeat(INVOICE_WIDTH);

        let subtotal = order.total_amount;
        let tax = subtotal * self.tax_rate;
        let total = subtotal + tax;

        let mut lines = vec![
            rule.clone(),
            format!("{:^INVOICE_WIDTH$}", self.store_name)
                .trim_end()
                .to_string(),
            rule.clone(),
            format!("Invoice ID: {}", order.id),
            format!("Date: {}", generated_at.format(DATE_FORMAT)),
            format!("Customer: {}", order.customer_name),
            format!("Phone: {}", order.customer_phone),
            thin_rule.clone(),
            "Items:".to_string(),
            thin_rule.clone(),
            format!(
                "{:<PRODUCT_WIDTH$}{:>QTY_WIDTH$}{:>PRICE_WIDTH$}{:>TOTAL_WIDTH$}",
                "Product", "Qty", "Price", "Total"
            ),
        ];

        lines.extend(order.items.iter().map(|item| self.item_line(item)));

        lines.extend([
            thin_rule.clone(),
            self.amount_line("Subtotal:", subtotal),
            self.amount_line(&format!("Tax ({}%):", self.tax_percent()), tax),
            self.amount_line("Total:", total),
            thin_rule,
            format!("Payment Method: {}", order.payment_method),
            format!("Status: {}", order.status),
            "Thank you for your business!".to_string(),
            rule,
        ]);

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn item_line(&self, item: &LineItem) -> String {
        format!(
            "{:<PRODUCT_WIDTH$}{:>QTY_WIDTH$}{:>PRICE_WIDTH$}{:>TOTAL_WIDTH$}",
            truncate_name(&item.product_name),
            item.quantity,
            self.money(item.unit_price),
            self.money(item.line_total()),
        )
    }

    fn amount_line(&self, label: &str, amount: Decimal) -> String {
        format!(
            "{label:<LABEL_WIDTH$}{:>TOTAL_WIDTH$}",
            self.money(amount)
        )
    }

    /// Tax rate as a percentage without trailing zeros (0.15 -> "15").
    fn tax_percent(&self) -> Decimal {
        (self.tax_rate * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Fit a product name into the product column.
fn truncate_name(name: &str) -> String {
    if name.chars().count() > PRODUCT_WIDTH - 2 {
        let head: String = name.chars().take(PRODUCT_WIDTH - 3).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Invoice service: renders and stores invoices.
pub struct InvoiceService<'a> {
    invoices: &'a mut JsonStore<Invoice>,
    renderer: &'a InvoiceRenderer,
}

impl<'a> InvoiceService<'a> {
    /// Create a new invoice service.
    #[must_use]
    pub const fn new(invoices: &'a mut JsonStore<Invoice>, renderer: &'a InvoiceRenderer) -> Self {
        Self { invoices, renderer }
    }

    /// Render and persist an invoice for `order`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be written.
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    pub fn generate_invoice(&mut self, order: &Order) -> Result<Invoice, AppError> {
        let invoice = self.render(order, Utc::now());
        self.invoices.add(invoice.clone())?;

        tracing::info!(invoice_id = %invoice.id, "Invoice generated");
        Ok(invoice)
    }

    /// Render invoices for `orders` without persisting them.
    #[must_use]
    pub fn invoices_for(&self, orders: &[Order]) -> Vec<Invoice> {
        let now = Utc::now();
        orders.iter().map(|order| self.render(order, now)).collect()
    }

    /// Most recently stored invoice for an order, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn latest_for_order(&mut self, order_id: &OrderId) -> Result<Option<Invoice>, AppError> {
        Ok(self
            .invoices
            .load_all()?
            .into_iter()
            .filter(|invoice| &invoice.order_id == order_id)
            .max_by_key(|invoice| invoice.generated_at))
    }

    fn render(&self, order: &Order, generated_at: DateTime<Utc>) -> Invoice {
        Invoice {
            id: InvoiceId::generate_at(generated_at),
            order_id: order.id.clone(),
            content: self.renderer.render(order, generated_at),
            generated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use storekeeper_core::{OrderStatus, PaymentMethod, ProductId, UserId};

    use super::*;

    fn line(name: &str, cents: i64, quantity: i32) -> LineItem {
        LineItem {
            product_id: ProductId::generate(),
            product_name: name.to_string(),
            unit_price: Decimal::new(cents, 2),
            quantity,
        }
    }

    fn order(items: Vec<LineItem>) -> Order {
        Order {
            id: OrderId::new("ORD-20240315-101500-ab12"),
            customer_name: "Ana".to_string(),
            customer_phone: "0912345678".to_string(),
            total_amount: Order::total_of(&items),
            items,
            order_date: Utc.with_ymd_and_hms(2024, 3, 15, 10, 15, 0).unwrap(),
            status: OrderStatus::Completed,
            employee_id: UserId::new("u-1"),
            payment_method: PaymentMethod::Cash,
        }
    }

    #[test]
    fn test_render_layout() {
        let renderer = InvoiceRenderer::default();
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 15, 10, 16, 30).unwrap();
        let text = renderer.render(&order(vec![line("Widget", 1_000, 2)]), generated_at);

        let expected = [
            "=========================================",
            "         STORE MANAGEMENT SYSTEM",
            "=========================================",
            "Invoice ID: ORD-20240315-101500-ab12",
            "Date: 2024-03-15 10:16:30",
            "Customer: Ana",
            "Phone: 0912345678",
            "-----------------------------------------",
            "Items:",
            "-----------------------------------------",
            "Product                Qty       Price       Total",
            "Widget                   2      $10.00      $20.00",
            "-----------------------------------------",
            "Subtotal:                                   $20.00",
            "Tax (15%):                                   $3.00",
            "Total:                                      $23.00",
            "-----------------------------------------",
            "Payment Method: Cash",
            "Status: Completed",
            "Thank you for your business!",
            "=========================================",
        ]
        .join("\n")
            + "\n";

        assert_eq!(text, expected);
    }

    #[test]
    fn test_truncates_long_names() {
        assert_eq!(truncate_name("Exactly18CharsName"), "Exactly18CharsName");
        assert_eq!(
            truncate_name("Nineteen_Char_Name!"),
            "Nineteen_Char_Nam..."
        );

        let renderer = InvoiceRenderer::default();
        let text = renderer.render(
            &order(vec![line("Extra Large Deluxe Widget", 100, 1)]),
            Utc::now(),
        );
        assert!(text.contains("\nExtra Large Delux...     1"));
    }

    #[test]
    fn test_configured_tax_and_currency() {
        let renderer = InvoiceRenderer::new("SHOP", Decimal::new(75, 3), CurrencyCode::EUR);
        let text = renderer.render(
            &order(vec![line("Widget", 100_000, 20)]),
            Utc::now(),
        );

        assert!(text.contains("Tax (7.5%):"));
        assert!(text.contains("€20,000.00"));
        assert!(text.contains("€21,500.00"));
    }

    #[test]
    fn test_render_at_price_ceiling() {
        let mut item = line("Gold", 100, i32::MAX);
        item.unit_price = crate::models::MAX_UNIT_PRICE;

        let text = InvoiceRenderer::default().render(&order(vec![item]), Utc::now());
        assert!(text.contains("\nTotal:"));
    }

    #[test]
    fn test_generate_invoice_persists() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(tmp.path().join("invoices.json")).unwrap();
        let renderer = InvoiceRenderer::default();
        let order = order(vec![line("Widget", 1_000, 1)]);

        let mut service = InvoiceService::new(&mut store, &renderer);
        let invoice = service.generate_invoice(&order).unwrap();

        assert!(invoice.id.as_str().starts_with("INV-"));
        assert!(invoice.content.contains("Invoice ID: ORD-20240315-101500-ab12"));
        assert_eq!(
            service.latest_for_order(&order.id).unwrap(),
            Some(invoice.clone())
        );
        assert!(service
            .latest_for_order(&OrderId::new("ORD-other"))
            .unwrap()
            .is_none());

        let reopened: JsonStore<Invoice> =
            JsonStore::open(tmp.path().join("invoices.json")).unwrap();
        assert_eq!(reopened.items(), &[invoice]);
    }

    #[test]
    fn test_invoices_for_does_not_persist() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(tmp.path().join("invoices.json")).unwrap();
        let renderer = InvoiceRenderer::default();

        let service = InvoiceService::new(&mut store, &renderer);
        let invoices = service.invoices_for(&[order(vec![]), order(vec![])]);
        assert_eq!(invoices.len(), 2);
        assert!(store.is_empty());
    }
}
