//! Point-of-sale and order history commands.

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::AppError;
use storekeeper_backoffice::models::{Invoice, Order, User};
use storekeeper_backoffice::services::orders::is_in_month;
use storekeeper_backoffice::services::{CartSession, CheckoutRequest};
use storekeeper_core::{Money, OrderId, PaymentMethod, ProductId};

use super::reports::check_month;
use super::{CliError, emit, emit_rows};

/// Build a cart from `PRODUCT_ID:QTY` lines, check out, and print the invoice.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for malformed lines or payment method,
/// or any checkout error from the back office.
pub fn checkout(
    state: &mut AppState,
    actor: &User,
    customer_name: String,
    phone: String,
    payment: &str,
    items: &[String],
) -> Result<(), CliError> {
    let payment_method: PaymentMethod = payment
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("--payment", e))?;

    let mut cart = CartSession::new();
    {
        let catalog = state.catalog();
        for raw in items {
            let (product_id, quantity) = parse_item(raw)?;
            let product = catalog.get_product(&product_id)?;
            cart.add_item(&product, quantity)?;
        }
    }

    let request = CheckoutRequest {
        customer_name,
        phone,
        payment_method,
    };
    let order = state.checkout().checkout(&mut cart, &request, Some(actor))?;
    let invoice = state.invoices().generate_invoice(&order)?;

    emit(&invoice.content)
}

/// List orders, optionally filtered by customer name.
///
/// # Errors
///
/// Returns `FileFormat` if the document cannot be read.
pub fn list_orders(state: &mut AppState, customer: Option<&str>) -> Result<(), CliError> {
    let currency = state.renderer().currency();
    let orders = match customer {
        Some(name) => state.orders().orders_by_customer(name)?,
        None => state.orders().all_orders()?,
    };

    emit_rows(
        &format!(
            "{:<26}  {:<19}  {:<20}  {:>5}  {:>12}  {}",
            "ID", "DATE", "CUSTOMER", "UNITS", "TOTAL", "STATUS"
        ),
        orders.iter().map(|order| {
            format!(
                "{:<26}  {:<19}  {:<20}  {:>5}  {:>12}  {}",
                order.id,
                order.order_date.format("%Y-%m-%d %H:%M:%S").to_string(),
                order.customer_name,
                order.units(),
                Money::new(order.total_amount, currency).to_string(),
                order.status
            )
        }),
    )
}

/// Print the stored invoice for an order, generating one if none exists.
///
/// # Errors
///
/// Returns `AppError::InvalidInput` for an unknown order.
pub fn show_invoice(state: &mut AppState, order_id: &str) -> Result<(), CliError> {
    let order = state
        .orders()
        .get_order(&OrderId::new(order_id))
        .ok_or_else(|| AppError::InvalidInput(format!("Order {order_id} not found")))?;

    let mut invoices = state.invoices();
    let invoice = match invoices.latest_for_order(&order.id)? {
        Some(invoice) => invoice,
        None => invoices.generate_invoice(&order)?,
    };

    emit(&invoice.content)
}

/// Print freshly rendered invoices for a customer, a month, or both.
///
/// Nothing is stored; stored invoices are shown by [`show_invoice`].
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for a month outside 1-12, or
/// `FileFormat` if the orders cannot be read.
pub fn list_invoices(
    state: &mut AppState,
    customer: Option<&str>,
    month: Option<(i32, u32)>,
) -> Result<(), CliError> {
    let invoices = matching_invoices(state, customer, month)?;
    if invoices.is_empty() {
        return emit("No matching orders");
    }

    let text = invoices
        .iter()
        .map(|invoice| invoice.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    emit(text.trim_end())
}

fn matching_invoices(
    state: &mut AppState,
    customer: Option<&str>,
    month: Option<(i32, u32)>,
) -> Result<Vec<Invoice>, CliError> {
    if let Some((_, month)) = month {
        check_month(month)?;
    }

    let orders: Vec<Order> = match (customer, month) {
        (Some(name), Some((year, month))) => state
            .orders()
            .orders_by_customer(name)?
            .into_iter()
            .filter(|order| is_in_month(order.order_date, year, month))
            .collect(),
        (Some(name), None) => state.orders().orders_by_customer(name)?,
        (None, Some((year, month))) => state.orders().orders_by_month(year, month)?,
        (None, None) => state.orders().all_orders()?,
    };

    Ok(state.invoices().invoices_for(&orders))
}

/// Parse `PRODUCT_ID:QTY`.
fn parse_item(raw: &str) -> Result<(ProductId, i32), CliError> {
    let (id, quantity) = raw.rsplit_once(':').ok_or_else(|| {
        CliError::InvalidArgument("--item", format!("expected PRODUCT_ID:QTY, got '{raw}'"))
    })?;

    let quantity = quantity
        .trim()
        .parse::<i32>()
        .map_err(|e| CliError::InvalidArgument("--item", format!("'{raw}': {e}")))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(CliError::InvalidArgument(
            "--item",
            format!("missing product id in '{raw}'"),
        ));
    }

    Ok((ProductId::new(id), quantity))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Utc};
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use storekeeper_backoffice::config::BackofficeConfig;
    use storekeeper_backoffice::models::{NewCategory, NewProduct};

    use super::*;

    fn sell(state: &mut AppState, actor: &User, product_id: &ProductId, customer: &str) {
        let product = state.catalog().get_product(product_id).unwrap();
        let mut cart = CartSession::new();
        cart.add_item(&product, 1).unwrap();

        let request = CheckoutRequest {
            customer_name: customer.to_string(),
            phone: "0912345678".to_string(),
            payment_method: PaymentMethod::Cash,
        };
        state
            .checkout()
            .checkout(&mut cart, &request, Some(actor))
            .unwrap();
    }

    #[test]
    fn test_matching_invoices_filters_by_customer_and_month() {
        let tmp = tempfile::tempdir().unwrap();
        let mut state = AppState::open(BackofficeConfig::new(tmp.path())).unwrap();
        let admin = state
            .users()
            .initialize_admin(&SecretString::from("Xk9#vQ2!mT7z"))
            .unwrap()
            .unwrap();

        let mut catalog = state.catalog();
        let category = catalog
            .add_category(NewCategory {
                name: "Snacks".to_string(),
                description: String::new(),
            })
            .unwrap();
        let chips = catalog
            .add_product(NewProduct {
                name: "Chips".to_string(),
                description: String::new(),
                category_id: category.id,
                price: Decimal::new(150, 2),
                quantity_in_stock: 10,
            })
            .unwrap();

        sell(&mut state, &admin, &chips.id, "Ana Lopez");
        sell(&mut state, &admin, &chips.id, "Bob");

        let now = Utc::now();
        let this_month = Some((now.year(), now.month()));

        let for_ana = matching_invoices(&mut state, Some("ana"), None).unwrap();
        assert_eq!(for_ana.len(), 1);
        let ana_invoice = for_ana.first().unwrap();
        assert!(ana_invoice.content.contains("Customer: Ana Lopez"));

        assert_eq!(matching_invoices(&mut state, None, this_month).unwrap().len(), 2);
        assert_eq!(matching_invoices(&mut state, Some("bob"), this_month).unwrap().len(), 1);
        assert!(
            matching_invoices(&mut state, None, Some((now.year() - 1, now.month())))
                .unwrap()
                .is_empty()
        );
        assert!(matches!(
            matching_invoices(&mut state, None, Some((now.year(), 13))),
            Err(CliError::InvalidArgument("--month", _))
        ));

        // Listing renders without storing
        assert!(state.invoices().latest_for_order(&ana_invoice.order_id).unwrap().is_none());
    }

    #[test]
    fn test_parse_item() {
        let (id, quantity) = parse_item("3f2c:4").unwrap();
        assert_eq!(id.as_str(), "3f2c");
        assert_eq!(quantity, 4);
    }

    #[test]
    fn test_parse_item_rejects_malformed() {
        for raw in ["3f2c", "3f2c:", ":2", "3f2c:two"] {
            assert!(
                matches!(parse_item(raw), Err(CliError::InvalidArgument("--item", _))),
                "{raw} should be rejected"
            );
        }
    }
}
