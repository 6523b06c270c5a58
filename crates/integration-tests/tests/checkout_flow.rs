//! End-to-end tests for the point-of-sale flow.
//!
//! Cart, checkout, stock, invoices and reports working against real
//! documents in a temporary data directory.

#![allow(clippy::unwrap_used)]

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use storekeeper_backoffice::AppError;
use storekeeper_backoffice::services::{
    CartSession, CheckoutRequest, monthly_summary, render_monthly_report,
};
use storekeeper_core::{CurrencyCode, OrderStatus, PaymentMethod, UserRole};
use storekeeper_integration_tests::{TestStore, actor, seed_category, seed_product};

fn request(phone: &str) -> CheckoutRequest {
    CheckoutRequest {
        customer_name: "Ana Lopez".to_string(),
        phone: phone.to_string(),
        payment_method: PaymentMethod::Cash,
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Stock is only checked against the cart, not reserved: the store still
/// shows 5 units of A after the cart holds all of them.
#[test]
fn test_cart_reserves_nothing_but_caps_at_stock() {
    let mut store = TestStore::new();
    let category = seed_category(&mut store.state, "Snacks");
    let a = seed_product(&mut store.state, &category, "A", 1_000, 5);
    let b = seed_product(&mut store.state, &category, "B", 500, 0);

    let mut cart = CartSession::new();
    assert!(matches!(
        cart.add_item(&b, 1),
        Err(AppError::InsufficientStock { .. })
    ));
    cart.add_item(&a, 5).unwrap();
    assert!(matches!(
        cart.add_item(&a, 1),
        Err(AppError::InsufficientStock {
            requested: 6,
            available: 5,
            ..
        })
    ));

    let stored = store.state.catalog().get_product(&a.id).unwrap();
    assert_eq!(stored.quantity_in_stock, 5);
    assert_eq!(cart.item_count(), 5);
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_checkout_two_units_at_ten() {
    let mut store = TestStore::new();
    let category = seed_category(&mut store.state, "Snacks");
    let a = seed_product(&mut store.state, &category, "A", 1_000, 5);
    let clerk = actor("clerk", UserRole::Employee);

    let mut cart = CartSession::new();
    cart.add_item(&a, 2).unwrap();
    let order = store
        .state
        .checkout()
        .checkout(&mut cart, &request("0912345678"), Some(&clerk))
        .unwrap();

    assert_eq!(order.total_amount, Decimal::new(2_000, 2));
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.status, OrderStatus::Completed);
    assert!(cart.is_empty());

    let mut reopened = store.reopen();
    let stored = reopened.catalog().get_product(&a.id).unwrap();
    assert_eq!(stored.quantity_in_stock, 3);
    assert!(stored.last_restocked.is_some());
    assert_eq!(reopened.orders().all_orders().unwrap(), vec![order.clone()]);

    let json = store.document_json("orders.json");
    assert_eq!(json[0]["id"], order.id.as_str());
    assert_eq!(json[0]["total_amount"], "20.00");
}

#[test]
fn test_checkout_with_empty_cart_changes_nothing() {
    let mut store = TestStore::new();
    let category = seed_category(&mut store.state, "Snacks");
    seed_product(&mut store.state, &category, "A", 1_000, 5);
    let products_before = store.document("products.json");

    let result = store.state.checkout().checkout(
        &mut CartSession::new(),
        &request("0912345678"),
        Some(&actor("clerk", UserRole::Employee)),
    );

    assert!(matches!(result, Err(AppError::InvalidInput(_))));
    assert_eq!(store.document("products.json"), products_before);
    assert_eq!(store.document("orders.json"), "[]");
}

#[test]
fn test_checkout_phone_validation() {
    let mut store = TestStore::new();
    let category = seed_category(&mut store.state, "Snacks");
    let a = seed_product(&mut store.state, &category, "A", 1_000, 5);
    let clerk = actor("clerk", UserRole::Employee);

    for bad in ["123456789", "09123", "0812345678", "09123456ab", ""] {
        let mut cart = CartSession::new();
        cart.add_item(&a, 1).unwrap();
        let result = store
            .state
            .checkout()
            .checkout(&mut cart, &request(bad), Some(&clerk));
        assert!(
            matches!(result, Err(AppError::InvalidInput(_))),
            "{bad:?} should be rejected"
        );
        assert_eq!(cart.item_count(), 1);
    }

    let mut cart = CartSession::new();
    cart.add_item(&a, 1).unwrap();
    let order = store
        .state
        .checkout()
        .checkout(&mut cart, &request("0912345678"), Some(&clerk))
        .unwrap();
    assert_eq!(order.customer_phone, "0912345678");
}

/// Two carts built from the same stock: the second checkout must fail and
/// leave the first sale intact.
#[test]
fn test_second_cart_cannot_oversell() {
    let mut store = TestStore::new();
    let category = seed_category(&mut store.state, "Snacks");
    let a = seed_product(&mut store.state, &category, "A", 1_000, 3);
    let b = seed_product(&mut store.state, &category, "B", 250, 10);
    let clerk = actor("clerk", UserRole::Employee);

    let mut first = CartSession::new();
    first.add_item(&a, 2).unwrap();
    let mut second = CartSession::new();
    second.add_item(&b, 1).unwrap();
    second.add_item(&a, 2).unwrap();

    store
        .state
        .checkout()
        .checkout(&mut first, &request("0912345678"), Some(&clerk))
        .unwrap();
    let err = store
        .state
        .checkout()
        .checkout(&mut second, &request("0987654321"), Some(&clerk))
        .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { .. }));

    // B was not decremented even though its line came first
    let mut catalog = store.state.catalog();
    assert_eq!(catalog.get_product(&a.id).unwrap().quantity_in_stock, 1);
    assert_eq!(catalog.get_product(&b.id).unwrap().quantity_in_stock, 10);
    assert_eq!(catalog.list_products().unwrap().len(), 2);
    assert_eq!(store.state.orders().all_orders().unwrap().len(), 1);
    assert_eq!(second.item_count(), 3);
}

// =============================================================================
// Invoices and reports
// =============================================================================

#[test]
fn test_invoice_and_monthly_report_after_sales() {
    let mut store = TestStore::with_config(|config| {
        config.store_name = "CORNER SHOP".to_string();
        config.tax_rate = Decimal::new(10, 2);
    });
    let category = seed_category(&mut store.state, "Snacks");
    let chips = seed_product(&mut store.state, &category, "Chips", 150, 100);
    let cola = seed_product(&mut store.state, &category, "Cola", 200, 100);
    let clerk = actor("clerk", UserRole::Employee);

    let mut cart = CartSession::new();
    cart.add_item(&chips, 4).unwrap();
    cart.add_item(&cola, 1).unwrap();
    let order = store
        .state
        .checkout()
        .checkout(&mut cart, &request("0912345678"), Some(&clerk))
        .unwrap();

    let invoice = store.state.invoices().generate_invoice(&order).unwrap();
    assert!(invoice.content.contains("CORNER SHOP"));
    assert!(invoice.content.contains(&format!("Invoice ID: {}", order.id)));
    assert!(invoice.content.contains("Tax (10%):"));
    assert!(invoice.content.contains("$8.80"));
    assert_eq!(
        store.state.invoices().latest_for_order(&order.id).unwrap(),
        Some(invoice)
    );

    cart.add_item(&cola, 3).unwrap();
    store
        .state
        .checkout()
        .checkout(&mut cart, &request("0912345678"), Some(&clerk))
        .unwrap();

    let now = Utc::now();
    let orders = store
        .state
        .orders()
        .orders_by_month(now.year(), now.month())
        .unwrap();
    let summary = monthly_summary(&orders, now.year(), now.month());
    assert_eq!(summary.order_count, 2);
    assert_eq!(summary.units_sold, 8);
    assert_eq!(summary.revenue, Decimal::new(1_400, 2));
    assert_eq!(summary.top_products[0].product_name, "Chips");
    assert_eq!(summary.top_products[1].product_name, "Cola");

    assert_eq!(
        store
            .state
            .orders()
            .monthly_revenue(now.year(), now.month())
            .unwrap(),
        summary.revenue
    );

    let text = render_monthly_report(now.year(), now.month(), &summary, CurrencyCode::USD);
    assert!(text.contains("Total Revenue: $14.00"));
    assert!(text.contains("  Chips: 4 units"));
}
