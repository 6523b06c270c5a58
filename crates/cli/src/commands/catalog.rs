//! Category, product and stock commands.

use rust_decimal::Decimal;

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::models::{NewCategory, NewProduct, User};
use storekeeper_core::{CategoryId, Money, ProductId};

use super::{CliError, emit, emit_rows, require_admin};

/// Arguments of `product add`.
pub struct ProductArgs {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i32,
    pub description: String,
}

// =============================================================================
// Categories
// =============================================================================

/// Create a category.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins and `InvalidCategory` for a blank name.
pub fn add_category(
    state: &mut AppState,
    actor: &User,
    name: String,
    description: String,
) -> Result<(), CliError> {
    require_admin(actor, "manage categories")?;
    let category = state
        .catalog()
        .add_category(NewCategory { name, description })?;
    emit(&format!("Created category '{}' ({})", category.name, category.id))
}

/// List categories.
///
/// # Errors
///
/// Returns `FileFormat` if the document cannot be read.
pub fn list_categories(state: &mut AppState) -> Result<(), CliError> {
    let categories = state.catalog().list_categories()?;
    emit_rows(
        &format!("{:<36}  {:<24}  {}", "ID", "NAME", "DESCRIPTION"),
        categories.iter().map(|category| {
            format!(
                "{:<36}  {:<24}  {}",
                category.id, category.name, category.description
            )
        }),
    )
}

/// Delete a category no product uses.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins and `InvalidCategory` if the category
/// is unknown or still in use.
pub fn delete_category(state: &mut AppState, actor: &User, id: &str) -> Result<(), CliError> {
    require_admin(actor, "manage categories")?;
    state.catalog().delete_category(&CategoryId::new(id))?;
    emit(&format!("Deleted category {id}"))
}

// =============================================================================
// Products
// =============================================================================

/// Create a product.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins, `InvalidProduct` or `InvalidCategory`
/// for bad input.
pub fn add_product(state: &mut AppState, actor: &User, args: ProductArgs) -> Result<(), CliError> {
    require_admin(actor, "manage products")?;
    let product = state.catalog().add_product(NewProduct {
        name: args.name,
        description: args.description,
        category_id: CategoryId::new(args.category),
        price: args.price,
        quantity_in_stock: args.stock,
    })?;
    emit(&format!("Created product '{}' ({})", product.name, product.id))
}

/// List products, optionally within one category.
///
/// # Errors
///
/// Returns `FileFormat` if the document cannot be read.
pub fn list_products(state: &mut AppState, category: Option<&str>) -> Result<(), CliError> {
    let currency = state.renderer().currency();
    let products = match category {
        Some(id) => state.catalog().products_in_category(&CategoryId::new(id))?,
        None => state.catalog().list_products()?,
    };

    emit_rows(
        &format!("{:<36}  {:<24}  {:>12}  {:>7}", "ID", "NAME", "PRICE", "STOCK"),
        products.iter().map(|product| {
            format!(
                "{:<36}  {:<24}  {:>12}  {:>7}",
                product.id,
                product.name,
                Money::new(product.price, currency).to_string(),
                product.quantity_in_stock
            )
        }),
    )
}

/// Add units to a product.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins, `InvalidArgument` for a
/// non-positive quantity and `InvalidProduct` for an unknown id.
pub fn restock(state: &mut AppState, actor: &User, id: &str, quantity: i32) -> Result<(), CliError> {
    require_admin(actor, "restock products")?;
    if quantity <= 0 {
        return Err(CliError::InvalidArgument(
            "--quantity",
            "must be positive".to_string(),
        ));
    }

    let product = state.stock().adjust(&ProductId::new(id), quantity)?;
    emit(&format!(
        "{} now has {} in stock",
        product.name, product.quantity_in_stock
    ))
}

/// Delete a product.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins and `InvalidProduct` for an unknown id.
pub fn delete_product(state: &mut AppState, actor: &User, id: &str) -> Result<(), CliError> {
    require_admin(actor, "manage products")?;
    state.catalog().delete_product(&ProductId::new(id))?;
    emit(&format!("Deleted product {id}"))
}
