//! Category and product management.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::instrument;

use storekeeper_core::{CategoryId, ProductId};

use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::{Category, MAX_UNIT_PRICE, NewCategory, NewProduct, Product};

/// Catalog service.
///
/// Validates category and product edits before they reach the store. Stock
/// levels change through [`crate::services::StockLedger`]; a full product
/// update here is the only other path and is validated the same way.
pub struct CatalogService<'a> {
    categories: &'a mut JsonStore<Category>,
    products: &'a mut JsonStore<Product>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(
        categories: &'a mut JsonStore<Category>,
        products: &'a mut JsonStore<Product>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories, re-read from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn list_categories(&mut self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.load_all()?)
    }

    /// Look up a category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCategory` if no category has this id.
    pub fn get_category(&self, id: &CategoryId) -> Result<Category, AppError> {
        self.categories
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::InvalidCategory(format!("Category with ID {id} not found")))
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCategory` for a blank name, or
    /// `AppError::FileFormat` if the document cannot be written.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub fn add_category(&mut self, input: NewCategory) -> Result<Category, AppError> {
        validate_category_name(&input.name)?;

        let category = Category::new(input, Utc::now());
        self.categories.add(category.clone())?;

        tracing::info!(category_id = %category.id, "Category created");
        Ok(category)
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCategory` for a blank name or unknown id.
    #[instrument(skip(self, category), fields(category_id = %category.id))]
    pub fn update_category(&mut self, category: Category) -> Result<(), AppError> {
        validate_category_name(&category.name)?;

        let id = category.id.clone();
        if !self.categories.update(category)? {
            return Err(AppError::InvalidCategory(format!(
                "Category with ID {id} not found"
            )));
        }
        Ok(())
    }

    /// Delete a category that no product references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCategory` if products still reference the
    /// category or the id is unknown.
    #[instrument(skip(self))]
    pub fn delete_category(&mut self, id: &CategoryId) -> Result<(), AppError> {
        let category = self.get_category(id)?;

        let referencing = self
            .products
            .load_all()?
            .iter()
            .filter(|product| &product.category_id == id)
            .count();
        if referencing > 0 {
            return Err(AppError::InvalidCategory(format!(
                "Category {} is still used by {referencing} product(s)",
                category.name
            )));
        }

        self.categories.delete(id)?;
        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, re-read from disk.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn list_products(&mut self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.load_all()?)
    }

    /// Products belonging to one category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be read.
    pub fn products_in_category(
        &mut self,
        category_id: &CategoryId,
    ) -> Result<Vec<Product>, AppError> {
        Ok(self
            .products
            .load_all()?
            .into_iter()
            .filter(|product| &product.category_id == category_id)
            .collect())
    }

    /// Look up a product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` if no product has this id.
    pub fn get_product(&self, id: &ProductId) -> Result<Product, AppError> {
        self.products
            .get_by_id(id)
            .cloned()
            .ok_or_else(|| AppError::InvalidProduct(format!("Product with ID {id} not found")))
    }

    /// Create a product in an existing category.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` for a blank name, non-positive price
    /// or negative stock, and `AppError::InvalidCategory` when the category
    /// does not exist.
    #[instrument(skip(self, input), fields(name = %input.name, category_id = %input.category_id))]
    pub fn add_product(&mut self, input: NewProduct) -> Result<Product, AppError> {
        validate_product(&input.name, input.price, input.quantity_in_stock)?;
        self.require_category(&input.category_id)?;

        let product = Product::new(input, Utc::now());
        self.products.add(product.clone())?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` for invalid fields or an unknown id,
    /// and `AppError::InvalidCategory` when the category does not exist.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn update_product(&mut self, product: Product) -> Result<(), AppError> {
        validate_product(&product.name, product.price, product.quantity_in_stock)?;
        self.require_category(&product.category_id)?;

        let id = product.id.clone();
        if !self.products.update(product)? {
            return Err(AppError::InvalidProduct(format!(
                "Product with ID {id} not found"
            )));
        }
        Ok(())
    }

    /// Delete a product. Past orders keep their line snapshots.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` if the id is unknown.
    #[instrument(skip(self))]
    pub fn delete_product(&mut self, id: &ProductId) -> Result<(), AppError> {
        if self.products.delete(id)? == 0 {
            return Err(AppError::InvalidProduct(format!(
                "Product with ID {id} not found"
            )));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Category lookup failures surface as `InvalidCategory` whatever the cause.
    fn require_category(&self, id: &CategoryId) -> Result<(), AppError> {
        self.get_category(id)
            .map(|_| ())
            .map_err(|_| AppError::InvalidCategory(format!("Category with ID {id} not found")))
    }
}

fn validate_category_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidCategory(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_product(name: &str, price: Decimal, quantity_in_stock: i32) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidProduct(
            "Product name cannot be empty".to_string(),
        ));
    }

    if price <= Decimal::ZERO {
        return Err(AppError::InvalidProduct(
            "Product price must be positive".to_string(),
        ));
    }

    if price > MAX_UNIT_PRICE {
        return Err(AppError::InvalidProduct(format!(
            "Product price cannot exceed {MAX_UNIT_PRICE}"
        )));
    }

    if quantity_in_stock < 0 {
        return Err(AppError::InvalidProduct(
            "Stock quantity cannot be negative".to_string(),
        ));
    }

    Ok(())
}
