//! Stock ledger: the only writer of `Product::quantity_in_stock` besides
//! validated catalog edits.

use chrono::Utc;
use tracing::instrument;

use storekeeper_core::ProductId;

use crate::db::JsonStore;
use crate::error::AppError;
use crate::models::Product;

/// Products document as it was before a batch stock change.
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    products: Vec<Product>,
}

impl StockSnapshot {
    /// Products captured by the snapshot.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

/// Stock ledger.
///
/// Every adjustment keeps `quantity_in_stock >= 0` and stamps
/// `last_restocked`, including sales (negative deltas).
pub struct StockLedger<'a> {
    products: &'a mut JsonStore<Product>,
}

impl<'a> StockLedger<'a> {
    /// Create a new stock ledger.
    #[must_use]
    pub const fn new(products: &'a mut JsonStore<Product>) -> Self {
        Self { products }
    }

    /// Add `delta` units (negative to remove) to one product.
    ///
    /// Like [`StockLedger::apply_batch`], this works from the document on
    /// disk rather than the cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` for an unknown id and
    /// `AppError::InsufficientStock` if the result would be negative; stock
    /// is unchanged in both cases.
    #[instrument(skip(self))]
    pub fn adjust(&mut self, product_id: &ProductId, delta: i32) -> Result<Product, AppError> {
        let mut product = self
            .products
            .load_all()?
            .into_iter()
            .find(|product| &product.id == product_id)
            .ok_or_else(|| {
                AppError::InvalidProduct(format!("Product with ID {product_id} not found"))
            })?;

        product.quantity_in_stock = next_quantity(&product, i64::from(delta))?;
        product.last_restocked = Some(Utc::now());
        self.products.update(product.clone())?;

        tracing::info!(
            product_id = %product.id,
            delta,
            quantity_in_stock = product.quantity_in_stock,
            "Stock adjusted"
        );
        Ok(product)
    }

    /// Apply several deltas as one unit of work.
    ///
    /// Products are reloaded from disk, deltas for the same product are
    /// summed, and every resulting quantity is validated before anything is
    /// written. All changes then land in a single document rewrite. The
    /// returned snapshot can be passed to [`StockLedger::restore`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidProduct` or `AppError::InsufficientStock`
    /// for the first offending line, with nothing applied.
    #[instrument(skip(self, deltas), fields(lines = deltas.len()))]
    pub fn apply_batch(&mut self, deltas: &[(ProductId, i32)]) -> Result<StockSnapshot, AppError> {
        let before = self.products.load_all()?;
        let mut after = before.clone();

        let mut combined: Vec<(&ProductId, i64)> = Vec::with_capacity(deltas.len());
        for (id, delta) in deltas {
            match combined.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, total)) => *total += i64::from(*delta),
                None => combined.push((id, i64::from(*delta))),
            }
        }

        let now = Utc::now();
        for (id, delta) in combined {
            let product = after
                .iter_mut()
                .find(|product| &product.id == id)
                .ok_or_else(|| AppError::InvalidProduct(format!("Product with ID {id} not found")))?;
            product.quantity_in_stock = next_quantity(product, delta)?;
            product.last_restocked = Some(now);
        }

        self.products.save_all(after)?;
        tracing::info!("Stock batch applied");

        Ok(StockSnapshot { products: before })
    }

    /// Rewrite the products document from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if the document cannot be written.
    #[instrument(skip(self, snapshot))]
    pub fn restore(&mut self, snapshot: StockSnapshot) -> Result<(), AppError> {
        self.products.save_all(snapshot.products)?;
        tracing::warn!("Stock restored from snapshot");
        Ok(())
    }
}

/// Quantity after applying `delta`, refusing to go below zero.
fn next_quantity(product: &Product, delta: i64) -> Result<i32, AppError> {
    let available = i64::from(product.quantity_in_stock);
    let next = available + delta;

    if next < 0 {
        return Err(AppError::InsufficientStock {
            product: product.name.clone(),
            requested: -delta,
            available,
        });
    }

    i32::try_from(next).map_err(|_| {
        AppError::InvalidProduct(format!("Stock level for {} is out of range", product.name))
    })
}
