//! Opened stores plus configuration for one data directory.

use crate::config::BackofficeConfig;
use crate::db::Storage;
use crate::error::AppError;
use crate::services::{
    CatalogService, CheckoutCoordinator, InvoiceRenderer, InvoiceService, OrderService,
    StockLedger, UserService,
};

/// Application state owned by the front end.
///
/// Each accessor borrows the stores one service needs; only one service is
/// alive at a time.
#[derive(Debug)]
pub struct AppState {
    config: BackofficeConfig,
    storage: Storage,
    renderer: InvoiceRenderer,
}

impl AppState {
    /// Open every store under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::FileFormat` if a document cannot be created or parsed.
    pub fn open(config: BackofficeConfig) -> Result<Self, AppError> {
        let storage = Storage::open(&config.data_dir)?;
        let renderer = InvoiceRenderer::from_config(&config);

        tracing::info!(
            data_dir = %config.data_dir.display(),
            products = storage.products.len(),
            orders = storage.orders.len(),
            "Back office opened"
        );

        Ok(Self {
            config,
            storage,
            renderer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &BackofficeConfig {
        &self.config
    }

    #[must_use]
    pub const fn renderer(&self) -> &InvoiceRenderer {
        &self.renderer
    }

    pub const fn catalog(&mut self) -> CatalogService<'_> {
        CatalogService::new(&mut self.storage.categories, &mut self.storage.products)
    }

    pub const fn stock(&mut self) -> StockLedger<'_> {
        StockLedger::new(&mut self.storage.products)
    }

    pub const fn users(&mut self) -> UserService<'_> {
        UserService::new(&mut self.storage.users)
    }

    pub const fn orders(&mut self) -> OrderService<'_> {
        OrderService::new(&mut self.storage.orders)
    }

    pub const fn checkout(&mut self) -> CheckoutCoordinator<'_> {
        CheckoutCoordinator::new(&mut self.storage.products, &mut self.storage.orders)
    }

    pub const fn invoices(&mut self) -> InvoiceService<'_> {
        InvoiceService::new(&mut self.storage.invoices, &self.renderer)
    }
}
