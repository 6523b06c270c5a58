//! JSON document persistence.
//!
//! # Layout
//!
//! One document per entity type inside the data directory, each a top-level
//! JSON array:
//!
//! - `categories.json` - Product categories
//! - `products.json` - Catalog and stock levels
//! - `orders.json` - Completed checkouts
//! - `users.json` - Back-office accounts
//! - `invoices.json` - Rendered invoices (derived, regenerable)
//!
//! Missing documents are created as `[]` and a missing directory is created
//! on open. There is no cross-process locking.

pub mod json_store;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use json_store::JsonStore;

use crate::models::{Category, Invoice, Order, Product, User};

/// Document holding categories.
pub const CATEGORIES_FILE: &str = "categories.json";
/// Document holding products.
pub const PRODUCTS_FILE: &str = "products.json";
/// Document holding orders.
pub const ORDERS_FILE: &str = "orders.json";
/// Document holding users.
pub const USERS_FILE: &str = "users.json";
/// Document holding invoices.
pub const INVOICES_FILE: &str = "invoices.json";

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing path is not a `.json` document.
    #[error("invalid file format for {}: only JSON files are supported", .0.display())]
    InvalidExtension(PathBuf),

    /// Reading, writing or renaming the document failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not a JSON array of the expected entity.
    #[error("failed to load data from {}: {source}", path.display())]
    Parse {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The in-memory set could not be serialized.
    #[error("failed to save data to {}: {source}", path.display())]
    Serialize {
        /// Document path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

/// Every entity store of one data directory.
#[derive(Debug)]
pub struct Storage {
    /// Category documents.
    pub categories: JsonStore<Category>,
    /// Product documents.
    pub products: JsonStore<Product>,
    /// Order documents.
    pub orders: JsonStore<Order>,
    /// User documents.
    pub users: JsonStore<User>,
    /// Invoice documents.
    pub invoices: JsonStore<Invoice>,
}

impl Storage {
    /// Open (creating as needed) every document under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a directory or document cannot be created
    /// or an existing document cannot be parsed.
    pub fn open(data_dir: &Path) -> Result<Self, RepositoryError> {
        tracing::debug!(data_dir = %data_dir.display(), "Opening entity stores");

        Ok(Self {
            categories: JsonStore::open(data_dir.join(CATEGORIES_FILE))?,
            products: JsonStore::open(data_dir.join(PRODUCTS_FILE))?,
            orders: JsonStore::open(data_dir.join(ORDERS_FILE))?,
            users: JsonStore::open(data_dir.join(USERS_FILE))?,
            invoices: JsonStore::open(data_dir.join(INVOICES_FILE))?,
        })
    }
}
