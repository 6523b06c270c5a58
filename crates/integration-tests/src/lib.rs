//! Integration tests for Storekeeper.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storekeeper-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart, checkout, invoices and reports end to end
//! - `persistence` - Document layout and reopen behavior
//! - `users` - Bootstrap, login and account administration
//!
//! Every test runs against its own temporary data directory.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rust_decimal::Decimal;
use tempfile::TempDir;

use storekeeper_backoffice::AppState;
use storekeeper_backoffice::config::BackofficeConfig;
use storekeeper_backoffice::models::{Category, NewCategory, NewProduct, Product, User};
use storekeeper_core::{UserId, UserRole};

/// A back office opened on a fresh temporary directory.
pub struct TestStore {
    dir: TempDir,
    pub state: AppState,
}

impl TestStore {
    /// Open a store with default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or stores cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Open a store after adjusting the default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or stores cannot be created.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn with_config(adjust: impl FnOnce(&mut BackofficeConfig)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = BackofficeConfig::new(dir.path().join("data"));
        adjust(&mut config);
        let state = AppState::open(config).unwrap();
        Self { dir, state }
    }

    /// Directory holding the JSON documents.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Open a second, independent state on the same directory.
    ///
    /// # Panics
    ///
    /// Panics if the documents cannot be read.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn reopen(&self) -> AppState {
        AppState::open(self.state.config().clone()).unwrap()
    }

    /// Raw text of one document.
    ///
    /// # Panics
    ///
    /// Panics if the document does not exist.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn document(&self, file: &str) -> String {
        std::fs::read_to_string(self.data_dir().join(file)).unwrap()
    }

    /// Parsed JSON of one document.
    ///
    /// # Panics
    ///
    /// Panics if the document does not exist or is not JSON.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn document_json(&self, file: &str) -> serde_json::Value {
        serde_json::from_str(&self.document(file)).unwrap()
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a category.
///
/// # Panics
///
/// Panics if the category is rejected.
#[allow(clippy::unwrap_used)]
pub fn seed_category(state: &mut AppState, name: &str) -> Category {
    state
        .catalog()
        .add_category(NewCategory {
            name: name.to_string(),
            description: format!("{name} aisle"),
        })
        .unwrap()
}

/// Create a product priced in cents.
///
/// # Panics
///
/// Panics if the product is rejected.
#[allow(clippy::unwrap_used)]
pub fn seed_product(
    state: &mut AppState,
    category: &Category,
    name: &str,
    price_cents: i64,
    stock: i32,
) -> Product {
    state
        .catalog()
        .add_product(NewProduct {
            name: name.to_string(),
            description: String::new(),
            category_id: category.id.clone(),
            price: Decimal::new(price_cents, 2),
            quantity_in_stock: stock,
        })
        .unwrap()
}

/// An in-memory account that never touches the users document.
#[must_use]
pub fn actor(username: &str, role: UserRole) -> User {
    User {
        id: UserId::generate(),
        username: username.to_string(),
        password_hash: String::new(),
        full_name: username.to_string(),
        role,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// Whether a `.tmp` sibling was left behind anywhere in `dir`.
///
/// # Panics
///
/// Panics if the directory cannot be listed.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn has_leftover_temp_files(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .any(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
}
