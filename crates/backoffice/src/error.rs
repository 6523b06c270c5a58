//! Unified error handling for the back office.

use thiserror::Error;

use storekeeper_core::{PhoneError, UsernameError};

use crate::db::RepositoryError;

/// Application-level error type for back-office operations.
///
/// Every error is returned to the immediate caller; nothing is retried and
/// nothing is swallowed. The front end decides whether to re-prompt or abort.
#[derive(Debug, Error)]
pub enum AppError {
    /// Empty category name, or an unknown category id was referenced.
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// Empty product name, non-positive price, negative stock, or unknown id.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// Backing document unreadable, unparseable, unwritable, or wrong extension.
    #[error("File format error: {0}")]
    FileFormat(#[from] RepositoryError),

    /// Bad credentials or inactive account.
    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// Requested quantity exceeds what is available.
    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product name.
        product: String,
        /// Quantity that would be required.
        requested: i64,
        /// Quantity currently on hand.
        available: i64,
    },

    /// Blank required field, malformed phone/username, or empty cart.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Actor missing or lacking permission.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<PhoneError> for AppError {
    fn from(err: PhoneError) -> Self {
        Self::InvalidInput(format!(
            "{err}. Phone number must be in the format: 09xxxxxxxx (10 digits total, starting with 09)"
        ))
    }
}

impl From<UsernameError> for AppError {
    fn from(err: UsernameError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
