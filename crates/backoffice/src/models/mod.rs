//! Persisted domain models.
//!
//! Each model implements [`storekeeper_core::Entity`] so it can live in a
//! [`crate::db::JsonStore`]. Field names are the JSON attribute names.

pub mod category;
pub mod invoice;
pub mod order;
pub mod product;
pub mod user;

pub use category::{Category, NewCategory};
pub use invoice::Invoice;
pub use order::{LineItem, Order};
pub use product::{MAX_UNIT_PRICE, NewProduct, Product};
pub use user::{NewUser, User};
