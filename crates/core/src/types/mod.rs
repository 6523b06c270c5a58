//! Core types for Storekeeper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod entity;
pub mod id;
pub mod phone;
pub mod price;
pub mod status;
pub mod username;

pub use entity::Entity;
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use price::{CurrencyCode, Money};
pub use status::*;
pub use username::{Username, UsernameError};
