//! Storekeeper Back-office library.
//!
//! This crate provides the back-office functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Layers
//!
//! - [`db`] - Generic JSON document store, one file per entity type
//! - [`models`] - Persisted entities
//! - [`services`] - Catalog, stock ledger, users, cart, checkout, orders,
//!   invoices and reports
//! - [`state`] - Opened stores plus configuration
//!
//! Everything is synchronous and single-threaded. Exactly one process is
//! expected to touch a data directory at a time.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use error::AppError;
pub use state::AppState;
