//! Storekeeper Core - Shared types library.
//!
//! This crate provides common types used across all Storekeeper components:
//! - `backoffice` - Persistence, checkout workflow, invoices and reports
//! - `cli` - Command-line front end for store management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no file access.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed identities, money, statuses, phone numbers and usernames

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
