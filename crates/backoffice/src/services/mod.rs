//! Business logic services for the back office.
//!
//! # Services
//!
//! - `cart` - In-memory cart for one point-of-sale session
//! - `catalog` - Category and product management
//! - `checkout` - Cart to order, with stock decrement and rollback
//! - `invoice` - Invoice rendering and storage
//! - `orders` - Order queries
//! - `report` - Sales summaries and report text
//! - `stock` - Stock ledger
//! - `users` - Login, account administration and admin bootstrap
//!
//! Services borrow the stores they need from [`crate::db::Storage`] for the
//! duration of one operation; [`crate::AppState`] hands them out.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod invoice;
pub mod orders;
pub mod report;
pub mod stock;
pub mod users;

pub use cart::CartSession;
pub use catalog::CatalogService;
pub use checkout::{CheckoutCoordinator, CheckoutRequest};
pub use invoice::{InvoiceRenderer, InvoiceService};
pub use orders::OrderService;
pub use report::{
    ProductSales, SalesSummary, monthly_summary, range_summary, render_monthly_report,
    render_range_report,
};
pub use stock::{StockLedger, StockSnapshot};
pub use users::{UserService, hash_password};
