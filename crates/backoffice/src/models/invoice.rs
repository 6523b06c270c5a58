//! Invoice model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeeper_core::{Entity, InvoiceId, OrderId};

/// A rendered invoice for one order.
///
/// Derived data: it can be regenerated from the order at any time and is not
/// a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice ID (`INV-YYYYMMDD-HHMMSS-xxxx`).
    pub id: InvoiceId,
    /// Order this invoice was rendered from.
    pub order_id: OrderId,
    /// Rendered invoice text.
    pub content: String,
    /// When the invoice was rendered.
    pub generated_at: DateTime<Utc>,
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &InvoiceId {
        &self.id
    }
}
