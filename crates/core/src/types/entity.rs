//! Identity capability for storable entities.

use core::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// An entity with a stable identity that can be persisted by the entity store.
///
/// The store is generic over this trait rather than over any particular
/// entity type: anything that can report its identity and round-trip
/// through serde can be stored.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use storekeeper_core::{Entity, ProductId};
///
/// #[derive(Clone, Serialize, Deserialize)]
/// struct Shelf {
///     id: ProductId,
///     label: String,
/// }
///
/// impl Entity for Shelf {
///     type Id = ProductId;
///
///     fn id(&self) -> &ProductId {
///         &self.id
///     }
/// }
/// ```
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Identity type. Compared for equality during lookup, update and delete.
    type Id: PartialEq + Clone + fmt::Debug + fmt::Display;

    /// The entity's identity. Assigned at creation and never reassigned.
    fn id(&self) -> &Self::Id;
}
