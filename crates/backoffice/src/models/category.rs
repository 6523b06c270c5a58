//! Product category model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeeper_core::{CategoryId, Entity};

/// A product category.
///
/// Products reference categories by id; there is no cascade on delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category ID.
    pub id: CategoryId,
    /// Display name (never blank).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Build a category with a fresh identity.
    #[must_use]
    pub fn new(input: NewCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: CategoryId::generate(),
            name: input.name,
            description: input.description,
            created_at: now,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &CategoryId {
        &self.id
    }
}

/// Input for creating a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
}
