//! Back-office user model.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use storekeeper_core::{Entity, UserId, UserRole};

/// A back-office account.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name, unique case-insensitively.
    pub username: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Display name.
    #[serde(default)]
    pub full_name: String,
    /// Permission level.
    pub role: UserRole,
    /// Inactive accounts cannot log in or act.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Whether the user may manage other accounts.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &UserId {
        &self.id
    }
}

/// Input for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Plain-text password, hashed before storage.
    pub password: SecretString,
    /// Display name.
    pub full_name: String,
    /// Permission level.
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_debug_redacts_password_hash() {
        let user = User {
            id: UserId::new("u-1"),
            username: "cashier".to_string(),
            password_hash: "$argon2id$v=19$secret-material".to_string(),
            full_name: "Front Desk".to_string(),
            role: UserRole::Employee,
            is_active: true,
            created_at: Utc::now(),
        };

        let debug_output = format!("{user:?}");

        assert!(debug_output.contains("cashier"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-material"));
    }
}
