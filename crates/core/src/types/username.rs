//! Back-office username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Fewer than the minimum number of characters.
    #[error("username must be at least {min} characters")]
    TooShort {
        /// Minimum allowed length.
        min: usize,
    },
    /// More than the maximum number of characters.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// A character outside `[A-Za-z0-9_]`.
    #[error("username may contain only letters, numbers, and underscores")]
    InvalidCharacter,
}

/// A login name for a back-office user.
///
/// ## Constraints
///
/// - Length: 3-20 characters
/// - Only ASCII letters, digits and underscore
///
/// Uniqueness is compared case-insensitively; see [`Username::collides_with`].
///
/// ## Examples
///
/// ```
/// use storekeeper_core::Username;
///
/// assert!(Username::parse("cashier_01").is_ok());
/// assert!(Username::parse("ab").is_err());
/// assert!(Username::parse("with space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum length.
    pub const MIN_LENGTH: usize = 3;

    /// Maximum length.
    pub const MAX_LENGTH: usize = 20;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is outside 3-20 characters or contains
    /// anything other than ASCII letters, digits and underscore.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(UsernameError::InvalidCharacter);
        }

        if s.len() < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
            });
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether two usernames collide under case-insensitive comparison.
    #[must_use]
    pub fn collides_with(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
