//! Customer phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Wrong number of characters.
    #[error("phone number must be exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required length.
        expected: usize,
        /// Length of the input.
        actual: usize,
    },
    /// The number does not start with `09`.
    #[error("phone number must start with 09")]
    WrongPrefix,
    /// A character other than an ASCII digit.
    #[error("phone number may contain digits only")]
    NonDigit,
}

/// A mobile phone number in the `09xxxxxxxx` format.
///
/// ## Constraints
///
/// - Exactly 10 ASCII digits
/// - Starts with `09`
///
/// ## Examples
///
/// ```
/// use storekeeper_core::Phone;
///
/// assert!(Phone::parse("0912345678").is_ok());
///
/// assert!(Phone::parse("123456789").is_err()); // too short, wrong prefix
/// assert!(Phone::parse("09123").is_err());     // too short
/// assert!(Phone::parse("091234567a").is_err()); // non-digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Required number of digits.
    pub const LENGTH: usize = 10;

    /// Required leading digits.
    pub const PREFIX: &'static str = "09";

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains anything but ASCII digits
    /// - Is not exactly 10 digits long
    /// - Does not start with `09`
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if s.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
                expected: Self::LENGTH,
                actual: s.len(),
            });
        }

        if !s.starts_with(Self::PREFIX) {
            return Err(PhoneError::WrongPrefix);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
