//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. Identities are opaque
//! string tokens; the generation scheme only has to be collision resistant.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
/// - `generate()`, either a bare UUID v4 or `PREFIX-YYYYMMDD-HHMMSS-xxxx`
///
/// # Example
///
/// ```rust
/// # use storekeeper_core::define_id;
/// define_id!(ShelfId);
/// define_id!(ReceiptId, prefix = "RCT");
///
/// let shelf = ShelfId::generate();
/// let receipt = ReceiptId::generate();
/// assert_eq!(shelf.as_str().len(), 36);
/// assert!(receipt.as_str().starts_with("RCT-"));
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = receipt;
/// ```
#[macro_export]
macro_rules! define_id {
    (@base $name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identity token.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identity as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
    ($name:ident) => {
        $crate::define_id!(@base $name);

        impl $name {
            /// Generate a fresh identity (UUID v4).
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }
        }
    };
    ($name:ident, prefix = $prefix:literal) => {
        $crate::define_id!(@base $name);

        impl $name {
            /// Generate a fresh identity stamped with the current time.
            #[must_use]
            pub fn generate() -> Self {
                Self::generate_at(::chrono::Utc::now())
            }

            /// Generate an identity stamped with `at`.
            ///
            /// Four hex characters of a random UUID keep identities generated
            /// within the same second apart.
            #[must_use]
            pub fn generate_at(at: ::chrono::DateTime<::chrono::Utc>) -> Self {
                let suffix: String = ::uuid::Uuid::new_v4()
                    .simple()
                    .to_string()
                    .chars()
                    .take(4)
                    .collect();
                Self(format!("{}-{}-{}", $prefix, at.format("%Y%m%d-%H%M%S"), suffix))
            }
        }
    };
}

// Define standard entity IDs
define_id!(CategoryId);
define_id!(ProductId);
define_id!(UserId);
define_id!(OrderId, prefix = "ORD");
define_id!(InvoiceId, prefix = "INV");
