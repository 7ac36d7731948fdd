//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use rand::Rng;

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use delights_core::define_id;
/// define_id!(GadgetId);
/// define_id!(PocketId);
///
/// let gadget = GadgetId::new("anywhere-door");
/// assert_eq!(gadget.as_str(), "anywhere-door");
///
/// // These are different types, so this won't compile:
/// // let _: PocketId = gadget;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
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
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog and cart line IDs share the item id: a cart holds one line per item.
define_id!(ItemId);
define_id!(OrderNumber);

/// Prefix of every generated order number.
pub const ORDER_NUMBER_PREFIX: &str = "DORA-";

const ORDER_NUMBER_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const ORDER_NUMBER_SUFFIX_LEN: usize = 8;

impl OrderNumber {
    /// Generate a fresh order number such as `DORA-7KQ2M9XD`.
    ///
    /// The alphabet leaves out `0`, `O`, `1` and `I` so numbers read back
    /// over the phone survive.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let suffix: String = (0..ORDER_NUMBER_SUFFIX_LEN)
            .filter_map(|_| {
                ORDER_NUMBER_CHARSET
                    .get(rng.random_range(0..ORDER_NUMBER_CHARSET.len()))
                    .map(|&b| char::from(b))
            })
            .collect();
        Self(format!("{ORDER_NUMBER_PREFIX}{suffix}"))
    }
}
