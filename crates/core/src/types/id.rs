//! Newtype keys for type-safe references.
//!
//! Use the `define_key!` macro to create string-backed wrappers that prevent
//! accidentally passing a size where a product id is expected.

/// Macro to define a type-safe string key.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `is_blank()`
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use arcane_core::define_key;
/// define_key!(SkuCode);
/// define_key!(WarehouseCode);
///
/// let sku = SkuCode::new("hoodie-black");
/// let warehouse = WarehouseCode::new("hoodie-black");
///
/// // These are different types, so this won't compile:
/// // let _: SkuCode = warehouse;
/// assert_eq!(sku.as_str(), warehouse.as_str());
/// ```
#[macro_export]
macro_rules! define_key {
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
            /// Create a new key from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the key is empty once surrounding whitespace is removed.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<$name> for String {
            fn from(key: $name) -> Self {
                key.0
            }
        }
    };
}

define_key!(ProductId);
define_key!(VariantKey);

/// Size offered when the shopper has not picked one.
pub const DEFAULT_SIZE: &str = "S";

/// The fixed set of sizes a product can be ordered in.
pub const SIZE_OPTIONS: [&str; 4] = ["S", "M", "L", "XL"];

impl Default for VariantKey {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(ProductId::new("").is_blank());
        assert!(ProductId::new("   ").is_blank());
        assert!(!ProductId::new("p1").is_blank());
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&ProductId::new("p1")).unwrap_or_default();
        assert_eq!(json, "\"p1\"");
    }

    #[test]
    fn test_default_variant_is_small() {
        assert_eq!(VariantKey::default().as_str(), "S");
        assert!(SIZE_OPTIONS.contains(&DEFAULT_SIZE));
    }
}
