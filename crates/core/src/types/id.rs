//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - `FromStr`, accepting the decimal form produced by `Display`
///
/// Because the wrapper is transparent, it can be used as a JSON map key: it
/// serializes as `"7"` and parses back from the same string.
///
/// # Example
///
/// ```rust
/// # use sweet_bites_core::define_id;
/// define_id!(ShelfId);
///
/// let shelf: ShelfId = "12".parse().unwrap();
/// assert_eq!(shelf.as_i32(), 12);
/// assert_eq!(shelf.to_string(), "12");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_parses_display_form() {
        let id = ProductId::new(3);
        assert_eq!(id.to_string().parse::<ProductId>().unwrap(), id);
        assert_eq!(" 4 ".parse::<ProductId>().unwrap(), ProductId::new(4));
    }

    #[test]
    fn test_product_id_rejects_garbage() {
        assert!("abc".parse::<ProductId>().is_err());
        assert!("".parse::<ProductId>().is_err());
        assert!("1.5".parse::<ProductId>().is_err());
    }

    #[test]
    fn test_product_id_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(ProductId::new(2), 5_u32);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"2":5}"#);

        let back: std::collections::BTreeMap<ProductId, u32> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
