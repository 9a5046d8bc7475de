//! Typed integer identifiers
//!
//! Every table in the marketplace is keyed by an auto-incrementing `i32`.
//! Wrapping each key in its own newtype keeps a `BeverageId` from being
//! passed where an `OrderId` is expected.

/// Define an `i32` newtype identifier.
///
/// The generated type serializes as a bare number, prints as a number and
/// parses from a path segment via `FromStr`.
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create an id from its raw value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Raw value of the id.
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

define_id!(UserId);
define_id!(BeverageId);
define_id!(InventoryId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(ReceiptId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_number() {
        let id = OrderId::new(42);
        assert_eq!(serde_json::to_value(id).unwrap(), serde_json::json!(42));

        let parsed: BeverageId = serde_json::from_value(serde_json::json!(7)).unwrap();
        assert_eq!(parsed.as_i32(), 7);
    }

    #[test]
    fn test_id_parses_from_path_segment() {
        assert_eq!("12".parse::<UserId>().unwrap(), UserId::new(12));
        assert!("abc".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn test_id_display() {
        assert_eq!(ReceiptId::new(3).to_string(), "3");
    }
}
