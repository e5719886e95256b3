//! Newtype identifiers.
//!
//! Using newtypes prevents accidentally mixing up a product ID with an
//! order number where both are plain strings on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of order numbers issued at checkout.
pub const ORDER_PREFIX: &str = "ORD";

/// Prefix of order numbers issued for custom-order requests.
pub const CUSTOM_ORDER_PREFIX: &str = "CO";

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Opaque identifier of a catalog product.
    ProductId
);
define_id!(
    /// Human-readable order number, e.g. `ORD-20240601-1A2B3C4D`.
    OrderNumber
);

impl OrderNumber {
    /// Generate an order number for today with a random suffix.
    pub fn generate(prefix: &str) -> Self {
        let today = chrono::Local::now().date_naive();
        let suffix: [u8; 4] = rand::random();
        Self::format(prefix, today, suffix)
    }

    /// Build an order number from its parts: `PREFIX-YYYYMMDD-HEX`.
    pub fn format(prefix: &str, date: NaiveDate, suffix: [u8; 4]) -> Self {
        let hex: String = suffix.iter().map(|b| format!("{:02X}", b)).collect();
        Self(format!("{}-{}-{}", prefix, date.format("%Y%m%d"), hex))
    }

    /// Prefix portion (`ORD`, `CO`, ...).
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }
}
