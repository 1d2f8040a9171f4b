//! Newtype IDs for type-safe identifiers.
//!
//! Ids are assigned by the document store when a record is created. A
//! record built locally carries an unassigned (empty) id until then.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// A unique identifier.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// An id for a record the store has not seen yet.
            pub fn unassigned() -> Self {
                Self(String::new())
            }

            /// Whether the store has assigned this id.
            pub fn is_assigned(&self) -> bool {
                !self.0.is_empty()
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

define_id!(ProductId);
define_id!(OrderId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
        assert!(id.is_assigned());
    }

    #[test]
    fn test_unassigned() {
        assert!(!OrderId::unassigned().is_assigned());
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ProductId::new("p1")).unwrap();
        assert_eq!(json, "\"p1\"");
    }

    #[test]
    fn test_id_equality() {
        let id1 = OrderId::new("same");
        let id2: OrderId = "same".into();
        let id3 = OrderId::new("different");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }
}
