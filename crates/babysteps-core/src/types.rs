//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A log ended before it started.
    #[error("log {log_id} ends before it starts")]
    EndBeforeStart { log_id: String },

    /// Unknown enum value coming from storage or user input.
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated account identifier, issued by the external auth provider.
    UserId, "user ID"
);

define_string_id!(
    /// A validated child identifier.
    BabyId, "baby ID"
);

define_string_id!(
    /// A validated log identifier.
    LogId, "log ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_empty_and_blank() {
        assert_eq!(
            BabyId::new("").unwrap_err(),
            ValidationError::Empty { field: "baby ID" }
        );
        assert!(LogId::new("   ").is_err());
        assert!(UserId::new("uid-1").is_ok());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = LogId::generate();
        let b = LogId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn ids_deserialize_through_validation() {
        let parsed: Result<BabyId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());

        let parsed: BabyId = serde_json::from_str("\"baby-1\"").unwrap();
        assert_eq!(parsed.as_str(), "baby-1");
    }
}
