//! Strongly-typed identifiers for domain entities
//!
//! The source datasets identify claims, providers and beneficiaries with
//! free-form strings (`CLM46614`, `PRV55912`, `BENE11001`). Newtype wrappers
//! keep the three kinds apart and carry the name of the source column each
//! one is read from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::value::Value;

macro_rules! define_id {
    ($name:ident, $column:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Source column holding this identifier
            pub const COLUMN: &'static str = $column;

            /// Creates an identifier from its textual form
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier text
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Reads the identifier from a cell
            ///
            /// Sentinel, marker and missing cells carry no identity and yield `None`.
            pub fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Text(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
                    Value::Integer(n) => Some(Self(n.to_string())),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::validation(concat!(
                        stringify!($name),
                        " cannot be empty"
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

define_id!(ClaimId, "ClaimID");
define_id!(ProviderId, "Provider");
define_id!(BeneficiaryId, "BeneID");
