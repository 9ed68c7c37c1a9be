//! Core Kernel - Foundational types for the claims fraud screening pipeline
//!
//! This crate provides the building blocks shared by every layer:
//! - Strongly-typed identifiers for claims, providers and beneficiaries
//! - Cell values carrying the `Unknown` sentinel and the unparseable-date marker
//! - Ordered tables with a checked schema
//! - The `TableStore` port implemented by the record store

pub mod value;
pub mod table;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use value::{Value, UNKNOWN_SENTINEL, UNPARSEABLE_MARKER};
pub use table::{Row, Schema, Table};
pub use identifiers::{BeneficiaryId, ClaimId, ProviderId};
pub use ports::{PortError, TableName, TableStore};
pub use error::CoreError;
