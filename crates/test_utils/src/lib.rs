//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! claims fraud screening test suite.
//!
//! # Modules
//!
//! - `fixtures`: source CSV files with known scoring results
//! - `builders`: builders for claim tables and CSV text
//! - `database`: in-memory record stores
//! - `assertions`: assertion helpers for cleaned and scored tables
//! - `generators`: property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
