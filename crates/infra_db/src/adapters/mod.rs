//! Port adapters
//!
//! Adapters implement the `core_kernel` ports on top of the repositories
//! and translate `DatabaseError` into `PortError`.

pub mod table_store;

pub use table_store::SqliteTableStore;
