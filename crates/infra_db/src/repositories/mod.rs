//! Repository implementations
//!
//! Repositories issue the SQL and map between SQLite rows and tables. They
//! report [`DatabaseError`](crate::DatabaseError)s; the adapters translate
//! those for the ports.

pub mod tables;

pub use tables::TableRepository;
