//! Record Store Infrastructure
//!
//! This crate provides the storage side of the screening pipeline: reading
//! the flat-file sources into tables and holding those tables in SQLite
//! through SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. [`TableRepository`] issues the
//! SQL and reports [`DatabaseError`]s; [`SqliteTableStore`] adapts it to the
//! `TableStore` port of `core_kernel` so the pipeline never sees SQL types.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, read_csv_table, DatabaseConfig, SqliteTableStore};
//!
//! let pool = create_pool(DatabaseConfig::new("sqlite://insurance_fraud.db")).await?;
//! let store = SqliteTableStore::new(pool);
//! let table = read_csv_table("data/Train.csv").await?;
//! store.replace_table(TableName::Providers, &table).await?;
//! ```

pub mod pool;
pub mod error;
pub mod ingest;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, DatabaseConfig};
pub use error::DatabaseError;
pub use ingest::{read_csv, read_csv_table};
pub use repositories::TableRepository;
pub use adapters::SqliteTableStore;
