//! SQLite Table Store Adapter
//!
//! Implements the `TableStore` port with [`TableRepository`].
//!
//! ```rust,ignore
//! use core_kernel::{TableName, TableStore};
//! use infra_db::SqliteTableStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn TableStore> = Arc::new(SqliteTableStore::new(pool));
//! let providers = store.load_table(TableName::Providers).await?;
//! ```

use async_trait::async_trait;
use tracing::{debug, instrument};

use core_kernel::{PortError, Table, TableName, TableStore};

use crate::error::DatabaseError;
use crate::pool::{create_pool, DatabaseConfig, DatabasePool};
use crate::repositories::TableRepository;

/// SQLite-backed implementation of the `TableStore` port
#[derive(Debug, Clone)]
pub struct SqliteTableStore {
    repository: TableRepository,
}

impl SqliteTableStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            repository: TableRepository::new(pool),
        }
    }

    /// Opens a store on a fresh in-memory database
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(create_pool(DatabaseConfig::in_memory()).await?))
    }

    /// Returns the underlying repository for operations the port does not expose
    pub fn repository(&self) -> &TableRepository {
        &self.repository
    }

    /// Checks that the database answers queries
    pub async fn health_check(&self) -> Result<(), PortError> {
        self.repository.ping().await.map_err(PortError::from)
    }
}

#[async_trait]
impl TableStore for SqliteTableStore {
    #[instrument(skip_all, fields(table = %name, rows = table.len()))]
    async fn replace_table(&self, name: TableName, table: &Table) -> Result<(), PortError> {
        debug!("Replacing table");
        self.repository
            .replace(name.as_str(), table)
            .await
            .map_err(PortError::from)
    }

    #[instrument(skip_all, fields(table = %name))]
    async fn load_table(&self, name: TableName) -> Result<Table, PortError> {
        debug!("Loading table");
        self.repository
            .load(name.as_str())
            .await
            .map_err(PortError::from)
    }

    #[instrument(skip_all, fields(table = %name))]
    async fn row_count(&self, name: TableName) -> Result<u64, PortError> {
        self.repository
            .count(name.as_str())
            .await
            .map_err(PortError::from)
    }
}
