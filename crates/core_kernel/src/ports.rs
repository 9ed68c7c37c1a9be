//! Ports for the record store
//!
//! The pipeline only talks to storage through [`TableStore`]. The SQLite
//! adapter lives in `infra_db`; tests can substitute any other adapter.
//!
//! ```rust,ignore
//! let store = SqliteTableStore::new(pool);
//! store.replace_table(TableName::InpatientClaims, &table).await?;
//! let reloaded = store.load_table(TableName::InpatientClaims).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::table::Table;

/// Error type for port operations
///
/// Every store adapter maps its own failures onto this type so that the
/// pipeline handles storage errors uniformly.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested table does not exist
    #[error("Not found: table {table}")]
    NotFound { table: String },

    /// Stored data could not be mapped back into a table
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(table: impl fmt::Display) -> Self {
        PortError::NotFound {
            table: table.to_string(),
        }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Fixed names of the tables held by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Beneficiaries,
    InpatientClaims,
    OutpatientClaims,
    Providers,
    /// Snapshot of the scored inpatient claims
    InpatientClaimsScored,
}

impl TableName {
    /// The four tables loaded from external sources
    pub const SOURCES: [TableName; 4] = [
        TableName::Beneficiaries,
        TableName::InpatientClaims,
        TableName::OutpatientClaims,
        TableName::Providers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Beneficiaries => "beneficiaries",
            TableName::InpatientClaims => "inpatient_claims",
            TableName::OutpatientClaims => "outpatient_claims",
            TableName::Providers => "providers",
            TableName::InpatientClaimsScored => "inpatient_claims_scored",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage port for whole tables
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Writes `table` under `name`, replacing any prior table of that name
    async fn replace_table(&self, name: TableName, table: &Table) -> Result<(), PortError>;

    /// Reads the table stored under `name`
    async fn load_table(&self, name: TableName) -> Result<Table, PortError>;

    /// Number of rows stored under `name`
    async fn row_count(&self, name: TableName) -> Result<u64, PortError>;
}
