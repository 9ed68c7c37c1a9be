//! Database error types

use std::path::PathBuf;

use core_kernel::{CoreError, PortError};
use thiserror::Error;

/// Errors raised by the record store and the CSV sources
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to open the database
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Table not present in the store
    #[error("Table not found: {0}")]
    NotFound(String),

    /// Constraint violation reported by SQLite
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Table shape the store cannot hold
    #[error("Schema error: {0}")]
    Schema(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Source file could not be opened
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Table(#[from] CoreError),

    /// Generic SQL error
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn not_found(table: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(table.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Maps SQLx errors onto specific variants using SQLite result codes
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // SQLITE_CONSTRAINT and its extended codes
                Some("19" | "275" | "531" | "787" | "1043" | "1299" | "1555" | "1811" | "2067") => {
                    DatabaseError::ConstraintViolation(db_err.message().to_string())
                }
                // SQLITE_CANTOPEN
                Some("14") => DatabaseError::ConnectionFailed(db_err.message().to_string()),
                _ => DatabaseError::QueryFailed(db_err.message().to_string()),
            },
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound(table) => PortError::NotFound { table },
            DatabaseError::ConnectionFailed(message) => PortError::Connection { message },
            DatabaseError::PoolExhausted => PortError::connection(error.to_string()),
            DatabaseError::Schema(message) => PortError::Transformation { message },
            DatabaseError::Table(ref source) => PortError::transformation(source.to_string()),
            other => PortError::Internal {
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }
}
