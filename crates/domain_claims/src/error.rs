//! Claims domain errors

use core_kernel::CoreError;
use thiserror::Error;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Required column missing: {0}")]
    MissingColumn(String),

    #[error("Invalid fraud risk score at row {row}: {value}")]
    InvalidScore { row: usize, value: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
