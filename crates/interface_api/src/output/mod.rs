//! Static outputs of a pipeline run
//!
//! - [`console`]: sample of high-risk claims for the terminal
//! - [`chart`]: SVG histogram of the score distribution
//! - [`dictionary`]: markdown data dictionary file

pub mod console;
pub mod chart;
pub mod dictionary;

use domain_claims::{columns, ProviderDirectory, ScoredRow};
use core_kernel::{Schema, Value};

/// Columns shown when a claim row is summarized
pub const SUMMARY_COLUMNS: [&str; 6] = [
    columns::CLAIM_ID,
    columns::PROVIDER,
    columns::BENEFICIARY_ID,
    columns::CLAIM_START_DATE,
    columns::REIMBURSED_AMOUNT,
    columns::FRAUD_RISK_SCORE,
];

/// Display text of the provider's `PotentialFraud` flag for a scored row
pub fn potential_fraud_label(row: &ScoredRow, providers: &ProviderDirectory) -> &'static str {
    match row
        .claim
        .provider
        .as_ref()
        .and_then(|provider| providers.potential_fraud(provider))
    {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Unknown",
    }
}

/// Display text of `column` in a scored row; absent columns render empty
pub fn cell_text(schema: &Schema, row: &ScoredRow, column: &str) -> String {
    schema
        .position(column)
        .and_then(|position| row.row.get(position))
        .map(Value::to_string)
        .unwrap_or_default()
}
