//! Claims Screening Domain
//!
//! This crate holds the logic of the fraud screening pipeline: cleaning the
//! ingested claim tables, scoring inpatient claims with fixed heuristic rules,
//! and filtering the scored claims for display.
//!
//! # Pipeline
//!
//! ```text
//! raw table -> Cleaner -> cleaned table (+ duplicate evidence)
//!           -> RiskScorer -> scored table (+ rule outcomes)
//!           -> Reporter -> claims with score >= threshold
//! ```

pub mod claim;
pub mod beneficiary;
pub mod provider;
pub mod cleaning;
pub mod scoring;
pub mod report;
pub mod histogram;
pub mod dictionary;
pub mod error;

pub use claim::{columns, Claim, ClaimDate};
pub use beneficiary::{Beneficiary, BeneficiarySummary};
pub use provider::ProviderDirectory;
pub use cleaning::{CleanedTable, Cleaner, CleaningReport, DuplicateEvidence, StepOutcome};
pub use scoring::{RiskRule, RiskScore, RiskScorer, RuleOutcome, ScoredClaims, ScoringReport, ScoringResult};
pub use report::{Reporter, ScoredRow, HIGH_RISK_THRESHOLD, DASHBOARD_DEFAULT_MIN_SCORE};
pub use histogram::{HistogramBin, ScoreHistogram};
pub use dictionary::DataDictionary;
pub use error::ClaimError;
