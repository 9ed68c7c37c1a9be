//! Claims DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

use core_kernel::Value;
use domain_claims::{
    ProviderDirectory, RiskRule, RiskScore, RuleOutcome, ScoredRow, ScoringReport,
    DASHBOARD_DEFAULT_MIN_SCORE, HIGH_RISK_THRESHOLD,
};

/// Bounds of the dashboard's score control
pub const MIN_SCORE_LOWER: i64 = 0;
pub const MIN_SCORE_UPPER: i64 = 10;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ClaimsQuery {
    #[validate(range(min = 0, max = 10, message = "must be between 0 and 10"))]
    pub min_score: Option<i64>,
}

impl ClaimsQuery {
    pub fn min_score(&self) -> i64 {
        self.min_score
            .unwrap_or(i64::from(DASHBOARD_DEFAULT_MIN_SCORE))
    }
}

/// One scored claim with all its columns
#[derive(Debug, Serialize)]
pub struct ClaimRecord {
    pub position: usize,
    pub fraud_risk_score: RiskScore,
    pub high_risk: bool,
    /// `PotentialFraud` flag of the claim's provider
    pub potential_fraud: Option<bool>,
    #[serde(serialize_with = "ordered_map")]
    pub fields: Vec<(String, Value)>,
}

impl ClaimRecord {
    pub fn from_row(row: &ScoredRow, columns: &[String], providers: &ProviderDirectory) -> Self {
        Self {
            position: row.position,
            fraud_risk_score: row.score,
            high_risk: row.score >= HIGH_RISK_THRESHOLD,
            potential_fraud: row
                .claim
                .provider
                .as_ref()
                .and_then(|provider| providers.potential_fraud(provider)),
            fields: columns
                .iter()
                .cloned()
                .zip(row.row.cells().iter().cloned())
                .collect(),
        }
    }
}

/// Serializes pairs as a map, keeping column order
fn ordered_map<S: Serializer>(fields: &[(String, Value)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(fields.iter().map(|(column, value)| (column, value)))
}

#[derive(Debug, Serialize)]
pub struct RuleSummary {
    pub rule: RiskRule,
    pub points: RiskScore,
    pub description: &'static str,
    #[serde(flatten)]
    pub outcome: RuleOutcome,
}

#[derive(Debug, Serialize)]
pub struct ScoringSummary {
    pub rules: Vec<RuleSummary>,
    pub amount_mean: Option<Decimal>,
    pub amount_threshold: Option<Decimal>,
}

impl From<&ScoringReport> for ScoringSummary {
    fn from(report: &ScoringReport) -> Self {
        Self {
            rules: report
                .outcomes
                .iter()
                .map(|(rule, outcome)| RuleSummary {
                    rule: *rule,
                    points: rule.points(),
                    description: rule.description(),
                    outcome: outcome.clone(),
                })
                .collect(),
            amount_mean: report.amount_mean,
            amount_threshold: report.amount_threshold,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimsResponse {
    pub min_score: i64,
    pub total_claims: usize,
    pub matched: usize,
    pub claims: Vec<ClaimRecord>,
    /// Absent when the claims were loaded from a stored snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringSummary>,
}
