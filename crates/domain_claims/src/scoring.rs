//! Heuristic fraud-risk scoring
//!
//! Three fixed, independent rules each add points to a claim:
//!
//! | rule                    | source column            | points |
//! |-------------------------|--------------------------|--------|
//! | amount outlier          | `InscClaimAmtReimbursed` | 3      |
//! | duplicate identifier    | `ClaimID`                | 2      |
//! | high-frequency provider | `Provider`               | 2      |
//!
//! A rule whose source column is absent from the table contributes nothing
//! and reports [`RuleOutcome::SkippedMissingColumn`]. Scores are not clamped.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info, warn};

use core_kernel::{ClaimId, ProviderId, Table, Value};

use crate::claim::{columns, Claim};
use crate::cleaning::DuplicateEvidence;
use crate::error::ClaimError;
use crate::report::HIGH_RISK_THRESHOLD;

/// Fraud-risk score of one claim
pub type RiskScore = u32;

pub const AMOUNT_OUTLIER_POINTS: RiskScore = 3;
pub const DUPLICATE_CLAIM_POINTS: RiskScore = 2;
pub const HIGH_FREQUENCY_PROVIDER_POINTS: RiskScore = 2;

/// Amounts above this multiple of the mean are outliers
pub const AMOUNT_OUTLIER_MULTIPLIER: Decimal = Decimal::TWO;

/// Providers with more claims than this are high-frequency
pub const PROVIDER_CLAIM_LIMIT: usize = 100;

/// The scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRule {
    AmountOutlier,
    DuplicateClaim,
    HighFrequencyProvider,
}

impl RiskRule {
    pub const ALL: [RiskRule; 3] = [
        RiskRule::AmountOutlier,
        RiskRule::DuplicateClaim,
        RiskRule::HighFrequencyProvider,
    ];

    pub fn points(&self) -> RiskScore {
        match self {
            RiskRule::AmountOutlier => AMOUNT_OUTLIER_POINTS,
            RiskRule::DuplicateClaim => DUPLICATE_CLAIM_POINTS,
            RiskRule::HighFrequencyProvider => HIGH_FREQUENCY_PROVIDER_POINTS,
        }
    }

    pub fn source_column(&self) -> &'static str {
        match self {
            RiskRule::AmountOutlier => columns::REIMBURSED_AMOUNT,
            RiskRule::DuplicateClaim => columns::CLAIM_ID,
            RiskRule::HighFrequencyProvider => columns::PROVIDER,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskRule::AmountOutlier => "reimbursed amount above twice the mean",
            RiskRule::DuplicateClaim => "claim identifier submitted more than once",
            RiskRule::HighFrequencyProvider => "provider with more than 100 claims",
        }
    }
}

/// What a rule did on one scoring run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    Applied { flagged: usize },
    SkippedMissingColumn { column: String },
    /// The amount column holds no numeric value to average
    SkippedNoNumericValues,
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied { .. })
    }

    pub fn flagged(&self) -> usize {
        match self {
            RuleOutcome::Applied { flagged } => *flagged,
            _ => 0,
        }
    }
}

/// Rule outcomes and the statistics the rules were evaluated with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringReport {
    pub outcomes: Vec<(RiskRule, RuleOutcome)>,
    /// Mean over numeric amounts; sentinel and text cells are excluded
    pub amount_mean: Option<Decimal>,
    pub amount_threshold: Option<Decimal>,
    pub high_frequency_providers: Vec<ProviderId>,
}

impl ScoringReport {
    pub fn outcome(&self, rule: RiskRule) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|(r, _)| *r == rule)
            .map(|(_, outcome)| outcome)
    }

    pub fn fired(&self, rule: RiskRule) -> bool {
        self.outcome(rule).is_some_and(RuleOutcome::is_applied)
    }
}

/// A claim table carrying a `fraud_risk_score` column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredClaims {
    table: Table,
    scores: Vec<RiskScore>,
}

impl ScoredClaims {
    /// Rebuilds scored claims from a stored snapshot
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::MissingColumn` when the snapshot has no score
    /// column and `ClaimError::InvalidScore` for cells that are not
    /// non-negative integers.
    pub fn from_snapshot(table: Table) -> Result<Self, ClaimError> {
        let cells = table
            .column(columns::FRAUD_RISK_SCORE)
            .map_err(|_| ClaimError::MissingColumn(columns::FRAUD_RISK_SCORE.to_string()))?;

        let scores = cells
            .enumerate()
            .map(|(row, cell)| {
                cell.as_i64()
                    .and_then(|score| RiskScore::try_from(score).ok())
                    .ok_or_else(|| ClaimError::InvalidScore {
                        row,
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { table, scores })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn scores(&self) -> &[RiskScore] {
        &self.scores
    }

    pub fn score(&self, row: usize) -> Option<RiskScore> {
        self.scores.get(row).copied()
    }

    /// Typed view of the claim at `row`
    pub fn claim(&self, row: usize) -> Option<Claim> {
        self.table
            .rows()
            .get(row)
            .map(|r| Claim::from_row(self.table.schema(), r))
    }

    pub fn is_high_risk(&self, row: usize) -> bool {
        self.score(row).is_some_and(|score| score >= HIGH_RISK_THRESHOLD)
    }

    pub fn high_risk_count(&self) -> usize {
        self.scores.iter().filter(|&&s| s >= HIGH_RISK_THRESHOLD).count()
    }

    pub fn max_score(&self) -> Option<RiskScore> {
        self.scores.iter().copied().max()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn into_table(self) -> Table {
        self.table
    }
}

/// Output of a scoring run
#[derive(Debug, Clone)]
pub struct ScoringResult {
    pub claims: ScoredClaims,
    pub report: ScoringReport,
}

struct RuleEvaluation {
    outcome: RuleOutcome,
    hits: Vec<usize>,
}

impl RuleEvaluation {
    fn skipped(outcome: RuleOutcome) -> Self {
        Self {
            outcome,
            hits: Vec::new(),
        }
    }

    fn applied(hits: Vec<usize>) -> Self {
        Self {
            outcome: RuleOutcome::Applied { flagged: hits.len() },
            hits,
        }
    }
}

/// Applies the scoring rules to cleaned inpatient claims
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    /// Scores `table`, looking for duplicate identifiers in `table` itself
    ///
    /// On a deduplicated table the duplicate-claim rule finds nothing; use
    /// [`RiskScorer::score_with_evidence`] to score against the duplicates
    /// recorded before dedup.
    pub fn score(&self, table: &Table) -> ScoringResult {
        let evidence = DuplicateEvidence::from_table(table);
        self.score_with_evidence(table, &evidence)
    }

    /// Scores `table` using externally recorded duplicate evidence
    pub fn score_with_evidence(&self, table: &Table, evidence: &DuplicateEvidence) -> ScoringResult {
        let mut scores: Vec<RiskScore> = vec![0; table.len()];
        let mut outcomes = Vec::with_capacity(RiskRule::ALL.len());

        let (amount, amount_mean, amount_threshold) = amount_outlier(table);
        let duplicate = duplicate_claim(table, evidence);
        let (frequency, high_frequency_providers) = high_frequency_provider(table);

        for (rule, evaluation) in [
            (RiskRule::AmountOutlier, amount),
            (RiskRule::DuplicateClaim, duplicate),
            (RiskRule::HighFrequencyProvider, frequency),
        ] {
            match &evaluation.outcome {
                RuleOutcome::Applied { flagged } => {
                    debug!(rule = ?rule, flagged, "rule applied");
                }
                skipped => {
                    warn!(rule = ?rule, outcome = ?skipped, "rule skipped");
                }
            }
            for &row in &evaluation.hits {
                scores[row] += rule.points();
            }
            outcomes.push((rule, evaluation.outcome));
        }

        let table = table
            .clone()
            .with_computed_column(columns::FRAUD_RISK_SCORE, |row, _| {
                Value::Integer(i64::from(scores[row]))
            });
        let claims = ScoredClaims { table, scores };

        info!(
            claims = claims.len(),
            high_risk = claims.high_risk_count(),
            max_score = claims.max_score().unwrap_or(0),
            "scoring completed"
        );

        ScoringResult {
            claims,
            report: ScoringReport {
                outcomes,
                amount_mean,
                amount_threshold,
                high_frequency_providers,
            },
        }
    }
}

fn amount_outlier(table: &Table) -> (RuleEvaluation, Option<Decimal>, Option<Decimal>) {
    let Ok(cells) = table.column(columns::REIMBURSED_AMOUNT) else {
        return (
            RuleEvaluation::skipped(RuleOutcome::SkippedMissingColumn {
                column: columns::REIMBURSED_AMOUNT.to_string(),
            }),
            None,
            None,
        );
    };

    let amounts: Vec<Option<Decimal>> = cells.map(Value::as_decimal).collect();
    let numeric: Vec<Decimal> = amounts.iter().flatten().copied().collect();
    if numeric.is_empty() {
        return (
            RuleEvaluation::skipped(RuleOutcome::SkippedNoNumericValues),
            None,
            None,
        );
    }

    let mean = mean(&numeric);
    // A threshold beyond the Decimal range is exceeded by no amount
    let Some(threshold) = mean.checked_mul(AMOUNT_OUTLIER_MULTIPLIER) else {
        debug!(%mean, "amount threshold out of range, no outliers");
        return (RuleEvaluation::applied(Vec::new()), Some(mean), None);
    };
    let hits = amounts
        .iter()
        .enumerate()
        .filter(|(_, amount)| amount.is_some_and(|a| a > threshold))
        .map(|(row, _)| row)
        .collect();

    (RuleEvaluation::applied(hits), Some(mean), Some(threshold))
}

/// Arithmetic mean of a non-empty slice
///
/// Falls back to summing pre-divided terms when the plain sum leaves the
/// Decimal range.
fn mean(values: &[Decimal]) -> Decimal {
    let count = Decimal::from(values.len());
    match values
        .iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(*value))
    {
        Some(sum) => sum / count,
        None => values.iter().fold(Decimal::ZERO, |sum, value| {
            let term = *value / count;
            sum.checked_add(term).unwrap_or(if term.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            })
        }),
    }
}

fn duplicate_claim(table: &Table, evidence: &DuplicateEvidence) -> RuleEvaluation {
    let Ok(cells) = table.column(columns::CLAIM_ID) else {
        return RuleEvaluation::skipped(RuleOutcome::SkippedMissingColumn {
            column: columns::CLAIM_ID.to_string(),
        });
    };

    let hits = cells
        .enumerate()
        .filter(|(_, cell)| ClaimId::from_value(cell).is_some_and(|id| evidence.contains(&id)))
        .map(|(row, _)| row)
        .collect();

    RuleEvaluation::applied(hits)
}

fn high_frequency_provider(table: &Table) -> (RuleEvaluation, Vec<ProviderId>) {
    let Ok(cells) = table.column(columns::PROVIDER) else {
        return (
            RuleEvaluation::skipped(RuleOutcome::SkippedMissingColumn {
                column: columns::PROVIDER.to_string(),
            }),
            Vec::new(),
        );
    };

    let providers: Vec<Option<ProviderId>> = cells.map(ProviderId::from_value).collect();
    let mut counts: HashMap<&ProviderId, usize> = HashMap::new();
    for provider in providers.iter().flatten() {
        *counts.entry(provider).or_default() += 1;
    }

    let frequent: BTreeSet<ProviderId> = counts
        .into_iter()
        .filter(|(_, count)| *count > PROVIDER_CLAIM_LIMIT)
        .map(|(provider, _)| provider.clone())
        .collect();

    let hits = providers
        .iter()
        .enumerate()
        .filter(|(_, provider)| provider.as_ref().is_some_and(|p| frequent.contains(p)))
        .map(|(row, _)| row)
        .collect();

    (RuleEvaluation::applied(hits), frequent.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amounts_table(amounts: &[Value]) -> Table {
        let mut table = Table::new([columns::REIMBURSED_AMOUNT]).unwrap();
        for amount in amounts {
            table.push_row(vec![amount.clone()]).unwrap();
        }
        table
    }

    #[test]
    fn test_amount_outlier_mean_and_threshold() {
        let table = amounts_table(&[
            Value::Integer(10),
            Value::Integer(10),
            Value::Integer(10),
            Value::Integer(100),
        ]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(result.report.amount_mean, Some(dec!(32.5)));
        assert_eq!(result.report.amount_threshold, Some(dec!(65)));
        assert_eq!(result.claims.scores(), [0, 0, 0, 3]);
    }

    #[test]
    fn test_sentinel_amounts_excluded_from_mean() {
        let table = amounts_table(&[
            Value::Integer(10),
            Value::Unknown,
            Value::Integer(10),
            Value::Integer(10),
            Value::Integer(100),
        ]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(result.report.amount_mean, Some(dec!(32.5)));
        assert_eq!(result.claims.scores(), [0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_no_numeric_amounts_skips_rule() {
        let table = amounts_table(&[Value::Unknown, Value::text("n/a")]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(
            result.report.outcome(RiskRule::AmountOutlier),
            Some(&RuleOutcome::SkippedNoNumericValues)
        );
        assert_eq!(result.claims.scores(), [0, 0]);
    }

    fn large(digits_after_four: u32) -> Value {
        Value::Decimal(Decimal::from_i128_with_scale(4 * 10_i128.pow(digits_after_four), 0))
    }

    #[test]
    fn test_amount_sum_beyond_decimal_range() {
        let table = amounts_table(&[
            large(28),
            large(28),
            Value::Integer(0),
            Value::Integer(0),
            Value::Integer(0),
            Value::Integer(0),
        ]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(
            result.report.outcome(RiskRule::AmountOutlier),
            Some(&RuleOutcome::Applied { flagged: 2 })
        );
        assert_eq!(result.claims.scores(), [3, 3, 0, 0, 0, 0]);
    }

    #[test]
    fn test_amount_threshold_beyond_decimal_range() {
        let huge = Value::Decimal(Decimal::from_i128_with_scale(
            50_000_000_000_000_000_000_000_000_000,
            0,
        ));
        let table = amounts_table(&[huge.clone(), huge]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(
            result.report.outcome(RiskRule::AmountOutlier),
            Some(&RuleOutcome::Applied { flagged: 0 })
        );
        assert!(result.report.amount_mean.is_some());
        assert_eq!(result.report.amount_threshold, None);
        assert_eq!(result.claims.scores(), [0, 0]);
    }

    #[test]
    fn test_missing_columns_are_reported() {
        let table = amounts_table(&[Value::Integer(1)]);
        let result = RiskScorer::new().score(&table);

        assert!(result.report.fired(RiskRule::AmountOutlier));
        assert!(!result.report.fired(RiskRule::DuplicateClaim));
        assert!(!result.report.fired(RiskRule::HighFrequencyProvider));
        assert_eq!(
            result.report.outcome(RiskRule::HighFrequencyProvider),
            Some(&RuleOutcome::SkippedMissingColumn {
                column: "Provider".to_string()
            })
        );
    }

    #[test]
    fn test_score_column_appended() {
        let table = amounts_table(&[Value::Integer(1), Value::Integer(9)]);
        let result = RiskScorer::new().score(&table);
        let scored = result.claims.table();

        assert_eq!(scored.columns().last().map(String::as_str), Some("fraud_risk_score"));
        assert_eq!(scored.get(1, "fraud_risk_score"), Some(&Value::Integer(0)));
    }

    #[test]
    fn test_rescoring_replaces_scores() {
        let table = amounts_table(&[Value::Integer(1), Value::Integer(1), Value::Integer(10)]);
        let first = RiskScorer::new().score(&table);
        let second = RiskScorer::new().score(first.claims.table());

        assert_eq!(second.claims.scores(), first.claims.scores());
        assert_eq!(second.claims.table().columns(), first.claims.table().columns());
    }

    #[test]
    fn test_from_snapshot() {
        let table = amounts_table(&[Value::Integer(1), Value::Integer(10)]);
        let scored = RiskScorer::new().score(&table).claims;
        let restored = ScoredClaims::from_snapshot(scored.table().clone()).unwrap();
        assert_eq!(restored, scored);

        let err = ScoredClaims::from_snapshot(table).unwrap_err();
        assert!(matches!(err, ClaimError::MissingColumn(_)));
    }

    #[test]
    fn test_from_snapshot_rejects_negative_scores() {
        let table = Table::new([columns::FRAUD_RISK_SCORE])
            .unwrap()
            .with_column(columns::FRAUD_RISK_SCORE, vec![])
            .unwrap();
        assert!(ScoredClaims::from_snapshot(table).unwrap().is_empty());

        let mut table = Table::new([columns::FRAUD_RISK_SCORE]).unwrap();
        table.push_row(vec![Value::Integer(-1)]).unwrap();
        let err = ScoredClaims::from_snapshot(table).unwrap_err();
        assert!(matches!(err, ClaimError::InvalidScore { row: 0, .. }));
    }
}
