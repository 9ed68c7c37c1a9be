//! Tests for the claims screening domain

use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Table, Value};

use domain_claims::{
    columns, Cleaner, Reporter, RiskRule, RiskScorer, RuleOutcome, HIGH_RISK_THRESHOLD,
};

fn claims_table(rows: &[(&str, &str, i64)]) -> Table {
    let mut table = Table::new([
        columns::CLAIM_ID,
        columns::PROVIDER,
        columns::REIMBURSED_AMOUNT,
    ])
    .unwrap();
    for (id, provider, amount) in rows {
        table
            .push_row(vec![Value::text(*id), Value::text(*provider), Value::Integer(*amount)])
            .unwrap();
    }
    table
}

/// `count` claims of `provider`, numbered from `first`
fn provider_claims(provider: &str, first: usize, count: usize, amount: i64) -> Vec<(String, String, i64)> {
    (first..first + count)
        .map(|n| (format!("CLM{n:05}"), provider.to_string(), amount))
        .collect()
}

fn owned_table(rows: &[(String, String, i64)]) -> Table {
    let borrowed: Vec<(&str, &str, i64)> = rows
        .iter()
        .map(|(id, provider, amount)| (id.as_str(), provider.as_str(), *amount))
        .collect();
    claims_table(&borrowed)
}

// ============================================================================
// Scoring Rules
// ============================================================================

mod rule_tests {
    use super::*;

    #[test]
    fn test_amount_outlier_rule() {
        let table = claims_table(&[
            ("C1", "P1", 10),
            ("C2", "P1", 10),
            ("C3", "P1", 10),
            ("C4", "P1", 100),
        ]);
        let result = RiskScorer::new().score(&table);

        assert_eq!(result.report.amount_mean, Some(dec!(32.5)));
        assert_eq!(result.report.amount_threshold, Some(dec!(65)));
        assert_eq!(result.claims.scores(), [0, 0, 0, 3]);
        assert_eq!(
            result.report.outcome(RiskRule::AmountOutlier),
            Some(&RuleOutcome::Applied { flagged: 1 })
        );
    }

    #[test]
    fn test_amount_equal_to_threshold_is_not_flagged() {
        // mean 20, threshold 40
        let table = claims_table(&[("C1", "P1", 10), ("C2", "P1", 10), ("C3", "P1", 40)]);
        let result = RiskScorer::new().score(&table);
        assert_eq!(result.claims.scores(), [0, 0, 0]);
    }

    #[test]
    fn test_high_frequency_provider_rule() {
        let mut rows = provider_claims("P1", 0, 101, 100);
        rows.extend(provider_claims("P2", 101, 1, 100));
        let result = RiskScorer::new().score(&owned_table(&rows));

        let scores = result.claims.scores();
        assert!(scores[..101].iter().all(|&s| s == 2));
        assert_eq!(scores[101], 0);
        assert_eq!(result.report.high_frequency_providers.len(), 1);
        assert_eq!(result.report.high_frequency_providers[0].as_str(), "P1");
    }

    #[test]
    fn test_provider_with_exactly_limit_claims_is_not_flagged() {
        let rows = provider_claims("P1", 0, 100, 100);
        let result = RiskScorer::new().score(&owned_table(&rows));
        assert!(result.claims.scores().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_unknown_providers_are_not_counted() {
        let mut table = Table::new([columns::CLAIM_ID, columns::PROVIDER]).unwrap();
        for n in 0..150 {
            table
                .push_row(vec![Value::text(format!("C{n}")), Value::Unknown])
                .unwrap();
        }
        let result = RiskScorer::new().score(&table);
        assert!(result.claims.scores().iter().all(|&s| s == 0));
        assert!(result.report.high_frequency_providers.is_empty());
    }

    #[test]
    fn test_combined_rules() {
        let mut rows = provider_claims("P1", 0, 101, 10);
        rows.push(("CLM99999".to_string(), "P1".to_string(), 10_000));
        rows.push(("CLM88888".to_string(), "P2".to_string(), 10));
        let result = RiskScorer::new().score(&owned_table(&rows));
        let claims = &result.claims;

        // amount outlier + high-frequency provider
        assert_eq!(claims.score(101), Some(5));
        assert!(claims.is_high_risk(101));

        // high-frequency provider only
        assert_eq!(claims.score(0), Some(2));
        assert!(!claims.is_high_risk(0));

        assert_eq!(claims.score(102), Some(0));
        assert_eq!(claims.high_risk_count(), 1);
    }

    #[test]
    fn test_removing_a_column_skips_its_rule() {
        let mut table = Table::new([columns::CLAIM_ID, columns::REIMBURSED_AMOUNT]).unwrap();
        table.push_row(vec![Value::text("C1"), Value::Integer(5)]).unwrap();
        let result = RiskScorer::new().score(&table);

        assert!(result.report.fired(RiskRule::AmountOutlier));
        assert!(result.report.fired(RiskRule::DuplicateClaim));
        assert_eq!(
            result.report.outcome(RiskRule::HighFrequencyProvider),
            Some(&RuleOutcome::SkippedMissingColumn {
                column: columns::PROVIDER.to_string()
            })
        );
    }
}

// ============================================================================
// Cleaner and Scorer Together
// ============================================================================

mod pipeline_tests {
    use super::*;

    fn raw_with_duplicate() -> Table {
        claims_table(&[
            ("C1", "P1", 10),
            ("C2", "P1", 10),
            ("C1", "P2", 10),
            ("C3", "P3", 10),
        ])
    }

    #[test]
    fn test_duplicate_rule_uses_pre_dedup_evidence() {
        let cleaned = Cleaner::for_claims().clean(raw_with_duplicate());
        let result = RiskScorer::new()
            .score_with_evidence(&cleaned.table, &cleaned.report.duplicate_evidence);

        assert_eq!(result.claims.len(), 3);
        assert_eq!(result.claims.scores(), [2, 0, 0]);
        assert_eq!(
            result.report.outcome(RiskRule::DuplicateClaim),
            Some(&RuleOutcome::Applied { flagged: 1 })
        );
    }

    #[test]
    fn test_duplicate_rule_after_dedup_finds_nothing() {
        let cleaned = Cleaner::for_claims().clean(raw_with_duplicate());
        let result = RiskScorer::new().score(&cleaned.table);

        assert_eq!(result.claims.scores(), [0, 0, 0]);
        assert_eq!(
            result.report.outcome(RiskRule::DuplicateClaim),
            Some(&RuleOutcome::Applied { flagged: 0 })
        );
    }

    #[test]
    fn test_sentinel_amounts_are_scored_but_not_averaged() {
        let mut table = Table::new([columns::CLAIM_ID, columns::REIMBURSED_AMOUNT]).unwrap();
        for (id, amount) in [
            ("C1", Value::Integer(10)),
            ("C2", Value::Missing),
            ("C3", Value::Integer(10)),
            ("C4", Value::Integer(10)),
            ("C5", Value::Integer(100)),
        ] {
            table.push_row(vec![Value::text(id), amount]).unwrap();
        }

        let cleaned = Cleaner::for_claims().clean(table);
        assert_eq!(cleaned.table.get(1, columns::REIMBURSED_AMOUNT), Some(&Value::Unknown));

        let result = RiskScorer::new()
            .score_with_evidence(&cleaned.table, &cleaned.report.duplicate_evidence);
        assert_eq!(result.report.amount_mean, Some(dec!(32.5)));
        assert_eq!(result.claims.scores(), [0, 0, 0, 0, 3]);
    }

    #[test]
    fn test_clean_and_score_twice_is_identical() {
        let run = |table: Table| {
            let cleaned = Cleaner::for_claims().clean(table);
            RiskScorer::new()
                .score_with_evidence(&cleaned.table, &cleaned.report.duplicate_evidence)
                .claims
        };
        assert_eq!(run(raw_with_duplicate()), run(raw_with_duplicate()));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

fn arbitrary_cell(max: i64) -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Missing),
        4 => (0..max).prop_map(Value::Integer),
    ]
}

prop_compose! {
    fn arbitrary_claims()(
        rows in prop::collection::vec(
            (prop::option::of(0u8..8), arbitrary_cell(3), arbitrary_cell(500)),
            0..60,
        )
    ) -> Table {
        let mut table = Table::new([
            columns::CLAIM_ID,
            columns::PROVIDER,
            columns::REIMBURSED_AMOUNT,
        ])
        .unwrap();
        for (id, provider, amount) in rows {
            let id = id.map_or(Value::Missing, |n| Value::text(format!("C{n}")));
            let provider = match provider {
                Value::Integer(n) => Value::text(format!("P{n}")),
                other => other,
            };
            table.push_row(vec![id, provider, amount]).unwrap();
        }
        table
    }
}

proptest! {
    #[test]
    fn prop_cleaned_tables_have_no_missing_cells(table in arbitrary_claims()) {
        let cleaned = Cleaner::for_claims().clean(table);
        prop_assert!(!cleaned.table.has_missing());
    }

    #[test]
    fn prop_cleaned_identifiers_are_unique(table in arbitrary_claims()) {
        let cleaned = Cleaner::for_claims().clean(table);
        let ids: Vec<String> = cleaned
            .table
            .column(columns::CLAIM_ID)
            .unwrap()
            .map(ToString::to_string)
            .collect();
        let unique: std::collections::HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn prop_cleaning_is_idempotent(table in arbitrary_claims()) {
        let cleaner = Cleaner::for_claims();
        let once = cleaner.clean(table);
        let twice = cleaner.clean(once.table.clone());
        prop_assert_eq!(twice.table, once.table);
    }

    #[test]
    fn prop_reporter_returns_exactly_rows_at_or_above_threshold(
        table in arbitrary_claims(),
        threshold in -3i64..10,
    ) {
        let cleaned = Cleaner::for_claims().clean(table);
        let claims = RiskScorer::new()
            .score_with_evidence(&cleaned.table, &cleaned.report.duplicate_evidence)
            .claims;

        let expected: Vec<usize> = (0..claims.len())
            .filter(|&i| i64::from(claims.scores()[i]) >= threshold)
            .collect();
        let actual: Vec<usize> = Reporter::new(&claims)
            .filter(threshold)
            .iter()
            .map(|row| row.position)
            .collect();

        prop_assert_eq!(&actual, &expected);
        if threshold <= 0 {
            prop_assert_eq!(actual.len(), claims.len());
        }
    }

    #[test]
    fn prop_high_risk_matches_threshold(table in arbitrary_claims()) {
        let claims = RiskScorer::new().score(&Cleaner::for_claims().clean(table).table).claims;
        let high_risk = Reporter::new(&claims).high_risk();
        prop_assert_eq!(high_risk.len(), claims.high_risk_count());
        prop_assert!(high_risk.iter().all(|row| row.score >= HIGH_RISK_THRESHOLD));
    }
}

mod serialization {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_outcomes_serialize_with_tag() {
        let table = claims_table(&[
            ("C1", "P1", 10),
            ("C2", "P1", 10),
            ("C3", "P1", 10),
            ("C4", "P1", 100),
        ]);
        let report = RiskScorer::new().score(&table).report;

        let outcome = report.outcome(RiskRule::AmountOutlier).unwrap();
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            json!({"outcome": "applied", "flagged": 1})
        );
        assert_eq!(
            serde_json::to_value(RuleOutcome::SkippedMissingColumn {
                column: columns::PROVIDER.to_string()
            })
            .unwrap(),
            json!({"outcome": "skipped_missing_column", "column": "Provider"})
        );
    }
}
