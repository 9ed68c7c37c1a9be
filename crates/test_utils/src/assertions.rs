//! Custom Test Assertions
//!
//! Assertions over cleaned and scored claim tables.

use std::collections::HashSet;

use core_kernel::{ClaimId, Table};
use domain_claims::{columns, ScoredClaims, ScoredRow};

/// Asserts that no cell of `table` is absent
pub fn assert_no_missing(table: &Table) {
    for (index, row) in table.rows().iter().enumerate() {
        if let Some(position) = row.cells().iter().position(|cell| cell.is_missing()) {
            panic!(
                "row {index} has a missing `{}` cell",
                table.columns()[position]
            );
        }
    }
}

/// Asserts that no claim identifier occurs twice, the sentinel included
pub fn assert_unique_claim_ids(table: &Table) {
    let mut seen = HashSet::new();
    for id in table
        .column(columns::CLAIM_ID)
        .expect("table has a claim identifier column")
        .map(ToString::to_string)
    {
        assert!(seen.insert(id.clone()), "claim {id} occurs more than once");
    }
}

/// Asserts the score of the claim identified by `id`
pub fn assert_claim_score(claims: &ScoredClaims, id: &str, expected: u32) {
    let wanted = ClaimId::new(id);
    let index = (0..claims.len())
        .find(|&i| claims.claim(i).and_then(|claim| claim.id).as_ref() == Some(&wanted))
        .unwrap_or_else(|| panic!("claim {id} not found"));
    let score = claims.score(index).expect("scored row");
    assert_eq!(score, expected, "claim {id} scored {score} instead of {expected}");
}

/// Asserts that every row meets `min_score` and row order is preserved
pub fn assert_filtered(rows: &[ScoredRow], min_score: i64) {
    for row in rows {
        assert!(
            i64::from(row.score) >= min_score,
            "row {} scored {} below {min_score}",
            row.position,
            row.score
        );
    }
    assert!(
        rows.windows(2).all(|pair| pair[0].position < pair[1].position),
        "filtered rows are out of order"
    );
}
