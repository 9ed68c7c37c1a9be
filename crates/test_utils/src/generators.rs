//! Property-Based Test Generators
//!
//! Proptest strategies for raw claim tables, including the messy cells the
//! cleaning stage has to absorb.

use chrono::NaiveDate;
use proptest::prelude::*;

use core_kernel::{Table, Value};
use domain_claims::columns;

/// Strategy for claim identifiers drawn from a small pool, so duplicates occur
pub fn claim_id_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        8 => (0u32..20).prop_map(|n| Value::text(format!("CLM{n:05}"))),
        1 => Just(Value::Missing),
    ]
}

/// Strategy for provider identifiers
pub fn provider_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        8 => (0u32..4).prop_map(|n| Value::text(format!("PRV5100{n}"))),
        1 => Just(Value::Missing),
    ]
}

/// Strategy for reimbursed amounts, including non-numeric cells
pub fn amount_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        6 => (0i64..100_000).prop_map(Value::Integer),
        1 => Just(Value::Missing),
        1 => Just(Value::text("n/a")),
    ]
}

/// Strategy for raw claim start dates
pub fn raw_date_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (0i64..3_650).prop_map(|offset| {
            let date = NaiveDate::from_ymd_opt(2000, 1, 1)
                .expect("valid date")
                + chrono::Duration::days(offset);
            Value::text(date.format("%Y-%m-%d").to_string())
        }),
        1 => "[a-z]{3,8}".prop_map(Value::text),
        1 => Just(Value::Missing),
    ]
}

/// Strategy for raw claim tables of up to `max_rows` rows
pub fn claim_table_strategy(max_rows: usize) -> impl Strategy<Value = Table> {
    prop::collection::vec(
        (
            claim_id_strategy(),
            provider_strategy(),
            raw_date_strategy(),
            amount_strategy(),
        ),
        0..=max_rows,
    )
    .prop_map(|rows| {
        let mut table = Table::new([
            columns::CLAIM_ID,
            columns::PROVIDER,
            columns::CLAIM_START_DATE,
            columns::REIMBURSED_AMOUNT,
        ])
        .expect("claim columns are distinct");
        for (id, provider, date, amount) in rows {
            table
                .push_row(vec![id, provider, date, amount])
                .expect("rows match the header");
        }
        table
    })
}

/// Strategy for minimum-score thresholds, including out-of-range ones
pub fn min_score_strategy() -> impl Strategy<Value = i64> {
    -3i64..15
}
