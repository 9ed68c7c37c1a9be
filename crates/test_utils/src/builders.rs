//! Test Data Builders
//!
//! Builders for claim tables and CSV documents. Tests name only the columns
//! they care about.

use core_kernel::{Table, Value};
use domain_claims::columns;

/// Builder for claim tables with `ClaimID`, `Provider` and
/// `InscClaimAmtReimbursed` columns
#[derive(Debug, Default)]
pub struct ClaimTableBuilder {
    rows: Vec<[Value; 3]>,
}

impl ClaimTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one claim
    pub fn claim(mut self, id: &str, provider: &str, amount: i64) -> Self {
        self.rows.push([Value::text(id), Value::text(provider), Value::Integer(amount)]);
        self
    }

    /// Adds one claim with arbitrary cells
    pub fn claim_cells(mut self, id: Value, provider: Value, amount: Value) -> Self {
        self.rows.push([id, provider, amount]);
        self
    }

    /// Adds `count` claims of `provider`, identified `<prefix>0`, `<prefix>1`, ...
    pub fn provider_claims(mut self, prefix: &str, provider: &str, count: usize, amount: i64) -> Self {
        for n in 0..count {
            self.rows.push([
                Value::text(format!("{prefix}{n}")),
                Value::text(provider),
                Value::Integer(amount),
            ]);
        }
        self
    }

    pub fn build(self) -> Table {
        let mut table = Table::new([
            columns::CLAIM_ID,
            columns::PROVIDER,
            columns::REIMBURSED_AMOUNT,
        ])
        .expect("claim columns are distinct");
        for row in self.rows {
            table.push_row(row.to_vec()).expect("rows match the header");
        }
        table
    }
}

/// Builder for CSV text
#[derive(Debug)]
pub struct CsvBuilder {
    lines: Vec<String>,
}

impl CsvBuilder {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            lines: vec![headers.join(",")],
        }
    }

    /// Appends a row; fields are written as given, without quoting
    pub fn row(mut self, fields: &[&str]) -> Self {
        self.lines.push(fields.join(","));
        self
    }

    pub fn rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.lines.extend(rows.into_iter().map(|fields| fields.join(",")));
        self
    }

    pub fn build(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_table_builder() {
        let table = ClaimTableBuilder::new()
            .claim("C1", "P1", 10)
            .provider_claims("X", "P2", 3, 5)
            .build();

        assert_eq!(table.len(), 4);
        assert_eq!(table.get(3, columns::CLAIM_ID), Some(&Value::text("X2")));
    }

    #[test]
    fn test_csv_builder() {
        let csv = CsvBuilder::new(&["a", "b"]).row(&["1", ""]).build();
        assert_eq!(csv, "a,b\n1,\n");
    }
}
