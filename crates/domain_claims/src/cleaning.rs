//! Claim table cleaning
//!
//! One pass over a raw claim table:
//!
//! 1. Date columns are parsed; text that is not a date becomes
//!    `Value::Unparseable` instead of failing the table.
//! 2. Every `Missing` cell becomes the `Unknown` sentinel.
//! 3. Rows are deduplicated on the claim identifier, keeping the first
//!    occurrence. The `Unknown` sentinel is an identifier value like any
//!    other here, so rows without an identifier collapse to the first one.
//!    The real identifiers that were duplicated are kept as
//!    [`DuplicateEvidence`] for the duplicate-claim rule.
//!
//! Bad data never raises an error; it degrades to sentinel and marker values.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info, warn};

use core_kernel::{ClaimId, Table, Value};

use crate::claim::{columns, parse_date};

/// Outcome of a cleaning step that depends on a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Applied,
    SkippedMissingColumn { column: String },
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }
}

/// Claim identifiers that occurred more than once in a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateEvidence {
    ids: BTreeSet<ClaimId>,
}

impl DuplicateEvidence {
    /// Collects the identifiers appearing more than once in `table`
    ///
    /// Rows without an identifier are ignored; a table without the identifier
    /// column has no evidence.
    pub fn from_table(table: &Table) -> Self {
        let Ok(cells) = table.column(columns::CLAIM_ID) else {
            return Self::default();
        };

        let mut counts: HashMap<ClaimId, usize> = HashMap::new();
        for id in cells.filter_map(ClaimId::from_value) {
            *counts.entry(id).or_default() += 1;
        }

        Self {
            ids: counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(id, _)| id)
                .collect(),
        }
    }

    pub fn contains(&self, id: &ClaimId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ClaimId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// What a cleaning pass did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    /// One entry per designated date column
    pub date_steps: Vec<(String, StepOutcome)>,
    pub dedup: StepOutcome,
    pub dates_parsed: usize,
    pub dates_unparseable: usize,
    pub cells_filled: usize,
    pub duplicates_removed: usize,
    /// Identifiers duplicated before dedup
    pub duplicate_evidence: DuplicateEvidence,
}

/// A cleaned table and the report of the pass that produced it
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub table: Table,
    pub report: CleaningReport,
}

/// Cleans claim tables
#[derive(Debug, Clone)]
pub struct Cleaner {
    id_column: String,
    date_columns: Vec<String>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::for_claims()
    }
}

impl Cleaner {
    /// Cleaner for the inpatient/outpatient claim layout
    pub fn for_claims() -> Self {
        Self::new(columns::CLAIM_ID, [columns::CLAIM_START_DATE])
    }

    pub fn new<I, S>(id_column: impl Into<String>, date_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_column: id_column.into(),
            date_columns: date_columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Cleans `table`, returning the cleaned table and a report
    pub fn clean(&self, table: Table) -> CleanedTable {
        let rows_in = table.len();

        let mut date_steps = Vec::with_capacity(self.date_columns.len());
        let mut present_dates: HashSet<&str> = HashSet::new();
        for column in &self.date_columns {
            if table.has_column(column) {
                present_dates.insert(column.as_str());
                date_steps.push((column.clone(), StepOutcome::Applied));
            } else {
                warn!(column = %column, "date column missing, skipping date normalization");
                date_steps.push((
                    column.clone(),
                    StepOutcome::SkippedMissingColumn { column: column.clone() },
                ));
            }
        }

        let mut dates_parsed = 0;
        let mut dates_unparseable = 0;
        let mut cells_filled = 0;
        let table = table.map_cells(|column, value| {
            let value = if present_dates.contains(column) {
                let normalized = normalize_date(value);
                match &normalized {
                    DateCell::Parsed(_) => dates_parsed += 1,
                    DateCell::Unparseable(_) => dates_unparseable += 1,
                    DateCell::Unchanged(_) => {}
                }
                normalized.into_value()
            } else {
                value
            };

            if value.is_missing() {
                cells_filled += 1;
                Value::Unknown
            } else {
                value
            }
        });

        let duplicate_evidence = DuplicateEvidence::from_table(&table);

        let (table, dedup) = match table.schema().position(&self.id_column) {
            Some(position) => {
                // Keyed on the cell text, so sentinel identifiers collapse too
                let mut seen: HashSet<String> = HashSet::new();
                let keep: Vec<usize> = table
                    .rows()
                    .iter()
                    .enumerate()
                    .filter(|(_, row)| {
                        let key = row.get(position).map(ToString::to_string).unwrap_or_default();
                        seen.insert(key)
                    })
                    .map(|(index, _)| index)
                    .collect();
                let deduped = if keep.len() == table.len() {
                    table
                } else {
                    table.select_rows(&keep)
                };
                (deduped, StepOutcome::Applied)
            }
            None => {
                warn!(column = %self.id_column, "identifier column missing, skipping deduplication");
                (
                    table,
                    StepOutcome::SkippedMissingColumn {
                        column: self.id_column.clone(),
                    },
                )
            }
        };

        let duplicates_removed = rows_in - table.len();
        debug!(
            dates_parsed,
            dates_unparseable,
            duplicate_ids = duplicate_evidence.len(),
            "cleaning details"
        );
        info!(
            rows_in,
            rows_out = table.len(),
            duplicates_removed,
            cells_filled,
            "cleaning completed"
        );

        CleanedTable {
            table,
            report: CleaningReport {
                date_steps,
                dedup,
                dates_parsed,
                dates_unparseable,
                cells_filled,
                duplicates_removed,
                duplicate_evidence,
            },
        }
    }
}

enum DateCell {
    Parsed(Value),
    Unparseable(Value),
    Unchanged(Value),
}

impl DateCell {
    fn into_value(self) -> Value {
        match self {
            DateCell::Parsed(v) | DateCell::Unparseable(v) | DateCell::Unchanged(v) => v,
        }
    }
}

fn normalize_date(value: Value) -> DateCell {
    let raw = match &value {
        Value::Text(raw) => raw.clone(),
        Value::Integer(n) => n.to_string(),
        Value::Decimal(d) => d.to_string(),
        // Missing is left for the sentinel fill; dates, sentinels and markers are final
        _ => return DateCell::Unchanged(value),
    };

    match parse_date(&raw) {
        Some(date) => DateCell::Parsed(Value::Date(date)),
        None => DateCell::Unparseable(Value::Unparseable(raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw_claims() -> Table {
        let mut table = Table::new(["ClaimID", "Provider", "ClaimStartDt"]).unwrap();
        for (id, provider, date) in [
            ("C1", Value::text("P1"), Value::text("2009-04-12")),
            ("C2", Value::Missing, Value::text("12/31/2009")),
            ("C1", Value::text("P9"), Value::text("2009-05-01")),
            ("C3", Value::text("P1"), Value::text("garbage")),
            ("C4", Value::text("P2"), Value::Missing),
        ] {
            table.push_row(vec![Value::text(id), provider, date]).unwrap();
        }
        table
    }

    #[test]
    fn test_dates_parsed_or_marked() {
        let cleaned = Cleaner::for_claims().clean(raw_claims());
        let table = &cleaned.table;

        assert_eq!(
            table.get(0, "ClaimStartDt"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2009, 4, 12).unwrap()))
        );
        assert_eq!(
            table.get(1, "ClaimStartDt"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2009, 12, 31).unwrap()))
        );
        assert_eq!(
            table.get(2, "ClaimStartDt"),
            Some(&Value::Unparseable("garbage".to_string()))
        );
        assert_eq!(table.get(3, "ClaimStartDt"), Some(&Value::Unknown));
        assert_eq!(cleaned.report.dates_parsed, 3);
        assert_eq!(cleaned.report.dates_unparseable, 1);
    }

    #[test]
    fn test_missing_cells_filled() {
        let cleaned = Cleaner::for_claims().clean(raw_claims());
        assert!(!cleaned.table.has_missing());
        assert_eq!(cleaned.table.get(1, "Provider"), Some(&Value::Unknown));
        assert_eq!(cleaned.report.cells_filled, 2);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let cleaned = Cleaner::for_claims().clean(raw_claims());
        let ids: Vec<String> = cleaned
            .table
            .column("ClaimID")
            .unwrap()
            .map(ToString::to_string)
            .collect();

        assert_eq!(ids, ["C1", "C2", "C3", "C4"]);
        assert_eq!(cleaned.table.get(0, "Provider"), Some(&Value::text("P1")));
        assert_eq!(cleaned.report.duplicates_removed, 1);
        assert!(cleaned.report.duplicate_evidence.contains(&ClaimId::new("C1")));
        assert_eq!(cleaned.report.duplicate_evidence.len(), 1);
    }

    #[test]
    fn test_rows_without_identifier_collapse_to_first() {
        let mut table = Table::new(["ClaimID", "Provider"]).unwrap();
        table.push_row(vec![Value::Missing, Value::text("P1")]).unwrap();
        table.push_row(vec![Value::Missing, Value::text("P2")]).unwrap();
        table.push_row(vec![Value::text("C1"), Value::text("P3")]).unwrap();

        let cleaned = Cleaner::for_claims().clean(table);
        let ids: Vec<String> = cleaned
            .table
            .column("ClaimID")
            .unwrap()
            .map(ToString::to_string)
            .collect();

        assert_eq!(ids, ["Unknown", "C1"]);
        assert_eq!(cleaned.table.get(0, "Provider"), Some(&Value::text("P1")));
        assert_eq!(cleaned.report.duplicates_removed, 1);
        assert!(cleaned.report.duplicate_evidence.is_empty());
    }

    #[test]
    fn test_missing_columns_skip_steps() {
        let mut table = Table::new(["Provider"]).unwrap();
        table.push_row(vec![Value::text("P1")]).unwrap();
        table.push_row(vec![Value::text("P1")]).unwrap();

        let cleaned = Cleaner::for_claims().clean(table);
        assert_eq!(cleaned.table.len(), 2);
        assert_eq!(
            cleaned.report.dedup,
            StepOutcome::SkippedMissingColumn { column: "ClaimID".to_string() }
        );
        assert!(!cleaned.report.date_steps[0].1.is_applied());
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = Cleaner::for_claims();
        let once = cleaner.clean(raw_claims());
        let twice = cleaner.clean(once.table.clone());

        assert_eq!(twice.table, once.table);
        assert_eq!(twice.report.duplicates_removed, 0);
        assert_eq!(twice.report.cells_filled, 0);
        assert_eq!(twice.report.dates_parsed, 0);
    }
}
