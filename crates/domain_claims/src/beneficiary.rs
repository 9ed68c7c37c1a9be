//! Beneficiary records
//!
//! Beneficiaries are read once and never modified by cleaning or scoring.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use core_kernel::{BeneficiaryId, Table, Value};

use crate::claim::{cell, columns, parse_date};

/// Chronic-condition flag values used by the source data
const CONDITION_PRESENT: i64 = 1;
const CONDITION_ABSENT: i64 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Beneficiary {
    pub id: Option<BeneficiaryId>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub race: Option<String>,
    /// Condition name (column without the `ChronicCond_` prefix) to flag
    pub chronic_conditions: BTreeMap<String, bool>,
}

impl Beneficiary {
    /// Reads every beneficiary of a table, in row order
    pub fn from_table(table: &Table) -> Vec<Beneficiary> {
        let schema = table.schema();
        let condition_columns: Vec<(usize, String)> = schema
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(position, column)| {
                column
                    .strip_prefix(columns::CHRONIC_CONDITION_PREFIX)
                    .map(|name| (position, name.to_string()))
            })
            .collect();

        table
            .rows()
            .iter()
            .map(|row| {
                let chronic_conditions = condition_columns
                    .iter()
                    .filter_map(|(position, name)| {
                        let flag = match row.get(*position).and_then(Value::as_i64) {
                            Some(CONDITION_PRESENT) => true,
                            Some(CONDITION_ABSENT) => false,
                            _ => return None,
                        };
                        Some((name.clone(), flag))
                    })
                    .collect();

                Beneficiary {
                    id: BeneficiaryId::from_value(cell(schema, row, columns::BENEFICIARY_ID)),
                    date_of_birth: match cell(schema, row, columns::DATE_OF_BIRTH) {
                        Value::Date(date) => Some(*date),
                        Value::Text(raw) => parse_date(raw),
                        _ => None,
                    },
                    gender: display_text(cell(schema, row, columns::GENDER)),
                    race: display_text(cell(schema, row, columns::RACE)),
                    chronic_conditions,
                }
            })
            .collect()
    }

    pub fn has_chronic_condition(&self) -> bool {
        self.chronic_conditions.values().any(|&present| present)
    }

    pub fn chronic_condition_count(&self) -> usize {
        self.chronic_conditions.values().filter(|&&present| present).count()
    }
}

/// Counts over the loaded beneficiaries, reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BeneficiarySummary {
    pub total: usize,
    pub with_chronic_condition: usize,
    /// Sum of flagged conditions over all beneficiaries
    pub chronic_conditions: usize,
    pub missing_birth_date: usize,
}

impl BeneficiarySummary {
    pub fn from_beneficiaries(beneficiaries: &[Beneficiary]) -> Self {
        beneficiaries.iter().fold(Self::default(), |summary, beneficiary| Self {
            total: summary.total + 1,
            with_chronic_condition: summary.with_chronic_condition
                + usize::from(beneficiary.has_chronic_condition()),
            chronic_conditions: summary.chronic_conditions + beneficiary.chronic_condition_count(),
            missing_birth_date: summary.missing_birth_date
                + usize::from(beneficiary.date_of_birth.is_none()),
        })
    }
}

fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Missing | Value::Unknown => None,
        other => Some(other.to_string()),
    }
}
