//! Claim records
//!
//! Inpatient and outpatient claims share one layout. Claims stay as table
//! rows through cleaning and scoring; [`Claim`] is the typed view used when a
//! single claim is displayed.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use core_kernel::{BeneficiaryId, ClaimId, ProviderId, Row, Schema, Value};

/// Column names of the source datasets
pub mod columns {
    use core_kernel::{BeneficiaryId, ClaimId, ProviderId};

    pub const CLAIM_ID: &str = ClaimId::COLUMN;
    pub const PROVIDER: &str = ProviderId::COLUMN;
    pub const BENEFICIARY_ID: &str = BeneficiaryId::COLUMN;
    pub const CLAIM_START_DATE: &str = "ClaimStartDt";
    pub const REIMBURSED_AMOUNT: &str = "InscClaimAmtReimbursed";
    pub const FRAUD_RISK_SCORE: &str = "fraud_risk_score";
    pub const POTENTIAL_FRAUD: &str = "PotentialFraud";
    pub const DATE_OF_BIRTH: &str = "DOB";
    pub const GENDER: &str = "Gender";
    pub const RACE: &str = "Race";
    pub const CHRONIC_CONDITION_PREFIX: &str = "ChronicCond_";
}

/// Date layouts accepted for claim dates, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses date text in any accepted layout
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
}

/// Claim start date after cleaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ClaimDate {
    Known(NaiveDate),
    Unknown,
    /// Source text that is not a date
    Unparseable(String),
}

impl ClaimDate {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Date(date) => ClaimDate::Known(*date),
            Value::Missing | Value::Unknown => ClaimDate::Unknown,
            Value::Unparseable(raw) => ClaimDate::Unparseable(raw.clone()),
            Value::Text(raw) => match parse_date(raw) {
                Some(date) => ClaimDate::Known(date),
                None => ClaimDate::Unparseable(raw.clone()),
            },
            other => {
                let raw = other.to_string();
                match parse_date(&raw) {
                    Some(date) => ClaimDate::Known(date),
                    None => ClaimDate::Unparseable(raw),
                }
            }
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ClaimDate::Known(date) => Some(*date),
            _ => None,
        }
    }
}

/// Typed view of one claim row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub id: Option<ClaimId>,
    pub provider: Option<ProviderId>,
    pub beneficiary: Option<BeneficiaryId>,
    pub start_date: ClaimDate,
    /// `None` when the amount is not numeric (e.g. the `Unknown` sentinel)
    pub reimbursed_amount: Option<Decimal>,
    /// Present on scored tables only
    pub fraud_risk_score: Option<u32>,
}

impl Claim {
    /// Reads a claim from a row laid out by `schema`
    ///
    /// Columns absent from the schema read as absent fields.
    pub fn from_row(schema: &Schema, row: &Row) -> Self {
        Self {
            id: ClaimId::from_value(cell(schema, row, columns::CLAIM_ID)),
            provider: ProviderId::from_value(cell(schema, row, columns::PROVIDER)),
            beneficiary: BeneficiaryId::from_value(cell(schema, row, columns::BENEFICIARY_ID)),
            start_date: ClaimDate::from_value(cell(schema, row, columns::CLAIM_START_DATE)),
            reimbursed_amount: cell(schema, row, columns::REIMBURSED_AMOUNT).as_decimal(),
            fraud_risk_score: cell(schema, row, columns::FRAUD_RISK_SCORE)
                .as_i64()
                .and_then(|score| u32::try_from(score).ok()),
        }
    }
}

static MISSING: Value = Value::Missing;

/// Cell of `row` in `column`; columns absent from the schema read as `Missing`
pub(crate) fn cell<'a>(schema: &Schema, row: &'a Row, column: &str) -> &'a Value {
    schema
        .position(column)
        .and_then(|position| row.get(position))
        .unwrap_or(&MISSING)
}
