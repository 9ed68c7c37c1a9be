//! Test Fixtures
//!
//! Source files with a known outcome. The inpatient fixture is laid out so
//! that every scoring rule fires:
//!
//! - `PRV51001` files 102 claims after deduplication (frequency rule)
//! - `CLM00000` appears twice in the source (duplicate rule)
//! - `CLM90001` and `CLM90004` exceed twice the mean amount (outlier rule)
//! - `CLM90002` has an unparseable start date, `CLM90003` a missing amount

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use core_kernel::TableName;

use crate::builders::CsvBuilder;

/// Expected results of cleaning and scoring the inpatient fixture
pub mod inpatient_expected {
    pub const RAW_ROWS: usize = 106;
    pub const CLEANED_ROWS: usize = 105;
    pub const DUPLICATES_REMOVED: usize = 1;
    /// Claims scoring at least 4
    pub const HIGH_RISK: usize = 2;
    /// Claims scoring at least 3
    pub const AT_DEFAULT_MIN_SCORE: usize = 3;
    pub const MAX_SCORE: u32 = 5;
    pub const FREQUENT_PROVIDER: &str = "PRV51001";

    /// Claim identifiers and their final score, for the claims not scoring 2
    pub const SCORES: &[(&str, u32)] = &[
        ("CLM00000", 4),
        ("CLM90001", 3),
        ("CLM90002", 0),
        ("CLM90003", 0),
        ("CLM90004", 5),
    ];
}

pub const INPATIENT_HEADERS: &[&str] = &[
    "BeneID",
    "ClaimID",
    "ClaimStartDt",
    "ClaimEndDt",
    "Provider",
    "InscClaimAmtReimbursed",
    "AttendingPhysician",
];

/// Inpatient claims source
pub fn inpatient_csv() -> String {
    let regular = (0..101).map(|n| {
        vec![
            format!("BENE{}", 11000 + n),
            format!("CLM{n:05}"),
            format!("2009-04-{:02}", n % 28 + 1),
            format!("2009-05-{:02}", n % 28 + 1),
            "PRV51001".to_string(),
            "1000".to_string(),
            format!("PHY{}", 390000 + n),
        ]
    });

    CsvBuilder::new(INPATIENT_HEADERS)
        .rows(regular)
        .row(&["BENE11000", "CLM00000", "2009-06-01", "2009-06-03", "PRV51001", "1000", "PHY390000"])
        .row(&["BENE11101", "CLM90001", "2009-06-01", "2009-06-10", "PRV51003", "50000", "PHY390101"])
        .row(&["BENE11102", "CLM90002", "not-a-date", "2009-06-10", "PRV51003", "2000", "PHY390102"])
        .row(&["BENE11103", "CLM90003", "", "", "PRV51004", "", ""])
        .row(&["BENE11104", "CLM90004", "12/24/2009", "12/30/2009", "PRV51001", "60000", "NA"])
        .build()
}

/// Outpatient claims source: four rows, one duplicated identifier
pub fn outpatient_csv() -> String {
    CsvBuilder::new(&["BeneID", "ClaimID", "ClaimStartDt", "Provider", "InscClaimAmtReimbursed"])
        .row(&["BENE11000", "CLM600001", "2009-03-01", "PRV51001", "70"])
        .row(&["BENE11001", "CLM600002", "2009-03-02", "PRV51003", "40"])
        .row(&["BENE11000", "CLM600001", "2009-03-01", "PRV51001", "70"])
        .row(&["BENE11002", "CLM600003", "2009-03-05", "", "300"])
        .build()
}

/// Beneficiary source: three beneficiaries
pub fn beneficiaries_csv() -> String {
    CsvBuilder::new(&["BeneID", "DOB", "Gender", "Race", "ChronicCond_Diabetes", "ChronicCond_Cancer"])
        .row(&["BENE11000", "1943-01-01", "1", "1", "1", "2"])
        .row(&["BENE11001", "1936-09-01", "2", "1", "2", "2"])
        .row(&["BENE11002", "", "1", "2", "2", "1"])
        .build()
}

/// Provider source with `PotentialFraud` labels
pub fn providers_csv() -> String {
    CsvBuilder::new(&["Provider", "PotentialFraud"])
        .row(&["PRV51001", "Yes"])
        .row(&["PRV51003", "No"])
        .row(&["PRV51004", "No"])
        .build()
}

/// The four source files written to a temporary directory
///
/// Output paths point into the same directory. The directory is removed on
/// drop.
pub struct SourceFiles {
    dir: TempDir,
}

impl SourceFiles {
    /// Writes the standard fixtures
    pub fn standard() -> Self {
        Self::with_inpatient(&inpatient_csv())
    }

    /// Writes the standard fixtures with a custom inpatient source
    pub fn with_inpatient(inpatient: &str) -> Self {
        let dir = tempfile::tempdir().expect("temporary directory");
        let files = Self { dir };
        files.write(TableName::Beneficiaries, &beneficiaries_csv());
        files.write(TableName::InpatientClaims, inpatient);
        files.write(TableName::OutpatientClaims, &outpatient_csv());
        files.write(TableName::Providers, &providers_csv());
        files
    }

    /// Overwrites one source file
    pub fn write(&self, table: TableName, contents: &str) {
        fs::write(self.source_path(table), contents).expect("fixture file written");
    }

    pub fn source_path(&self, table: TableName) -> PathBuf {
        self.dir.path().join(format!("{}.csv", table.as_str()))
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.dir.path().join("data_dictionary.md")
    }

    pub fn chart_path(&self) -> PathBuf {
        self.dir.path().join("fraud_risk_scores.svg")
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inpatient_fixture_row_count() {
        let lines = inpatient_csv().lines().count();
        assert_eq!(lines, inpatient_expected::RAW_ROWS + 1);
    }

    #[test]
    fn test_source_files_written() {
        let files = SourceFiles::standard();
        for table in TableName::SOURCES {
            assert!(files.source_path(table).exists());
        }
        assert!(!files.chart_path().exists());
    }
}
