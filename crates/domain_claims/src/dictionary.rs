//! Markdown data dictionary of the screened tables

use core_kernel::{Schema, TableName};

use crate::claim::columns;

const HEADING: &str = "## Data Dictionary for Insurance Fraud Detection";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Section {
    table: TableName,
    title: &'static str,
    fields: Vec<(&'static str, &'static str)>,
    additional: Vec<String>,
}

impl Section {
    fn describes(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| *name == column)
    }
}

/// Field descriptions for the four source tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDictionary {
    sections: Vec<Section>,
}

impl Default for DataDictionary {
    fn default() -> Self {
        Self::standard()
    }
}

impl DataDictionary {
    pub fn standard() -> Self {
        let sections = vec![
            Section {
                table: TableName::Beneficiaries,
                title: "Beneficiaries Table",
                fields: vec![
                    (columns::BENEFICIARY_ID, "Unique identifier for the patient"),
                    (columns::DATE_OF_BIRTH, "Date of birth"),
                    (columns::GENDER, "Gender code"),
                    (columns::RACE, "Racial classification code"),
                    ("ChronicCond_Diabetes", "Whether the patient has diabetes (1 = yes, 2 = no)"),
                ],
                additional: Vec::new(),
            },
            Section {
                table: TableName::InpatientClaims,
                title: "Inpatient Claims Table",
                fields: vec![
                    (columns::CLAIM_ID, "Unique claim identifier"),
                    (columns::PROVIDER, "Identifier of the provider (hospital or physician)"),
                    (columns::BENEFICIARY_ID, "Identifier of the patient"),
                    (columns::CLAIM_START_DATE, "Date the claim started"),
                    (columns::REIMBURSED_AMOUNT, "Amount reimbursed for the claim"),
                    (
                        columns::FRAUD_RISK_SCORE,
                        "Heuristic fraud-risk score; 4 or more is high-risk",
                    ),
                ],
                additional: Vec::new(),
            },
            Section {
                table: TableName::OutpatientClaims,
                title: "Outpatient Claims Table",
                fields: vec![
                    (columns::CLAIM_ID, "Unique claim identifier"),
                    (columns::REIMBURSED_AMOUNT, "Amount reimbursed for outpatient services"),
                ],
                additional: Vec::new(),
            },
            Section {
                table: TableName::Providers,
                title: "Providers Table",
                fields: vec![
                    (columns::PROVIDER, "Unique provider identifier"),
                    (columns::POTENTIAL_FRAUD, "Whether the provider is suspected of fraud (Yes/No)"),
                ],
                additional: Vec::new(),
            },
        ];
        Self { sections }
    }

    /// Lists the columns of `schema` that the standard text does not describe
    ///
    /// Tables without a section (the scored snapshot) are ignored.
    pub fn with_observed(mut self, table: TableName, schema: &Schema) -> Self {
        if let Some(section) = self.sections.iter_mut().find(|s| s.table == table) {
            let extra: Vec<String> = schema
                .columns()
                .iter()
                .filter(|column| !section.describes(column) && !section.additional.contains(column))
                .cloned()
                .collect();
            section.additional.extend(extra);
        }
        self
    }

    pub fn additional_columns(&self, table: TableName) -> &[String] {
        self.sections
            .iter()
            .find(|s| s.table == table)
            .map(|s| s.additional.as_slice())
            .unwrap_or(&[])
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(HEADING);
        out.push('\n');

        for section in &self.sections {
            out.push_str(&format!("\n### {}\n", section.title));
            for (name, description) in &section.fields {
                out.push_str(&format!("- **{name}**: {description}\n"));
            }
            if !section.additional.is_empty() {
                out.push_str("\nAdditional columns: ");
                let names: Vec<String> = section
                    .additional
                    .iter()
                    .map(|column| format!("`{column}`"))
                    .collect();
                out.push_str(&names.join(", "));
                out.push('\n');
            }
        }
        out
    }
}
