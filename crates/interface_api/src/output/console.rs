//! Terminal sample of high-risk claims

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use domain_claims::{columns, ProviderDirectory, Reporter, ScoredClaims, HIGH_RISK_THRESHOLD};

use super::{cell_text, potential_fraud_label, SUMMARY_COLUMNS};

/// Rows printed after a run
pub const CONSOLE_SAMPLE_ROWS: usize = 5;

/// Renders the first high-risk claims as a text table
pub fn render_high_risk_sample(claims: &ScoredClaims, providers: &ProviderDirectory) -> String {
    let reporter = Reporter::new(claims);
    let threshold = i64::from(HIGH_RISK_THRESHOLD);
    let rows = reporter.head(threshold, CONSOLE_SAMPLE_ROWS);
    if rows.is_empty() {
        return format!("No claims with {} >= {threshold}", columns::FRAUD_RISK_SCORE);
    }

    let schema = claims.table().schema();
    let shown: Vec<&str> = SUMMARY_COLUMNS
        .iter()
        .copied()
        .filter(|column| schema.contains(column))
        .collect();

    let mut header: Vec<&str> = shown.clone();
    header.push(columns::POTENTIAL_FRAUD);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in &rows {
        let mut cells: Vec<String> = shown
            .iter()
            .map(|column| cell_text(schema, row, column))
            .collect();
        cells.push(potential_fraud_label(row, providers).to_string());
        table.add_row(cells);
    }

    format!(
        "High-risk claims ({} >= {threshold}): {} of {}\n{table}",
        columns::FRAUD_RISK_SCORE,
        rows.len(),
        reporter.count(threshold),
    )
}
