//! Interactive dashboard
//!
//! A single page: a range control for the minimum score and the table of
//! claims at or above it. Changing the control reloads the page with the
//! new `min_score`; every request re-filters the shared scored claims.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Html,
};
use html_escape::{encode_double_quoted_attribute, encode_text};

use domain_claims::{columns, Reporter, HIGH_RISK_THRESHOLD};

use crate::dto::claims::{ClaimsQuery, ScoringSummary, MIN_SCORE_LOWER, MIN_SCORE_UPPER};
use crate::error::ApiError;
use crate::output::potential_fraud_label;
use crate::pipeline::ScreeningResults;
use crate::AppState;

use super::validated_min_score;

pub const DASHBOARD_TITLE: &str = "Insurance Fraud Detection Dashboard";

/// Rows rendered into one page
pub const DASHBOARD_ROW_LIMIT: usize = 1_000;

const TEMPLATE: &str = include_str!("../templates/dashboard.html");

pub async fn dashboard(
    State(state): State<AppState>,
    query: Result<Query<ClaimsQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let min_score = validated_min_score(query)?;
    Ok(Html(render_dashboard(&state.results, min_score)))
}

/// Renders the dashboard page for `min_score`
pub fn render_dashboard(results: &ScreeningResults, min_score: i64) -> String {
    let reporter = Reporter::new(&results.claims);
    let matched = reporter.count(min_score);
    let rows = reporter.head(min_score, DASHBOARD_ROW_LIMIT);
    let column_names = results.claims.table().columns();

    let mut head: String = column_names
        .iter()
        .map(|column| format!("<th>{}</th>", encode_text(column)))
        .collect();
    head.push_str(&format!("<th>{}</th>", columns::POTENTIAL_FRAUD));

    let body: String = rows
        .iter()
        .map(|row| {
            let class = if row.score >= HIGH_RISK_THRESHOLD {
                " class=\"high-risk\""
            } else {
                ""
            };
            let cells: String = row
                .row
                .cells()
                .iter()
                .map(|cell| format!("<td>{}</td>", encode_text(&cell.to_string())))
                .collect();
            format!(
                "    <tr{class}>{cells}<td>{}</td></tr>\n",
                potential_fraud_label(row, &results.providers)
            )
        })
        .collect();

    let notice = if matched > rows.len() {
        format!("Showing the first {} of {matched} matching claims.", rows.len())
    } else if matched == 0 {
        "No claims at or above this score.".to_string()
    } else {
        String::new()
    };

    TEMPLATE
        .replace("{{{TITLE}}}", DASHBOARD_TITLE)
        .replace(
            "{{{MIN_SCORE}}}",
            &encode_double_quoted_attribute(&min_score.to_string()),
        )
        .replace("{{{SCORE_MIN}}}", &MIN_SCORE_LOWER.to_string())
        .replace("{{{SCORE_MAX}}}", &MIN_SCORE_UPPER.to_string())
        .replace("{{{MATCHED}}}", &matched.to_string())
        .replace("{{{TOTAL}}}", &results.claims.len().to_string())
        .replace("{{{HIGH_RISK}}}", &results.claims.high_risk_count().to_string())
        .replace("{{{RULES}}}", &render_rules(results))
        .replace("{{{NOTICE}}}", &notice)
        .replace("{{{TABLE_HEAD}}}", &head)
        .replace("{{{TABLE_BODY}}}", &body)
}

fn render_rules(results: &ScreeningResults) -> String {
    let Some(report) = results.report.as_ref() else {
        return String::new();
    };
    let summary = ScoringSummary::from(report);

    let items: String = summary
        .rules
        .iter()
        .map(|rule| {
            let status = if rule.outcome.is_applied() {
                format!("{} claims flagged", rule.outcome.flagged())
            } else {
                "skipped".to_string()
            };
            format!(
                "  <li>+{} {}: {}</li>\n",
                rule.points,
                encode_text(rule.description),
                status
            )
        })
        .collect();

    format!("<ul class=\"rules\">\n{items}</ul>")
}
