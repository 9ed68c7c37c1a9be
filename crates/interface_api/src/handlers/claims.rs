//! Claims handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::debug;

use domain_claims::Reporter;

use crate::dto::claims::{ClaimRecord, ClaimsQuery, ClaimsResponse, ScoringSummary};
use crate::{error::ApiError, AppState};

use super::validated_min_score;

/// Lists scored claims at or above `min_score`
pub async fn list_claims(
    State(state): State<AppState>,
    query: Result<Query<ClaimsQuery>, QueryRejection>,
) -> Result<Json<ClaimsResponse>, ApiError> {
    let min_score = validated_min_score(query)?;
    let results = &state.results;
    let columns = results.claims.table().columns();

    let claims: Vec<ClaimRecord> = Reporter::new(&results.claims)
        .filter(min_score)
        .iter()
        .map(|row| ClaimRecord::from_row(row, columns, &results.providers))
        .collect();
    debug!(min_score, matched = claims.len(), "Claims filtered");

    Ok(Json(ClaimsResponse {
        min_score,
        total_claims: results.claims.len(),
        matched: claims.len(),
        claims,
        scoring: results.report.as_ref().map(ScoringSummary::from),
    }))
}
