//! Request handlers

pub mod claims;
pub mod dashboard;
pub mod health;

use axum::extract::{rejection::QueryRejection, Query};
use validator::Validate;

use crate::dto::claims::ClaimsQuery;
use crate::error::ApiError;

/// Extracts and validates the `min_score` query of the dashboard routes
pub(crate) fn validated_min_score(
    query: Result<Query<ClaimsQuery>, QueryRejection>,
) -> Result<i64, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    query.validate()?;
    Ok(query.min_score())
}
