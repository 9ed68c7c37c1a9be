//! Score-threshold views over scored claims

use serde::Serialize;

use core_kernel::{Row, Table};

use crate::claim::Claim;
use crate::histogram::{ScoreHistogram, DEFAULT_BIN_COUNT};
use crate::scoring::{RiskScore, ScoredClaims};

/// Claims scoring at least this much are high-risk
pub const HIGH_RISK_THRESHOLD: RiskScore = 4;

/// Initial `min_score` of the interactive view
pub const DASHBOARD_DEFAULT_MIN_SCORE: RiskScore = 3;

/// One claim that passed a threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredRow {
    /// Row index in the scored table
    pub position: usize,
    pub score: RiskScore,
    pub claim: Claim,
    #[serde(skip)]
    pub row: Row,
}

/// Filters scored claims by minimum score
///
/// Every filter is a pure read of the scored table; rows keep their
/// original order.
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    claims: &'a ScoredClaims,
}

impl<'a> Reporter<'a> {
    pub fn new(claims: &'a ScoredClaims) -> Self {
        Self { claims }
    }

    /// Rows with `score >= min_score`; every row when `min_score <= 0`
    pub fn filter(&self, min_score: i64) -> Vec<ScoredRow> {
        self.matching(min_score).collect()
    }

    /// Rows at or above [`HIGH_RISK_THRESHOLD`]
    pub fn high_risk(&self) -> Vec<ScoredRow> {
        self.filter(i64::from(HIGH_RISK_THRESHOLD))
    }

    /// The first `n` rows of a filtered view
    pub fn head(&self, min_score: i64, n: usize) -> Vec<ScoredRow> {
        self.matching(min_score).take(n).collect()
    }

    /// The filtered view as a table with the scored table's columns
    pub fn filtered_table(&self, min_score: i64) -> Table {
        let positions: Vec<usize> = self.positions(min_score).collect();
        self.claims.table().select_rows(&positions)
    }

    pub fn count(&self, min_score: i64) -> usize {
        self.positions(min_score).count()
    }

    pub fn histogram(&self) -> ScoreHistogram {
        ScoreHistogram::from_scores(self.claims.scores(), DEFAULT_BIN_COUNT)
    }

    fn positions(&self, min_score: i64) -> impl Iterator<Item = usize> + 'a {
        self.claims
            .scores()
            .iter()
            .enumerate()
            .filter(move |(_, score)| i64::from(**score) >= min_score)
            .map(|(position, _)| position)
    }

    fn matching(&self, min_score: i64) -> impl Iterator<Item = ScoredRow> + 'a {
        let claims = self.claims;
        let schema = claims.table().schema();
        self.positions(min_score).map(move |position| {
            let row = claims.table().rows()[position].clone();
            ScoredRow {
                position,
                score: claims.scores()[position],
                claim: Claim::from_row(schema, &row),
                row,
            }
        })
    }
}
