//! Equal-width histogram of risk scores

use serde::Serialize;

use crate::scoring::RiskScore;

pub const DEFAULT_BIN_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bins spanning `[min score, max score]`
///
/// Bins are half-open except the last, which is closed on the right, so
/// every score lands in exactly one bin. When every score is equal the range
/// is widened by half a point on each side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreHistogram {
    bins: Vec<HistogramBin>,
}

impl ScoreHistogram {
    pub fn from_scores(scores: &[RiskScore], bin_count: usize) -> Self {
        let (Some(&min), Some(&max)) = (scores.iter().min(), scores.iter().max()) else {
            return Self { bins: Vec::new() };
        };
        let bin_count = bin_count.max(1);

        let (low, high) = if min == max {
            (f64::from(min) - 0.5, f64::from(max) + 0.5)
        } else {
            (f64::from(min), f64::from(max))
        };
        let width = (high - low) / bin_count as f64;

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: low + width * i as f64,
                end: if i + 1 == bin_count {
                    high
                } else {
                    low + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &score in scores {
            let offset = ((f64::from(score) - low) / width).floor();
            let index = (offset.max(0.0) as usize).min(bin_count - 1);
            bins[index].count += 1;
        }

        Self { bins }
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.bins.first()?.start, self.bins.last()?.end))
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_score_counted_once() {
        let scores = [0, 0, 2, 3, 5, 7, 7];
        let histogram = ScoreHistogram::from_scores(&scores, DEFAULT_BIN_COUNT);

        assert_eq!(histogram.bins().len(), 10);
        assert_eq!(histogram.total(), scores.len());
        assert_eq!(histogram.range(), Some((0.0, 7.0)));
        assert_eq!(histogram.bins()[0].count, 2);
        assert_eq!(histogram.bins()[9].count, 2);
    }

    #[test]
    fn test_degenerate_range_is_widened() {
        let histogram = ScoreHistogram::from_scores(&[0, 0, 0], DEFAULT_BIN_COUNT);
        assert_eq!(histogram.range(), Some((-0.5, 0.5)));
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.max_count(), 3);
    }

    #[test]
    fn test_empty_scores() {
        assert!(ScoreHistogram::from_scores(&[], DEFAULT_BIN_COUNT).is_empty());
    }
}
