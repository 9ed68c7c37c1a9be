//! SVG histogram of fraud-risk scores

use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use domain_claims::ScoreHistogram;

use crate::error::PipelineError;

pub const CHART_TITLE: &str = "Distribution of Fraud Risk Scores";
pub const X_AXIS_LABEL: &str = "Fraud Risk Score";
pub const Y_AXIS_LABEL: &str = "Number of Claims";

const CHART_SIZE: (u32, u32) = (1000, 600);

/// Draws `histogram` as an SVG bar chart at `path`
///
/// An empty histogram still produces a chart with titled, empty axes.
pub fn write_score_chart(path: &Path, histogram: &ScoreHistogram) -> Result<(), PipelineError> {
    let chart_error = |e: &dyn std::fmt::Display| PipelineError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let (x_start, x_end) = histogram.range().unwrap_or((0.0, 1.0));
    let y_end = (histogram.max_count().max(1) as f64 * 1.1).ceil();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| chart_error(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_start..x_end, 0f64..y_end)
        .map_err(|e| chart_error(&e))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .y_label_formatter(&|count| format!("{count:.0}"))
        .draw()
        .map_err(|e| chart_error(&e))?;

    chart
        .draw_series(histogram.bins().iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|e| chart_error(&e))?;

    root.present().map_err(|e| chart_error(&e))?;

    info!(path = %path.display(), bins = histogram.bins().len(), "Score chart written");
    Ok(())
}
