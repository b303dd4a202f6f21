use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::evaluation::PrPoint;

use super::style;

fn draw<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, points: &[PrPoint]) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(
            "Precision-Recall Curve (Fraud Signal Score)",
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..1.05f64, 0f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc("Recall")
        .y_desc("Precision")
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|p| (p.recall, p.precision)),
        style::NON_FRAUD.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.recall, p.precision), 3, style::NON_FRAUD.filled())),
    )?;

    root.present()?;
    Ok(())
}

/// Render the precision-recall sweep as a PNG + SVG pair.
pub fn precision_recall_curve(points: &[PrPoint], plots_dir: &Path) -> Result<()> {
    let (png, svg) = style::chart_pair(plots_dir, "precision_recall_curve")?;
    draw(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        points,
    )?;
    draw(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        points,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}
