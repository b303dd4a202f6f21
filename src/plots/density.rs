use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use crate::models::TransactionTable;
use crate::stats::gaussian_kde;

use super::style;

struct DensitySpec {
    caption: &'static str,
    x_desc: &'static str,
}

fn draw_density<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    non_fraud: &[(f64, f64)],
    fraud: &[(f64, f64)],
    x_max: f64,
    spec: &DensitySpec,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let peak = non_fraud
        .iter()
        .chain(fraud.iter())
        .map(|(_, d)| *d)
        .fold(0.0f64, f64::max);
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(spec.caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_desc)
        .y_desc("Density")
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    if !non_fraud.is_empty() {
        chart
            .draw_series(LineSeries::new(
                non_fraud.iter().copied(),
                style::NON_FRAUD.stroke_width(2),
            ))?
            .label("Non-Fraud Density")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], style::NON_FRAUD.stroke_width(2))
            });
    }
    if !fraud.is_empty() {
        chart
            .draw_series(LineSeries::new(
                fraud.iter().copied(),
                style::FRAUD.stroke_width(2),
            ))?
            .label("Fraud Density")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], style::FRAUD.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn save_density(
    plots_dir: &Path,
    stem: &str,
    non_fraud_values: &[f64],
    fraud_values: &[f64],
    spec: &DensitySpec,
) -> Result<()> {
    if non_fraud_values.is_empty() && fraud_values.is_empty() {
        warn!("{stem}: no rows, skipping");
        return Ok(());
    }
    let x_max = non_fraud_values
        .iter()
        .chain(fraud_values.iter())
        .copied()
        .fold(0.0f64, f64::max)
        + 1.0;
    let non_fraud = gaussian_kde(non_fraud_values, 0.0, x_max, 200);
    let fraud = gaussian_kde(fraud_values, 0.0, x_max, 200);

    let (png, svg) = style::chart_pair(plots_dir, stem)?;
    draw_density(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        &non_fraud,
        &fraud,
        x_max,
        spec,
    )?;
    draw_density(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        &non_fraud,
        &fraud,
        x_max,
        spec,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}

/// Mule score density, fraud vs non-fraud.
pub fn mule_score_density(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    let (non_fraud, fraud) = table.split_by_fraud(|t| t.mule_score_w);
    save_density(
        plots_dir,
        "06_mule_score_density",
        &non_fraud,
        &fraud,
        &DensitySpec {
            caption: "Mule Score - Fraud vs Non-Fraud",
            x_desc: "Mule Score",
        },
    )
}

/// Fraud signal score density, fraud vs non-fraud. Scores come from the
/// shared derivation so this chart can never drift from the evaluator.
pub fn fraud_score_density(scores: &[f64], labels: &[u8], plots_dir: &Path) -> Result<()> {
    let mut non_fraud = Vec::new();
    let mut fraud = Vec::new();
    for (&score, &label) in scores.iter().zip(labels) {
        if label == 1 {
            fraud.push(score);
        } else {
            non_fraud.push(score);
        }
    }
    save_density(
        plots_dir,
        "07_fraud_score_density",
        &non_fraud,
        &fraud,
        &DensitySpec {
            caption: "Fraud Signal Score - Fraud vs Non-Fraud",
            x_desc: "Fraud Signal Score",
        },
    )
}
