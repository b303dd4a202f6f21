use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::{info, warn};

use crate::models::TransactionTable;
use crate::stats::{gaussian_kde, histogram, quantile, HistBin};

use super::style;

struct Marker {
    label: &'static str,
    value: f64,
    color: RGBColor,
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bins: &[HistBin],
    markers: &[Marker],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_min = bins.first().map(|b| b.lo).unwrap_or(0.0);
    let mut x_max = bins.last().map(|b| b.hi).unwrap_or(1.0);
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption("Transaction Amount Distribution (Log Scale)", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc("log(amount + 1)")
        .y_desc("Frequency")
        .light_line_style(BLACK.mix(0.1))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new(
            [(b.lo, 0.0), (b.hi, b.count as f64)],
            style::NON_FRAUD.mix(0.6).filled(),
        )
    }))?;

    for m in markers {
        let color = m.color;
        chart
            .draw_series(LineSeries::new(
                [(m.value, 0.0), (m.value, y_max)],
                color.stroke_width(2),
            ))?
            .label(m.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
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

/// 100-bin histogram of the log-amount column with median / 90th / 99th
/// percentile marker lines.
pub fn log_amount_distribution(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    let xs = table.log_amounts();
    if xs.is_empty() {
        warn!("log_amount_distribution: no rows, skipping");
        return Ok(());
    }
    let bins = histogram(&xs, 100);
    let markers = [
        Marker {
            label: "Median",
            value: quantile(&xs, 0.50),
            color: style::MEDIAN_MARK,
        },
        Marker {
            label: "90th %ile",
            value: quantile(&xs, 0.90),
            color: style::P90_MARK,
        },
        Marker {
            label: "99th %ile",
            value: quantile(&xs, 0.99),
            color: style::P99_MARK,
        },
    ];

    let (png, svg) = style::chart_pair(plots_dir, "01_log_amount_distribution")?;
    draw_histogram(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        &bins,
        &markers,
    )?;
    draw_histogram(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        &bins,
        &markers,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}

struct ViolinGroup {
    label: &'static str,
    color: RGBColor,
    values: Vec<f64>,
}

fn draw_violins<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    groups: &[ViolinGroup],
    y_min: f64,
    y_max: f64,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(
            "Fraud vs Non-Fraud - Transaction Amount (log scale)",
            ("sans-serif", 24),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(groups.len() as f64 - 0.5), y_min..y_max)?;

    let labels: Vec<&'static str> = groups.iter().map(|g| g.label).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("log(amount + 1)")
        .x_labels(groups.len())
        .x_label_formatter(&move |x: &f64| {
            let i = x.round() as isize;
            if (x - i as f64).abs() < 0.3 && i >= 0 && (i as usize) < labels.len() {
                labels[i as usize].to_string()
            } else {
                String::new()
            }
        })
        .draw()?;

    for (i, g) in groups.iter().enumerate() {
        if g.values.is_empty() {
            continue;
        }
        let center = i as f64;
        let kde = gaussian_kde(&g.values, y_min, y_max, 200);
        let peak = kde.iter().map(|(_, d)| *d).fold(0.0f64, f64::max);
        if peak > 0.0 {
            let scale = 0.35 / peak;
            let mut outline: Vec<(f64, f64)> = kde
                .iter()
                .map(|(y, d)| (center - d * scale, *y))
                .collect();
            outline.extend(kde.iter().rev().map(|(y, d)| (center + d * scale, *y)));
            chart.draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                g.color.mix(0.35).filled(),
            )))?;
            chart.draw_series(std::iter::once(PathElement::new(outline, g.color)))?;
        }

        // Quartile box with median and 1.5 IQR whiskers, fliers omitted.
        let q1 = quantile(&g.values, 0.25);
        let q2 = quantile(&g.values, 0.50);
        let q3 = quantile(&g.values, 0.75);
        let iqr = q3 - q1;
        let lo = g.values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = g.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let w_lo = (q1 - 1.5 * iqr).max(lo);
        let w_hi = (q3 + 1.5 * iqr).min(hi);
        let half = 0.09;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(center - half, q1), (center + half, q3)],
            WHITE.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(center - half, q1), (center + half, q3)],
            BLACK,
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center - half, q2), (center + half, q2)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center, w_lo), (center, q1)],
            BLACK,
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center, q3), (center, w_hi)],
            BLACK,
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center - half / 2.0, w_lo), (center + half / 2.0, w_lo)],
            BLACK,
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center - half / 2.0, w_hi), (center + half / 2.0, w_hi)],
            BLACK,
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Violin (mirrored density outline) plus quartile box of the log-amount
/// column, split by fraud label.
pub fn fraud_vs_nonfraud_amount(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    let (non_fraud, fraud) = table.split_by_fraud(|t| t.log_amount);
    if non_fraud.is_empty() && fraud.is_empty() {
        warn!("fraud_vs_nonfraud_amount: no rows, skipping");
        return Ok(());
    }

    let all: Vec<f64> = non_fraud.iter().chain(fraud.iter()).copied().collect();
    let lo = all.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = all.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((hi - lo) * 0.08).max(0.5);
    let groups = [
        ViolinGroup {
            label: "Non-fraud",
            color: style::NON_FRAUD,
            values: non_fraud,
        },
        ViolinGroup {
            label: "Fraud",
            color: style::FRAUD,
            values: fraud,
        },
    ];

    let (png, svg) = style::chart_pair(plots_dir, "02_fraud_vs_nonfraud_amount")?;
    draw_violins(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        &groups,
        lo - pad,
        hi + pad,
    )?;
    draw_violins(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        &groups,
        lo - pad,
        hi + pad,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}
