use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};

use crate::models::{Transaction, TransactionTable};

use super::style;

struct Bar {
    label: String,
    rate: f64,
    count: usize,
}

struct BarChartSpec {
    caption: &'static str,
    x_desc: &'static str,
    y_desc: &'static str,
    y_max: f64,
    shade: fn(usize, usize) -> RGBColor,
    annotate: bool,
}

fn centered(size: u32) -> TextStyle<'static> {
    TextStyle::from(("sans-serif", size)).pos(Pos::new(HPos::Center, VPos::Bottom))
}

fn draw_vertical_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[Bar],
    spec: &BarChartSpec,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(spec.caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(bars.len() as f64 - 0.5), 0f64..spec.y_max)?;

    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(spec.x_desc)
        .y_desc(spec.y_desc)
        .x_labels(bars.len())
        .x_label_formatter(&move |x: &f64| {
            let i = x.round() as isize;
            if (x - i as f64).abs() < 0.3 && i >= 0 && (i as usize) < labels.len() {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .draw()?;

    for (i, b) in bars.iter().enumerate() {
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.35, 0.0), (x + 0.35, b.rate)],
            (spec.shade)(i, bars.len()).filled(),
        )))?;
        if spec.annotate {
            chart.draw_series(std::iter::once(Text::new(
                format!("n={}", b.count),
                (x, b.rate + spec.y_max * 0.015),
                centered(13),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}

fn save_vertical_bars(
    plots_dir: &Path,
    stem: &str,
    bars: &[Bar],
    spec: &BarChartSpec,
) -> Result<()> {
    let (png, svg) = style::chart_pair(plots_dir, stem)?;
    draw_vertical_bars(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        bars,
        spec,
    )?;
    draw_vertical_bars(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        bars,
        spec,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}

/// Mean origin-side mismatch rate per transaction type, highest first.
pub fn origin_mismatch_by_type(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    if table.is_empty() {
        warn!("origin_mismatch_by_type: no rows, skipping");
        return Ok(());
    }

    let mut groups: HashMap<String, (usize, usize)> = HashMap::new();
    for t in table {
        let entry = groups.entry(t.tx_type.to_string()).or_insert((0, 0));
        entry.0 += usize::from(t.origin_mismatch);
        entry.1 += 1;
    }
    let mut bars: Vec<Bar> = groups
        .into_iter()
        .map(|(label, (hits, count))| Bar {
            label,
            rate: hits as f64 / count as f64,
            count,
        })
        .collect();
    bars.sort_by(|a, b| b.rate.total_cmp(&a.rate));

    save_vertical_bars(
        plots_dir,
        "03_origin_mismatch_by_type",
        &bars,
        &BarChartSpec {
            caption: "Origin Ledger Mismatch Rate by Transaction Type",
            x_desc: "Transaction Type",
            y_desc: "Mismatch Rate",
            y_max: 1.0,
            shade: style::red_shade,
            annotate: false,
        },
    )
}

/// Mean destination-side mismatch rate per same-step destination activity
/// level, with per-bar sample sizes.
pub fn mismatch_by_dest_activity(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    if table.is_empty() {
        warn!("mismatch_by_dest_activity: no rows, skipping");
        return Ok(());
    }

    let mut groups: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for t in table {
        let entry = groups.entry(t.dest_tx_count_step).or_insert((0, 0));
        entry.0 += usize::from(t.dest_mismatch);
        entry.1 += 1;
    }
    let bars: Vec<Bar> = groups
        .into_iter()
        .map(|(step, (hits, count))| Bar {
            label: step.to_string(),
            rate: hits as f64 / count as f64,
            count,
        })
        .collect();
    let y_max = bars.iter().map(|b| b.rate).fold(0.0f64, f64::max) + 0.1;

    save_vertical_bars(
        plots_dir,
        "04_mismatch_by_dest_activity",
        &bars,
        &BarChartSpec {
            caption: "Mismatch Rate vs Destination Activity Level",
            x_desc: "Destination Transaction Count Step",
            y_desc: "Destination Mismatch Rate",
            y_max,
            shade: style::blue_shade,
            annotate: true,
        },
    )
}

fn draw_horizontal_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[Bar],
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let x_max = bars.iter().map(|b| b.rate).fold(0.0f64, f64::max) + 0.15;
    let mut chart = ChartBuilder::on(root)
        .caption("Either vs Both vs Single-Side Mismatch", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(100)
        .build_cartesian_2d(0f64..x_max, -0.5f64..(bars.len() as f64 - 0.5))?;

    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Proportion of Transactions")
        .y_labels(bars.len())
        .y_label_formatter(&move |y: &f64| {
            let i = y.round() as isize;
            if (y - i as f64).abs() < 0.3 && i >= 0 && (i as usize) < labels.len() {
                labels[i as usize].clone()
            } else {
                String::new()
            }
        })
        .draw()?;

    let left = TextStyle::from(("sans-serif", 13)).pos(Pos::new(HPos::Left, VPos::Center));
    for (i, b) in bars.iter().enumerate() {
        let y = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.3), (b.rate, y + 0.3)],
            style::green_shade(bars.len() - 1 - i, bars.len()).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.3), (b.rate, y + 0.3)],
            BLACK,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.1}%", b.rate * 100.0),
            (b.rate + x_max * 0.01, y),
            left.clone(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("n={}", b.count),
            (x_max * 0.01, y),
            left.clone(),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Either / Both / Origin-only / Dest-only mismatch rates as annotated
/// horizontal bars, largest on top.
pub fn mismatch_breakdown(table: &TransactionTable, plots_dir: &Path) -> Result<()> {
    if table.is_empty() {
        warn!("mismatch_breakdown: no rows, skipping");
        return Ok(());
    }

    let specs: [(&str, fn(&Transaction) -> bool); 4] = [
        ("Either", |t| t.either_mismatch),
        ("Both", |t| t.both_mismatch),
        ("Origin only", |t| t.origin_mismatch && !t.dest_mismatch),
        ("Dest only", |t| t.dest_mismatch && !t.origin_mismatch),
    ];

    let total = table.len() as f64;
    let mut bars: Vec<Bar> = specs
        .iter()
        .map(|&(label, flag)| {
            let count = table.iter().filter(|&t| flag(t)).count();
            Bar {
                label: label.to_string(),
                rate: count as f64 / total,
                count,
            }
        })
        .collect();
    // Ascending, so the largest rate lands on the top row.
    bars.sort_by(|a, b| a.rate.total_cmp(&b.rate));

    let (png, svg) = style::chart_pair(plots_dir, "05_mismatch_breakdown")?;
    draw_horizontal_bars(
        &BitMapBackend::new(&png, style::CHART_SIZE).into_drawing_area(),
        &bars,
    )?;
    draw_horizontal_bars(
        &SVGBackend::new(&svg, style::CHART_SIZE).into_drawing_area(),
        &bars,
    )?;
    info!("Saved {} / {}", png.display(), svg.display());
    Ok(())
}
