use anyhow::{Context, Result};
use plotters::style::RGBColor;
use std::fs;
use std::path::{Path, PathBuf};

pub const CHART_SIZE: (u32, u32) = (1000, 600);

// Matplotlib default-cycle colors, so the charts read like the rest of the
// team's notebooks.
pub const NON_FRAUD: RGBColor = RGBColor(31, 119, 180);
pub const FRAUD: RGBColor = RGBColor(214, 39, 40);
pub const MEDIAN_MARK: RGBColor = RGBColor(214, 39, 40);
pub const P90_MARK: RGBColor = RGBColor(255, 165, 0);
pub const P99_MARK: RGBColor = RGBColor(128, 0, 128);

/// Gradient shade for ranked bar charts, position 0 darkest.
pub fn red_shade(i: usize, n: usize) -> RGBColor {
    let t = i as f64 / n.max(1) as f64;
    RGBColor(214, (39.0 + t * 140.0) as u8, (40.0 + t * 140.0) as u8)
}

pub fn blue_shade(i: usize, n: usize) -> RGBColor {
    let t = i as f64 / n.max(1) as f64;
    RGBColor((31.0 + t * 120.0) as u8, (119.0 + t * 90.0) as u8, 180)
}

pub fn green_shade(i: usize, n: usize) -> RGBColor {
    let t = i as f64 / n.max(1) as f64;
    RGBColor((44.0 + t * 120.0) as u8, 160, (44.0 + t * 120.0) as u8)
}

/// Resolve the PNG + SVG pair for a chart stem, creating the plots directory
/// if needed.
pub fn chart_pair(plots_dir: &Path, stem: &str) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(plots_dir)
        .with_context(|| format!("cannot create {}", plots_dir.display()))?;
    Ok((
        plots_dir.join(format!("{stem}.png")),
        plots_dir.join(format!("{stem}.svg")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_pair_creates_directory() {
        let dir = std::env::temp_dir().join(format!("fraud_signal_style_{}", std::process::id()));
        let (png, svg) = chart_pair(&dir, "test_chart").unwrap();
        assert!(dir.is_dir());
        assert!(png.to_string_lossy().ends_with("test_chart.png"));
        assert!(svg.to_string_lossy().ends_with("test_chart.svg"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn shades_stay_in_byte_range() {
        for i in 0..6 {
            let _ = red_shade(i, 6);
            let _ = blue_shade(i, 6);
            let _ = green_shade(i, 6);
        }
    }
}
