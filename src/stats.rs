use serde::Serialize;

/// Summary statistics for a numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl ScoreStats {
    pub fn print_summary(&self, name: &str) {
        println!("{name} distribution:");
        println!("  count: {}", self.count);
        println!("  mean:  {:.4}", self.mean);
        println!("  std:   {:.4}", self.std);
        println!("  min:   {:.2}", self.min);
        println!("  25%:   {:.2}", self.p25);
        println!("  50%:   {:.2}", self.p50);
        println!("  75%:   {:.2}", self.p75);
        println!("  max:   {:.2}", self.max);
    }
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn std_dev(xs: &[f64], m: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let variance = xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (xs.len() - 1) as f64;
    variance.sqrt()
}

/// Quantile with linear interpolation between order statistics.
pub fn quantile(xs: &[f64], q: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

pub fn describe(xs: &[f64]) -> ScoreStats {
    let m = mean(xs);
    ScoreStats {
        count: xs.len(),
        mean: m,
        std: std_dev(xs, m),
        min: xs.iter().copied().fold(f64::INFINITY, f64::min),
        p25: quantile(xs, 0.25),
        p50: quantile(xs, 0.50),
        p75: quantile(xs, 0.75),
        max: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// One histogram bucket over `[lo, hi)`.
#[derive(Debug, Clone, Copy)]
pub struct HistBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

pub fn histogram(xs: &[f64], bins: usize) -> Vec<HistBin> {
    if xs.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span <= 0.0 {
        return vec![HistBin {
            lo: min,
            hi: max,
            count: xs.len(),
        }];
    }
    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in xs {
        let idx = (((x - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistBin {
            lo: min + i as f64 * width,
            hi: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate over an evenly spaced grid.
///
/// Bandwidth is Silverman's rule; degenerate samples (constant or near-empty)
/// fall back to a bandwidth derived from the grid span so the curve stays
/// finite.
pub fn gaussian_kde(xs: &[f64], lo: f64, hi: f64, grid_points: usize) -> Vec<(f64, f64)> {
    if xs.is_empty() || grid_points < 2 || hi <= lo {
        return Vec::new();
    }
    let n = xs.len() as f64;
    let m = mean(xs);
    let sd = std_dev(xs, m);
    let mut h = 1.06 * sd * n.powf(-0.2);
    if h <= 0.0 {
        h = (hi - lo) / 100.0;
    }

    let step = (hi - lo) / (grid_points - 1) as f64;
    let norm = 1.0 / (n * h * (2.0 * std::f64::consts::PI).sqrt());
    (0..grid_points)
        .map(|i| {
            let x = lo + i as f64 * step;
            let density = xs
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / h;
                    (-0.5 * u * u).exp()
                })
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect()
}
