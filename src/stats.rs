//! Summary statistics behind box, violin and histogram glyphs.

use std::cmp::Ordering;

fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    values
}

/// Linear-interpolated percentile of sorted data, `p` in `[0, 1]`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

/// Box-and-whisker summary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStat {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Whiskers reach the most extreme values within `whis * IQR` of the box.
pub fn box_stat(data: &[f64], whis: f64) -> Option<BoxStat> {
    let ys = sorted_finite(data);
    if ys.is_empty() {
        return None;
    }

    let q1 = percentile(&ys, 0.25);
    let median = percentile(&ys, 0.50);
    let q3 = percentile(&ys, 0.75);
    let iqr = q3 - q1;

    let lower_fence = q1 - whis * iqr;
    let upper_fence = q3 + whis * iqr;

    let lower_whisker = ys.iter().copied().find(|&v| v >= lower_fence).unwrap_or(q1);
    let upper_whisker = ys.iter().rev().copied().find(|&v| v <= upper_fence).unwrap_or(q3);
    let outliers = ys
        .iter()
        .copied()
        .filter(|&v| v < lower_fence || v > upper_fence)
        .collect();

    Some(BoxStat {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}

/// Silverman's rule of thumb for bandwidth selection
pub fn silverman_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    if n < 2.0 {
        return 1.0;
    }

    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    let sorted = sorted_finite(data);
    let iqr = percentile(&sorted, 0.75) - percentile(&sorted, 0.25);

    // h = 0.9 * min(std, IQR/1.34) * n^(-1/5)
    let scale = if iqr > 0.0 { std_dev.min(iqr / 1.34) } else { std_dev };
    if scale <= 0.0 {
        return 1.0;
    }
    0.9 * scale * n.powf(-0.2)
}

fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Density curve of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    /// Evaluation points along the value axis.
    pub grid: Vec<f64>,
    /// Density at each grid point, scaled so the peak is 1.
    pub density: Vec<f64>,
}

/// Gaussian KDE evaluated on 128 points spanning the data plus three
/// bandwidths on each side.
pub fn kde(data: &[f64]) -> Density {
    const GRID_POINTS: usize = 128;

    let values = sorted_finite(data);
    let (Some(&min_y), Some(&max_y)) = (values.first(), values.last()) else {
        return Density { grid: vec![], density: vec![] };
    };

    let bandwidth = silverman_bandwidth(&values);
    let n = values.len() as f64;
    let extend = 3.0 * bandwidth;
    let y_start = min_y - extend;
    let range = (max_y + extend) - y_start;
    if range <= 0.0 {
        return Density { grid: vec![min_y], density: vec![1.0] };
    }

    let step = range / (GRID_POINTS - 1) as f64;
    let grid: Vec<f64> = (0..GRID_POINTS).map(|i| y_start + i as f64 * step).collect();
    let mut density: Vec<f64> = grid
        .iter()
        .map(|&y| {
            values
                .iter()
                .map(|&xi| gaussian_kernel((y - xi) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth)
        })
        .collect();

    let max_density = density.iter().fold(0.0f64, |a, &b| a.max(b));
    if max_density > 0.0 {
        for d in &mut density {
            *d /= max_density;
        }
    }

    Density { grid, density }
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<f64>,
}

/// Count finite values into `bins` equal-width bins over their range. The
/// last bin is closed on the right.
pub fn histogram(data: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let values = sorted_finite(data);
    let (Some(&min), Some(&max)) = (values.first(), values.last()) else {
        return Histogram { edges: vec![], counts: vec![] };
    };

    let (lo, hi) = if min == max { (min - 0.5, max + 0.5) } else { (min, max) };
    let width = (hi - lo) / bins as f64;
    let edges = (0..=bins).map(|i| lo + i as f64 * width).collect();

    let mut counts = vec![0.0; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1.0;
    }

    Histogram { edges, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 1.0), 4.0);
        assert!((percentile(&data, 0.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_box_stat_outliers() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let stat = box_stat(&data, 1.5).unwrap();
        assert_eq!(stat.median, 3.5);
        assert_eq!(stat.outliers, vec![100.0]);
        assert_eq!(stat.upper_whisker, 5.0);
        assert_eq!(stat.lower_whisker, 1.0);
    }

    #[test]
    fn test_box_stat_empty() {
        assert!(box_stat(&[], 1.5).is_none());
        assert!(box_stat(&[f64::NAN], 1.5).is_none());
    }

    #[test]
    fn test_kde_peak_normalized() {
        let density = kde(&[1.0, 2.0, 2.0, 3.0]);
        assert_eq!(density.grid.len(), 128);
        let peak = density.density.iter().cloned().fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_counts() {
        let h = histogram(&[0.0, 0.5, 1.0, 1.5, 2.0], 2);
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0]);
        assert_eq!(h.counts, vec![2.0, 3.0]);
    }

    #[test]
    fn test_histogram_single_value() {
        let h = histogram(&[3.0, 3.0], 4);
        assert_eq!(h.counts.iter().sum::<f64>(), 2.0);
        assert_eq!(h.edges.len(), 5);
    }
}
