//! Descriptive statistics behind the dashboard charts.
//!
//! Everything here works on plain `f64` slices so it can be tested without
//! building records.

use crate::data::model::RentalRecord;

// ---------------------------------------------------------------------------
// Histogram + kernel density
// ---------------------------------------------------------------------------

/// One equal-width histogram bin, `[start, end)` (the last bin is closed).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins spanning `[min, max]` of the finite values.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            start: min + i as f64 * width,
            end: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();

    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Sample standard deviation (n - 1), `None` for fewer than two values.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Gaussian kernel density estimate on `points` evenly spaced positions
/// across the data range, with Scott's rule bandwidth `σ·n^(-1/5)`.
///
/// Returns `[x, density]` pairs; the density integrates to 1.
pub fn gaussian_kde(values: &[f64], points: usize) -> Vec<[f64; 2]> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(sigma) = sample_std_dev(&finite) else {
        return Vec::new();
    };
    if sigma <= 0.0 || points < 2 {
        return Vec::new();
    }
    let n = finite.len() as f64;
    let bandwidth = sigma * n.powf(-0.2);
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let x = min + i as f64 * step;
            let density: f64 = finite
                .iter()
                .map(|&xi| {
                    let u = (x - xi) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            [x, density * norm]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

/// Ordinary least squares fit `y = slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `None` for fewer than two points or when every x is identical.
pub fn linear_regression(points: &[[f64; 2]]) -> Option<LinearFit> {
    let n = points.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / nf;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    let (mut xx, mut yy) = (0.0, 0.0);
    for p in points {
        let dx = p[0] - mean_x;
        let dy = p[1] - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
        xx += p[0] * p[0];
        yy += p[1] * p[1];
    }
    if is_constant(sxx, xx, n) {
        return None;
    }
    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if is_constant(syy, yy, n) { 1.0 } else { (sxy * sxy) / (sxx * syy) };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

// ---------------------------------------------------------------------------
// Box plot summary
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5·IQR).
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxSummary {
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
            .iter()
            .partition(|v| **v >= lo_fence && **v <= hi_fence);
        // Quartiles always lie inside the fences, so `inside` is non-empty.
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }
}

/// Linear-interpolation quantile of an already sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// True when the centred sum of squares of `n` values is no larger than the
/// rounding error of their mean, judged against the raw sum of squares.
fn is_constant(centred: f64, raw: f64, n: usize) -> bool {
    let tolerance = n as f64 * f64::EPSILON;
    centred <= raw * tolerance * tolerance
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation; `None` when undefined (length mismatch, < 2 pairs,
/// or a constant series).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mx = xs.iter().sum::<f64>() / n;
    let my = ys.iter().sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    let (mut xx, mut yy) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
        xx += x * x;
        yy += y * y;
    }
    if is_constant(sxx, xx, xs.len()) || is_constant(syy, yy, xs.len()) {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Numeric columns that take part in the correlation heatmap.
pub const CORRELATION_COLUMNS: [&str; 7] = [
    "season",
    "workingday",
    "weathersit",
    "temp_day",
    "hr",
    "cnt_day",
    "cnt_hour",
];

fn numeric_columns(record: &RentalRecord) -> [Option<f64>; 7] {
    [
        Some(f64::from(record.season.code())),
        Some(if record.working_day { 1.0 } else { 0.0 }),
        Some(f64::from(record.weather.code())),
        Some(record.temperature),
        record.hour.map(f64::from),
        Some(f64::from(record.daily_count)),
        record.hourly_count.map(f64::from),
    ]
}

/// Square matrix of pairwise Pearson coefficients over [`CORRELATION_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }
}

/// Pairwise complete observations: a pair uses only records where both
/// columns have a value (daily rows have no hour).
pub fn correlation_matrix<'a>(records: impl IntoIterator<Item = &'a RentalRecord>) -> CorrelationMatrix {
    let rows: Vec<[Option<f64>; 7]> = records.into_iter().map(numeric_columns).collect();
    let k = CORRELATION_COLUMNS.len();
    let mut values = vec![vec![None; k]; k];
    for i in 0..k {
        for j in i..k {
            let (xs, ys): (Vec<f64>, Vec<f64>) = rows
                .iter()
                .filter_map(|r| Some((r[i]?, r[j]?)))
                .unzip();
            let r = if i == j {
                pearson(&xs, &ys).map(|_| 1.0)
            } else {
                pearson(&xs, &ys)
            };
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    CorrelationMatrix {
        columns: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bins = histogram(&values, 30);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 100);
        assert_eq!(bins.last().unwrap().end, 99.0);
        assert!(bins.last().unwrap().count > 0);
    }

    #[test]
    fn histogram_edge_cases() {
        assert!(histogram(&[], 30).is_empty());
        assert!(histogram(&[1.0, 2.0], 0).is_empty());
        let single = histogram(&[5.0, 5.0, 5.0], 10);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].count, 3);
        assert_eq!(single[0].center(), 5.0);
    }

    #[test]
    fn kde_is_a_density() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0, 8.0];
        let curve = gaussian_kde(&values, 200);
        assert_eq!(curve.len(), 200);
        assert!(curve.iter().all(|p| p[1] >= 0.0));
        assert!(gaussian_kde(&[4.0, 4.0], 50).is_empty());
        assert!(gaussian_kde(&[4.0], 50).is_empty());
    }

    #[test]
    fn regression_recovers_exact_line() {
        let points: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 3.0 * i as f64 + 2.0]).collect();
        let fit = linear_regression(&points).unwrap();
        assert!((fit.slope - 3.0).abs() < 1e-10);
        assert!((fit.intercept - 2.0).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
        assert!((fit.predict(20.0) - 62.0).abs() < 1e-9);
    }

    #[test]
    fn regression_needs_x_variance() {
        assert!(linear_regression(&[[1.0, 2.0]]).is_none());
        assert!(linear_regression(&[[1.0, 2.0], [1.0, 5.0]]).is_none());
        assert!(linear_regression(&[[0.3, 2.0], [0.3, 5.0], [0.3, 7.0]]).is_none());
    }

    #[test]
    fn narrow_temperature_span_still_fits() {
        let points: Vec<[f64; 2]> = (0..5)
            .map(|i| {
                let t = 0.5 + 1e-9 * i as f64;
                [t, 1_000_000.0 * t]
            })
            .collect();
        let fit = linear_regression(&points).unwrap();
        assert!((fit.slope / 1_000_000.0 - 1.0).abs() < 1e-4);
        let xs: Vec<f64> = points.iter().map(|p| p[0]).collect();
        let ys: Vec<f64> = points.iter().map(|p| p[1]).collect();
        assert!((pearson(&xs, &ys).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn box_summary_quartiles() {
        let b = BoxSummary::compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]).unwrap();
        assert_eq!(b.median, 5.5);
        assert_eq!(b.q1, 3.25);
        assert_eq!(b.q3, 7.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 9.0);
        assert_eq!(b.outliers, vec![100.0]);
        assert_eq!(b.count, 10);
        assert!(BoxSummary::compute(&[]).is_none());
    }

    #[test]
    fn pearson_signs_and_undefined() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert!((pearson(&xs, &[2.0, 4.0, 6.0, 8.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &[8.0, 6.0, 4.0, 2.0]).unwrap() + 1.0).abs() < 1e-12);
        assert!(pearson(&xs, &[1.0, 1.0, 1.0, 1.0]).is_none());
        assert!(pearson(&xs, &[1.0]).is_none());
    }
}
