//! Small descriptive statistics helpers shared by the pipeline steps

/// Median of the values, averaging the two middle values for even counts.
///
/// Returns `None` for an empty slice. NaN values are ordered last by
/// `total_cmp` and should be filtered out by the caller.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Empirical quantile using linear interpolation between order statistics.
///
/// For `n` sorted values the quantile `p` sits at position `p * (n - 1)`;
/// fractional positions are interpolated between the neighbouring values.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, p))
}

/// Same as [`quantile`] for values already sorted ascending and non-empty.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Survivors over group size; NaN for an empty group.
pub fn survival_rate(survived: usize, count: usize) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        survived as f64 / count as f64
    }
}

/// Pearson correlation of two equally long samples.
///
/// Returns NaN when either sample has zero variance or fewer than two points.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile(&values, 0.25), Some(2.0));
        assert_eq!(quantile(&values, 0.75), Some(4.0));

        let values = [1.0, 2.0, 3.0, 4.0];
        // position 0.75 between 1.0 and 2.0
        assert_eq!(quantile(&values, 0.25), Some(1.75));
    }

    #[test]
    fn test_survival_rate_empty_group_is_nan() {
        assert!(survival_rate(0, 0).is_nan());
        assert_eq!(survival_rate(1, 4), 0.25);
    }

    #[test]
    fn test_pearson_perfect_and_constant() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [10.0, 8.0, 6.0, 4.0];
        assert!((pearson_correlation(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &z) + 1.0).abs() < 1e-12);
        assert!(pearson_correlation(&x, &[5.0; 4]).is_nan());
    }
}
