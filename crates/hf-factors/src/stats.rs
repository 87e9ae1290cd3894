//! Descriptive statistics over in-memory slices.
//!
//! Every function returns `None` instead of dividing by zero or producing a
//! non-finite number, so callers can apply their own fallback.

/// `Some(x)` when `x` is finite.
pub fn finite(x: f64) -> Option<f64> {
    x.is_finite().then_some(x)
}

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    finite(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Variance with `ddof` delta degrees of freedom. Needs more than `ddof` values.
pub fn variance(xs: &[f64], ddof: usize) -> Option<f64> {
    if xs.len() <= ddof {
        return None;
    }
    let m = mean(xs)?;
    let ss: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    finite(ss / (xs.len() - ddof) as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom.
pub fn std_dev(xs: &[f64], ddof: usize) -> Option<f64> {
    variance(xs, ddof).map(f64::sqrt)
}

/// Central moments `(m2, m3, m4)` with divisor `n`.
fn central_moments(xs: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(xs)?;
    let n = xs.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for x in xs {
        let d = x - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((m2 / n, m3 / n, m4 / n))
}

/// Biased sample skewness, `m3 / m2^1.5`.
pub fn skewness(xs: &[f64]) -> Option<f64> {
    let (m2, m3, _) = central_moments(xs)?;
    if m2 == 0.0 {
        return None;
    }
    finite(m3 / m2.powf(1.5))
}

/// Biased excess kurtosis, `m4 / m2^2 - 3`.
pub fn kurtosis(xs: &[f64]) -> Option<f64> {
    let (m2, _, m4) = central_moments(xs)?;
    if m2 == 0.0 {
        return None;
    }
    finite(m4 / (m2 * m2) - 3.0)
}

/// Covariance with `ddof` delta degrees of freedom over equal-length slices.
pub fn covariance(xs: &[f64], ys: &[f64], ddof: usize) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() <= ddof {
        return None;
    }
    let (mx, my) = (mean(xs)?, mean(ys)?);
    let sum: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    finite(sum / (xs.len() - ddof) as f64)
}

/// Pearson correlation over the pairs where both sides are present.
///
/// `None` with fewer than two complete pairs or a constant side.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .unzip();
    if xs.len() < 2 {
        return None;
    }
    let cov = covariance(&xs, &ys, 0)?;
    let denom = (variance(&xs, 0)? * variance(&ys, 0)?).sqrt();
    if denom == 0.0 {
        return None;
    }
    finite(cov / denom)
}

/// Period-over-period change, `x_t / x_{t-1} - 1`. The first element has none.
pub fn pct_change(xs: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(xs.windows(2).map(|w| finite(w[1] / w[0] - 1.0)))
        .take(xs.len())
        .collect()
}

/// Shift by `lag` positions: positive lags look back, negative lags look ahead.
pub fn shift(xs: &[f64], lag: isize) -> Vec<Option<f64>> {
    (0..xs.len() as isize)
        .map(|i| {
            let j = i - lag;
            (0..xs.len() as isize)
                .contains(&j)
                .then(|| xs[j as usize])
        })
        .collect()
}

/// One-based ranks, ties sharing the average of the ranks they span.
pub fn average_rank(xs: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));

    let mut ranks = vec![0.0; xs.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && xs[order[end]] == xs[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_std() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(mean(&xs).unwrap(), 2.5);
        assert_relative_eq!(variance(&xs, 0).unwrap(), 1.25);
        assert_relative_eq!(std_dev(&xs, 1).unwrap(), (5.0_f64 / 3.0).sqrt());
        assert!(std_dev(&[1.0], 1).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn test_skew_kurt() {
        let xs = [1.0, 2.0, 3.0, 10.0];
        // m = 4, deviations -3,-2,-1,6
        let m2 = (9.0 + 4.0 + 1.0 + 36.0) / 4.0;
        let m3 = (-27.0 - 8.0 - 1.0 + 216.0) / 4.0;
        let m4 = (81.0 + 16.0 + 1.0 + 1296.0) / 4.0;
        assert_relative_eq!(skewness(&xs).unwrap(), m3 / f64::powf(m2, 1.5), epsilon = 1e-12);
        assert_relative_eq!(kurtosis(&xs).unwrap(), m4 / (m2 * m2) - 3.0, epsilon = 1e-12);
        assert!(skewness(&[2.0, 2.0, 2.0]).is_none());
        assert!(kurtosis(&[]).is_none());
    }

    #[test]
    fn test_pearson() {
        let xs = [Some(1.0), Some(2.0), Some(3.0), None];
        let ys = [Some(2.0), Some(4.0), Some(6.0), Some(100.0)];
        assert_relative_eq!(pearson(&xs, &ys).unwrap(), 1.0, epsilon = 1e-12);

        let flat = [Some(1.0), Some(1.0), Some(1.0), Some(1.0)];
        assert!(pearson(&flat, &ys).is_none());
        assert!(pearson(&[Some(1.0)], &[Some(2.0)]).is_none());
    }

    #[test]
    fn test_pct_change_and_shift() {
        let xs = [1.0, 2.0, 0.0, 3.0];
        assert_eq!(pct_change(&xs), vec![None, Some(1.0), Some(-1.0), None]);
        assert_eq!(shift(&xs, 1), vec![None, Some(1.0), Some(2.0), Some(0.0)]);
        assert_eq!(shift(&xs, -1), vec![Some(2.0), Some(0.0), Some(3.0), None]);
        assert!(pct_change(&[]).is_empty());
    }

    #[test]
    fn test_average_rank() {
        let ranks = average_rank(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(ranks, vec![3.5, 1.0, 3.5, 2.0]);
    }
}
