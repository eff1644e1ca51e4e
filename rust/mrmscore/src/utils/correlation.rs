use peakgroup::errors::{
    DataProcessingError,
    Result,
};

/// Transforms the data in place to zero mean and unit population
/// standard deviation (the divisor is `n`, not `n - 1`).
///
/// A zero-variance input becomes all zeros instead of dividing by zero.
pub fn standardize_mean_variance(data: &mut [f64]) {
    if data.is_empty() {
        return;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let std = (data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std == 0.0 {
        data.fill(0.0);
        return;
    }
    for x in data.iter_mut() {
        *x = (*x - mean) / std;
    }
}

/// Cross-correlation values indexed by signed lag, in ascending lag
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XCorrArray {
    pub data: Vec<(i32, f64)>,
}

impl XCorrArray {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The `(lag, value)` pair with the largest value, or `None` for an
    /// empty series. Ties resolve to the most negative lag.
    pub fn max_peak(&self) -> Option<(i32, f64)> {
        let mut best: Option<(i32, f64)> = None;
        for &(lag, value) in &self.data {
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((lag, value)),
            }
        }
        best
    }

    pub fn value_at(&self, lag: i32) -> Option<f64> {
        self.data
            .iter()
            .find(|(l, _)| *l == lag)
            .map(|(_, v)| *v)
    }
}

/// Computes `sum_i data1[i] * data2[i + delay]` over the valid overlap
/// for every `delay` in `{-maxdelay, -maxdelay + lag, ..., +maxdelay}`.
///
/// The inputs are used as-is; see [`normalized_cross_correlation`] for
/// the standardized, length-normalized variant.
pub fn calculate_cross_correlation(
    data1: &[f64],
    data2: &[f64],
    maxdelay: usize,
    lag: usize,
) -> Result<XCorrArray> {
    assert!(lag > 0, "lag stride must be positive");
    if data1.len() != data2.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: data1.len(),
            other: data2.len(),
            context: "calculate_cross_correlation".to_string(),
        });
    }
    if data1.is_empty() {
        return Err(DataProcessingError::ExpectedNonEmptyData {
            context: Some("calculate_cross_correlation".to_string()),
        });
    }

    let n = data1.len() as i64;
    let maxdelay = maxdelay as i64;
    let mut data = Vec::with_capacity((2 * maxdelay as usize / lag) + 1);
    let mut delay = -maxdelay;
    while delay <= maxdelay {
        let mut sxy = 0.0;
        for i in 0..n {
            let j = i + delay;
            if j < 0 || j >= n {
                continue;
            }
            sxy += data1[i as usize] * data2[j as usize];
        }
        data.push((delay as i32, sxy));
        delay += lag as i64;
    }
    Ok(XCorrArray { data })
}

/// Standardizes both inputs, cross-correlates them and divides each
/// summed product by the sample count, so that the autocorrelation of any
/// trace with nonzero variance is exactly 1 at lag 0.
///
/// # Example
///
/// ```
/// use mrmscore::utils::correlation::normalized_cross_correlation;
///
/// let data = vec![0.0, 1.0, 3.0, 22.0, 5.0];
/// let xcorr = normalized_cross_correlation(&data, &data, data.len() - 1, 1).unwrap();
/// let (lag, value) = xcorr.max_peak().unwrap();
/// assert_eq!(lag, 0);
/// assert!((value - 1.0).abs() < 1e-12);
/// ```
pub fn normalized_cross_correlation(
    data1: &[f64],
    data2: &[f64],
    maxdelay: usize,
    lag: usize,
) -> Result<XCorrArray> {
    let mut d1 = data1.to_vec();
    let mut d2 = data2.to_vec();
    standardize_mean_variance(&mut d1);
    standardize_mean_variance(&mut d2);
    let mut result = calculate_cross_correlation(&d1, &d2, maxdelay, lag)?;
    let n = data1.len() as f64;
    for (_, value) in result.data.iter_mut() {
        *value /= n;
    }
    Ok(result)
}

/// Pearson correlation coefficient, or `None` when either input has zero
/// variance (or the lengths differ).
pub fn pearson(data1: &[f64], data2: &[f64]) -> Option<f64> {
    if data1.len() != data2.len() || data1.is_empty() {
        return None;
    }
    let n = data1.len() as f64;
    let mean1 = data1.iter().sum::<f64>() / n;
    let mean2 = data2.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut var1 = 0.0;
    let mut var2 = 0.0;
    for (a, b) in data1.iter().zip(data2.iter()) {
        num += (a - mean1) * (b - mean2);
        var1 += (a - mean1).powi(2);
        var2 += (b - mean2).powi(2);
    }
    let denom = (var1 * var2).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(num / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close_enough(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() < tol, "Expected {:?}, got {:?}", b, a);
    }

    #[test]
    fn test_standardize() {
        let mut data = vec![
            5.97543668746948,
            4.2749171257019,
            3.3301842212677,
            4.08597040176392,
            5.50307035446167,
            5.24326848983765,
            8.40812492370605,
            2.83419919013977,
            6.94378805160522,
            7.69957494735718,
            4.08597040176392,
        ];
        standardize_mean_variance(&mut data);
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert_close_enough(mean, 0.0, 1e-12);
        assert_close_enough(var, 1.0, 1e-12);
        assert_close_enough(data[0], 0.3880091649, 1e-9);
    }

    #[test]
    fn test_standardize_zero_variance() {
        let mut data = vec![3.0, 3.0, 3.0];
        standardize_mean_variance(&mut data);
        assert_eq!(data, vec![0.0, 0.0, 0.0]);

        let mut empty: Vec<f64> = vec![];
        standardize_mean_variance(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_cross_correlation_windowed() {
        // A one-sample left shift of the same peak shows up as the
        // maximum at lag -1.
        let data1 = vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0];
        let data2 = vec![1.0, 3.0, 5.0, 2.0, 0.0, 0.0];
        let xcorr = normalized_cross_correlation(&data1, &data2, 2, 1).unwrap();
        assert_eq!(xcorr.data.len(), 5);

        assert_close_enough(xcorr.value_at(-2).unwrap(), 0.1563421829, 1e-9);
        assert_close_enough(xcorr.value_at(-1).unwrap(), 0.8215339233, 1e-9);
        assert_close_enough(xcorr.value_at(0).unwrap(), 0.4159292035, 1e-9);
        assert_close_enough(xcorr.value_at(1).unwrap(), -0.5678466077, 1e-9);
        assert_close_enough(xcorr.value_at(2).unwrap(), -0.7374631268, 1e-9);

        let (lag, _) = xcorr.max_peak().unwrap();
        assert_eq!(lag, -1);
    }

    #[test]
    fn test_cross_correlation_full_range() {
        let data = vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0];
        let xcorr = normalized_cross_correlation(&data, &data, data.len() - 1, 1).unwrap();
        assert_eq!(xcorr.data.len(), 2 * data.len() - 1);
        assert_close_enough(xcorr.value_at(0).unwrap(), 1.0, 1e-12);
        // Symmetric for the autocorrelation case
        assert_close_enough(
            xcorr.value_at(-3).unwrap(),
            xcorr.value_at(3).unwrap(),
            1e-12,
        );
    }

    #[test]
    fn test_cross_correlation_stride() {
        let data = vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0];
        let xcorr = normalized_cross_correlation(&data, &data, 4, 2).unwrap();
        let lags: Vec<i32> = xcorr.data.iter().map(|(l, _)| *l).collect();
        assert_eq!(lags, vec![-4, -2, 0, 2, 4]);
    }

    #[test]
    fn test_cross_correlation_errors() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(normalized_cross_correlation(&a, &b, 1, 1).is_err());

        let empty: Vec<f64> = vec![];
        assert!(normalized_cross_correlation(&empty, &empty, 0, 1).is_err());
    }

    #[test]
    fn test_max_peak_ties_take_most_negative_lag() {
        // A flat trace standardizes to zeros, so every lag value is 0 and
        // the reported peak is the leftmost lag.
        let flat = vec![7.0; 5];
        let bumpy = vec![0.0, 1.0, 5.0, 1.0, 0.0];
        let xcorr = normalized_cross_correlation(&flat, &bumpy, 4, 1).unwrap();
        assert_eq!(xcorr.max_peak(), Some((-4, 0.0)));
    }

    #[test]
    fn test_pearson() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 4.0, 6.0];
        assert_close_enough(pearson(&a, &b).unwrap(), 1.0, 1e-12);
        let c = vec![3.0, 2.0, 1.0];
        assert_close_enough(pearson(&a, &c).unwrap(), -1.0, 1e-12);
        assert!(pearson(&a, &[1.0, 1.0, 1.0]).is_none());
        assert!(pearson(&a, &b[..2]).is_none());
    }
}
