/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (Bessel-corrected, divisor `n - 1`).
///
/// Fewer than two values have no spread; 0 is returned instead of
/// dividing by zero.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_sample_std() {
        let values = vec![0.0, 3.0, 0.0];
        assert_eq!(mean(&values), 1.0);
        assert!((sample_std(&values) - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_std(&[]), 0.0);
        assert_eq!(sample_std(&[5.0]), 0.0);
    }
}
