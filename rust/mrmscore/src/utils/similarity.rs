use peakgroup::errors::{
    DataProcessingError,
    Result,
};

/// Scales the data in place so it sums to 1. A zero-sum input is left
/// untouched.
pub fn normalize_sum(data: &mut [f64]) {
    let total: f64 = data.iter().sum();
    if total == 0.0 {
        return;
    }
    for x in data.iter_mut() {
        *x /= total;
    }
}

fn check_pair(data1: &[f64], data2: &[f64], context: &str) -> Result<()> {
    if data1.len() != data2.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: data1.len(),
            other: data2.len(),
            context: context.to_string(),
        });
    }
    if data1.is_empty() {
        return Err(DataProcessingError::ExpectedNonEmptyData {
            context: Some(context.to_string()),
        });
    }
    Ok(())
}

/// Mean absolute difference of the two series after each is normalized
/// to sum to 1.
pub fn manhattan_distance(data1: &[f64], data2: &[f64]) -> Result<f64> {
    check_pair(data1, data2, "manhattan_distance")?;
    let mut d1 = data1.to_vec();
    let mut d2 = data2.to_vec();
    normalize_sum(&mut d1);
    normalize_sum(&mut d2);
    let sum: f64 = d1.iter().zip(d2.iter()).map(|(a, b)| (a - b).abs()).sum();
    Ok(sum / data1.len() as f64)
}

/// Population root-mean-square deviation on the raw values.
pub fn rmsd(data1: &[f64], data2: &[f64]) -> Result<f64> {
    check_pair(data1, data2, "rmsd")?;
    let sum: f64 = data1
        .iter()
        .zip(data2.iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok((sum / data1.len() as f64).sqrt())
}

/// Angle between the two series seen as vectors,
/// `acos(dot / (|d1| * |d2|))` with the cosine clamped to [-1, 1].
///
/// An all-zero input has no direction; the angle is defined as `pi / 2`
/// in that case instead of evaluating 0/0.
pub fn spectral_angle(data1: &[f64], data2: &[f64]) -> Result<f64> {
    check_pair(data1, data2, "spectral_angle")?;
    let dot: f64 = data1.iter().zip(data2.iter()).map(|(a, b)| a * b).sum();
    let norm1 = data1.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm2 = data2.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm1 == 0.0 || norm2 == 0.0 {
        return Ok(std::f64::consts::FRAC_PI_2);
    }
    Ok((dot / (norm1 * norm2)).clamp(-1.0, 1.0).acos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{
        FRAC_PI_2,
        PI,
    };

    #[test]
    fn test_normalize_sum() {
        let mut data = vec![1.0, 3.0, 4.0];
        normalize_sum(&mut data);
        assert_eq!(data, vec![0.125, 0.375, 0.5]);

        let mut zeros = vec![0.0, 0.0];
        normalize_sum(&mut zeros);
        assert_eq!(zeros, vec![0.0, 0.0]);
    }

    #[test]
    fn test_manhattan_distance() {
        let d1 = vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0];
        let d2 = vec![1.0, 3.0, 5.0, 2.0, 0.0, 0.0];
        let dist = manhattan_distance(&d1, &d2).unwrap();
        assert!((dist - 0.15151515).abs() < 1e-7);

        // Symmetry
        assert_eq!(dist, manhattan_distance(&d2, &d1).unwrap());
    }

    #[test]
    fn test_rmsd() {
        let d1 = vec![0.0, 1.0, 3.0, 5.0, 2.0, 0.0];
        let d2 = vec![1.0, 3.0, 5.0, 2.0, 0.0, 0.0];
        let value = rmsd(&d1, &d2).unwrap();
        assert!((value - 1.9148542155).abs() < 1e-9);
        assert_eq!(value, rmsd(&d2, &d1).unwrap());
        assert_eq!(rmsd(&d1, &d1).unwrap(), 0.0);
    }

    #[test]
    fn test_spectral_angle() {
        let x = vec![1.0, 2.0, 3.0];
        let minus_x: Vec<f64> = x.iter().map(|v| -v).collect();
        assert!(spectral_angle(&x, &x).unwrap().abs() < 1e-9);
        assert!((spectral_angle(&x, &minus_x).unwrap() - PI).abs() < 1e-9);

        let orthogonal = vec![-2.0, 1.0, 0.0];
        assert!((spectral_angle(&x, &orthogonal).unwrap() - FRAC_PI_2).abs() < 1e-9);

        // All-zero input maps to a right angle instead of NaN.
        let zeros = vec![0.0, 0.0, 0.0];
        assert_eq!(spectral_angle(&x, &zeros).unwrap(), FRAC_PI_2);
        assert_eq!(spectral_angle(&zeros, &zeros).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let d1 = vec![1.0, 2.0];
        let d2 = vec![1.0, 2.0, 3.0];
        assert!(manhattan_distance(&d1, &d2).is_err());
        assert!(rmsd(&d1, &d2).is_err());
        assert!(spectral_angle(&d1, &d2).is_err());
    }
}
