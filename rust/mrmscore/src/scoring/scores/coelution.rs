//! Co-elution reductions over lagged cross-correlation matrices.
//!
//! Each populated cell contributes the absolute lag at which its
//! correlation peaks; perfectly co-eluting traces peak at lag 0, so both
//! the mean and the spread of those deltas should be small.

use peakgroup::Array2D;

use crate::utils::correlation::XCorrArray;
use crate::utils::stats::{
    mean,
    sample_std,
};

/// Mean plus sample standard deviation (divisor `n - 1`) of the absolute
/// best-correlation lags over the populated cells.
///
/// Unpopulated cells (traces without intensity data) are skipped. Fewer
/// than two populated cells leave the spread undefined and score 0.
pub fn lag_spread<'a>(cells: impl Iterator<Item = &'a XCorrArray>) -> f64 {
    let deltas: Vec<f64> = cells
        .filter_map(|cell| cell.max_peak())
        .map(|(lag, _)| lag.unsigned_abs() as f64)
        .collect();
    if deltas.len() < 2 {
        return 0.0;
    }
    mean(&deltas) + sample_std(&deltas)
}

/// Per-row mean absolute best-correlation lag over the populated upper
/// cells (`col >= row`) of each row. Rows without a populated cell score
/// 0.
pub fn lag_row_means(matrix: &Array2D<XCorrArray>) -> Vec<f64> {
    (0..matrix.nrows())
        .map(|row| {
            let deltas: Vec<f64> = (row..matrix.ncols())
                .filter_map(|col| matrix.get(row, col).and_then(|c| c.max_peak()))
                .map(|(lag, _)| lag.unsigned_abs() as f64)
                .collect();
            mean(&deltas)
        })
        .collect()
}

/// Sum of the absolute best-correlation lags over the populated upper
/// cells, each weighted by the outer product of the per-trace weights
/// (`w_i * w_i` on the diagonal, `2 * w_i * w_j` off it, so every
/// unordered pair carries its full weight).
pub fn weighted_lag_sum(matrix: &Array2D<XCorrArray>, weights: &[f64]) -> f64 {
    assert_eq!(
        weights.len(),
        matrix.nrows(),
        "one weight per trace is required"
    );
    matrix
        .iter_upper_triangle()
        .filter_map(|(i, j, cell)| cell.max_peak().map(|(lag, _)| (i, j, lag)))
        .map(|(i, j, lag)| {
            let weight = if i == j {
                weights[i] * weights[i]
            } else {
                2.0 * weights[i] * weights[j]
            };
            lag.unsigned_abs() as f64 * weight
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(lag: i32, value: f64) -> XCorrArray {
        XCorrArray {
            data: vec![(lag, value)],
        }
    }

    #[test]
    fn test_lag_spread_skips_unpopulated() {
        let mut matrix = Array2D::new_with_default(2, 2, XCorrArray::default());
        matrix.insert(0, 0, cell(0, 1.0));
        matrix.insert(0, 1, cell(-3, 0.4));
        matrix.insert(1, 1, cell(0, 1.0));
        // (1, 0) stays empty and must not contribute.
        let score = lag_spread(matrix.iter_indexed().map(|(_, _, c)| c));
        assert!((score - (1.0 + 3f64.sqrt())).abs() < 1e-12);
    }

    #[test]
    fn test_lag_spread_degenerate() {
        let empty = Array2D::new_with_default(2, 2, XCorrArray::default());
        assert_eq!(lag_spread(empty.iter_indexed().map(|(_, _, c)| c)), 0.0);

        let mut single = Array2D::new_with_default(1, 1, XCorrArray::default());
        single.insert(0, 0, cell(0, 1.0));
        assert_eq!(lag_spread(single.iter_indexed().map(|(_, _, c)| c)), 0.0);
    }

    #[test]
    fn test_weighted_lag_sum() {
        let mut matrix = Array2D::new_with_default(2, 2, XCorrArray::default());
        matrix.insert(0, 0, cell(0, 1.0));
        matrix.insert(0, 1, cell(-3, 0.4));
        matrix.insert(1, 1, cell(0, 1.0));
        // 0*0.25 + 3*2*0.25 + 0*0.25
        assert_eq!(weighted_lag_sum(&matrix, &[0.5, 0.5]), 1.5);
    }
}
