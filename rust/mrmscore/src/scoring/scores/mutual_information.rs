//! Reductions over ranked-mutual-information matrices.
//!
//! MI cells are plain scalars (there is no lag dimension), so every
//! reduction is an average or weighted sum over the cells that the
//! matrix topology populates. Traces without signal leave their cells at
//! 0, which is also the natural MI of a constant trace, so they simply
//! drag the average down instead of being special-cased.

use peakgroup::Array2D;

use crate::utils::stats::mean;

/// Mean over the given cells; 0 when there are none.
pub fn mi_mean<'a>(cells: impl Iterator<Item = &'a f64>) -> f64 {
    let values: Vec<f64> = cells.copied().collect();
    mean(&values)
}

/// Per-row mean over the upper cells (`col >= row`) of each row.
pub fn mi_row_means(matrix: &Array2D<f64>) -> Vec<f64> {
    (0..matrix.nrows())
        .map(|row| {
            let values: Vec<f64> = (row..matrix.ncols())
                .filter_map(|col| matrix.get(row, col).copied())
                .collect();
            mean(&values)
        })
        .collect()
}

/// Sum over the upper cells, weighted by the outer product of the
/// per-trace weights (`w_i * w_i` on the diagonal, `2 * w_i * w_j` off
/// it).
pub fn weighted_mi_sum(matrix: &Array2D<f64>, weights: &[f64]) -> f64 {
    assert_eq!(
        weights.len(),
        matrix.nrows(),
        "one weight per trace is required"
    );
    matrix
        .iter_upper_triangle()
        .map(|(i, j, value)| {
            let weight = if i == j {
                weights[i] * weights[i]
            } else {
                2.0 * weights[i] * weights[j]
            };
            value * weight
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mi_mean_and_rows() {
        let mut matrix = Array2D::new_with_default(2, 2, 0.0f64);
        matrix.insert(0, 0, 3.0);
        matrix.insert(0, 1, 1.0);
        matrix.insert(1, 1, 2.0);
        assert_eq!(mi_mean(matrix.iter_upper_triangle().map(|(_, _, v)| v)), 2.0);
        assert_eq!(mi_row_means(&matrix), vec![2.0, 2.0]);
    }

    #[test]
    fn test_weighted_mi_sum() {
        let mut matrix = Array2D::new_with_default(2, 2, 0.0f64);
        matrix.insert(0, 0, 3.0);
        matrix.insert(0, 1, 1.0);
        matrix.insert(1, 1, 2.0);
        // 3*0.25 + 1*2*0.25 + 2*0.25
        assert_eq!(weighted_mi_sum(&matrix, &[0.5, 0.5]), 1.75);
    }
}
