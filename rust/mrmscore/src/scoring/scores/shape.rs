//! Peak-shape reductions over lagged cross-correlation matrices.
//!
//! Where co-elution looks at *which* lag each cell peaks at, shape looks
//! at *how strong* the correlation is at that peak: similar peak shapes
//! correlate close to 1 at their best alignment.

use peakgroup::Array2D;

use crate::utils::correlation::XCorrArray;
use crate::utils::stats::mean;

/// Mean best-lag correlation value over the populated cells; 0 when
/// nothing is populated.
pub fn peak_value_mean<'a>(cells: impl Iterator<Item = &'a XCorrArray>) -> f64 {
    let values: Vec<f64> = cells
        .filter_map(|cell| cell.max_peak())
        .map(|(_, value)| value)
        .collect();
    mean(&values)
}

/// Per-row mean best-lag correlation value over the populated upper
/// cells (`col >= row`) of each row.
pub fn peak_value_row_means(matrix: &Array2D<XCorrArray>) -> Vec<f64> {
    (0..matrix.nrows())
        .map(|row| {
            let values: Vec<f64> = (row..matrix.ncols())
                .filter_map(|col| matrix.get(row, col).and_then(|c| c.max_peak()))
                .map(|(_, value)| value)
                .collect();
            mean(&values)
        })
        .collect()
}

/// Sum of the best-lag correlation values over the populated upper
/// cells, weighted by the outer product of the per-trace weights
/// (`w_i * w_i` on the diagonal, `2 * w_i * w_j` off it).
pub fn weighted_peak_value_sum(matrix: &Array2D<XCorrArray>, weights: &[f64]) -> f64 {
    assert_eq!(
        weights.len(),
        matrix.nrows(),
        "one weight per trace is required"
    );
    matrix
        .iter_upper_triangle()
        .filter_map(|(i, j, cell)| cell.max_peak().map(|(_, value)| (i, j, value)))
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
