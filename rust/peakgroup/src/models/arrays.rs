use std::fmt::Debug;

use crate::errors::{
    DataProcessingError,
    Result,
};

/// Dense row-major 2D container.
///
/// `values` is a flattened array of values, `major_dim` is the number of
/// values in each row and `minor_dim` is the number of rows. Values that
/// belong to the same row are adjacent in memory.
///
/// Pairwise score matrices only ever populate a subset of their cells
/// (the upper triangle for square matrices built from a single trace
/// collection), so construction with a default cell value plus
/// [`Array2D::iter_upper_triangle`] keeps that contract in one place
/// instead of scattering `row <= col` checks through the call sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Array2D<T: Clone> {
    values: Vec<T>,
    major_dim: usize,
    minor_dim: usize,
}

impl<T: Clone> Array2D<T> {
    pub fn new<S: AsRef<[T]>, C: AsRef<[S]>>(values: C) -> Result<Array2D<T>> {
        let nrows = values.as_ref().len();
        if nrows == 0 {
            return Err(DataProcessingError::ExpectedNonEmptyData { context: None });
        }
        let ncols = values.as_ref()[0].as_ref().len();
        if ncols == 0 {
            return Err(DataProcessingError::ExpectedNonEmptyData { context: None });
        }

        let expected_size = nrows * ncols;
        let values: Vec<T> = values
            .as_ref()
            .iter()
            .flat_map(|x| x.as_ref())
            .cloned()
            .collect();

        if values.len() != expected_size {
            return Err(DataProcessingError::ExpectedVectorSameLength);
        }

        Ok(Array2D {
            values,
            major_dim: ncols,
            minor_dim: nrows,
        })
    }

    /// Builds an `nrows x ncols` array with every cell set to `value`.
    ///
    /// Zero-sized dimensions are allowed; the resulting array simply has
    /// nothing to iterate.
    pub fn new_with_default(nrows: usize, ncols: usize, value: T) -> Array2D<T> {
        Array2D {
            values: vec![value; nrows * ncols],
            major_dim: ncols,
            minor_dim: nrows,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.minor_dim || col >= self.major_dim {
            return None;
        }
        Some(&self.values[row * self.major_dim + col])
    }

    pub fn insert(&mut self, row_idx: usize, col_idx: usize, value: T) {
        let idx = row_idx * self.major_dim + col_idx;
        self.values[idx] = value;
    }

    pub fn get_row(&self, index: usize) -> Option<&[T]> {
        let start = index * self.major_dim;
        let end = start + self.major_dim;
        if end > self.values.len() || start >= self.values.len() {
            return None;
        }
        Some(&self.values[start..end])
    }

    pub fn nrows(&self) -> usize {
        self.minor_dim
    }

    pub fn ncols(&self) -> usize {
        self.major_dim
    }

    /// Iterates every cell in row-major order as `(row, col, value)`.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx / self.major_dim, idx % self.major_dim, v))
    }

    /// Iterates the cells with `col >= row` in row-major order.
    ///
    /// For a rectangular array this is the generalized upper triangle:
    /// rows beyond the column count contribute no cells.
    ///
    /// ```
    /// use peakgroup::Array2D;
    ///
    /// let arr = Array2D::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
    /// let upper: Vec<(usize, usize, i32)> =
    ///     arr.iter_upper_triangle().map(|(i, j, v)| (i, j, *v)).collect();
    /// assert_eq!(upper, vec![(0, 0, 1), (0, 1, 2), (1, 1, 4)]);
    /// ```
    pub fn iter_upper_triangle(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        self.iter_indexed().filter(|(row, col, _)| col >= row)
    }
}
