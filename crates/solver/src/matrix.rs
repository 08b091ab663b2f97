// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Dense real matrices with dimension validation.

use crate::errors::{RootfitError, RootfitResult};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A row-major `rows x cols` matrix of `f64`.
///
/// Dimensions are validated at construction; rows can be swapped in place,
/// which is the only structural mutation elimination needs.
///
/// # Example
///
/// ```
/// use rootfit_solver::DenseMatrix;
///
/// let matrix = DenseMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(matrix.rows(), 2);
/// assert_eq!(matrix.cols(), 2);
/// assert_eq!(matrix[(1, 0)], 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct DenseMatrix {
    data: Vec<Vec<f64>>,
    rows: usize,
    cols: usize,
}

impl DenseMatrix {
    /// Creates a new matrix from row data, validating dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if rows have inconsistent lengths.
    pub fn new(data: Vec<Vec<f64>>) -> RootfitResult<Self> {
        if data.is_empty() {
            return Ok(Self {
                data,
                rows: 0,
                cols: 0,
            });
        }

        let rows = data.len();
        let cols = data[0].len();

        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(RootfitError::matrix(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }

        Ok(Self { data, rows, cols })
    }

    /// Creates a zero matrix of the specified dimensions.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![vec![0.0; cols]; rows],
            rows,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns a reference to the underlying rows.
    pub fn data(&self) -> &[Vec<f64>] {
        &self.data
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    /// Mutable access to row `target` alongside shared access to row `source`.
    ///
    /// # Panics
    ///
    /// Panics if `target == source` or either index is out of bounds.
    pub fn row_pair_mut(&mut self, target: usize, source: usize) -> (&mut [f64], &[f64]) {
        assert_ne!(target, source, "row_pair_mut needs two distinct rows");
        if target < source {
            let (head, tail) = self.data.split_at_mut(source);
            (head[target].as_mut_slice(), tail[0].as_slice())
        } else {
            let (head, tail) = self.data.split_at_mut(target);
            (tail[0].as_mut_slice(), head[source].as_slice())
        }
    }

    /// Computes `self · x`.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() != self.cols()`.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        assert_eq!(x.len(), self.cols, "vector length must match columns");
        self.data
            .iter()
            .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
            .collect()
    }
}

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row][col]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row][col]
    }
}

impl From<DenseMatrix> for Vec<Vec<f64>> {
    fn from(matrix: DenseMatrix) -> Self {
        matrix.data
    }
}

impl TryFrom<Vec<Vec<f64>>> for DenseMatrix {
    type Error = RootfitError;

    fn try_from(data: Vec<Vec<f64>>) -> RootfitResult<Self> {
        Self::new(data)
    }
}
