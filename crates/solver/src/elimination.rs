// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Gaussian elimination with partial pivoting over an `n x k` system.
//!
//! The system `A · x = b` may have more equations than unknowns (`n > k`).
//! Elimination runs over all `n` rows but only the `k` columns, so surplus
//! rows compete for pivots yet their reduced equations are never checked.
//! The returned vector exactly satisfies the `k` rows that end up forming the
//! upper-triangular block.

use crate::errors::SolveError;
use crate::matrix::DenseMatrix;
use tracing::{debug, trace};

/// Absolute pivot magnitude at or below which the system is singular.
///
/// Non-finite pivots are treated as singular regardless of the tolerance.
pub const PIVOT_EPSILON: f64 = 1e-12;

/// Solve `a · x = b`, consuming both inputs.
///
/// # Example
///
/// ```
/// use rootfit_solver::{solve, DenseMatrix};
///
/// let a = DenseMatrix::new(vec![vec![2.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let x = solve(a, vec![3.0, 5.0]).unwrap();
/// assert!((x[0] - 0.8).abs() < 1e-12);
/// assert!((x[1] - 1.4).abs() < 1e-12);
/// ```
pub fn solve(a: DenseMatrix, b: Vec<f64>) -> Result<Vec<f64>, SolveError> {
    solve_with_tolerance(a, b, PIVOT_EPSILON)
}

/// Solve `a · x = b` with a caller-chosen absolute pivot tolerance.
pub fn solve_with_tolerance(
    mut a: DenseMatrix,
    mut b: Vec<f64>,
    tolerance: f64,
) -> Result<Vec<f64>, SolveError> {
    eliminate(&mut a, &mut b, tolerance)
}

/// Reduce `a` and `b` in place and back-substitute.
///
/// On return (successful or not) `a` and `b` hold the partially or fully
/// reduced system with rows permuted; they no longer describe the original
/// equations.
pub fn eliminate(
    a: &mut DenseMatrix,
    b: &mut [f64],
    tolerance: f64,
) -> Result<Vec<f64>, SolveError> {
    let n = a.rows();
    let k = a.cols();

    if k == 0 {
        return Err(SolveError::dimension(1, 0, "unknowns"));
    }
    if n < k {
        return Err(SolveError::dimension(k, n, "equations"));
    }
    if b.len() != n {
        return Err(SolveError::dimension(n, b.len(), "right-hand side"));
    }

    for p in 0..k {
        let max = pivot_row(a, p);
        if max != p {
            trace!(column = p, from = max, "swapping pivot row");
            a.swap_rows(p, max);
            b.swap(p, max);
        }

        let pivot = a[(p, p)];
        if !(pivot.is_finite() && pivot.abs() > tolerance) {
            debug!(column = p, pivot, "pivot below tolerance");
            return Err(SolveError::SingularMatrix { column: p, pivot });
        }

        for i in (p + 1)..n {
            let alpha = a[(i, p)] / pivot;
            b[i] -= alpha * b[p];
            let (row, pivot_values) = a.row_pair_mut(i, p);
            for (cell, above) in row[p..k].iter_mut().zip(&pivot_values[p..k]) {
                *cell -= alpha * above;
            }
        }
    }

    if n > k {
        debug!(unverified = n - k, "surplus equations not checked");
    }

    Ok(back_substitute(a, b))
}

/// Row in `p..n` with the largest `|a[i][p]|`; the earliest wins ties.
fn pivot_row(a: &DenseMatrix, p: usize) -> usize {
    let mut max = p;
    for i in (p + 1)..a.rows() {
        if a[(i, p)].abs() > a[(max, p)].abs() {
            max = i;
        }
    }
    max
}

fn back_substitute(a: &DenseMatrix, b: &[f64]) -> Vec<f64> {
    let k = a.cols();
    let mut x = vec![0.0; k];
    for i in (0..k).rev() {
        let sum: f64 = ((i + 1)..k).map(|j| a[(i, j)] * x[j]).sum();
        x[i] = (b[i] - sum) / a[(i, i)];
    }
    x
}

/// Largest absolute entry of `a · x - b`, or NaN if any entry is NaN.
///
/// # Panics
///
/// Panics if `x.len() != a.cols()` or `b.len() != a.rows()`.
pub fn residual(a: &DenseMatrix, x: &[f64], b: &[f64]) -> f64 {
    assert_eq!(b.len(), a.rows(), "right-hand side length must match rows");
    a.mul_vec(x)
        .iter()
        .zip(b)
        .map(|(ax, bi)| (ax - bi).abs())
        // NaN sticks once seen: `diff > NaN` is false
        .fold(0.0, |worst, diff| {
            if diff.is_nan() || diff > worst {
                diff
            } else {
                worst
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn matrix(rows: &[&[f64]]) -> DenseMatrix {
        DenseMatrix::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_solves_square_system() {
        let a = matrix(&[&[2.0, 1.0, -1.0], &[-3.0, -1.0, 2.0], &[-2.0, 1.0, 2.0]]);
        let b = vec![8.0, -11.0, -3.0];
        let x = solve(a.clone(), b.clone()).unwrap();
        let expected = [2.0, 3.0, -1.0];
        for (got, want) in x.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {:?}", x);
        }
        assert!(residual(&a, &x, &b) < 1e-9);
    }

    #[test]
    fn test_requires_pivoting() {
        // Zero in the leading position; fails without a row swap
        let a = matrix(&[&[0.0, 1.0], &[1.0, 0.0]]);
        let x = solve(a, vec![4.0, 7.0]).unwrap();
        assert_eq!(x, vec![7.0, 4.0]);
    }

    #[test]
    fn test_duplicate_rows_are_singular() {
        let a = matrix(&[&[1.0, 2.0, 4.0], &[1.0, 2.0, 4.0], &[1.0, 3.0, 9.0]]);
        let err = solve(a, vec![0.0; 3]).unwrap_err();
        assert!(matches!(err, SolveError::SingularMatrix { .. }));
    }

    #[test]
    fn test_singular_reports_column() {
        let a = matrix(&[&[1.0, 2.0], &[2.0, 4.0]]);
        match solve(a, vec![1.0, 2.0]) {
            Err(SolveError::SingularMatrix { column, .. }) => assert_eq!(column, 1),
            other => panic!("expected singular matrix, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_column_singular_at_first_column() {
        let a = matrix(&[&[0.0, 1.0], &[0.0, 2.0]]);
        let err = solve(a, vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            SolveError::SingularMatrix {
                column: 0,
                pivot: 0.0
            }
        );
    }

    #[test]
    fn test_fewer_equations_than_unknowns() {
        let a = matrix(&[&[1.0, 2.0, 3.0]]);
        let err = solve(a, vec![1.0]).unwrap_err();
        assert_eq!(err, SolveError::dimension(3, 1, "equations"));
    }

    #[test]
    fn test_dimension_checked_before_elimination() {
        let mut a = matrix(&[&[0.0, 5.0, 1.0], &[3.0, 1.0, 2.0]]);
        let mut b = vec![1.0, 2.0];
        let before = a.clone();
        assert!(matches!(
            eliminate(&mut a, &mut b, PIVOT_EPSILON),
            Err(SolveError::Dimension { .. })
        ));
        assert_eq!(a, before);
        assert_eq!(b, vec![1.0, 2.0]);
    }

    #[test]
    fn test_no_unknowns() {
        let a = DenseMatrix::zeros(3, 0);
        assert!(matches!(
            solve(a, vec![0.0; 3]),
            Err(SolveError::Dimension { .. })
        ));
    }

    #[test]
    fn test_rhs_length_mismatch() {
        let a = matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert_eq!(
            solve(a, vec![1.0]).unwrap_err(),
            SolveError::dimension(2, 1, "right-hand side")
        );
    }

    #[test]
    fn test_overdetermined_ignores_surplus_rows() {
        // Third equation contradicts the first two but is never checked
        let a = matrix(&[&[1.0, 0.0], &[0.0, 1.0], &[0.5, 0.5]]);
        let b = vec![1.0, 2.0, 100.0];
        let x = solve(a.clone(), b.clone()).unwrap();
        assert_eq!(x, vec![1.0, 2.0]);
        assert!(residual(&a, &x, &b) > 1.0);
    }

    #[test]
    fn test_surplus_row_can_win_pivot() {
        // Row 2 has the largest leading entry and becomes the first pivot
        let a = matrix(&[&[1.0, 1.0], &[1.0, 2.0], &[4.0, 0.0]]);
        let b = vec![2.0, 3.0, 4.0];
        let x = solve(a, b).unwrap();
        // Pivots come from rows 2 and 1; row 0 is left unchecked
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tolerance_is_absolute() {
        let a = matrix(&[&[1e-13, 0.0], &[0.0, 1.0]]);
        assert!(matches!(
            solve(a.clone(), vec![1.0, 1.0]),
            Err(SolveError::SingularMatrix { column: 0, .. })
        ));
        let x = solve_with_tolerance(a, vec![1e-13, 1.0], 1e-15).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_pivot_is_singular() {
        let a = matrix(&[&[f64::NAN, 1.0], &[1.0, 2.0]]);
        match solve(a, vec![1.0, 1.0]) {
            Err(SolveError::SingularMatrix { column, pivot }) => {
                assert_eq!(column, 0);
                assert!(pivot.is_nan());
            }
            other => panic!("expected singular matrix, got {:?}", other),
        }

        let a = matrix(&[&[f64::INFINITY, 1.0], &[1.0, 2.0]]);
        assert!(matches!(
            solve(a, vec![1.0, 1.0]),
            Err(SolveError::SingularMatrix { column: 0, .. })
        ));

        // NaN introduced by elimination surfaces at the next pivot
        let a = matrix(&[&[2.0, f64::NAN], &[1.0, 1.0]]);
        assert!(matches!(
            solve(a, vec![1.0, 1.0]),
            Err(SolveError::SingularMatrix { column: 1, .. })
        ));
    }

    #[test]
    fn test_residual_propagates_nan() {
        let identity = matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert!(residual(&identity, &[f64::NAN, f64::NAN], &[0.0, 0.0]).is_nan());
        assert!(residual(&identity, &[1.0, f64::NAN], &[0.0, 0.0]).is_nan());
        assert!(residual(&identity, &[f64::NAN, 5.0], &[0.0, 0.0]).is_nan());
        assert_eq!(residual(&identity, &[1.0, -3.0], &[0.0, 0.0]), 3.0);
    }

    #[test]
    fn test_eliminate_leaves_upper_triangle() {
        let mut a = matrix(&[&[1.0, 2.0], &[3.0, 4.0]]);
        let mut b = vec![5.0, 6.0];
        eliminate(&mut a, &mut b, PIVOT_EPSILON).unwrap();
        assert_eq!(a.row(0), &[3.0, 4.0]);
        assert!(a[(1, 0)].abs() < 1e-15);
        assert_eq!(b[0], 6.0);
    }

    /// Diagonally dominant systems are non-singular by construction.
    fn arb_square_system() -> impl Strategy<Value = (DenseMatrix, Vec<f64>)> {
        (1usize..=8).prop_flat_map(|k| {
            (
                prop::collection::vec(prop::collection::vec(-10.0f64..10.0, k), k),
                prop::collection::vec(-100.0f64..100.0, k),
            )
                .prop_map(move |(mut rows, b)| {
                    for (i, row) in rows.iter_mut().enumerate() {
                        let off: f64 = row.iter().map(|v| v.abs()).sum();
                        row[i] = off + 1.0;
                    }
                    (DenseMatrix::new(rows).unwrap(), b)
                })
        })
    }

    proptest! {
        #[test]
        fn solution_satisfies_original_system((a, b) in arb_square_system()) {
            let x = solve(a.clone(), b.clone()).unwrap();
            prop_assert_eq!(x.len(), a.cols());
            prop_assert!(residual(&a, &x, &b) < 1e-6);
        }
    }
}
