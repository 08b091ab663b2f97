// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Assembly of the root-fitting system and the end-to-end reconstruction.
//!
//! For samples `x_0, ..., x_{n-1}` and `k` requested coefficients the system is
//! the `n x k` Vandermonde matrix `V[i][j] = x_i^j` against an all-zero
//! right-hand side, since every sample is a root.

use crate::decoder::{decode_with_policy, OverflowPolicy};
use crate::elimination::{residual, solve_with_tolerance, PIVOT_EPSILON};
use crate::errors::{RootfitError, RootfitResult, SolveError};
use crate::matrix::DenseMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One encoded x-coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Name used in error messages and logs
    pub label: String,
    /// Digit string
    pub value: String,
    /// Radix of `value` (0 means 10)
    pub base: u32,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: impl Into<String>, base: u32) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            base,
        }
    }
}

/// Knobs for [`reconstruct`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructOptions {
    /// Absolute pivot tolerance
    pub tolerance: f64,
    pub overflow: OverflowPolicy,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            tolerance: PIVOT_EPSILON,
            overflow: OverflowPolicy::Checked,
        }
    }
}

/// Outcome of [`reconstruct`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    /// `coefficients[j]` multiplies `x^j`
    pub coefficients: Vec<f64>,
    /// Decoded x-coordinates in sample order
    pub roots: Vec<i64>,
    /// Surplus equations (`n - k`) whose consistency was not checked
    pub unverified_rows: usize,
    /// `max |V · c|` over every sample, including the unverified ones
    pub residual: f64,
}

/// Decode every sample's x-coordinate, tagging failures with the sample label.
pub fn decode_samples(samples: &[Sample], overflow: OverflowPolicy) -> RootfitResult<Vec<i64>> {
    samples
        .iter()
        .map(|sample| {
            decode_with_policy(&sample.value, sample.base, overflow).map_err(|source| {
                RootfitError::Sample {
                    label: sample.label.clone(),
                    source,
                }
            })
        })
        .collect()
}

/// Build the `xs.len() x k` matrix whose row `i` is `[x_i^0, ..., x_i^(k-1)]`.
///
/// # Errors
///
/// [`SolveError::Dimension`] when `k == 0` or there are fewer points than
/// coefficients.
pub fn build_vandermonde(xs: &[i64], k: usize) -> Result<DenseMatrix, SolveError> {
    if k == 0 {
        return Err(SolveError::dimension(1, 0, "coefficients"));
    }
    if xs.len() < k {
        return Err(SolveError::dimension(k, xs.len(), "sample points"));
    }

    let mut matrix = DenseMatrix::zeros(xs.len(), k);
    for (i, &x) in xs.iter().enumerate() {
        let x = x as f64;
        for j in 0..k {
            matrix[(i, j)] = x.powi(j as i32);
        }
    }
    Ok(matrix)
}

/// Recover `k` polynomial coefficients from encoded roots.
///
/// # Example
///
/// ```
/// use rootfit_solver::{reconstruct, ReconstructOptions, Sample};
///
/// let samples = vec![
///     Sample::new("1", "1", 10),
///     Sample::new("2", "10", 2),
///     Sample::new("3", "3", 10),
/// ];
/// let result = reconstruct(&samples, 3, ReconstructOptions::default()).unwrap();
/// assert_eq!(result.roots, vec![1, 2, 3]);
/// assert!(result.residual < 1e-6);
/// ```
pub fn reconstruct(
    samples: &[Sample],
    k: usize,
    options: ReconstructOptions,
) -> RootfitResult<Reconstruction> {
    if samples.len() < k {
        return Err(SolveError::dimension(k, samples.len(), "sample points").into());
    }

    let roots = decode_samples(samples, options.overflow)?;
    let matrix = build_vandermonde(&roots, k)?;
    let rhs = vec![0.0; roots.len()];
    debug!(rows = matrix.rows(), cols = matrix.cols(), "assembled system");

    let coefficients = solve_with_tolerance(matrix.clone(), rhs.clone(), options.tolerance)?;
    let residual = residual(&matrix, &coefficients, &rhs);
    let unverified_rows = roots.len() - k;

    info!(
        points = roots.len(),
        k,
        unverified_rows,
        residual,
        "reconstructed coefficients"
    );

    Ok(Reconstruction {
        coefficients,
        roots,
        unverified_rows,
        residual,
    })
}
