// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Polynomial coefficient recovery from encoded roots.
//!
//! Given `n` roots `x_0, ..., x_{n-1}`, each written as a digit string in some
//! base between 2 and 36, this crate recovers the `k` coefficients of a
//! polynomial `a₀ + a₁x + ... + a_{k-1}x^{k-1}` vanishing at those roots.
//!
//! ## Pipeline
//!
//! 1. [`decode`] turns each digit string into an exact `i64`.
//! 2. [`build_vandermonde`] assembles the `n x k` matrix `V[i][j] = x_i^j`.
//! 3. [`solve`] runs Gaussian elimination with partial pivoting against the
//!    all-zero right-hand side.
//!
//! [`reconstruct`] chains the three steps.
//!
//! ## Overdetermined systems
//!
//! With `n > k` every row takes part in pivot selection but only `k` rows end
//! up in the triangular system; the others are not checked for consistency.
//! [`Reconstruction::unverified_rows`] reports how many were left out.

pub mod decoder;
pub mod elimination;
pub mod errors;
pub mod matrix;
pub mod utils;
pub mod vandermonde;

pub use decoder::{decode, decode_with_policy, encode, OverflowPolicy};
pub use elimination::{eliminate, residual, solve, solve_with_tolerance, PIVOT_EPSILON};
pub use errors::{DecodeError, RootfitError, RootfitResult, SolveError};
pub use matrix::DenseMatrix;
pub use vandermonde::{
    build_vandermonde, decode_samples, reconstruct, ReconstructOptions, Reconstruction, Sample,
};
