// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for decoding and solving
//!
//! Each stage has its own closed set of failures so callers can branch on the
//! category. [`RootfitError`] wraps both for the end-to-end reconstruction.

use std::num::ParseIntError;
use thiserror::Error;

/// Failures while turning a digit string into an integer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A character is outside the alphabet or too large for the base
    #[error("Invalid digit '{digit}' for base {base}")]
    InvalidDigit { digit: char, base: u32 },

    /// A decimal literal could not be parsed
    #[error("Invalid decimal literal '{value}': {source}")]
    Format {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Empty digit string in a non-decimal base
    #[error("Empty digit string for base {base}")]
    Empty { base: u32 },

    /// The accumulated value left the i64 range
    #[error("Value '{value}' in base {base} overflows a 64-bit signed integer")]
    Overflow { value: String, base: u32 },

    /// Radix outside 2..=36 (0 is accepted as an alias for 10)
    #[error("Unsupported base {base}: expected 0 or a value in 2..=36")]
    UnsupportedBase { base: u32 },
}

/// Failures of the linear solver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Not enough equations, no unknowns, or a right-hand side of the wrong length
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    Dimension {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Pivot magnitude at or below the tolerance
    #[error("Matrix is singular or nearly singular at column {column} (|pivot| = {pivot:e})")]
    SingularMatrix { column: usize, pivot: f64 },
}

impl SolveError {
    /// Create a dimension mismatch error
    pub fn dimension(expected: usize, actual: usize, context: impl Into<String>) -> Self {
        SolveError::Dimension {
            context: context.into(),
            expected,
            actual,
        }
    }
}

/// Top-level error for the reconstruction pipeline
#[derive(Error, Debug)]
pub enum RootfitError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    /// Matrix construction errors (ragged rows)
    #[error("Matrix operation error: {message}")]
    Matrix { message: String },

    /// A sample failed to decode; carries the sample label for the message
    #[error("Sample '{label}': {source}")]
    Sample {
        label: String,
        #[source]
        source: DecodeError,
    },
}

/// Result type alias for reconstruction operations
pub type RootfitResult<T> = Result<T, RootfitError>;

impl RootfitError {
    /// Create a matrix error with a message
    pub fn matrix(message: impl Into<String>) -> Self {
        RootfitError::Matrix {
            message: message.into(),
        }
    }

    /// The underlying decode failure, if this error came from decoding.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            RootfitError::Decode(err) | RootfitError::Sample { source: err, .. } => Some(err),
            _ => None,
        }
    }

    /// The underlying solver failure, if this error came from solving.
    pub fn as_solve(&self) -> Option<&SolveError> {
        match self {
            RootfitError::Solve(err) => Some(err),
            _ => None,
        }
    }
}
