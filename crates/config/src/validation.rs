// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::str::FromStr;

use anyhow::{bail, ensure};

/// Largest number of decimal places an f64 can meaningfully show.
pub const MAX_PRECISION: usize = 17;

/// A strictly positive, finite tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidTolerance(f64);

impl ValidTolerance {
    pub fn new(value: f64) -> anyhow::Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            bail!("Tolerance must be a positive finite number, got {}", value);
        }
        Ok(ValidTolerance(value))
    }
}

impl FromStr for ValidTolerance {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ValidTolerance::new(s.parse::<f64>()?)
    }
}

impl From<ValidTolerance> for f64 {
    fn from(value: ValidTolerance) -> Self {
        value.0
    }
}

pub fn validate_precision(precision: usize) -> anyhow::Result<()> {
    ensure!(
        precision <= MAX_PRECISION,
        "Precision must be at most {} decimal places, got {}",
        MAX_PRECISION,
        precision
    );
    Ok(())
}
