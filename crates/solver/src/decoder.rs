// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Positional-notation decoding of digit strings in bases 2 through 36.

use crate::errors::DecodeError;
use serde::{Deserialize, Serialize};

/// Digit alphabet shared by decoding and encoding.
pub const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// How the non-decimal accumulator behaves when it leaves the i64 range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail with [`DecodeError::Overflow`]
    #[default]
    Checked,
    /// Two's-complement wraparound, bit-compatible with the legacy tool
    Wrapping,
}

/// Decode `value` written in `base`, failing loudly on overflow.
///
/// A base of `0` or `10` parses a signed decimal literal.
///
/// # Example
///
/// ```
/// use rootfit_solver::decode;
///
/// assert_eq!(decode("ff", 16).unwrap(), 255);
/// assert_eq!(decode("-42", 10).unwrap(), -42);
/// ```
pub fn decode(value: &str, base: u32) -> Result<i64, DecodeError> {
    decode_with_policy(value, base, OverflowPolicy::Checked)
}

/// Decode `value` written in `base` with an explicit overflow policy.
///
/// The policy only affects non-decimal bases: decimal literals outside the
/// i64 range are always a [`DecodeError::Format`].
pub fn decode_with_policy(
    value: &str,
    base: u32,
    policy: OverflowPolicy,
) -> Result<i64, DecodeError> {
    if base == 0 || base == 10 {
        return value.parse::<i64>().map_err(|source| DecodeError::Format {
            value: value.to_string(),
            source,
        });
    }
    check_base(base)?;

    if value.is_empty() {
        return Err(DecodeError::Empty { base });
    }

    let radix = i64::from(base);
    let mut result: i64 = 0;
    for c in value.chars() {
        let digit = digit_value(c, base)?;
        result = match policy {
            OverflowPolicy::Checked => result
                .checked_mul(radix)
                .and_then(|r| r.checked_add(digit))
                .ok_or_else(|| DecodeError::Overflow {
                    value: value.to_string(),
                    base,
                })?,
            OverflowPolicy::Wrapping => result.wrapping_mul(radix).wrapping_add(digit),
        };
    }

    Ok(result)
}

/// Render `value` in `base` using uppercase digits.
pub fn encode(value: i64, base: u32) -> Result<String, DecodeError> {
    let base = if base == 0 { 10 } else { base };
    check_base(base)?;

    let mut magnitude = value.unsigned_abs();
    if magnitude == 0 {
        return Ok("0".to_string());
    }

    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(DIGITS[(magnitude % u64::from(base)) as usize]);
        magnitude /= u64::from(base);
    }
    if value < 0 {
        digits.push(b'-');
    }
    digits.reverse();

    // Every byte comes from DIGITS or is '-'
    Ok(digits.into_iter().map(char::from).collect())
}

fn check_base(base: u32) -> Result<(), DecodeError> {
    if (MIN_BASE..=MAX_BASE).contains(&base) {
        Ok(())
    } else {
        Err(DecodeError::UnsupportedBase { base })
    }
}

fn digit_value(c: char, base: u32) -> Result<i64, DecodeError> {
    let upper = c.to_ascii_uppercase();
    DIGITS
        .iter()
        .position(|&d| char::from(d) == upper)
        .map(|d| d as u32)
        .filter(|&d| d < base)
        .map(i64::from)
        .ok_or(DecodeError::InvalidDigit { digit: c, base })
}
