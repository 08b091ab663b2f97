// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::matrix::DenseMatrix;
use std::fmt::Write;

/// Render a matrix as aligned rows, e.g. for trace logging of the assembled system.
pub fn format_matrix(name: &str, matrix: &DenseMatrix, precision: usize) -> String {
    let cells: Vec<Vec<String>> = matrix
        .data()
        .iter()
        .map(|row| row.iter().map(|v| format_cell(*v, precision)).collect())
        .collect();

    let max_width = cells
        .iter()
        .flat_map(|row| row.iter())
        .map(|s| s.len())
        .max()
        .unwrap_or(1);

    let mut out = format!("{} ({}x{}):\n", name, matrix.rows(), matrix.cols());
    for row in cells {
        let padded: Vec<String> = row
            .iter()
            .map(|s| format!("{:>width$}", s, width = max_width))
            .collect();
        // Writing into a String cannot fail
        let _ = writeln!(out, "  [{}]", padded.join(", "));
    }
    out
}

fn format_cell(value: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, value);
    // Very large powers are shown in scientific notation
    if s.len() > 16 {
        format!("{:.*e}", precision, value)
    } else {
        s
    }
}
